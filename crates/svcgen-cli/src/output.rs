//! Persisting generated artifacts.
//!
//! The library crates only produce in-memory artifacts; this module is
//! where their overwrite and merge policy meets the filesystem:
//!
//! - missing file: created, parent directories included
//! - `overwrite`: replaced
//! - `merge`: content appended unless the file already contains it
//! - neither: left untouched
//!
//! Artifact paths are rendered from declaration data, so every target is
//! checked to stay under the output root before anything is written.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use svcgen_codegen::Artifact;
use tracing::debug;

/// What happened to one artifact on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    /// File did not exist and was written
    Created,
    /// Existing file was replaced
    Overwritten,
    /// Content was appended to an existing file
    Merged,
    /// Existing file already contained the content
    Unchanged,
    /// Existing file was kept; the artifact allows neither overwrite nor merge
    Skipped,
}

/// Decides what writing `artifact` over the file at `target` would do,
/// without touching the filesystem.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read for a merge.
pub fn plan(artifact: &Artifact, target: &Path) -> Result<WriteOutcome> {
    if !target.exists() {
        return Ok(WriteOutcome::Created);
    }
    if artifact.descriptor.overwrite {
        return Ok(WriteOutcome::Overwritten);
    }
    if artifact.descriptor.merge {
        let existing = fs::read_to_string(target)
            .with_context(|| format!("failed to read {}", target.display()))?;
        return Ok(if existing.contains(artifact.content()) {
            WriteOutcome::Unchanged
        } else {
            WriteOutcome::Merged
        });
    }
    Ok(WriteOutcome::Skipped)
}

/// Resolves where `artifact` goes under `root`.
///
/// # Errors
///
/// Returns an error if the artifact path is absolute or contains `..`.
pub fn target_path(root: &Path, artifact: &Artifact) -> Result<PathBuf> {
    let relative = artifact.relative_path();
    if let Some(component) = relative
        .components()
        .find(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        bail!(
            "artifact path '{}' escapes the output root ({component:?})",
            relative.display()
        );
    }
    Ok(root.join(relative))
}

/// Writes `artifact` under `root` according to its policy.
///
/// Returns the target path and what was done.
///
/// # Errors
///
/// Returns an error if the artifact path escapes `root`, a directory
/// cannot be created, or the file cannot be read or written.
pub fn write_artifact(root: &Path, artifact: &Artifact) -> Result<(PathBuf, WriteOutcome)> {
    let target = target_path(root, artifact)?;
    let outcome = persist(&target, artifact)?;
    Ok((target, outcome))
}

/// Writes `artifact` to an already resolved `target` according to its
/// policy.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the file cannot
/// be read or written.
pub fn persist(target: &Path, artifact: &Artifact) -> Result<WriteOutcome> {
    let outcome = plan(artifact, target)?;

    match outcome {
        WriteOutcome::Created | WriteOutcome::Overwritten => {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(target, artifact.content())
                .with_context(|| format!("failed to write {}", target.display()))?;
        }
        WriteOutcome::Merged => {
            let mut file = OpenOptions::new()
                .append(true)
                .open(target)
                .with_context(|| format!("failed to open {}", target.display()))?;
            file.write_all(artifact.content().as_bytes())
                .with_context(|| format!("failed to append to {}", target.display()))?;
        }
        WriteOutcome::Unchanged | WriteOutcome::Skipped => {}
    }

    debug!(path = %target.display(), outcome = ?outcome, "persisted artifact");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcgen_codegen::ArtifactDescriptor;
    use tempfile::TempDir;

    fn artifact(content: &str, overwrite: bool, merge: bool) -> Artifact {
        artifact_at("pkg/logging", content, overwrite, merge)
    }

    fn artifact_at(path: &str, content: &str, overwrite: bool, merge: bool) -> Artifact {
        let mut descriptor = ArtifactDescriptor::new("go", path, "logging.go");
        descriptor.overwrite = overwrite;
        descriptor.merge = merge;
        let mut artifact = Artifact::new(descriptor);
        artifact.push_str(content);
        artifact
    }

    #[test]
    fn test_creates_missing_file_and_directories() {
        let temp = TempDir::new().unwrap();
        let (path, outcome) = write_artifact(temp.path(), &artifact("v1\n", false, false)).unwrap();
        assert_eq!(outcome, WriteOutcome::Created);
        assert_eq!(path, temp.path().join("pkg/logging/logging.go"));
        assert_eq!(fs::read_to_string(path).unwrap(), "v1\n");
    }

    #[test]
    fn test_existing_file_kept_without_policy() {
        let temp = TempDir::new().unwrap();
        write_artifact(temp.path(), &artifact("v1\n", false, false)).unwrap();
        let (path, outcome) = write_artifact(temp.path(), &artifact("v2\n", false, false)).unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(fs::read_to_string(path).unwrap(), "v1\n");
    }

    #[test]
    fn test_overwrite_replaces() {
        let temp = TempDir::new().unwrap();
        write_artifact(temp.path(), &artifact("v1\n", true, false)).unwrap();
        let (path, outcome) = write_artifact(temp.path(), &artifact("v2\n", true, false)).unwrap();
        assert_eq!(outcome, WriteOutcome::Overwritten);
        assert_eq!(fs::read_to_string(path).unwrap(), "v2\n");
    }

    #[test]
    fn test_merge_appends_once() {
        let temp = TempDir::new().unwrap();
        write_artifact(temp.path(), &artifact("v1\n", false, true)).unwrap();

        let (_, outcome) = write_artifact(temp.path(), &artifact("v2\n", false, true)).unwrap();
        assert_eq!(outcome, WriteOutcome::Merged);

        let (path, outcome) = write_artifact(temp.path(), &artifact("v2\n", false, true)).unwrap();
        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert_eq!(fs::read_to_string(path).unwrap(), "v1\nv2\n");
    }

    #[test]
    fn test_plan_does_not_touch_filesystem() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("pkg/logging/logging.go");
        assert_eq!(plan(&artifact("v1\n", false, false), &target).unwrap(), WriteOutcome::Created);
        assert!(!target.exists());
        assert!(!temp.path().join("pkg").exists());
    }

    #[test]
    fn test_parent_dir_cannot_escape_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("out");

        let err = write_artifact(&root, &artifact_at("../escaped", "x\n", true, false)).unwrap_err();
        assert!(err.to_string().contains("escapes the output root"));
        assert!(!temp.path().join("escaped").exists());
        assert!(!root.exists());

        let nested = artifact_at("pkg/../../escaped", "x\n", true, false);
        assert!(target_path(&root, &nested).is_err());
    }

    #[test]
    fn test_absolute_path_rejected() {
        let temp = TempDir::new().unwrap();
        let absolute = temp.path().join("elsewhere");
        let artifact = artifact_at(absolute.to_str().unwrap(), "x\n", true, false);
        assert!(write_artifact(&temp.path().join("out"), &artifact).is_err());
        assert!(!absolute.exists());
    }

    #[test]
    fn test_current_dir_components_allowed() {
        let temp = TempDir::new().unwrap();
        let target = target_path(temp.path(), &artifact_at("./pkg", "x\n", false, false)).unwrap();
        assert!(target.starts_with(temp.path()));
        assert!(target.ends_with("pkg/logging.go"));
    }
}
