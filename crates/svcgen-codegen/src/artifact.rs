//! Generated artifacts and their creators.
//!
//! An [`Artifact`] is the handle generators write into: a descriptor
//! (where the file goes and how to persist it) plus an in-memory body.
//! Persisting it is the caller's job.
//!
//! # Examples
//!
//! ```
//! use std::fmt::Write;
//! use svcgen_codegen::artifact::{Artifact, ArtifactDescriptor};
//!
//! let mut artifact = Artifact::new(ArtifactDescriptor::new("go", "users/logging", "logging.go"));
//! writeln!(artifact, "package logging").unwrap();
//!
//! assert_eq!(artifact.content(), "package logging\n");
//! assert_eq!(artifact.relative_path().to_str(), Some("users/logging/logging.go"));
//! ```

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use svcgen_core::Result;
use svcgen_model::Service;

/// Where an artifact goes and how it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDescriptor {
    /// File-type tag, e.g. `go` or `proto`
    pub file_type: String,
    /// Directory relative to the output root
    pub path: String,
    /// File name
    pub name: String,
    /// Replace an existing file
    pub overwrite: bool,
    /// Append to an existing file
    pub merge: bool,
}

impl ArtifactDescriptor {
    /// Creates a descriptor that neither overwrites nor merges.
    #[must_use]
    pub fn new(file_type: impl Into<String>, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            path: path.into(),
            name: name.into(),
            overwrite: false,
            merge: false,
        }
    }
}

/// A generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Placement and persistence policy
    pub descriptor: ArtifactDescriptor,
    content: String,
}

impl Artifact {
    /// Creates an empty artifact.
    #[must_use]
    pub const fn new(descriptor: ArtifactDescriptor) -> Self {
        Self {
            descriptor,
            content: String::new(),
        }
    }

    /// Generated body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consumes the artifact, returning the body.
    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }

    /// Appends text.
    pub fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Appends text followed by a newline.
    pub fn push_line(&mut self, line: &str) {
        self.content.push_str(line);
        self.content.push('\n');
    }

    /// Returns `true` if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// `path/name`, relative to the output root.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.descriptor.path).join(&self.descriptor.name)
    }
}

impl fmt::Write for Artifact {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.content.push_str(s);
        Ok(())
    }
}

/// Creates artifact handles for a spec.
pub trait ArtifactCreator: fmt::Debug + Send + Sync {
    /// Creates the handle generators will write into.
    ///
    /// # Errors
    ///
    /// Implementation-defined; an error aborts the spec.
    fn create(&self, descriptor: ArtifactDescriptor, service: &Service) -> Result<Artifact>;
}

/// Default creator: an in-memory buffer, optionally pre-seeded with a
/// header line.
#[derive(Debug, Clone, Default)]
pub struct BufferCreator {
    header: Option<String>,
}

impl BufferCreator {
    /// Creates a creator producing empty buffers.
    #[must_use]
    pub const fn new() -> Self {
        Self { header: None }
    }

    /// Seeds every buffer with `header` and a newline.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

impl ArtifactCreator for BufferCreator {
    fn create(&self, descriptor: ArtifactDescriptor, _service: &Service) -> Result<Artifact> {
        let mut artifact = Artifact::new(descriptor);
        if let Some(header) = &self.header {
            artifact.push_line(header);
        }
        Ok(artifact)
    }
}
