//! Template engine for artifact generation using Handlebars.
//!
//! Wraps Handlebars in strict mode with a few naming helpers that service
//! templates need (`lower_first`, `upper_first`, `snake_case`).
//!
//! # Examples
//!
//! ```
//! use svcgen_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("client", "type {{lower_first name}}Client struct{}").unwrap();
//!
//! let out = engine.render("client", &json!({"name": "UserService"})).unwrap();
//! assert_eq!(out, "type userServiceClient struct{}");
//! ```

use handlebars::{Handlebars, handlebars_helper, no_escape};
use serde::Serialize;
use svcgen_core::{Error, Result};

handlebars_helper!(lower_first: |s: str| change_first(s, false));
handlebars_helper!(upper_first: |s: str| change_first(s, true));
handlebars_helper!(snake_case: |s: str| to_snake_case(s));

/// Template engine for artifact generation.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, so template generators can share one
/// engine behind an `Arc`.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates an engine with the naming helpers registered.
    ///
    /// Output is not HTML-escaped; generated sources are not markup.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for parity with template
    /// registration.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(no_escape);

        handlebars.register_helper("lower_first", Box::new(lower_first));
        handlebars.register_helper("upper_first", Box::new(upper_first));
        handlebars.register_helper("snake_case", Box::new(snake_case));

        Ok(Self { handlebars })
    }

    /// Renders a registered template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if:
    /// - Template name is not registered
    /// - Context cannot be serialized
    /// - A referenced variable is missing (strict mode)
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                message: format!("rendering '{template_name}' failed: {e}"),
            })
    }

    /// Registers a template, replacing any template with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template does not parse.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                message: format!("failed to register template '{name}': {e}"),
            })
    }

    /// Returns `true` if a template named `name` is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}

fn change_first(s: &str, upper: bool) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        let first: String = if upper {
            first.to_uppercase().collect()
        } else {
            first.to_lowercase().collect()
        };
        first + chars.as_str()
    })
}

fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if i > 0 && (prev_lower || (next_lower && chars[i - 1].is_uppercase())) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c == '-' || c == ' ' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}
