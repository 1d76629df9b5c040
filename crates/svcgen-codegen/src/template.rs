//! Template-backed generators.
//!
//! A [`TemplateGenerator`] renders one registered Handlebars template per
//! invocation and appends the result to the artifact. Templates see a
//! flattened, serializable view of the model: type descriptors are
//! pre-rendered as strings and flags are plain lists.
//!
//! Service templates get `{{service.*}}`; method templates additionally get
//! `{{method.*}}`.

use crate::spec::{MethodGeneratorHandler, ServiceGeneratorHandler};
use crate::template_engine::TemplateEngine;
use serde::Serialize;
use std::sync::Arc;
use svcgen_model::{Argument, Field, HttpOrigin, Method, Service};
use svcgen_tags::TagsOptions;

/// Template view of an argument or result.
#[derive(Debug, Serialize)]
pub struct FieldContext<'a> {
    /// Declared name
    pub name: &'a str,
    /// External name
    pub alias: &'a str,
    /// Rendered type, e.g. `[]*models.User`
    pub type_name: String,
    /// HTTP origin (arguments only)
    pub http_origin: Option<HttpOrigin>,
    /// Excluded from logs
    pub log_ignored: bool,
    /// Logged by length only
    pub log_len: bool,
}

impl<'a> FieldContext<'a> {
    fn argument(argument: &'a Argument, method: &Method) -> Self {
        Self {
            name: &argument.name,
            alias: &argument.alias,
            type_name: argument.ty.to_string(),
            http_origin: Some(argument.http_origin),
            log_ignored: method.logs_ignore.contains(&argument.name),
            log_len: method.logs_len.contains(&argument.name),
        }
    }

    fn result(field: &'a Field, method: &Method) -> Self {
        Self {
            name: &field.name,
            alias: &field.alias,
            type_name: field.ty.to_string(),
            http_origin: None,
            log_ignored: method.logs_ignore.contains(&field.name),
            log_len: method.logs_len.contains(&field.name),
        }
    }
}

/// Template view of a method.
#[derive(Debug, Serialize)]
pub struct MethodContext<'a> {
    /// Declared name
    pub name: &'a str,
    /// External name
    pub alias: &'a str,
    /// Prose documentation lines
    pub docs: &'a [String],
    /// Arguments in order
    pub arguments: Vec<FieldContext<'a>>,
    /// Results in order
    pub results: Vec<FieldContext<'a>>,
    /// Enabled flags, sorted
    pub flags: Vec<&'a str>,
    /// HTTP verb
    pub http_method: Option<&'a str>,
    /// HTTP path
    pub http_path: Option<&'a str>,
    /// Custom tag options
    pub tags: &'a TagsOptions,
}

impl<'a> MethodContext<'a> {
    /// Builds the view of `method`.
    #[must_use]
    pub fn new(method: &'a Method) -> Self {
        Self {
            name: &method.name,
            alias: &method.alias,
            docs: &method.docs,
            arguments: method
                .arguments
                .iter()
                .map(|a| FieldContext::argument(a, method))
                .collect(),
            results: method
                .results
                .iter()
                .map(|r| FieldContext::result(r, method))
                .collect(),
            flags: method.generate.iter().collect(),
            http_method: method.http_method.as_deref(),
            http_path: method.http_path.as_deref(),
            tags: &method.tags,
        }
    }
}

/// Template view of a service.
#[derive(Debug, Serialize)]
pub struct ServiceContext<'a> {
    /// Declared name
    pub name: &'a str,
    /// External name
    pub alias: &'a str,
    /// Declaring package
    pub package: &'a str,
    /// Prose documentation lines
    pub docs: &'a [String],
    /// URI prefix for HTTP transports
    pub http_prefix: Option<&'a str>,
    /// Capability names
    pub capabilities: Vec<&'static str>,
    /// Enabled flags, sorted
    pub flags: Vec<&'a str>,
    /// Methods in declaration order
    pub methods: Vec<MethodContext<'a>>,
    /// Custom tag options
    pub tags: &'a TagsOptions,
}

impl<'a> ServiceContext<'a> {
    /// Builds the view of `service`.
    #[must_use]
    pub fn new(service: &'a Service) -> Self {
        Self {
            name: &service.name,
            alias: &service.alias,
            package: &service.package,
            docs: &service.docs,
            http_prefix: service.http_prefix.as_deref(),
            capabilities: service.capabilities.iter().map(|c| c.as_str()).collect(),
            flags: service.generate.iter().collect(),
            methods: service.methods.iter().map(MethodContext::new).collect(),
            tags: &service.tags,
        }
    }
}

#[derive(Serialize)]
struct RenderContext<'a> {
    service: ServiceContext<'a>,
    method: Option<MethodContext<'a>>,
}

/// Generator rendering a named template from a shared engine.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    engine: Arc<TemplateEngine<'static>>,
    template: String,
}

impl TemplateGenerator {
    /// Creates a generator for `template`, which must be registered on
    /// `engine` by the time it runs.
    #[must_use]
    pub fn new(engine: Arc<TemplateEngine<'static>>, template: impl Into<String>) -> Self {
        Self {
            engine,
            template: template.into(),
        }
    }

    /// Template name this generator renders.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Renders the template for the service alone.
    ///
    /// # Errors
    ///
    /// Returns [`svcgen_core::Error::TemplateError`] if rendering fails.
    pub fn render_service(&self, service: &Service) -> svcgen_core::Result<String> {
        let context = RenderContext {
            service: ServiceContext::new(service),
            method: None,
        };
        self.engine.render(&self.template, &context)
    }

    /// Renders the template for one method of the service.
    ///
    /// # Errors
    ///
    /// Returns [`svcgen_core::Error::TemplateError`] if rendering fails.
    pub fn render_method(&self, service: &Service, method: &Method) -> svcgen_core::Result<String> {
        let context = RenderContext {
            service: ServiceContext::new(service),
            method: Some(MethodContext::new(method)),
        };
        self.engine.render(&self.template, &context)
    }

    /// Service-level handler appending the rendered template.
    #[must_use]
    pub fn into_service_handler(self) -> ServiceGeneratorHandler {
        ServiceGeneratorHandler::new(move |artifact, service| {
            artifact.push_str(&self.render_service(service)?);
            Ok(())
        })
    }

    /// Method-level handler appending the rendered template once per method.
    #[must_use]
    pub fn into_method_handler(self) -> MethodGeneratorHandler {
        MethodGeneratorHandler::new(move |artifact, service, method| {
            artifact.push_str(&self.render_method(service, method)?);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{flag_enabled_anywhere, method_flag};
    use crate::spec::Spec;
    use svcgen_model::declaration::ParsedFile;
    use svcgen_model::{ServiceModelBuilder, TagParserRegistry};

    const DECLARATION: &str = r#"{
        "package": "notes",
        "interfaces": [{
            "name": "NoteService",
            "docs": ["// Stores notes. @generate(logging) @http-prefix(/notes)"],
            "embeds": ["Validator"],
            "methods": [
                {"name": "Get",
                 "docs": ["// @http-method(GET) @http-path(/{id}) @logs-ignore(body)"],
                 "params": [
                    {"name": "ctx", "type": {"kind": "selector", "package": "context", "name": "Context"}},
                    {"name": "id", "type": {"kind": "ident", "name": "string"}}
                 ],
                 "results": [
                    {"name": "body", "type": {"kind": "slice", "elem": {"kind": "ident", "name": "byte"}}},
                    {"name": "err", "type": {"kind": "ident", "name": "error"}}
                 ]},
                {"name": "Purge", "docs": ["// @disable(logging)"],
                 "params": [{"name": "ctx", "type": {"kind": "selector", "package": "context", "name": "Context"}}],
                 "results": [{"name": "err", "type": {"kind": "ident", "name": "error"}}]}
            ]
        }]
    }"#;

    fn service() -> Service {
        let file: ParsedFile = serde_json::from_str(DECLARATION).unwrap();
        let registry = TagParserRegistry::new();
        ServiceModelBuilder::new(&registry)
            .parse_file(&file)
            .unwrap()
            .remove(0)
    }

    fn engine(templates: &[(&str, &str)]) -> Arc<TemplateEngine<'static>> {
        let mut engine = TemplateEngine::new().unwrap();
        for (name, body) in templates {
            engine.register_template_string(name, body).unwrap();
        }
        Arc::new(engine)
    }

    #[test]
    fn test_service_context_view() {
        let service = service();
        let context = ServiceContext::new(&service);
        assert_eq!(context.package, "notes");
        assert_eq!(context.capabilities, vec!["validator"]);
        assert_eq!(context.flags, vec!["logging"]);

        let get = &context.methods[0];
        assert_eq!(get.arguments[0].type_name, "string");
        assert_eq!(get.arguments[0].http_origin, Some(HttpOrigin::Path));
        assert_eq!(get.results[0].type_name, "[]byte");
        assert!(get.results[0].log_ignored);
        assert!(get.results[0].http_origin.is_none());
    }

    #[test]
    fn test_render_service_template() {
        let engine = engine(&[(
            "header",
            "package {{service.package}}\n// {{service.name}} ({{#each service.methods}}{{name}} {{/each}})\n",
        )]);
        let out = TemplateGenerator::new(engine, "header")
            .render_service(&service())
            .unwrap();
        assert_eq!(out, "package notes\n// NoteService (Get Purge )\n");
    }

    #[test]
    fn test_method_templates_in_spec() {
        let engine = engine(&[
            ("head", "package {{snake_case service.name}}\n"),
            (
                "log",
                "func log{{method.name}}({{#each method.arguments}}{{name}} {{type_name}}{{/each}})\n",
            ),
        ]);

        let mut spec = Spec::new("go", "logging.go").with_condition(flag_enabled_anywhere("logging"));
        spec.add_service_generator(
            "head",
            TemplateGenerator::new(Arc::clone(&engine), "head").into_service_handler(),
        )
        .unwrap();
        spec.add_method_generator(
            "log",
            TemplateGenerator::new(engine, "log")
                .into_method_handler()
                .with_condition(method_flag("logging")),
        )
        .unwrap();

        let artifact = spec.generate(&service()).unwrap().unwrap();
        assert_eq!(artifact.content(), "package note_service\nfunc logGet(id string)\n");
    }

    #[test]
    fn test_missing_template_is_template_error() {
        let generator = TemplateGenerator::new(engine(&[]), "absent");
        let err = generator.render_service(&service()).unwrap_err();
        assert!(err.is_template_error());
        assert_eq!(generator.template(), "absent");
    }

    #[test]
    fn test_strict_mode_surfaces_through_spec() {
        let engine = engine(&[("bad", "{{service.nope}}")]);
        let mut spec = Spec::new("go", "bad.go");
        spec.add_service_generator("bad", TemplateGenerator::new(engine, "bad").into_service_handler())
            .unwrap();
        let err = spec.generate(&service()).unwrap_err();
        assert!(err.is_template_error());
    }
}
