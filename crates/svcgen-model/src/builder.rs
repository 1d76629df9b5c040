//! Service model builder.
//!
//! Turns parsed interface declarations into validated [`Service`] graphs:
//! checks naming and signature conventions, converts types, classifies
//! documentation comments, and applies tags in declaration order.
//!
//! A method's generate set is seeded from its service (ALL) before the
//! method's own tags run, so `@disable` on one method never affects its
//! siblings.
//!
//! # Examples
//!
//! ```
//! use svcgen_model::declaration::{ParsedField, ParsedInterface, ParsedMethod, TypeExpr};
//! use svcgen_model::{ServiceModelBuilder, TagParserRegistry};
//!
//! let method = |name: &str, docs: &[&str]| ParsedMethod {
//!     name: name.to_string(),
//!     docs: docs.iter().map(ToString::to_string).collect(),
//!     params: vec![ParsedField::new("ctx", TypeExpr::selector("context", "Context"))],
//!     results: vec![ParsedField::new("err", TypeExpr::ident("error"))],
//! };
//! let iface = ParsedInterface {
//!     name: "PingService".to_string(),
//!     docs: vec!["// @generate(logging)".to_string()],
//!     embeds: vec![],
//!     methods: vec![method("Ping", &["// @disable(logging)"]), method("Echo", &[])],
//! };
//!
//! let registry = TagParserRegistry::new();
//! let service = ServiceModelBuilder::new(&registry).build(&iface).unwrap();
//!
//! assert!(!service.methods[0].is_enabled("logging"));
//! assert!(service.methods[1].is_enabled("logging"));
//! ```

use crate::builtin::{
    self, ALIAS, Alias, DISABLE, DISABLE_ALL, ENABLE, ENABLE_ALL, GENERATE, GENERATE_ALL,
    HTTP_METHOD, HTTP_ORIGIN, HTTP_PATH, HTTP_PREFIX, LOGS_IGNORE, LOGS_LEN, METHOD_TAGS,
    PARAM_TAGS, PARAMS, SERVICE_TAGS,
};
use crate::declaration::{ParsedField, ParsedFile, ParsedInterface, ParsedMethod, TypeExpr};
use crate::model::{
    Argument, BUILTIN_TYPES, Capabilities, Field, HttpOrigin, Method, Service, Type,
};
use crate::registry::TagParserRegistry;
use svcgen_core::{EntityKind, Error, ModelConfig, Result};
use svcgen_tags::{
    GenerateFlagsHandler, GenerateSet, ResolveError, ResolvedTag, TagOptions, TagPool,
    TagsOptions, classify, resolve,
};

/// Builds [`Service`] graphs from parsed declarations.
///
/// Holds the naming conventions, the flag universes, and a borrowed
/// registry of custom tag parsers. Building is pure: the same declaration
/// always yields the same graph.
#[derive(Debug)]
pub struct ServiceModelBuilder<'r> {
    config: ModelConfig,
    registry: &'r TagParserRegistry,
    service_flags: GenerateFlagsHandler,
    method_flags: GenerateFlagsHandler,
}

impl<'r> ServiceModelBuilder<'r> {
    /// Creates a builder with default conventions and flag universes.
    #[must_use]
    pub fn new(registry: &'r TagParserRegistry) -> Self {
        Self {
            config: ModelConfig::default(),
            registry,
            service_flags: GenerateFlagsHandler::service_defaults(),
            method_flags: GenerateFlagsHandler::method_defaults(),
        }
    }

    /// Replaces the naming conventions.
    #[must_use]
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the flag universes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the handlers are not for the
    /// service and method kinds respectively.
    pub fn with_flag_handlers(
        mut self,
        service: GenerateFlagsHandler,
        method: GenerateFlagsHandler,
    ) -> Result<Self> {
        if service.kind() != EntityKind::Service || method.kind() != EntityKind::Method {
            return Err(Error::ConfigError {
                message: format!(
                    "expected service and method flag universes, got {} and {}",
                    service.kind(),
                    method.kind()
                ),
            });
        }
        self.service_flags = service;
        self.method_flags = method;
        Ok(self)
    }

    /// Naming conventions in use.
    #[must_use]
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Builds every interface of a parsed file, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first error of any interface; see [`build`](Self::build).
    pub fn parse_file(&self, file: &ParsedFile) -> Result<Vec<Service>> {
        tracing::debug!(
            package = %file.package,
            interfaces = file.interfaces.len(),
            "building parsed file"
        );
        file.interfaces
            .iter()
            .map(|iface| self.build_in(&file.package, iface))
            .collect()
    }

    /// Builds one service outside of any package.
    ///
    /// # Errors
    ///
    /// - [`Error::ModelValidation`] for naming, signature, or type problems,
    ///   and for unknown names referenced by tags
    /// - [`Error::TagSyntax`], [`Error::UnknownTag`], [`Error::AmbiguousTag`]
    ///   for malformed or unresolvable tags
    /// - [`Error::InvalidFlagValue`] for generate directives outside the
    ///   flag universe
    /// - any error returned by a custom tag parser
    pub fn build(&self, iface: &ParsedInterface) -> Result<Service> {
        self.build_in("", iface)
    }

    /// Builds one service declared in `package`.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_in(&self, package: &str, iface: &ParsedInterface) -> Result<Service> {
        let entity = format!("service {}", iface.name);
        if !self.config.is_service_name(&iface.name) {
            return Err(Error::ModelValidation {
                entity,
                reason: format!(
                    "name must be an exported identifier ending in '{}'",
                    self.config.service_suffix
                ),
            });
        }

        let doc = classify(&iface.docs);
        let mut service = Service {
            name: iface.name.clone(),
            alias: iface.name.clone(),
            package: package.to_string(),
            docs: doc.wrapped_docs(),
            methods: Vec::new(),
            generate: GenerateSet::new(),
            http_prefix: None,
            capabilities: Capabilities::from_embeds(&iface.embeds),
            tags: TagsOptions::new(),
        };

        for token in &doc.tags {
            self.apply_service_tag(&entity, &mut service, token)?;
        }

        let mut methods: Vec<Method> = Vec::with_capacity(iface.methods.len());
        for parsed in &iface.methods {
            if methods.iter().any(|m| m.name == parsed.name) {
                return Err(Error::ModelValidation {
                    entity,
                    reason: format!("method '{}' is declared twice", parsed.name),
                });
            }
            methods.push(self.build_method(&service, parsed)?);
        }
        service.methods = methods;

        tracing::info!(
            service = %service.name,
            methods = service.methods.len(),
            flags = ?service.generate.iter().collect::<Vec<_>>(),
            "built service model"
        );
        Ok(service)
    }

    fn build_method(&self, service: &Service, parsed: &ParsedMethod) -> Result<Method> {
        let label = format!("{}.{}", service.name, parsed.name);
        let entity = format!("method {label}");
        let invalid = |reason: String| Error::ModelValidation {
            entity: entity.clone(),
            reason,
        };

        let Some((context, params)) = parsed.params.split_first() else {
            return Err(invalid(format!(
                "first parameter must be {}",
                self.config.context_type
            )));
        };
        if context.ty.to_string() != self.config.context_type {
            return Err(invalid(format!(
                "first parameter must be {}, found {}",
                self.config.context_type, context.ty
            )));
        }
        let Some((error, results)) = parsed.results.split_last() else {
            return Err(invalid(format!(
                "last result must be {}",
                self.config.error_type
            )));
        };
        if error.ty.to_string() != self.config.error_type {
            return Err(invalid(format!(
                "last result must be {}, found {}",
                self.config.error_type, error.ty
            )));
        }

        let mut arguments = Vec::with_capacity(params.len());
        let mut explicit_origin = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            check_named(&entity, "parameter", index + 1, param)?;
            let last = index + 1 == params.len();
            let doc = classify(&param.docs);
            let mut argument = Argument {
                name: param.name.clone(),
                alias: param.name.clone(),
                ty: convert_type(&entity, &param.ty, last)?,
                http_origin: HttpOrigin::default(),
                docs: doc.wrapped_docs(),
                tags: TagsOptions::new(),
            };
            let mut explicit = false;
            let param_entity = format!("param {label}.{}", param.name);
            for token in &doc.tags {
                self.apply_param_tag(&param_entity, &mut argument, &mut explicit, token)?;
            }
            arguments.push(argument);
            explicit_origin.push(explicit);
        }

        let mut fields = Vec::with_capacity(results.len());
        for (index, result) in results.iter().enumerate() {
            check_named(&entity, "result", index + 1, result)?;
            fields.push(Field {
                name: result.name.clone(),
                alias: result.name.clone(),
                ty: convert_type(&entity, &result.ty, false)?,
            });
        }

        let doc = classify(&parsed.docs);
        let mut method = Method {
            service: service.name.clone(),
            name: parsed.name.clone(),
            alias: parsed.name.clone(),
            docs: doc.wrapped_docs(),
            arguments,
            results: fields,
            generate: GenerateSet::new(),
            http_method: None,
            http_path: None,
            logs_ignore: Vec::new(),
            logs_len: Vec::new(),
            tags: TagsOptions::new(),
        };
        self.method_flags.all(&mut method.generate, &service.generate);

        for token in &doc.tags {
            self.apply_method_tag(&entity, &label, &mut method, &mut explicit_origin, token)?;
        }

        if let Some(path) = method.http_path.as_deref() {
            let placeholders = builtin::path_placeholders(path);
            if let Some(unknown) = placeholders
                .iter()
                .find(|p| !method.arguments.iter().any(|a| a.name == **p || a.alias == **p))
            {
                return Err(invalid(format!(
                    "http-path placeholder '{unknown}' is not an argument"
                )));
            }
            for (argument, explicit) in method.arguments.iter_mut().zip(&explicit_origin) {
                if !explicit
                    && placeholders
                        .iter()
                        .any(|p| *p == argument.name || *p == argument.alias)
                {
                    argument.http_origin = HttpOrigin::Path;
                }
            }
        }

        tracing::debug!(
            method = %label,
            flags = ?method.generate.iter().collect::<Vec<_>>(),
            "built method"
        );
        Ok(method)
    }

    fn resolve_tag(
        &self,
        kind: EntityKind,
        entity: &str,
        token: &str,
        builtin: &[&str],
    ) -> Result<ResolvedTag> {
        let custom = self.registry.names(kind);
        let resolved = resolve(token, builtin, &custom).map_err(|err| match err {
            ResolveError::Unknown => Error::UnknownTag {
                entity: entity.to_string(),
                tag: token.to_string(),
            },
            ResolveError::Ambiguous { name } => Error::AmbiguousTag {
                entity: entity.to_string(),
                tag: token.to_string(),
                name,
            },
            ResolveError::Syntax { reason, .. } => Error::TagSyntax {
                entity: entity.to_string(),
                tag: token.to_string(),
                reason,
            },
        })?;
        tracing::debug!(entity, tag = %resolved.name, pool = ?resolved.pool, "resolved tag");
        Ok(resolved)
    }

    fn apply_service_tag(&self, entity: &str, service: &mut Service, token: &str) -> Result<()> {
        let tag = self.resolve_tag(EntityKind::Service, entity, token, SERVICE_TAGS)?;
        let payload = tag.payload.as_deref();

        if tag.pool == TagPool::Custom {
            let parser = self
                .registry
                .service_parser(&tag.name)
                .ok_or_else(|| unknown(entity, token))?;
            let mut options = TagOptions::new();
            parser(service, payload, &mut options)?;
            service.tags.merge(tag.name, options);
            return Ok(());
        }

        match tag.name.as_str() {
            GENERATE => {
                let names = builtin::required_names(entity, token, payload)?;
                self.service_flags
                    .only(&mut service.generate, &names)
                    .map_err(|e| e.into_error(&service.name, GENERATE))?;
            }
            GENERATE_ALL => {
                let names = builtin::names(payload);
                self.service_flags
                    .all_but(&mut service.generate, true, &names)
                    .map_err(|e| e.into_error(&service.name, GENERATE_ALL))?;
            }
            ALIAS => service.alias = builtin::single_name(entity, token, payload)?,
            HTTP_PREFIX => service.http_prefix = Some(builtin::http_path(entity, token, payload)?),
            _ => return Err(unknown(entity, token)),
        }
        Ok(())
    }

    fn apply_method_tag(
        &self,
        entity: &str,
        label: &str,
        method: &mut Method,
        explicit_origin: &mut [bool],
        token: &str,
    ) -> Result<()> {
        let tag = self.resolve_tag(EntityKind::Method, entity, token, METHOD_TAGS)?;
        let payload = tag.payload.as_deref();

        if tag.pool == TagPool::Custom {
            let parser = self
                .registry
                .method_parser(&tag.name)
                .ok_or_else(|| unknown(entity, token))?;
            let mut options = TagOptions::new();
            parser(method, payload, &mut options)?;
            method.tags.merge(tag.name, options);
            return Ok(());
        }

        let invalid = |reason: String| Error::ModelValidation {
            entity: entity.to_string(),
            reason,
        };

        match tag.name.as_str() {
            ENABLE => {
                let names = builtin::required_names(entity, token, payload)?;
                self.method_flags
                    .add(&mut method.generate, &names)
                    .map_err(|e| e.into_error(label, ENABLE))?;
            }
            DISABLE => {
                let names = builtin::required_names(entity, token, payload)?;
                self.method_flags
                    .remove(&mut method.generate, &names)
                    .map_err(|e| e.into_error(label, DISABLE))?;
            }
            ENABLE_ALL => {
                let names = builtin::names(payload);
                self.method_flags
                    .all_but(&mut method.generate, true, &names)
                    .map_err(|e| e.into_error(label, ENABLE_ALL))?;
            }
            DISABLE_ALL => {
                let names = builtin::names(payload);
                self.method_flags
                    .all_but(&mut method.generate, false, &names)
                    .map_err(|e| e.into_error(label, DISABLE_ALL))?;
            }
            ALIAS => match builtin::alias(entity, token, payload)? {
                Alias::Own(alias) => method.alias = alias,
                Alias::Field { field, alias } => {
                    if let Some(argument) = method.arguments.iter_mut().find(|a| a.name == field) {
                        argument.alias = alias;
                    } else if let Some(result) = method.results.iter_mut().find(|r| r.name == field)
                    {
                        result.alias = alias;
                    } else {
                        return Err(invalid(format!(
                            "alias references unknown argument or result '{field}'"
                        )));
                    }
                }
            },
            PARAMS => {
                let parsed = builtin::params(entity, token, payload)?;
                for name in &parsed.names {
                    let Some(index) = method.arguments.iter().position(|a| a.name == *name) else {
                        return Err(invalid(format!("params references unknown argument '{name}'")));
                    };
                    let param_entity = format!("param {label}.{name}");
                    for param_tag in &parsed.tags {
                        self.apply_param_tag(
                            &param_entity,
                            &mut method.arguments[index],
                            &mut explicit_origin[index],
                            param_tag,
                        )?;
                    }
                }
            }
            LOGS_IGNORE | LOGS_LEN => {
                let names = builtin::required_names(entity, token, payload)?;
                for name in names {
                    let ty = method
                        .argument(&name)
                        .map(|a| &a.ty)
                        .or_else(|| method.result(&name).map(|r| &r.ty));
                    let Some(ty) = ty else {
                        return Err(invalid(format!(
                            "{} references unknown argument or result '{name}'",
                            tag.name
                        )));
                    };
                    if tag.name == LOGS_LEN && !ty.has_len() {
                        return Err(invalid(format!(
                            "logs-len target '{name}' of type {ty} has no length"
                        )));
                    }
                    let list = if tag.name == LOGS_LEN {
                        &mut method.logs_len
                    } else {
                        &mut method.logs_ignore
                    };
                    if !list.contains(&name) {
                        list.push(name);
                    }
                }
            }
            HTTP_METHOD => method.http_method = Some(builtin::http_verb(entity, token, payload)?),
            HTTP_PATH => method.http_path = Some(builtin::http_path(entity, token, payload)?),
            _ => return Err(unknown(entity, token)),
        }
        Ok(())
    }

    fn apply_param_tag(
        &self,
        entity: &str,
        argument: &mut Argument,
        explicit_origin: &mut bool,
        token: &str,
    ) -> Result<()> {
        let tag = self.resolve_tag(EntityKind::Param, entity, token, PARAM_TAGS)?;
        let payload = tag.payload.as_deref();

        if tag.pool == TagPool::Custom {
            let parser = self
                .registry
                .param_parser(&tag.name)
                .ok_or_else(|| unknown(entity, token))?;
            let mut options = TagOptions::new();
            parser(argument, payload, &mut options)?;
            argument.tags.merge(tag.name, options);
            return Ok(());
        }

        match tag.name.as_str() {
            ALIAS => argument.alias = builtin::single_name(entity, token, payload)?,
            HTTP_ORIGIN => {
                let value = builtin::single_name(entity, token, payload)?;
                argument.http_origin = value
                    .parse::<HttpOrigin>()
                    .map_err(|e: Error| builtin::syntax(entity, token, e.to_string()))?;
                *explicit_origin = true;
            }
            _ => return Err(unknown(entity, token)),
        }
        Ok(())
    }
}

fn unknown(entity: &str, token: &str) -> Error {
    Error::UnknownTag {
        entity: entity.to_string(),
        tag: token.to_string(),
    }
}

fn check_named(entity: &str, what: &str, position: usize, field: &ParsedField) -> Result<()> {
    if field.name.is_empty() || field.name == "_" {
        return Err(Error::ModelValidation {
            entity: entity.to_string(),
            reason: format!("{what} {position} ({}) is unnamed", field.ty),
        });
    }
    Ok(())
}

fn convert_type(entity: &str, expr: &TypeExpr, allow_variadic: bool) -> Result<Type> {
    let ty = match expr {
        TypeExpr::Ident { name } if BUILTIN_TYPES.contains(&name.as_str()) => Type::Builtin {
            name: name.clone(),
        },
        TypeExpr::Ident { name } => Type::Imported {
            package: None,
            name: name.clone(),
        },
        TypeExpr::Selector { package, name } => Type::Imported {
            package: Some(package.clone()),
            name: name.clone(),
        },
        TypeExpr::Slice { elem } if matches!(elem.as_ref(), TypeExpr::Ident { name } if name == "byte") => {
            Type::Bytes
        }
        TypeExpr::Slice { elem } => Type::Slice {
            elem: Box::new(convert_type(entity, elem, false)?),
        },
        TypeExpr::Ellipsis { elem } if allow_variadic => Type::Variadic {
            elem: Box::new(convert_type(entity, elem, false)?),
        },
        TypeExpr::Ellipsis { .. } => {
            return Err(Error::ModelValidation {
                entity: entity.to_string(),
                reason: format!("variadic type {expr} is only allowed on the last parameter"),
            });
        }
        TypeExpr::Map { key, value } => Type::Map {
            key: Box::new(convert_type(entity, key, false)?),
            value: Box::new(convert_type(entity, value, false)?),
        },
        TypeExpr::Star { elem } => Type::Pointer {
            elem: Box::new(convert_type(entity, elem, false)?),
        },
        TypeExpr::Array { .. }
        | TypeExpr::Chan { .. }
        | TypeExpr::Func
        | TypeExpr::Struct
        | TypeExpr::Interface => {
            return Err(Error::ModelValidation {
                entity: entity.to_string(),
                reason: format!("unsupported type shape {expr}"),
            });
        }
    };
    Ok(ty)
}
