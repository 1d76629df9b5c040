//! Built-in conditions and extractors.
//!
//! Small constructors for the predicates most specs gate on. Anything more
//! specific is a plain closure.
//!
//! # Examples
//!
//! ```
//! use svcgen_codegen::conditions::{flag_enabled_anywhere, methods_with_flag};
//! use svcgen_codegen::spec::{MethodGeneratorHandler, Spec};
//!
//! let mut spec = Spec::new("go", "logging.go").with_condition(flag_enabled_anywhere("logging"));
//! spec.add_method_generator(
//!     "wrap",
//!     MethodGeneratorHandler::new(|_, _, _| Ok(())).with_boxed_extractor(methods_with_flag("logging")),
//! )
//! .unwrap();
//! ```

use crate::spec::{Extractor, MethodCondition, ServiceCondition};
use svcgen_model::{Capability, Method, Service};

/// Holds when `flag` is enabled on the service or on any of its methods.
#[must_use]
pub fn flag_enabled_anywhere(flag: impl Into<String>) -> ServiceCondition {
    let flag = flag.into();
    Box::new(move |service: &Service| service.is_enabled_anywhere(&flag))
}

/// Holds when `flag` is enabled on the service itself.
#[must_use]
pub fn service_flag(flag: impl Into<String>) -> ServiceCondition {
    let flag = flag.into();
    Box::new(move |service: &Service| service.is_enabled(&flag))
}

/// Holds when `flag` is enabled on the method.
#[must_use]
pub fn method_flag(flag: impl Into<String>) -> MethodCondition {
    let flag = flag.into();
    Box::new(move |_service: &Service, method: &Method| method.is_enabled(&flag))
}

/// Holds when the service has `capability`.
#[must_use]
pub fn has_capability(capability: Capability) -> ServiceCondition {
    Box::new(move |service: &Service| service.has_capability(capability))
}

/// Methods with `flag` enabled, in declaration order.
#[must_use]
pub fn methods_with_flag(flag: impl Into<String>) -> Extractor {
    let flag = flag.into();
    extractor(move |service| {
        service
            .methods
            .iter()
            .filter(|m| m.is_enabled(&flag))
            .collect()
    })
}

fn extractor<F>(f: F) -> Extractor
where
    F: for<'a> Fn(&'a Service) -> Vec<&'a Method> + Send + Sync + 'static,
{
    Box::new(f)
}
