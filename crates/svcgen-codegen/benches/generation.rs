//! Performance benchmarks for running specs over service models.
//!
//! Run with: cargo bench --package svcgen-codegen

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use svcgen_codegen::conditions::method_flag;
use svcgen_codegen::{GeneratorRegistry, Spec, TemplateEngine, TemplateGenerator};
use svcgen_model::declaration::{ParsedField, ParsedInterface, ParsedMethod, TypeExpr};
use svcgen_model::{Service, ServiceModelBuilder, TagParserRegistry};

// ============================================================================
// Test Data Generators
// ============================================================================

/// Creates a service with `methods` methods, every other one logged.
fn create_service(methods: usize) -> Service {
    let iface = ParsedInterface {
        name: "BenchService".to_string(),
        docs: vec!["// @generate(middleware)".to_string()],
        embeds: Vec::new(),
        methods: (0..methods)
            .map(|i| ParsedMethod {
                name: format!("Method{i}"),
                docs: if i % 2 == 0 {
                    Vec::new()
                } else {
                    vec!["// @disable(logging)".to_string()]
                },
                params: vec![
                    ParsedField::new("ctx", TypeExpr::selector("context", "Context")),
                    ParsedField::new("id", TypeExpr::ident("string")),
                    ParsedField::new("tags", TypeExpr::slice(TypeExpr::ident("string"))),
                ],
                results: vec![
                    ParsedField::new("count", TypeExpr::ident("int")),
                    ParsedField::new("err", TypeExpr::ident("error")),
                ],
            })
            .collect(),
    };
    let registry = TagParserRegistry::new();
    ServiceModelBuilder::new(&registry)
        .build(&iface)
        .expect("valid bench service")
}

fn create_registry() -> GeneratorRegistry {
    let mut engine = TemplateEngine::new().expect("engine");
    engine
        .register_template_string(
            "method",
            "func {{lower_first method.name}}({{#each method.arguments}}{{name}} {{type_name}} {{/each}})\n",
        )
        .expect("valid template");
    let engine = Arc::new(engine);

    let mut spec = Spec::new("go", "logging.go");
    spec.add_method_generator(
        "wrap",
        TemplateGenerator::new(engine, "method")
            .into_method_handler()
            .with_condition(method_flag("logging")),
    )
    .expect("unique generator");

    let mut registry = GeneratorRegistry::new();
    registry.register("logging", spec).expect("unique spec");
    registry
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_generate(c: &mut Criterion) {
    let registry = create_registry();
    let mut group = c.benchmark_group("generate");
    for methods in [1, 10, 100] {
        let service = create_service(methods);
        group.throughput(Throughput::Elements(methods as u64));
        group.bench_with_input(BenchmarkId::from_parameter(methods), &service, |b, service| {
            b.iter(|| registry.generate(black_box(service)));
        });
    }
    group.finish();
}

fn bench_model_build(c: &mut Criterion) {
    c.bench_function("build_service_100_methods", |b| {
        b.iter(|| create_service(black_box(100)));
    });
}

criterion_group!(benches, bench_generate, bench_model_build);
criterion_main!(benches);
