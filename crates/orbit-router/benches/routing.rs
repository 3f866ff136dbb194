//! Template matching benchmarks.
//!
//! Run with: `cargo bench -p orbit-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orbit_router::{CompiledTemplate, Params};

fn build_table(num_routes: usize) -> Vec<CompiledTemplate> {
    let mut table = Vec::with_capacity(num_routes);

    for i in 0..num_routes / 3 {
        table.push(compile(&format!("/api/v1/resource{i}")));
    }
    for i in 0..num_routes / 3 {
        table.push(compile(&format!("/api/v1/resource{i}/{{id}}")));
    }
    for i in 0..num_routes / 3 {
        table.push(compile(&format!("/api/v1/org/{{orgId}}/resource{i}/{{id}}")));
    }

    table
}

fn compile(template: &str) -> CompiledTemplate {
    match CompiledTemplate::compile(template) {
        Ok(compiled) => compiled,
        Err(e) => panic!("bench template '{template}' failed to compile: {e}"),
    }
}

/// First-match linear scan, the same order a baked router uses.
fn first_match(table: &[CompiledTemplate], path: &str) -> Option<Params> {
    table.iter().find_map(|t| t.tokenize(path).ok())
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_two_params", |b| {
        b.iter(|| black_box(CompiledTemplate::compile("/a/b/{foo}/d/{bar}")));
    });
}

fn bench_tokenize(c: &mut Criterion) {
    let template = compile("/a/b/{foo}/d/{bar}");

    c.bench_function("tokenize_two_params", |b| {
        b.iter(|| black_box(template.tokenize("/a/b/hello/d/123")));
    });
}

fn bench_first_match(c: &mut Criterion) {
    let table = build_table(99);

    c.bench_function("first_match_static", |b| {
        b.iter(|| black_box(first_match(&table, "/api/v1/resource20")));
    });

    c.bench_function("first_match_nested", |b| {
        b.iter(|| black_box(first_match(&table, "/api/v1/org/acme-corp/resource10/12345")));
    });

    c.bench_function("miss", |b| {
        b.iter(|| black_box(first_match(&table, "/api/v1/nonexistent/path")));
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for num_routes in [9, 48, 99, 498] {
        let table = build_table(num_routes);

        group.bench_with_input(
            BenchmarkId::new("last_param_route", num_routes),
            &num_routes,
            |b, &n| {
                let path = format!("/api/v1/resource{}/12345", n / 3 - 1);
                b.iter(|| black_box(first_match(&table, &path)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile,
    bench_tokenize,
    bench_first_match,
    bench_scaling
);
criterion_main!(benches);
