use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datatype::language::{choice, named, reference};
use datatype::{coerce, validate, ResolvedSchema, Schema, Value};
use serde_json::json;

// ============================================================================
// Test Data
// ============================================================================

fn flat_schema() -> Schema {
    Schema::parse(&json!({
        "id": "int",
        "name": "str",
        "score": "float",
        "active": "bool",
        "optional note": "nullable str",
    }))
    .unwrap()
}

fn nested_schema() -> Schema {
    Schema::parse(&json!({
        "users": [{
            "id": "int",
            "name": "str",
            "roles": ["str"],
            "address": {"street": "str", "city": "str", "zip": "str"},
            "status": choice(["int", "str"]),
        }],
        "meta": {"_any_": "str"},
    }))
    .unwrap()
}

fn tree_schema() -> Schema {
    Schema::parse(&named(
        "node",
        json!({"value": "int", "children": [reference("node")]}),
    ))
    .unwrap()
}

fn generate_users(count: usize, as_text: bool) -> Value {
    let users: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let id = if as_text { json!(i.to_string()) } else { json!(i) };
            json!({
                "id": id,
                "name": format!("user{i}"),
                "roles": ["admin", "dev"],
                "address": {"street": "Main St", "city": "Boston", "zip": "02101"},
                "status": if i % 2 == 0 { json!(1) } else { json!("pending") },
            })
        })
        .collect();
    Value::from(json!({"users": users, "meta": {"source": "bench"}}))
}

fn generate_tree(depth: usize, fanout: usize) -> serde_json::Value {
    if depth == 0 {
        return json!({"value": 0, "children": []});
    }
    let children: Vec<serde_json::Value> = (0..fanout).map(|_| generate_tree(depth - 1, fanout)).collect();
    json!({"value": depth, "children": children})
}

// ============================================================================
// Validation Benchmarks
// ============================================================================

fn bench_validate_flat(c: &mut Criterion) {
    let schema = flat_schema();
    let value = Value::from(json!({"id": 1, "name": "a", "score": 0.5, "active": true}));

    c.bench_function("validate_flat", |b| {
        b.iter(|| validate(black_box(&schema), black_box(&value)))
    });
}

fn bench_validate_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_users_scaling");
    let schema = nested_schema();

    for size in [10, 100, 1000] {
        let value = generate_users(size, false);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| validate(black_box(&schema), black_box(value)))
        });
    }

    group.finish();
}

fn bench_validate_resolved_vs_fresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_tree");
    let schema = tree_schema();
    let resolved = ResolvedSchema::new(&schema).unwrap();
    let value = Value::from(generate_tree(5, 3));

    group.bench_function("fresh", |b| {
        b.iter(|| validate(black_box(&schema), black_box(&value)))
    });
    group.bench_function("resolved", |b| {
        b.iter(|| resolved.validate(black_box(&value)))
    });

    group.finish();
}

// ============================================================================
// Coercion Benchmarks
// ============================================================================

fn bench_coerce_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce_users_scaling");
    let schema = nested_schema();

    for size in [10, 100, 1000] {
        let value = generate_users(size, true);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| coerce(black_box(&schema), black_box(value)))
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    validate_benches,
    bench_validate_flat,
    bench_validate_scaling,
    bench_validate_resolved_vs_fresh
);

criterion_group!(coerce_benches, bench_coerce_scaling);

criterion_main!(validate_benches, coerce_benches);
