use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reflex_engine::predicates::method;
use reflex_engine::Reflex;
use reflex_model::{
    ConstructorDef, FieldDef, FunctionDef, MethodDef, Modifiers, PropertyDef, TypeBuilder, TypeId,
    TypeRegistry, Value,
};

struct Bench {
    reflex: Reflex,
    point: TypeId,
    counter: TypeId,
}

fn setup(depth: usize) -> Bench {
    let registry = Arc::new(TypeRegistry::new());

    let mut parent = registry
        .register(
            TypeBuilder::class("bench.Point")
                .field(FieldDef::new("x", TypeId::INT).modifiers(Modifiers::PRIVATE).initial(0))
                .field(FieldDef::new("y", TypeId::INT).modifiers(Modifiers::PRIVATE).initial(0))
                .constructor(ConstructorDef::empty())
                .method(MethodDef::new("norm", |_| Ok(Value::from(0))).returns(TypeId::INT))
                .method(
                    MethodDef::new("scale", |args| Ok(args[1].clone()))
                        .param("factor", TypeId::INT)
                        .returns(TypeId::INT),
                ),
        )
        .unwrap();
    for level in 0..depth {
        parent = registry
            .register(
                TypeBuilder::class(format!("bench.Point{level}"))
                    .extends(parent)
                    .method(MethodDef::new(format!("m{level}"), |_| Ok(Value::Unit))),
            )
            .unwrap();
    }

    let counter = registry
        .register(
            TypeBuilder::class("bench.Counter")
                .managed()
                .field(FieldDef::new("count", TypeId::INT).modifiers(Modifiers::PRIVATE).initial(0))
                .property(PropertyDef::backed("count", "count").mutable())
                .function(
                    FunctionDef::new("add", |args| Ok(args[1].clone()))
                        .param("n", TypeId::INT)
                        .returns(TypeId::INT),
                ),
        )
        .unwrap();

    Bench {
        reflex: Reflex::new(registry),
        point: parent,
        counter,
    }
}

fn bench_cached_lookup(c: &mut Criterion) {
    let bench = setup(4);
    bench.reflex.field(bench.point, "x").unwrap();
    bench.reflex.method(bench.point, "scale", &[TypeId::INT]).unwrap();

    c.bench_function("cached_field", |b| {
        b.iter(|| bench.reflex.field(black_box(bench.point), black_box("x")).unwrap());
    });

    c.bench_function("cached_method", |b| {
        b.iter(|| {
            bench
                .reflex
                .method(black_box(bench.point), black_box("scale"), &[TypeId::INT])
                .unwrap()
        });
    });
}

fn bench_hierarchy_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncached_field");

    for depth in [1, 8, 32] {
        let bench = setup(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &bench, |b, bench| {
            b.iter(|| {
                bench.reflex.cache().clear();
                bench.reflex.field(black_box(bench.point), "y").unwrap()
            });
        });
    }

    group.finish();
}

fn bench_invoke(c: &mut Criterion) {
    let bench = setup(4);
    let point = bench.reflex.new_instance(bench.point, &[]).unwrap();
    let counter = bench.reflex.new_instance(bench.counter, &[]).unwrap();

    c.bench_function("invoke_method", |b| {
        b.iter(|| {
            bench
                .reflex
                .invoke(point.clone(), black_box("scale"), &[Value::from(3)])
                .unwrap()
        });
    });

    c.bench_function("invoke_function", |b| {
        b.iter(|| {
            bench
                .reflex
                .invoke(counter.clone(), black_box("add"), &[Value::from(3)])
                .unwrap()
        });
    });

    c.bench_function("read_property", |b| {
        b.iter(|| bench.reflex.get_property_value(&counter, black_box("count")).unwrap());
    });
}

fn bench_predicate_query(c: &mut Criterion) {
    let bench = setup(8);
    let wanted = method::name_starts_with("m") & method::parameter_count(0) & !method::is_static();

    c.bench_function("collect_methods", |b| {
        b.iter(|| bench.reflex.collect_methods(bench.point, black_box(&wanted)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_cached_lookup,
    bench_hierarchy_depth,
    bench_invoke,
    bench_predicate_query
);

criterion_main!(benches);
