use std::hint::black_box;

use beamcast::{Value, ValueList, ValueMap};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_same_type_eq(c: &mut Criterion) {
    let a = Value::from(124);
    let b = Value::from(124);
    c.bench_function("eq_i32_i32", |bench| {
        bench.iter(|| black_box(&a) == black_box(&b))
    });
}

fn bench_cross_type_eq(c: &mut Criterion) {
    let a = Value::from(124.0f32);
    let b = Value::from("124.00");
    c.bench_function("eq_float_str", |bench| {
        bench.iter(|| black_box(&a) == black_box(&b))
    });
}

fn bench_list_eq(c: &mut Criterion) {
    let a = Value::from((0..100).map(Value::from).collect::<ValueList>());
    let b = Value::from((0..100).map(|i| Value::from(i.to_string())).collect::<ValueList>());
    c.bench_function("eq_list_100_mixed", |bench| {
        bench.iter(|| black_box(&a) == black_box(&b))
    });
}

fn bench_map_clone(c: &mut Criterion) {
    let map: ValueMap = (0..100)
        .map(|i| (format!("key{i}"), Value::from(i)))
        .collect();
    let value = Value::from(map);
    c.bench_function("clone_map_100", |bench| {
        bench.iter(|| black_box(value.clone()))
    });
}

fn bench_as_string(c: &mut Criterion) {
    let value = Value::from(ValueList::new().with(1).with(2.5f64).with("three"));
    c.bench_function("as_string_list", |bench| {
        bench.iter(|| black_box(value.as_string()))
    });
}

criterion_group!(
    benches,
    bench_same_type_eq,
    bench_cross_type_eq,
    bench_list_eq,
    bench_map_clone,
    bench_as_string
);
criterion_main!(benches);
