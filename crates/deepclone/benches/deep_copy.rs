// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//!
//! Benchmark: deep copy throughput
//!
//! Compares generic traversal against a registered copier and measures how
//! copy cost scales with slice length and nesting depth.

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use deepclone::{
    Cloner, MapValue, PointerValue, ScalarKind, SliceValue, StructBuilder, StructValue,
    TypeDescriptor, Value,
};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

fn sample_type() -> Arc<TypeDescriptor> {
    let string_type = Arc::new(TypeDescriptor::scalar(ScalarKind::String));
    let f64_type = Arc::new(TypeDescriptor::scalar(ScalarKind::F64));
    Arc::new(
        StructBuilder::new("Sample")
            .field("seq", ScalarKind::U64)
            .slice_field("readings", f64_type)
            .map_field("tags", string_type.clone(), string_type)
            .private_field("checksum", ScalarKind::U32)
            .build(),
    )
}

fn sample(desc: &Arc<TypeDescriptor>, readings: usize) -> Value {
    let string_type = Arc::new(TypeDescriptor::scalar(ScalarKind::String));
    let f64_type = Arc::new(TypeDescriptor::scalar(ScalarKind::F64));
    let mut tags = MapValue::new(string_type.clone(), string_type);
    tags.insert("site", "lab");
    tags.insert("unit", "celsius");
    Value::Struct(StructValue::new(
        desc.clone(),
        vec![
            Value::U64(1),
            Value::Slice(SliceValue::new(
                f64_type,
                (0..readings).map(|i| Value::F64(i as f64)).collect(),
            )),
            Value::Map(tags),
            Value::U32(0xabcd),
        ],
    ))
}

fn pointer_chain(depth: usize) -> Value {
    let mut ty = Arc::new(TypeDescriptor::scalar(ScalarKind::I64));
    let mut value = Value::I64(7);
    for _ in 0..depth {
        let next = Arc::new(TypeDescriptor::pointer(ty.clone()));
        value = Value::Pointer(PointerValue::new(ty, value));
        ty = next;
    }
    value
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_generic_vs_registered(c: &mut Criterion) {
    let desc = sample_type();
    let src = sample(&desc, 64);

    let generic = Cloner::builder().builtins(false).build();
    let registered = Cloner::builder()
        .builtins(false)
        .register_fn(desc, |v| Ok(v.clone()))
        .build();

    let mut group = c.benchmark_group("struct_copy");
    group.bench_function("generic", |b| {
        b.iter(|| generic.copy_value(black_box(&src)));
    });
    group.bench_function("registered", |b| {
        b.iter(|| registered.copy_value(black_box(&src)));
    });
    group.finish();
}

fn bench_slice_length(c: &mut Criterion) {
    let desc = sample_type();
    let cloner = Cloner::builder().builtins(false).build();

    let mut group = c.benchmark_group("slice_length");
    for len in [16usize, 256, 4096] {
        let src = sample(&desc, len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &src, |b, src| {
            b.iter(|| cloner.copy_value(black_box(src)));
        });
    }
    group.finish();
}

fn bench_pointer_depth(c: &mut Criterion) {
    let cloner = Cloner::builder().builtins(false).build();

    let mut group = c.benchmark_group("pointer_depth");
    for depth in [1usize, 8, 64] {
        let src = pointer_chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &src, |b, src| {
            b.iter(|| cloner.copy_value(black_box(src)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_generic_vs_registered,
    bench_slice_length,
    bench_pointer_depth
);
criterion_main!(benches);
