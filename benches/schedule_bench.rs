//! Performance benchmarks for resolution and simulation.
//!
//! Run with: `cargo bench`
//! Or for a specific bench: `cargo bench --bench schedule_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pipesim::{resolve, Registry, Simulator};

/// Builds a layered graph: `layers` groups of `width` items, each item
/// depending on every item of the previous layer.
fn layered_registry(layers: usize, width: usize) -> Registry {
    let mut builder = Registry::builder();
    for layer in 0..layers {
        let deps: Vec<String> = if layer == 0 {
            Vec::new()
        } else {
            (0..width)
                .map(|i| format!("item_{}_{}", layer - 1, i))
                .collect()
        };
        let dep_refs: Vec<&str> = deps.iter().map(String::as_str).collect();
        for i in 0..width {
            builder
                .add_component(
                    &format!("item_{layer}_{i}"),
                    (i as u64 % 4) + 1,
                    &format!("layer_{layer}"),
                    &dep_refs,
                )
                .unwrap();
        }
    }
    builder.build().unwrap()
}

fn bench_registry_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_build");
    for &(layers, width) in &[(10, 10), (20, 20), (40, 25)] {
        let items = layers * width;
        group.throughput(Throughput::Elements(items as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{layers}x{width}")),
            &(layers, width),
            |b, &(layers, width)| {
                b.iter(|| black_box(layered_registry(layers, width)));
            },
        );
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for &(layers, width) in &[(10, 10), (20, 20), (40, 25)] {
        let registry = layered_registry(layers, width);
        let target = format!("item_{}_0", layers - 1);
        group.throughput(Throughput::Elements((layers * width) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{layers}x{width}")),
            &registry,
            |b, registry| {
                b.iter(|| black_box(resolve(registry, &target).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    for &cores in &[1, 4, 16] {
        let registry = layered_registry(10, 16);
        let line = resolve(&registry, "item_9_0").unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cores}cores")),
            &cores,
            |b, &cores| {
                b.iter(|| {
                    let mut sim = Simulator::new(&registry, cores).unwrap();
                    black_box(sim.execute(&line).unwrap())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_registry_build, bench_resolve, bench_simulate);
criterion_main!(benches);
