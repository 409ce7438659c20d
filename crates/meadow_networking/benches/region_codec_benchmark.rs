//! # Region Codec Benchmark
//!
//! A busy town region: a few hundred ponies walking, some emoting, a handful
//! of tile edits per tick.
//!
//! Run with: `cargo bench --package meadow_networking`

// Benchmarks don't need docs
#![allow(missing_docs)]
#![allow(clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use meadow_networking::protocol::WireWriter;
use meadow_networking::{
    decode_region_update, encode_region_snapshot, encode_region_update, encode_region_update_into, CodecConfig,
    EntityDelta, EntitySnapshot, RegionDelta, ShowAll, UpdateFlags,
};
use meadow_shared::{Expression, RegionCoord, TileDelta, Vec2};

fn make_entities(count: u32) -> Vec<EntitySnapshot> {
    (0..count)
        .map(|id| {
            let f = f64::from(id);
            EntitySnapshot {
                position: Vec2::new(f * 0.37 % 100.0, f * 0.91 % 100.0),
                velocity: if id % 3 == 0 { Vec2::ZERO } else { Vec2::new(1.25, -0.5) },
                state: (id % 4) as u8,
                expression: (id % 5 == 0).then(|| Expression::new(3, 1, 1, 2, 2, 0)),
                entity_type: 1,
                name: (id % 2 == 0).then(|| format!("pony-{id}")),
                ..EntitySnapshot::new(id)
            }
        })
        .collect()
}

fn make_tiles() -> Vec<TileDelta> {
    (0..8).map(|i| TileDelta::new(i * 3, i, 2)).collect()
}

/// Benchmark: encode one tick's delta.
fn bench_encode_delta(c: &mut Criterion) {
    let config = CodecConfig::default();
    let tiles = make_tiles();
    let removes = [7u32, 8, 9];
    let mut group = c.benchmark_group("encode_delta");

    for count in [10u32, 100, 500] {
        let entities = make_entities(count);
        let deltas: Vec<EntityDelta<'_>> = entities
            .iter()
            .map(|e| EntityDelta::new(e, UpdateFlags::POSITION | UpdateFlags::EXPRESSION))
            .collect();
        let delta = RegionDelta {
            region: RegionCoord::new(4, 4),
            entities: &deltas,
            removes: &removes,
            tiles: &tiles,
            tile_data: None,
        };

        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &delta, |b, delta| {
            b.iter(|| black_box(encode_region_update(delta, &config)));
        });
    }

    group.finish();
}

/// Benchmark: encode into a reused buffer, the server's steady state.
fn bench_encode_reused_buffer(c: &mut Criterion) {
    let config = CodecConfig::default();
    let entities = make_entities(500);
    let deltas: Vec<EntityDelta<'_>> = entities
        .iter()
        .map(|e| EntityDelta::new(e, UpdateFlags::POSITION))
        .collect();
    let delta = RegionDelta { entities: &deltas, ..RegionDelta::empty(RegionCoord::new(1, 1)) };
    let mut writer = WireWriter::with_capacity(16 * 1024);

    c.bench_function("encode_delta_reused_500", |b| {
        b.iter(|| {
            writer.clear();
            encode_region_update_into(&mut writer, &delta, &config).ok();
            black_box(writer.len())
        });
    });
}

/// Benchmark: decode one tick's delta.
fn bench_decode_delta(c: &mut Criterion) {
    let config = CodecConfig::default();
    let entities = make_entities(500);
    let deltas: Vec<EntityDelta<'_>> = entities
        .iter()
        .map(|e| EntityDelta::new(e, UpdateFlags::POSITION | UpdateFlags::NAME))
        .collect();
    let delta = RegionDelta { entities: &deltas, ..RegionDelta::empty(RegionCoord::new(2, 9)) };
    let Ok(bytes) = encode_region_update(&delta, &config) else {
        return;
    };

    let mut group = c.benchmark_group("decode_delta");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("500", |b| {
        b.iter(|| black_box(decode_region_update(black_box(&bytes), &config)));
    });
    group.finish();
}

/// Benchmark: full snapshot for a newly subscribed client.
fn bench_snapshot(c: &mut Criterion) {
    let config = CodecConfig::default();
    let entities = make_entities(500);
    let tile_data = vec![0x5A_u8; 4096];

    c.bench_function("snapshot_500", |b| {
        b.iter(|| {
            black_box(encode_region_snapshot(
                RegionCoord::new(0, 0),
                &entities,
                &(),
                &ShowAll,
                Some(tile_data.as_slice()),
                &config,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_encode_delta,
    bench_encode_reused_buffer,
    bench_decode_delta,
    bench_snapshot,
);

criterion_main!(benches);
