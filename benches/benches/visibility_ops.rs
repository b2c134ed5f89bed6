// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_iso::{Box2i, Rect, Vector2i};
use understory_visibility::{Object, ObjectId, Visibility};

const TILE: i32 = 32;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: i32) -> i32 {
        (self.next_u64() % n as u64) as i32
    }
}

/// An `n` by `n` ortho grid of tiles with a tall sprite, like a forest map.
fn grid_objects(n: i32) -> Vec<Object> {
    let footprint = Rect::from_box(&Box2i::from_xywh(0, 0, TILE - 1, TILE - 1));
    let sprite = Box2i::from_xywh(-TILE, -2 * TILE, 2 * TILE, 3 * TILE);
    let mut out = Vec::with_capacity((n * n) as usize);
    for y in 0..n {
        for x in 0..n {
            let pos = Vector2i::new(x * TILE, y * TILE);
            out.push(Object::new("tile", pos, footprint).with_sprite(sprite));
        }
    }
    out
}

fn map_index(n: i32, max_objects: usize) -> Visibility {
    // Iso x spans [-n*TILE, n*TILE], iso y spans [0, n*TILE] plus sprite overhang.
    let side = (4 * n * TILE) as u32;
    let cell = side.next_power_of_two();
    let half = (cell / 2) as i32;
    Visibility::new(Vector2i::new(-half, -half), cell, 10, max_objects).unwrap()
}

fn populated(n: i32, max_objects: usize) -> (Visibility, Vec<ObjectId>) {
    let mut vis = map_index(n, max_objects);
    let ids = grid_objects(n)
        .into_iter()
        .map(|o| {
            let id = vis.insert_object(o);
            assert!(vis.add_object(id), "grid tile must fit the root");
            id
        })
        .collect();
    (vis, ids)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_insert");
    for &n in &[32_i32, 64, 128] {
        group.throughput(Throughput::Elements((n * n) as u64));
        for &max_objects in &[4_usize, 16] {
            group.bench_function(format!("grid_{n}x{n}_cap{max_objects}"), |b| {
                b.iter_batched(
                    || (map_index(n, max_objects), grid_objects(n)),
                    |(mut vis, objects)| {
                        for o in objects {
                            let id = vis.insert_object(o);
                            vis.add_object(id);
                        }
                        black_box(vis.node_count());
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_viewport_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_viewport");
    for &n in &[64_i32, 128] {
        let (mut vis, _) = populated(n, 8);
        let mut rng = Rng::new(0x9E37_79B9_7F4A_7C15);
        let span = n * TILE;
        group.bench_function(format!("screen_1280x720_grid_{n}x{n}"), |b| {
            b.iter(|| {
                let view = Box2i::from_xywh(rng.below(2 * span) - span, rng.below(span), 1280, 720);
                let examined = vis.check_visible_object(black_box(&view));
                black_box((examined, vis.sorted_draw_list().len()));
            });
        });
    }
    group.finish();
}

fn bench_update_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_update");
    let n = 64;
    let (mut vis, ids) = populated(n, 8);
    let mut rng = Rng::new(42);
    group.throughput(Throughput::Elements(256));
    group.bench_function("move_256_of_4096", |b| {
        b.iter(|| {
            for _ in 0..256 {
                let id = ids[rng.below(ids.len() as i32) as usize];
                let pos = Vector2i::new(rng.below(n * TILE), rng.below(n * TILE));
                vis.object_mut(id).unwrap().set_pos(pos);
                black_box(vis.update_object(id));
            }
        });
    });
    group.finish();
}

fn bench_placement(c: &mut Criterion) {
    let n = 64;
    let (vis, _) = populated(n, 8);
    let footprint = Rect::from_box(&Box2i::from_xywh(0, 0, TILE - 1, TILE - 1));
    let mut rng = Rng::new(7);
    c.bench_function("visibility_footprint_query", |b| {
        b.iter(|| {
            let pos = Vector2i::new(rng.below(n * TILE), rng.below(n * TILE));
            let candidate = Object::new("candidate", pos, footprint);
            black_box(vis.is_footprint_intersect(&candidate, None, &|_| true));
        });
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_viewport_query,
    bench_update_churn,
    bench_placement
);
criterion_main!(benches);
