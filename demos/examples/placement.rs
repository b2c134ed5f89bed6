// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Footprint-based placement validation and tree inspection.
//!
//! Run:
//! - `cargo run -p understory_demos --example placement`

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use understory_iso::{Box2i, Rect, Vector2i};
use understory_visibility::{Error, ObjectFlags, ObjectLayer, TileRef, VisibilityConfig};

const CRATE: TileRef = TileRef {
    tile_set: 1,
    tile_id: 4,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let config = VisibilityConfig {
        position: Vector2i::new(-256, -256),
        cell_size: 512,
        max_depth: 4,
        max_objects: 2,
    };
    let sprites = |tile: TileRef| (tile == CRATE).then(|| Box2i::from_xywh(-32, -16, 64, 48));
    let mut layer = ObjectLayer::new(&config, sprites).expect("power-of-two root");
    let cell = Rect::from_box(&Box2i::from_xywh(0, 0, 31, 31));

    let a = layer
        .add_object("crate_a", Vector2i::new(0, 0), cell, CRATE)
        .expect("empty map");
    layer
        .add_object("crate_b", Vector2i::new(32, 0), cell, CRATE)
        .expect("neighbor cell is free");

    // Half a tile over crate_a.
    match layer.add_object("crate_c", Vector2i::new(16, 0), cell, CRATE) {
        Err(Error::Blocked(by)) => info!(?by, crate_a = ?a, "crate_c blocked"),
        other => warn!(?other, "crate_c placement not blocked"),
    }

    let spawn = layer
        .add_anchor("spawn", Vector2i::new(96, 96), cell)
        .expect("free cell");
    info!(
        free = layer.can_place(Vector2i::new(96, 96), cell),
        "spawn cell while solid"
    );
    layer
        .set_flags(spawn, ObjectFlags::VISIBLE)
        .expect("spawn is live");
    info!(
        free = layer.can_place(Vector2i::new(96, 96), cell),
        "spawn cell once walkable"
    );

    match layer.move_object(a, Vector2i::new(1000, 0)) {
        Err(err) => info!(%err, "move rejected"),
        Ok(()) => info!("moved"),
    }

    info!("tree:\n{}", layer.visibility().tree_view());
}
