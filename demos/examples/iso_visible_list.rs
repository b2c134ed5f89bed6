// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painter's-order draw list for a scrolling isometric camera.
//!
//! Run:
//! - `cargo run -p understory_demos --example iso_visible_list`
//! - `RUST_LOG=understory_visibility=trace cargo run -p understory_demos --example iso_visible_list`

use kurbo::Rect as KurboRect;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use understory_iso::{Box2i, Rect, Vector2i};
use understory_visibility::{DrawInfo, ObjectLayer, Renderer, TileRef, VisibilityConfig};

const TILE: i32 = 32;
const GROUND: TileRef = TileRef {
    tile_set: 0,
    tile_id: 0,
};
const TREE: TileRef = TileRef {
    tile_set: 0,
    tile_id: 1,
};

/// Sprite extents relative to the tile's iso position.
fn sprite_box(tile: TileRef) -> Option<Box2i> {
    match tile.tile_id {
        0 => Some(Box2i::from_xywh(-TILE, 0, 2 * TILE, TILE)),
        1 => Some(Box2i::from_xywh(-TILE, -2 * TILE, 2 * TILE, 3 * TILE)),
        _ => None,
    }
}

struct LogRenderer {
    calls: usize,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, call: &DrawInfo<'_>) {
        if self.calls < 6 {
            info!(
                name = call.name,
                x = call.dest.x0,
                y = call.dest.y0,
                "draw"
            );
        }
        self.calls += 1;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: VisibilityConfig = serde_json::from_str(
        r#"{ "position": { "x": -2048, "y": -2048 }, "cell_size": 4096, "max_depth": 7, "max_objects": 6 }"#,
    )
    .expect("valid config");
    let mut layer = ObjectLayer::new(&config, sprite_box).expect("power-of-two root");

    // Ground tiles never block each other; trees stand on every fifth cell.
    let footprint = Rect::from_box(&Box2i::from_xywh(0, 0, TILE - 1, TILE - 1));
    let mut placed = 0;
    for y in 0..48 {
        for x in 0..48 {
            let pos = Vector2i::new(x * TILE, y * TILE);
            let tile = if (x * 7 + y * 3) % 5 == 0 { TREE } else { GROUND };
            let name = format!("{}{x}_{y}", if tile == TREE { "tree" } else { "ground" });
            match layer.add_object(&name, pos, footprint, tile) {
                Ok(_) => placed += 1,
                Err(err) => warn!(%name, %err, "skipping tile"),
            }
        }
    }
    let vis = layer.visibility();
    info!(
        placed,
        nodes = vis.node_count(),
        leaves = vis.leaf_count(),
        "map indexed"
    );

    // Scroll the camera down the map; the second frame at the same position
    // reuses the previous sort.
    for (cam_x, cam_y) in [(-640.0, -64.0), (-640.0, -64.0), (-640.0, 400.0), (-200.0, 900.0)] {
        let viewport = KurboRect::new(cam_x, cam_y, cam_x + 1280.0, cam_y + 720.0);
        let mut renderer = LogRenderer { calls: 0 };
        let stats = layer.render(viewport, &mut renderer);
        info!(
            cam_x,
            cam_y,
            visible = stats.visible,
            examined = stats.examined,
            drawn = stats.drawn,
            resorted = stats.resorted,
            "frame"
        );
    }
}
