// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Visibility: a dynamic quadtree answering "what is on screen" for
//! isometric maps.
//!
//! Objects are authored on an orthogonal grid and drawn in isometric space.
//! Each [`Object`] keeps its ortho position and footprint as the source of
//! truth and derives its iso footprint and iso bounding box from them (see
//! [`understory_iso`] for the projections). [`Visibility`] indexes those iso
//! boxes in a quadtree of power-of-two cells:
//!
//! - Incremental [`add_object`](Visibility::add_object),
//!   [`remove_object`](Visibility::remove_object) and
//!   [`update_object`](Visibility::update_object); full leaves split on
//!   demand up to a depth limit, and [`compact`](Visibility::compact) merges
//!   sparse subtrees back.
//! - Per-frame viewport queries with
//!   [`check_visible_object`](Visibility::check_visible_object), sorted back to
//!   front with [`compare`].
//! - Placement checks on AABBs ([`is_object_intersect`](Visibility::is_object_intersect))
//!   or exact iso footprints ([`is_object_base_intersect`](Visibility::is_object_base_intersect)).
//!
//! [`ObjectLayer`] bundles an index with a [`TileSource`] and drives a
//! [`Renderer`] once per frame.
//!
//! # Example
//!
//! ```rust
//! use understory_iso::{Box2i, Rect, Vector2i};
//! use understory_visibility::{Object, Visibility};
//!
//! let mut vis = Visibility::new(Vector2i::new(-512, -512), 1024, 6, 4).unwrap();
//! let footprint = Rect::from_box(&Box2i::from_xywh(0, 0, 31, 31));
//!
//! let mut ids = Vec::new();
//! for row in 0..4 {
//!     for col in 0..4 {
//!         let pos = Vector2i::new(col * 32, row * 32);
//!         let id = vis.insert_object(Object::new(format!("tile{row}{col}"), pos, footprint));
//!         assert!(vis.add_object(id));
//!         ids.push(id);
//!     }
//! }
//!
//! // Only the back corner of the map is in view.
//! vis.check_visible_object(&Box2i::from_xywh(-16, -16, 32, 24));
//! let order = vis.sorted_draw_list();
//! assert_eq!(order.first(), Some(&ids[0]));
//! assert!(order.len() < ids.len());
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (tree restructuring at `trace`,
//! refused insertions at `warn`) and never installs a subscriber.

mod config;
mod error;
mod layer;
mod object;
mod order;
mod quad;
mod visibility;

pub use config::VisibilityConfig;
pub use error::Error;
pub use layer::{DrawInfo, FrameStats, ObjectFlags, ObjectLayer, Renderer, TileSource};
pub use object::{Object, ObjectId, ObjectKind, TileRef};
pub use order::compare;
pub use quad::{Quad, QuadId};
pub use visibility::Visibility;
