// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Iso: geometry primitives for isometric maps.
//!
//! Understory Iso is the leaf of the isometric visibility stack. It has no
//! required dependencies and is `no_std`.
//!
//! - [`Box2`]: axis-aligned box stored as position plus non-negative size, with
//!   closed-interval containment, intersection, union, and clamping.
//! - [`Rect`]: four-point footprint polygon with segment crossing and
//!   point-in-triangle tests, used for fine overlap checks.
//! - [`ortho_to_iso`] / [`iso_to_ortho`]: the two projections between the map
//!   authoring grid ("ortho") and the rendering space ("iso").
//!
//! Every type is generic over a [`Scalar`]; map objects use `i32`
//! ([`Vector2i`], [`Box2i`]).
//!
//! # Example
//!
//! ```rust
//! use understory_iso::{Box2i, Rect, Vector2i, ortho_to_iso};
//!
//! // A 32x32 ortho footprint at (64, 0), projected into iso space.
//! let ortho = Rect::from_box(&Box2i::from_xywh(64, 0, 32, 32));
//! let iso = ortho.map(ortho_to_iso);
//! assert_eq!(iso.a, Vector2i::new(64, 32));
//!
//! // Its iso bounds form the diamond's AABB.
//! let bounds = iso.bounds();
//! assert_eq!(bounds, Box2i::from_xywh(32, 32, 64, 32));
//! assert!(bounds.contains_point(iso.c));
//! ```
//!
//! ## Features
//!
//! - `kurbo`: conversions between `f64` vectors/boxes and Kurbo points/rects,
//!   plus `iso_affine` (needs `std` or `libm`).
//! - `serde`: serialization for [`Vector2`] and [`Rect`].
//!
//! ### Integer semantics
//!
//! Integer halving truncates toward zero, so the ortho/iso round trip is only
//! exact when `x + y` is even. Footprint predicates are evaluated in `f64`.

#![no_std]

pub mod bounds;
pub mod rect;
pub mod scalar;
pub mod transform;
pub mod vector;

pub use bounds::{Box2, Box2f, Box2i};
pub use rect::{Rect, line_intersect};
pub use scalar::Scalar;
pub use transform::{iso_to_ortho, ortho_to_iso};
pub use vector::{Vector2, Vector2f, Vector2i};
