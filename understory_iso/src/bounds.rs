// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned box stored as position plus non-negative size.

use core::fmt;

use crate::scalar::{Scalar, clamp_t, le, lt};
use crate::vector::Vector2;

/// Axis-aligned bounding box in 2D, stored as `pos` (top-left) and `size`.
///
/// Both size components are non-negative; every constructor and mutator
/// checks this and panics on violation. The far corner is `(x2, y2) = pos + size`.
///
/// All predicates use closed intervals: a box touching another along an edge
/// both [contains](Self::contains) a degenerate box on that edge and
/// [intersects](Self::intersects) it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Box2<T> {
    pos: Vector2<T>,
    size: Vector2<T>,
}

/// Integer box, the key type of the visibility quadtree.
pub type Box2i = Box2<i32>;

/// Floating point box.
pub type Box2f = Box2<f64>;

impl<T: Scalar> Box2<T> {
    /// Create a box from its top-left position and size.
    ///
    /// # Panics
    ///
    /// Panics if either size component is negative (or NaN).
    #[track_caller]
    pub fn new(pos: Vector2<T>, size: Vector2<T>) -> Self {
        assert_size(size);
        Self { pos, size }
    }

    /// Create a box from origin and size components.
    ///
    /// # Panics
    ///
    /// Panics if `w` or `h` is negative.
    #[track_caller]
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self::new(Vector2::new(x, y), Vector2::new(w, h))
    }

    /// Create a box spanning `min..=max`.
    ///
    /// # Panics
    ///
    /// Panics if `max` lies left of or above `min`.
    #[track_caller]
    pub fn from_corners(min: Vector2<T>, max: Vector2<T>) -> Self {
        Self::new(min, max - min)
    }

    /// Replace position and size.
    ///
    /// # Panics
    ///
    /// Panics if either size component is negative.
    #[track_caller]
    pub fn set(&mut self, pos: Vector2<T>, size: Vector2<T>) {
        assert_size(size);
        self.pos = pos;
        self.size = size;
    }

    /// Move the box without resizing it.
    pub fn set_pos(&mut self, pos: Vector2<T>) {
        self.pos = pos;
    }

    /// Resize the box, keeping its position.
    ///
    /// # Panics
    ///
    /// Panics if either size component is negative.
    #[track_caller]
    pub fn set_size(&mut self, size: Vector2<T>) {
        assert_size(size);
        self.size = size;
    }

    /// Top-left corner.
    pub fn pos(&self) -> Vector2<T> {
        self.pos
    }

    /// Width and height.
    pub fn size(&self) -> Vector2<T> {
        self.size
    }

    /// Right edge.
    pub fn x2(&self) -> T {
        self.pos.x + self.size.x
    }

    /// Bottom edge.
    pub fn y2(&self) -> T {
        self.pos.y + self.size.y
    }

    /// Bottom-right corner, `(x2, y2)`.
    pub fn max(&self) -> Vector2<T> {
        Vector2::new(self.x2(), self.y2())
    }

    /// Center point (truncated for integers).
    pub fn center(&self) -> Vector2<T> {
        self.pos + self.size.half()
    }

    /// True when the box has no area.
    pub fn is_empty(&self) -> bool {
        !lt(T::zero(), self.size.x) || !lt(T::zero(), self.size.y)
    }

    /// Grow this box so it also covers `other`.
    pub fn include(&mut self, other: &Self) {
        let max = self.max().max(other.max());
        self.pos = self.pos.min(other.pos);
        self.size = max - self.pos;
    }

    /// The smallest box covering both inputs.
    #[must_use]
    pub fn union(mut self, other: &Self) -> Self {
        self.include(other);
        self
    }

    /// Whether `other` lies completely inside this box (edges included).
    pub fn contains(&self, other: &Self) -> bool {
        le(self.pos.x, other.pos.x)
            && le(self.pos.y, other.pos.y)
            && le(other.x2(), self.x2())
            && le(other.y2(), self.y2())
    }

    /// Whether the point lies inside this box (edges included).
    pub fn contains_point(&self, p: Vector2<T>) -> bool {
        le(self.pos.x, p.x) && le(self.pos.y, p.y) && le(p.x, self.x2()) && le(p.y, self.y2())
    }

    /// Whether the two boxes overlap. Only boxes strictly separated on an
    /// axis do not intersect; touching edges count as intersecting.
    pub fn intersects(&self, other: &Self) -> bool {
        !(lt(other.x2(), self.pos.x)
            || lt(self.x2(), other.pos.x)
            || lt(other.y2(), self.pos.y)
            || lt(self.y2(), other.pos.y))
    }

    /// Project a point onto this box.
    pub fn clamp_point(&self, p: Vector2<T>) -> Vector2<T> {
        Vector2::new(
            clamp_t(p.x, self.pos.x, self.x2()),
            clamp_t(p.y, self.pos.y, self.y2()),
        )
    }

    /// Project a box onto this box by clamping both of its corners.
    ///
    /// A box outside this one collapses onto the nearest edge or corner.
    #[must_use]
    pub fn clamp_box(&self, other: &Self) -> Self {
        let min = self.clamp_point(other.pos);
        let max = self.clamp_point(other.max());
        Self {
            pos: min,
            size: max - min,
        }
    }

    /// Translate the box by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vector2<T>) -> Self {
        Self {
            pos: self.pos + offset,
            size: self.size,
        }
    }

    /// The four equal quadrants of this box, ordered top-left, top-right,
    /// bottom-left, bottom-right. Integer sizes are halved with truncation.
    pub fn quadrants(&self) -> [Self; 4] {
        let half = self.size.half();
        let Vector2 { x, y } = self.pos;
        [
            Self { pos: Vector2::new(x, y), size: half },
            Self { pos: Vector2::new(x + half.x, y), size: half },
            Self { pos: Vector2::new(x, y + half.y), size: half },
            Self { pos: Vector2::new(x + half.x, y + half.y), size: half },
        ]
    }

    /// Subtract `other` from this box.
    ///
    /// Rectangle subtraction has no defined semantics for this type: the
    /// result of removing an inner box is not a box.
    ///
    /// # Panics
    ///
    /// Always panics.
    #[track_caller]
    pub fn exclude(&mut self, other: &Self) {
        let _ = other;
        unimplemented!("Box2::exclude has no defined semantics");
    }
}

#[track_caller]
fn assert_size<T: Scalar>(size: Vector2<T>) {
    assert!(
        le(T::zero(), size.x) && le(T::zero(), size.y),
        "box size must be non-negative, got {size:?}"
    );
}

impl<T: fmt::Display> fmt::Display for Box2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}x{}]",
            self.pos.x, self.pos.y, self.size.x, self.size.y
        )
    }
}
