// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Four-point footprint polygon with segment and triangle tests.

use crate::bounds::Box2;
use crate::scalar::Scalar;
use crate::vector::Vector2;

/// A quadrilateral `a, b, c, d`, expected in counter-clockwise order.
///
/// The winding is a caller contract and is not checked. Footprints are
/// usually convex (an axis-aligned box in ortho space becomes a diamond in
/// iso space), which is what the two-triangle decomposition used by
/// [`contains_point`](Self::contains_point) assumes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect<T> {
    /// First corner.
    pub a: Vector2<T>,
    /// Second corner.
    pub b: Vector2<T>,
    /// Third corner.
    pub c: Vector2<T>,
    /// Fourth corner.
    pub d: Vector2<T>,
}

impl<T> Rect<T> {
    /// Create a footprint from its four corners.
    pub const fn new(a: Vector2<T>, b: Vector2<T>, c: Vector2<T>, d: Vector2<T>) -> Self {
        Self { a, b, c, d }
    }
}

impl<T: Scalar> Rect<T> {
    /// The footprint of an axis-aligned box: `a = (x, y)`, `b = (x, y2)`,
    /// `c = (x2, y2)`, `d = (x2, y)`.
    pub fn from_box(bx: &Box2<T>) -> Self {
        let min = bx.pos();
        let max = bx.max();
        Self {
            a: min,
            b: Vector2::new(min.x, max.y),
            c: max,
            d: Vector2::new(max.x, min.y),
        }
    }

    /// Corners in order.
    pub fn points(&self) -> [Vector2<T>; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Edges `ab`, `bc`, `cd`, `da`.
    pub fn edges(&self) -> [(Vector2<T>, Vector2<T>); 4] {
        [
            (self.a, self.b),
            (self.b, self.c),
            (self.c, self.d),
            (self.d, self.a),
        ]
    }

    /// Apply `f` to every corner.
    #[must_use]
    pub fn map(&self, mut f: impl FnMut(Vector2<T>) -> Vector2<T>) -> Self {
        Self {
            a: f(self.a),
            b: f(self.b),
            c: f(self.c),
            d: f(self.d),
        }
    }

    /// Translate every corner by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vector2<T>) -> Self {
        self.map(|p| p + offset)
    }

    /// Axis-aligned bounds of the four corners.
    pub fn bounds(&self) -> Box2<T> {
        let min = self.a.min(self.b).min(self.c).min(self.d);
        let max = self.a.max(self.b).max(self.c).max(self.d);
        Box2::from_corners(min, max)
    }

    /// Whether any of the 16 edge pairs of the two footprints cross.
    pub fn intersects(&self, other: &Self) -> bool {
        self.edges().iter().any(|&(p, q)| {
            other
                .edges()
                .iter()
                .any(|&(r, s)| line_intersect(p, q, r, s))
        })
    }

    /// Reduced edge test: edges `ab` and `cd` of `self` against every edge of
    /// `other` (8 pairs).
    ///
    /// Cheaper than [`intersects`](Self::intersects) but blind to crossings
    /// that only involve `bc` or `da` of `self`, so it is meant to be combined
    /// with containment tests in both directions.
    pub fn intersects_reduced(&self, other: &Self) -> bool {
        [(self.a, self.b), (self.c, self.d)].iter().any(|&(p, q)| {
            other
                .edges()
                .iter()
                .any(|&(r, s)| line_intersect(p, q, r, s))
        })
    }

    /// Whether `p` lies inside the footprint.
    ///
    /// The quad is split into triangles `(a, b, c)` and `(a, c, d)`. Each
    /// triangle test accepts `u >= 0, v >= 0, u + v < 1`, so edges `ab`, `da`
    /// and the diagonal are inside while `bc` and `cd` are outside. Two
    /// footprints sharing an edge therefore never both claim it.
    pub fn contains_point(&self, p: Vector2<T>) -> bool {
        point_in_triangle(p, self.a, self.b, self.c) || point_in_triangle(p, self.a, self.c, self.d)
    }

    /// Whether every corner of `other` lies inside this footprint.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.points().iter().all(|&p| self.contains_point(p))
    }
}

/// Parametric intersection of segments `a1..a2` and `b1..b2`.
///
/// Parallel (and collinear) segments never intersect. Otherwise both
/// parameters must fall in `[0, 1]`, so segments sharing an endpoint do.
pub fn line_intersect<T: Scalar>(
    a1: Vector2<T>,
    a2: Vector2<T>,
    b1: Vector2<T>,
    b2: Vector2<T>,
) -> bool {
    let (a1x, a1y) = (T::widen(a1.x), T::widen(a1.y));
    let (a2x, a2y) = (T::widen(a2.x), T::widen(a2.y));
    let (b1x, b1y) = (T::widen(b1.x), T::widen(b1.y));
    let (b2x, b2y) = (T::widen(b2.x), T::widen(b2.y));

    let denominator = (b2y - b1y) * (a2x - a1x) - (b2x - b1x) * (a2y - a1y);
    if denominator == 0.0 {
        return false;
    }
    let s = ((b2x - b1x) * (a1y - b1y) - (b2y - b1y) * (a1x - b1x)) / denominator;
    let t = ((a2x - a1x) * (a1y - b1y) - (a2y - a1y) * (a1x - b1x)) / denominator;
    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}

/// Barycentric point-in-triangle test, exclusive on edge `p1..p2`.
fn point_in_triangle<T: Scalar>(
    p: Vector2<T>,
    p0: Vector2<T>,
    p1: Vector2<T>,
    p2: Vector2<T>,
) -> bool {
    let v0 = (T::widen(p2.x) - T::widen(p0.x), T::widen(p2.y) - T::widen(p0.y));
    let v1 = (T::widen(p1.x) - T::widen(p0.x), T::widen(p1.y) - T::widen(p0.y));
    let v2 = (T::widen(p.x) - T::widen(p0.x), T::widen(p.y) - T::widen(p0.y));

    let dot00 = v0.0 * v0.0 + v0.1 * v0.1;
    let dot01 = v0.0 * v1.0 + v0.1 * v1.1;
    let dot02 = v0.0 * v2.0 + v0.1 * v2.1;
    let dot11 = v1.0 * v1.0 + v1.1 * v1.1;
    let dot12 = v1.0 * v2.0 + v1.1 * v2.1;

    let denominator = dot00 * dot11 - dot01 * dot01;
    if denominator == 0.0 {
        return false;
    }
    let u = (dot11 * dot02 - dot01 * dot12) / denominator;
    let v = (dot00 * dot12 - dot01 * dot02) / denominator;
    u >= 0.0 && v >= 0.0 && u + v < 1.0
}
