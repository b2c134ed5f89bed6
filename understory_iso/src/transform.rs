// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ortho (map-authoring) and iso (rendering) coordinate transforms.

use crate::scalar::Scalar;
use crate::vector::Vector2;

/// Project an ortho map coordinate into iso space: `(x - y, (x + y) / 2)`.
///
/// For integers the halving truncates toward zero.
pub fn ortho_to_iso<T: Scalar>(v: Vector2<T>) -> Vector2<T> {
    Vector2::new(v.x - v.y, (v.x + v.y) / T::two())
}

/// Inverse of [`ortho_to_iso`]: `x' = y + x / 2`, `y' = 2y - x'`.
///
/// Exact for floats. For integers the round trip
/// `iso_to_ortho(ortho_to_iso(v))` returns `v` when `v.x + v.y` is even;
/// otherwise exactly one component is off by one unit, because both halvings
/// truncate toward zero. For a positive sum the component comes back one unit
/// low (X when `x > y`, Y when `x < y`); for a negative sum it comes back one
/// unit high (Y when `x > y`, X when `x < y`). This loss is accepted; callers that need exact positions keep
/// the ortho coordinate as the source of truth.
pub fn iso_to_ortho<T: Scalar>(v: Vector2<T>) -> Vector2<T> {
    let x = v.y + v.x / T::two();
    Vector2::new(x, T::two() * v.y - x)
}

#[cfg(feature = "kurbo")]
mod kurbo_interop {
    use kurbo::{Affine, Point, Rect};

    use crate::bounds::Box2f;
    use crate::vector::Vector2f;

    /// The ortho to iso projection as a Kurbo affine map.
    ///
    /// Agrees with [`ortho_to_iso`](crate::ortho_to_iso) on `f64` inputs.
    pub fn iso_affine() -> Affine {
        Affine::new([1.0, 0.5, -1.0, 0.5, 0.0, 0.0])
    }

    impl From<Vector2f> for Point {
        fn from(v: Vector2f) -> Self {
            Self::new(v.x, v.y)
        }
    }

    impl From<Point> for Vector2f {
        fn from(p: Point) -> Self {
            Self::new(p.x, p.y)
        }
    }

    impl From<Box2f> for Rect {
        fn from(b: Box2f) -> Self {
            Self::new(b.pos().x, b.pos().y, b.x2(), b.y2())
        }
    }

    impl From<Rect> for Box2f {
        /// Converts an abstract rect, normalizing inverted edges first.
        fn from(r: Rect) -> Self {
            let r = r.abs();
            Self::from_xywh(r.x0, r.y0, r.width(), r.height())
        }
    }
}

#[cfg(feature = "kurbo")]
pub use kurbo_interop::iso_affine;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{Vector2f, Vector2i};

    #[test]
    fn projection_matches_formula() {
        assert_eq!(ortho_to_iso(Vector2i::new(10, 4)), Vector2i::new(6, 7));
        assert_eq!(ortho_to_iso(Vector2i::new(0, 32)), Vector2i::new(-32, 16));
        assert_eq!(iso_to_ortho(Vector2i::new(6, 7)), Vector2i::new(10, 4));
    }

    #[test]
    fn integer_round_trip_is_exact_for_even_sums() {
        for x in -20..20 {
            for y in -20..20 {
                if (x + y) % 2 != 0 {
                    continue;
                }
                let v = Vector2i::new(x, y);
                assert_eq!(iso_to_ortho(ortho_to_iso(v)), v, "round trip of {v:?}");
            }
        }
    }

    #[test]
    fn integer_round_trip_is_off_by_one_for_odd_sums() {
        for x in -40..40 {
            for y in -40..40 {
                if (x + y) % 2 == 0 {
                    continue;
                }
                let v = Vector2i::new(x, y);
                let d = v - iso_to_ortho(ortho_to_iso(v));
                let expected = match (x + y > 0, x > y) {
                    (true, true) => Vector2i::new(1, 0),
                    (true, false) => Vector2i::new(0, 1),
                    (false, true) => Vector2i::new(0, -1),
                    (false, false) => Vector2i::new(-1, 0),
                };
                assert_eq!(d, expected, "round trip of {v:?}");
            }
        }
        // Negative sums truncate the other way.
        assert_eq!(
            iso_to_ortho(ortho_to_iso(Vector2i::new(-3, -6))),
            Vector2i::new(-3, -5)
        );
    }

    #[test]
    fn float_round_trip_is_exact() {
        let v = Vector2f::new(3.0, 8.0);
        assert_eq!(iso_to_ortho(ortho_to_iso(v)), v);
        assert_eq!(ortho_to_iso(v), Vector2f::new(-5.0, 5.5));
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn affine_agrees_with_float_projection() {
        let p = kurbo::Point::new(3.0, 8.0);
        let iso: Vector2f = (iso_affine() * p).into();
        assert_eq!(iso, ortho_to_iso(Vector2f::new(3.0, 8.0)));
    }
}
