// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric scalar abstraction shared by all geometry types.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric scalar for vectors, boxes, and footprints.
///
/// Integer scalars use truncating division, which is what makes the
/// ortho/iso round trip lossy (see [`iso_to_ortho`](crate::iso_to_ortho)).
/// Polygon predicates that need fractions are evaluated in `f64` through
/// [`Scalar::widen`].
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// The value two, used for halving.
    fn two() -> Self;

    /// Convert the scalar to `f64` for parametric and barycentric tests.
    fn widen(v: Self) -> f64;
}

impl Scalar for i32 {
    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn two() -> Self {
        2
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        f64::from(v)
    }
}

impl Scalar for i64 {
    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn two() -> Self {
        2
    }

    #[inline]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Map coordinates stay far below 2^53."
    )]
    fn widen(v: Self) -> f64 {
        v as f64
    }
}

impl Scalar for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn two() -> Self {
        2.0
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        f64::from(v)
    }
}

impl Scalar for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn two() -> Self {
        2.0
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        v
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

/// Clamp `v` into `[lo, hi]`. Assumes `lo <= hi` and no NaN.
pub(crate) fn clamp_t<T: PartialOrd + Copy>(v: T, lo: T, hi: T) -> T {
    min_t(max_t(v, lo), hi)
}
