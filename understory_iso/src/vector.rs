// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-component vector used for positions and sizes.

use core::fmt;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::scalar::{Scalar, max_t, min_t};

/// A 2D vector (or point) over a scalar `T`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2<T> {
    /// Horizontal component.
    pub x: T,
    /// Vertical component (grows downward in screen space).
    pub y: T,
}

/// Integer vector, the coordinate type of map objects.
pub type Vector2i = Vector2<i32>;

/// Floating point vector.
pub type Vector2f = Vector2<f64>;

impl<T> Vector2<T> {
    /// Create a vector from its components.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Scalar> Vector2<T> {
    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(min_t(self.x, other.x), min_t(self.y, other.y))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(max_t(self.x, other.x), max_t(self.y, other.y))
    }

    /// Divide both components by two (truncating for integers).
    pub fn half(self) -> Self {
        Self::new(self.x / T::two(), self.y / T::two())
    }
}

impl<T: Scalar> Add for Vector2<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Scalar> Sub for Vector2<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Scalar> Neg for Vector2<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<T: Scalar> AddAssign for Vector2<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar> SubAssign for Vector2<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: fmt::Display> fmt::Display for Vector2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_component_wise() {
        let a = Vector2i::new(3, -4);
        let b = Vector2i::new(1, 10);
        assert_eq!(a + b, Vector2i::new(4, 6));
        assert_eq!(a - b, Vector2i::new(2, -14));
        assert_eq!(-a, Vector2i::new(-3, 4));
        assert_eq!(a.min(b), Vector2i::new(1, -4));
        assert_eq!(a.max(b), Vector2i::new(3, 10));
        assert_eq!(Vector2i::new(7, -7).half(), Vector2i::new(3, -3));
    }
}
