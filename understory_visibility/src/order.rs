// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painter's-algorithm ordering of visible objects.

use core::cmp::Ordering;

use crate::object::Object;

/// Back-to-front draw order of two objects.
///
/// Objects whose iso footprint starts higher on screen (smaller
/// `iso_abs_base_rect().a.y`) come first; ties fall back to the leftmost
/// corner `b.x`. Objects with equal keys compare [`Ordering::Equal`], so sort
/// with a stable sort ([`slice::sort_by`]) to keep draw-list order among them.
pub fn compare(a: &Object, b: &Object) -> Ordering {
    let (ra, rb) = (a.iso_abs_base_rect(), b.iso_abs_base_rect());
    ra.a.y.cmp(&rb.a.y).then(ra.b.x.cmp(&rb.b.x))
}
