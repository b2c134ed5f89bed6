// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction parameters for [`Visibility`](crate::Visibility).

use serde::{Deserialize, Serialize};
use understory_iso::Vector2i;

/// Root placement and split policy of a visibility index.
///
/// Missing fields deserialize to their [`Default`] values, so a map file can
/// carry only the parameters it overrides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Iso-space top-left corner of the root cell.
    pub position: Vector2i,
    /// Side length of the root cell; must be a power of two.
    pub cell_size: u32,
    /// Maximum tree depth. Values below 1 are treated as 1.
    pub max_depth: u32,
    /// Objects a leaf holds before it splits; 0 never splits automatically.
    pub max_objects: usize,
}

impl VisibilityConfig {
    /// Default root cell side.
    pub const DEFAULT_CELL_SIZE: u32 = 4096;
    /// Default depth limit.
    pub const DEFAULT_MAX_DEPTH: u32 = 8;
    /// Default per-leaf capacity.
    pub const DEFAULT_MAX_OBJECTS: usize = 8;

    /// `max_depth` with the lower bound applied.
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth.max(1)
    }
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            position: Vector2i::zero(),
            cell_size: Self::DEFAULT_CELL_SIZE,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_objects: Self::DEFAULT_MAX_OBJECTS,
        }
    }
}
