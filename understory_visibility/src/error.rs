// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable errors of the visibility index and the draw layer.

use thiserror::Error;
use understory_iso::Box2i;

use crate::object::{ObjectId, TileRef};

/// Error type for visibility construction and layer-level object management.
///
/// Programmer errors (dangling ids handed to [`Visibility`](crate::Visibility),
/// negative box sizes) panic instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The root cell size must be a positive power of two.
    #[error("cell size {0} is not a positive power of two")]
    CellSizeNotPowerOfTwo(u32),
    /// The id does not name a live object.
    #[error("unknown object {0:?}")]
    UnknownObject(ObjectId),
    /// The tile source has no sprite for this tile.
    #[error("unknown tile {}:{}", .0.tile_set, .0.tile_id)]
    UnknownTile(TileRef),
    /// The footprint overlaps a solid object.
    #[error("placement blocked by {0:?}")]
    Blocked(ObjectId),
    /// The object's iso bounds do not fit in the root cell.
    #[error("object bounds {0} lie outside the map")]
    OutOfBounds(Box2i),
}
