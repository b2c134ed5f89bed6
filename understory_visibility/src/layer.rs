// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-layer adapter: placement validation and per-frame draw submission.
//!
//! [`ObjectLayer`] owns a [`Visibility`] and resolves tile sprites through a
//! [`TileSource`]. Each frame, [`ObjectLayer::render`] queries the viewport,
//! sorts the result back to front with [`compare`](crate::compare), and hands
//! one [`DrawInfo`] per visible tile to a [`Renderer`].

use std::collections::HashMap;

use bitflags::bitflags;
use kurbo::Rect as KurboRect;
use tracing::{debug, trace};
use understory_iso::{Box2i, Rect, Vector2i};

use crate::config::VisibilityConfig;
use crate::error::Error;
use crate::object::{Object, ObjectId, ObjectKind, TileRef};
use crate::visibility::Visibility;

/// Asset seam: the sprite extent of a tile, relative to the object's iso
/// position.
///
/// Implemented for any `Fn(TileRef) -> Option<Box2i>`.
pub trait TileSource {
    /// Sprite box of `tile`, or `None` when the tile is unknown.
    fn sprite_box(&self, tile: TileRef) -> Option<Box2i>;
}

impl<F> TileSource for F
where
    F: Fn(TileRef) -> Option<Box2i>,
{
    fn sprite_box(&self, tile: TileRef) -> Option<Box2i> {
        self(tile)
    }
}

/// Receives draw calls in back-to-front order.
pub trait Renderer {
    /// Draw one tile object.
    fn draw(&mut self, info: &DrawInfo<'_>);
}

/// One draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawInfo<'a> {
    /// The object being drawn.
    pub id: ObjectId,
    /// Its debug name.
    pub name: &'a str,
    /// Tile to draw.
    pub tile: TileRef,
    /// Destination rectangle, relative to the viewport's top-left corner.
    pub dest: KurboRect,
}

/// Counters from one [`ObjectLayer::render`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Objects whose bounds intersect the viewport.
    pub visible: usize,
    /// Objects tested by the visibility query.
    pub examined: usize,
    /// Draw calls issued.
    pub drawn: usize,
    /// Whether the draw order was recomputed this frame.
    pub resorted: bool,
}

bitflags! {
    /// Per-object flags controlling drawing and placement.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// Object is drawn when it is a tile.
        const VISIBLE = 0b0000_0001;
        /// Object blocks placement of other solid objects.
        const SOLID   = 0b0000_0010;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::SOLID
    }
}

/// A visibility index bundled with a tile source and draw bookkeeping.
#[derive(Debug)]
pub struct ObjectLayer<S> {
    visibility: Visibility,
    tiles: S,
    flags: HashMap<ObjectId, ObjectFlags>,
    sorted: Vec<ObjectId>,
    last_viewport: Option<Box2i>,
}

impl<S: TileSource> ObjectLayer<S> {
    /// Create an empty layer.
    ///
    /// # Errors
    ///
    /// [`Error::CellSizeNotPowerOfTwo`] for an invalid root cell size.
    pub fn new(config: &VisibilityConfig, tiles: S) -> Result<Self, Error> {
        Ok(Self {
            visibility: Visibility::from_config(config)?,
            tiles,
            flags: HashMap::new(),
            sorted: Vec::new(),
            last_viewport: None,
        })
    }

    /// The underlying index.
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// The tile source.
    pub fn tiles(&self) -> &S {
        &self.tiles
    }

    /// Place a drawable tile object.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownTile`] when the tile source has no sprite for `tile`.
    /// - [`Error::Blocked`] when the footprint overlaps a solid object.
    /// - [`Error::OutOfBounds`] when the object does not fit the map.
    pub fn add_object(
        &mut self,
        name: &str,
        pos: Vector2i,
        base_rect: Rect<i32>,
        tile: TileRef,
    ) -> Result<ObjectId, Error> {
        let sprite = self
            .tiles
            .sprite_box(tile)
            .ok_or(Error::UnknownTile(tile))?;
        let object = Object::new(name, pos, base_rect)
            .with_sprite(sprite)
            .with_kind(ObjectKind::Tile(tile));
        self.place(object)
    }

    /// Place a non-drawn object that still occupies ground.
    ///
    /// # Errors
    ///
    /// [`Error::Blocked`] and [`Error::OutOfBounds`] as for
    /// [`add_object`](Self::add_object).
    pub fn add_anchor(
        &mut self,
        name: &str,
        pos: Vector2i,
        base_rect: Rect<i32>,
    ) -> Result<ObjectId, Error> {
        self.place(Object::new(name, pos, base_rect))
    }

    fn place(&mut self, object: Object) -> Result<ObjectId, Error> {
        if let Some(blocker) = self.solid_overlap(&object, None) {
            debug!(name = object.name(), ?blocker, "placement blocked");
            return Err(Error::Blocked(blocker));
        }
        let key = object.iso_abs_box();
        if !self.visibility.bounds().contains(&key) {
            return Err(Error::OutOfBounds(key));
        }
        let id = self.visibility.insert_object(object);
        self.visibility.add_object(id);
        self.flags.insert(id, ObjectFlags::default());
        Ok(id)
    }

    /// Move an object to a new ortho position.
    ///
    /// On error the object keeps its previous position.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownObject`] for a stale id.
    /// - [`Error::Blocked`] when a solid object would overlap a solid mover.
    /// - [`Error::OutOfBounds`] when the new position leaves the map.
    pub fn move_object(&mut self, id: ObjectId, pos: Vector2i) -> Result<(), Error> {
        let object = self
            .visibility
            .object_mut(id)
            .ok_or(Error::UnknownObject(id))?;
        let old = object.pos();
        if old == pos {
            return Ok(());
        }
        object.set_pos(pos);

        let object = self.visibility.object(id).ok_or(Error::UnknownObject(id))?;
        let blocker = if self.is_solid(id) {
            self.solid_overlap(object, Some(id))
        } else {
            None
        };
        let key = object.iso_abs_box();
        let result = match blocker {
            Some(blocker) => Err(Error::Blocked(blocker)),
            None if !self.visibility.update_object(id) => Err(Error::OutOfBounds(key)),
            None => Ok(()),
        };
        if let Err(err) = result {
            if let Some(object) = self.visibility.object_mut(id) {
                object.set_pos(old);
            }
            // A failed update unindexes the object; the old position fits.
            if matches!(err, Error::OutOfBounds(_)) {
                self.visibility.update_object(id);
            }
        }
        result
    }

    /// Remove an object from the layer and return it.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownObject`] for a stale id.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<Object, Error> {
        let object = self
            .visibility
            .take_object(id)
            .ok_or(Error::UnknownObject(id))?;
        self.flags.remove(&id);
        self.sorted.retain(|&o| o != id);
        Ok(object)
    }

    /// Whether a solid object with this footprint could be placed at `pos`.
    pub fn can_place(&self, pos: Vector2i, base_rect: Rect<i32>) -> bool {
        let candidate = Object::new("candidate", pos, base_rect);
        self.visibility.bounds().contains(&candidate.iso_abs_box())
            && self.solid_overlap(&candidate, None).is_none()
    }

    /// Whether no object's iso bounds touch `area`.
    pub fn is_area_free(&self, area: &Box2i) -> bool {
        !self.visibility.is_object_intersect(area)
    }

    /// Flags of a live object.
    pub fn flags(&self, id: ObjectId) -> Option<ObjectFlags> {
        self.flags.get(&id).copied()
    }

    /// Replace an object's flags.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownObject`] for a stale id.
    pub fn set_flags(&mut self, id: ObjectId, flags: ObjectFlags) -> Result<(), Error> {
        let slot = self.flags.get_mut(&id).ok_or(Error::UnknownObject(id))?;
        *slot = flags;
        Ok(())
    }

    /// Draw every visible tile intersecting `viewport`, back to front.
    ///
    /// The viewport is rounded outward to whole iso units. The draw order is
    /// only recomputed when the index changed or the viewport moved.
    pub fn render(&mut self, viewport: KurboRect, renderer: &mut impl Renderer) -> FrameStats {
        let view = viewport_box(viewport);
        let examined = self.visibility.check_visible_object(&view);
        let resorted = self.visibility.has_updated() || self.last_viewport != Some(view);
        if resorted {
            self.sorted = self.visibility.sorted_draw_list();
            self.visibility.clear_updated();
            self.last_viewport = Some(view);
        }

        let mut drawn = 0;
        for &id in &self.sorted {
            let Some(object) = self.visibility.object(id) else {
                continue;
            };
            let ObjectKind::Tile(tile) = object.kind() else {
                continue;
            };
            let visible = self
                .flags
                .get(&id)
                .is_some_and(|f| f.contains(ObjectFlags::VISIBLE));
            if !visible {
                continue;
            }
            let sprite = object.sprite().translate(object.iso_pos() - view.pos());
            renderer.draw(&DrawInfo {
                id,
                name: object.name(),
                tile,
                dest: KurboRect::new(
                    f64::from(sprite.pos().x),
                    f64::from(sprite.pos().y),
                    f64::from(sprite.x2()),
                    f64::from(sprite.y2()),
                ),
            });
            drawn += 1;
        }

        let stats = FrameStats {
            visible: self.visibility.draw_list().len(),
            examined,
            drawn,
            resorted,
        };
        trace!(?stats, "frame rendered");
        stats
    }

    fn is_solid(&self, id: ObjectId) -> bool {
        self.flags
            .get(&id)
            .is_some_and(|f| f.contains(ObjectFlags::SOLID))
    }

    fn solid_overlap(&self, object: &Object, skip: Option<ObjectId>) -> Option<ObjectId> {
        self.visibility.find_footprint_overlap(
            &object.iso_abs_base_rect(),
            skip,
            &|id| self.is_solid(id),
        )
    }
}

/// Round a floating point viewport outward to an integer box.
fn viewport_box(viewport: KurboRect) -> Box2i {
    let r = viewport.abs().expand();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Float to int casts saturate; viewports beyond i32 are clipped."
    )]
    let (x0, y0, x1, y1) = (r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32);
    Box2i::from_corners(Vector2i::new(x0, y0), Vector2i::new(x1, y1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRASS: TileRef = TileRef {
        tile_set: 0,
        tile_id: 1,
    };

    type Source = fn(TileRef) -> Option<Box2i>;

    fn sprites(tile: TileRef) -> Option<Box2i> {
        (tile.tile_set == 0).then(|| Box2i::from_xywh(-32, -32, 64, 64))
    }

    fn layer() -> ObjectLayer<Source> {
        let config = VisibilityConfig {
            position: Vector2i::new(-512, -512),
            cell_size: 1024,
            max_depth: 4,
            max_objects: 2,
        };
        ObjectLayer::new(&config, sprites as Source).unwrap()
    }

    /// Footprint inset by one unit so grid neighbors do not touch.
    fn cell() -> Rect<i32> {
        Rect::from_box(&Box2i::from_xywh(0, 0, 31, 31))
    }

    #[derive(Default)]
    struct Recorder(Vec<(String, KurboRect)>);

    impl Renderer for Recorder {
        fn draw(&mut self, info: &DrawInfo<'_>) {
            self.0.push((info.name.to_owned(), info.dest));
        }
    }

    impl Recorder {
        fn names(&self) -> Vec<&str> {
            self.0.iter().map(|(n, _)| n.as_str()).collect()
        }
    }

    #[test]
    fn unknown_tiles_are_rejected() {
        let mut layer = layer();
        let missing = TileRef {
            tile_set: 9,
            tile_id: 0,
        };
        assert_eq!(
            layer.add_object("x", Vector2i::zero(), cell(), missing),
            Err(Error::UnknownTile(missing))
        );
        assert!(layer.visibility().is_empty());
    }

    #[test]
    fn solid_footprints_block_placement() {
        let mut layer = layer();
        let a = layer.add_object("a", Vector2i::new(0, 0), cell(), GRASS).unwrap();
        let b = layer.add_object("b", Vector2i::new(32, 0), cell(), GRASS).unwrap();
        let c = layer.add_object("c", Vector2i::new(0, 32), cell(), GRASS).unwrap();

        assert!(!layer.can_place(Vector2i::new(16, 16), cell()));
        let err = layer
            .add_object("d", Vector2i::new(16, 16), cell(), GRASS)
            .unwrap_err();
        assert!(
            matches!(err, Error::Blocked(id) if [a, b, c].contains(&id)),
            "unexpected {err:?}"
        );
        assert_eq!(layer.visibility().len(), 3);
        assert!(layer.can_place(Vector2i::new(32, 32), cell()));
    }

    #[test]
    fn crossing_footprints_block_placement() {
        let mut layer = layer();
        let tall = layer
            .add_anchor(
                "tall",
                Vector2i::zero(),
                Rect::from_box(&Box2i::from_xywh(0, 0, 10, 100)),
            )
            .unwrap();
        let bar = Rect::from_box(&Box2i::from_xywh(0, 0, 20, 10));
        assert!(!layer.can_place(Vector2i::new(-5, 40), bar));
        assert_eq!(
            layer.add_anchor("bar", Vector2i::new(-5, 40), bar),
            Err(Error::Blocked(tall))
        );
    }

    #[test]
    fn non_solid_objects_do_not_block() {
        let mut layer = layer();
        let spawn = layer
            .add_anchor("spawn", Vector2i::new(200, 200), cell())
            .unwrap();
        assert!(!layer.can_place(Vector2i::new(200, 200), cell()));
        layer.set_flags(spawn, ObjectFlags::empty()).unwrap();
        assert!(
            layer
                .add_object("rug", Vector2i::new(200, 200), cell(), GRASS)
                .is_ok()
        );
    }

    #[test]
    fn objects_outside_the_map_are_rejected() {
        let mut layer = layer();
        let err = layer
            .add_object("far", Vector2i::new(2000, 0), cell(), GRASS)
            .unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(_)), "unexpected {err:?}");
        assert!(!layer.can_place(Vector2i::new(2000, 0), cell()));
    }

    #[test]
    fn blocked_move_keeps_old_position() {
        let mut layer = layer();
        let a = layer.add_object("a", Vector2i::new(0, 0), cell(), GRASS).unwrap();
        let b = layer.add_object("b", Vector2i::new(32, 0), cell(), GRASS).unwrap();

        assert_eq!(
            layer.move_object(b, Vector2i::new(0, 0)),
            Err(Error::Blocked(a))
        );
        assert_eq!(layer.visibility().object(b).unwrap().pos(), Vector2i::new(32, 0));

        let err = layer.move_object(b, Vector2i::new(2000, 0)).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(_)), "unexpected {err:?}");
        let object = layer.visibility().object(b).unwrap();
        assert_eq!(object.pos(), Vector2i::new(32, 0));
        assert!(object.quad().is_some(), "reverted object is indexed again");

        assert_eq!(layer.move_object(b, Vector2i::new(96, 0)), Ok(()));
        assert_eq!(layer.visibility().object(b).unwrap().pos(), Vector2i::new(96, 0));
    }

    #[test]
    fn render_draws_back_to_front_and_caches_order() {
        let mut layer = layer();
        layer.add_object("a", Vector2i::new(0, 0), cell(), GRASS).unwrap();
        let b = layer.add_object("b", Vector2i::new(32, 0), cell(), GRASS).unwrap();
        layer.add_object("c", Vector2i::new(0, 32), cell(), GRASS).unwrap();
        layer.add_anchor("spawn", Vector2i::new(64, 64), cell()).unwrap();

        let viewport = KurboRect::new(-100.0, -100.0, 100.0, 100.0);
        let mut rec = Recorder::default();
        let stats = layer.render(viewport, &mut rec);
        // Rows back to front; within a row, leftmost first. Anchors are not drawn.
        assert_eq!(rec.names(), ["a", "c", "b"]);
        assert_eq!(stats.visible, 4);
        assert_eq!(stats.drawn, 3);
        assert!(stats.resorted);
        assert_eq!(rec.0[0].1, KurboRect::new(68.0, 68.0, 132.0, 132.0));

        let mut rec = Recorder::default();
        let stats = layer.render(viewport, &mut rec);
        assert!(!stats.resorted);
        assert_eq!(rec.names(), ["a", "c", "b"]);

        // Moving b to the front row forces a re-sort.
        layer.move_object(b, Vector2i::new(32, 64)).unwrap();
        let mut rec = Recorder::default();
        let stats = layer.render(viewport, &mut rec);
        assert!(stats.resorted);
        assert_eq!(rec.names(), ["a", "c", "b"]);

        layer.set_flags(b, ObjectFlags::SOLID).unwrap();
        let mut rec = Recorder::default();
        layer.render(viewport, &mut rec);
        assert_eq!(rec.names(), ["a", "c"]);
    }

    #[test]
    fn viewport_rounds_outward() {
        assert_eq!(
            viewport_box(KurboRect::new(0.5, -0.5, 10.2, 3.0)),
            Box2i::from_xywh(0, -1, 11, 4)
        );
        assert_eq!(
            viewport_box(KurboRect::new(10.0, 10.0, 0.0, 0.0)),
            Box2i::from_xywh(0, 0, 10, 10)
        );
    }

    #[test]
    fn removed_objects_stop_drawing_and_free_their_footprint() {
        let mut layer = layer();
        let a = layer.add_object("a", Vector2i::new(0, 0), cell(), GRASS).unwrap();
        assert!(!layer.can_place(Vector2i::zero(), cell()));
        let taken = layer.remove_object(a).unwrap();
        assert_eq!(taken.name(), "a");
        assert_eq!(layer.remove_object(a).unwrap_err(), Error::UnknownObject(a));
        assert_eq!(layer.flags(a), None);
        assert!(layer.can_place(Vector2i::zero(), cell()));

        let mut rec = Recorder::default();
        layer.render(KurboRect::new(-100.0, -100.0, 100.0, 100.0), &mut rec);
        assert!(rec.0.is_empty());
    }
}
