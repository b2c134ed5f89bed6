// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioned map objects and the generational store that owns them.

#[cfg(test)]
use understory_iso::iso_to_ortho;
use understory_iso::{Box2i, Rect, Vector2i, ortho_to_iso};

use crate::quad::QuadId;

/// Identifier for an object held by a [`Visibility`](crate::Visibility).
///
/// A slot index plus a generation counter. Removing an object bumps the
/// slot's generation, so a stale `ObjectId` never aliases a later object
/// stored in the same slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32, u32);

impl ObjectId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Reference to a tile inside an externally loaded tile set.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TileRef {
    /// Tile set identifier assigned by the asset layer.
    pub tile_set: u32,
    /// Tile index within the set.
    pub tile_id: u32,
}

/// What an indexed object is, as far as drawing is concerned.
///
/// The index itself only reads geometry; the kind is carried for the draw
/// layer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    /// A drawable tile.
    Tile(TileRef),
    /// A non-drawn object that still occupies ground (spawn points, blockers).
    #[default]
    Anchor,
}

/// A positioned object and its derived ortho/iso geometry.
///
/// The ortho position and the ortho footprint (`base_rect`, relative to the
/// position) are the source of truth. Everything else is derived whenever
/// one of them changes:
///
/// - `iso_pos = ortho_to_iso(pos)`
/// - `abs_base_rect = base_rect + pos`, and `abs_box` its bounds
/// - `iso_abs_base_rect`: every corner of `abs_base_rect` projected to iso
/// - `iso_abs_box`: the sprite box moved to `iso_pos`, grown to cover the iso
///   footprint. This is the key the quadtree indexes.
///
/// Changing geometry on an indexed object does not move it in the tree; call
/// [`Visibility::update_object`](crate::Visibility::update_object) afterwards.
#[derive(Clone, Debug)]
pub struct Object {
    name: String,
    kind: ObjectKind,
    pos: Vector2i,
    iso_pos: Vector2i,
    base_rect: Rect<i32>,
    abs_base_rect: Rect<i32>,
    iso_base_rect: Rect<i32>,
    iso_abs_base_rect: Rect<i32>,
    sprite: Box2i,
    abs_box: Box2i,
    iso_abs_box: Box2i,
    pub(crate) quad: Option<QuadId>,
}

impl Object {
    /// Create an anchor object at `pos` with the given ortho footprint.
    ///
    /// The sprite box starts empty at the iso origin, so the index key is
    /// just the projected footprint (plus the iso position).
    pub fn new(name: impl Into<String>, pos: Vector2i, base_rect: Rect<i32>) -> Self {
        let mut object = Self {
            name: name.into(),
            kind: ObjectKind::Anchor,
            pos,
            iso_pos: Vector2i::zero(),
            base_rect,
            abs_base_rect: base_rect,
            iso_base_rect: base_rect,
            iso_abs_base_rect: base_rect,
            sprite: Box2i::default(),
            abs_box: Box2i::default(),
            iso_abs_box: Box2i::default(),
            quad: None,
        };
        object.recompute();
        object
    }

    /// Set the drawn extent, relative to the iso position.
    #[must_use]
    pub fn with_sprite(mut self, sprite: Box2i) -> Self {
        self.set_sprite(sprite);
        self
    }

    /// Set the object kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// Move the object in ortho space and rederive its geometry.
    pub fn set_pos(&mut self, pos: Vector2i) {
        self.pos = pos;
        self.recompute();
    }

    /// Replace the ortho footprint (relative to the position).
    pub fn set_base_rect(&mut self, base_rect: Rect<i32>) {
        self.base_rect = base_rect;
        self.recompute();
    }

    /// Replace the sprite box (relative to the iso position).
    pub fn set_sprite(&mut self, sprite: Box2i) {
        self.sprite = sprite;
        self.recompute();
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Object kind.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Ortho position.
    pub fn pos(&self) -> Vector2i {
        self.pos
    }

    /// Iso position, `ortho_to_iso(pos)`.
    pub fn iso_pos(&self) -> Vector2i {
        self.iso_pos
    }

    /// Ortho footprint relative to the position.
    pub fn base_rect(&self) -> Rect<i32> {
        self.base_rect
    }

    /// Ortho footprint in map coordinates.
    pub fn abs_base_rect(&self) -> Rect<i32> {
        self.abs_base_rect
    }

    /// Iso footprint relative to the iso position.
    pub fn iso_base_rect(&self) -> Rect<i32> {
        self.iso_base_rect
    }

    /// Iso footprint in map coordinates; the key of fine overlap queries.
    pub fn iso_abs_base_rect(&self) -> Rect<i32> {
        self.iso_abs_base_rect
    }

    /// Sprite box relative to the iso position.
    pub fn sprite(&self) -> Box2i {
        self.sprite
    }

    /// Ortho AABB of the footprint.
    pub fn abs_box(&self) -> Box2i {
        self.abs_box
    }

    /// Iso AABB; the key of the quadtree.
    pub fn iso_abs_box(&self) -> Box2i {
        self.iso_abs_box
    }

    /// The quadtree node currently holding this object, if indexed.
    pub fn quad(&self) -> Option<QuadId> {
        self.quad
    }

    /// An object whose iso AABB is exactly `iso_box` (size at least 2x2).
    ///
    /// The footprint is a single point inside the box, so the sprite alone
    /// sets the index key.
    #[cfg(test)]
    pub(crate) fn with_iso_box(name: &str, iso_box: Box2i) -> Self {
        let anchor = iso_to_ortho(iso_box.center());
        let footprint = Rect::from_box(&Box2i::from_xywh(anchor.x, anchor.y, 0, 0));
        let object = Self::new(name, Vector2i::zero(), footprint).with_sprite(iso_box);
        debug_assert_eq!(object.iso_abs_box, iso_box);
        object
    }

    fn recompute(&mut self) {
        self.iso_pos = ortho_to_iso(self.pos);
        self.abs_base_rect = self.base_rect.translate(self.pos);
        self.abs_box = self.abs_base_rect.bounds();
        // Project absolute corners; projecting the relative rect and then
        // translating would round differently for odd coordinates.
        self.iso_abs_base_rect = self.abs_base_rect.map(ortho_to_iso);
        self.iso_base_rect = self.iso_abs_base_rect.translate(-self.iso_pos);
        self.iso_abs_box = self
            .sprite
            .translate(self.iso_pos)
            .union(&self.iso_abs_base_rect.bounds());
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    object: Option<Object>,
}

/// Generational slab owning every object known to a `Visibility`.
///
/// Storing an object and indexing it in the quadtree are separate steps.
#[derive(Debug, Default)]
pub(crate) struct ObjectStore {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    len: usize,
}

impl ObjectStore {
    pub(crate) fn insert(&mut self, object: Object) -> ObjectId {
        self.len += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation += 1;
            slot.object = Some(object);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId uses 32-bit indices by design."
            )]
            return ObjectId::new(idx as u32, slot.generation);
        }
        self.slots.push(Slot {
            generation: 1,
            object: Some(object),
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ObjectId uses 32-bit indices by design."
        )]
        ObjectId::new((self.slots.len() - 1) as u32, 1)
    }

    pub(crate) fn remove(&mut self, id: ObjectId) -> Option<Object> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        let object = slot.object.take()?;
        self.free_list.push(id.idx());
        self.len -= 1;
        Some(object)
    }

    pub(crate) fn get(&self, id: ObjectId) -> Option<&Object> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.object.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.object.as_mut()
    }

    #[track_caller]
    pub(crate) fn expect(&self, id: ObjectId) -> &Object {
        self.get(id)
            .unwrap_or_else(|| panic!("dangling ObjectId {id:?}"))
    }

    #[track_caller]
    pub(crate) fn expect_mut(&mut self, id: ObjectId) -> &mut Object {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("dangling ObjectId {id:?}"))
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId uses 32-bit indices by design."
            )]
            let id = ObjectId::new(i as u32, slot.generation);
            slot.object.as_ref().map(|o| (id, o))
        })
    }
}
