// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visibility manager: object storage plus the quadtree over it.

use tracing::{debug, instrument, trace, warn};
use understory_iso::{Box2i, Rect, Vector2i};

use crate::config::VisibilityConfig;
use crate::error::Error;
use crate::object::{Object, ObjectId, ObjectStore};
use crate::order::compare;
use crate::quad::{Quad, QuadId, QuadTree};

/// Owner of a map's objects and the quadtree indexing their iso bounds.
///
/// Objects are first stored with [`insert_object`](Self::insert_object) and
/// then indexed with [`add_object`](Self::add_object). Index mutations
/// (`add_object`, `remove_object`, `update_object`, `split`, `merge`,
/// `compact`) raise the [`has_updated`](Self::has_updated) flag when they
/// change something, so a renderer knows to re-sort its draw list.
///
/// Methods taking an [`ObjectId`] panic when the id does not name a live
/// object in this manager.
#[derive(Debug)]
pub struct Visibility {
    tree: QuadTree,
    objects: ObjectStore,
    draw_list: Vec<ObjectId>,
    updated: bool,
}

impl Visibility {
    /// Create an empty index whose root cell is `cell_size` square at
    /// `position` (iso space).
    ///
    /// A `max_depth` of 0 is treated as 1. A `max_objects` of 0 disables
    /// automatic splitting.
    ///
    /// # Errors
    ///
    /// [`Error::CellSizeNotPowerOfTwo`] unless `cell_size` is a positive
    /// power of two.
    pub fn new(
        position: Vector2i,
        cell_size: u32,
        max_depth: u32,
        max_objects: usize,
    ) -> Result<Self, Error> {
        // Root sides must also fit the i32 coordinate space.
        let side = i32::try_from(cell_size).map_err(|_| Error::CellSizeNotPowerOfTwo(cell_size))?;
        if !cell_size.is_power_of_two() {
            return Err(Error::CellSizeNotPowerOfTwo(cell_size));
        }
        let root_box = Box2i::new(position, Vector2i::new(side, side));
        let max_depth = max_depth.max(1);
        debug!(%root_box, max_depth, max_objects, "visibility index created");
        Ok(Self {
            tree: QuadTree::new(root_box, max_depth, max_objects),
            objects: ObjectStore::default(),
            draw_list: Vec::new(),
            updated: false,
        })
    }

    /// Create an index from a [`VisibilityConfig`].
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_config(config: &VisibilityConfig) -> Result<Self, Error> {
        Self::new(
            config.position,
            config.cell_size,
            config.effective_max_depth(),
            config.max_objects,
        )
    }

    /// Iso-space box covered by the root cell.
    pub fn bounds(&self) -> Box2i {
        self.quad(self.root()).abs_box()
    }

    /// Depth limit in effect.
    pub fn max_depth(&self) -> u32 {
        self.tree.max_depth()
    }

    /// Per-leaf capacity before an automatic split (0 = never).
    pub fn max_objects(&self) -> usize {
        self.tree.max_objects()
    }

    // --- object storage ---

    /// Store an object without indexing it.
    pub fn insert_object(&mut self, object: Object) -> ObjectId {
        self.objects.insert(object)
    }

    /// Look up a stored object.
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Mutable access to a stored object.
    ///
    /// Geometry edits do not move an indexed object; follow them with
    /// [`update_object`](Self::update_object).
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    /// Unindex and release an object. Returns `None` for unknown ids.
    pub fn take_object(&mut self, id: ObjectId) -> Option<Object> {
        let indexed = self.objects.get(id)?.quad.is_some();
        if indexed {
            self.remove_object(id);
        }
        self.draw_list.retain(|&o| o != id);
        self.objects.remove(id)
    }

    /// Iterate over every stored object, indexed or not.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.objects.iter()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.objects.len() == 0
    }

    // --- index maintenance ---

    /// Index a stored object under the root.
    ///
    /// Returns `false` when the object's iso bounds do not fit in the root
    /// cell, or when the object is already indexed.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live object.
    pub fn add_object(&mut self, id: ObjectId) -> bool {
        let object = self.objects.expect(id);
        if object.quad.is_some() {
            warn!(name = object.name(), "object is already indexed");
            return false;
        }
        let root = self.tree.root();
        let added = self.tree.add_object(root, id, &mut self.objects);
        if !added {
            let object = self.objects.expect(id);
            warn!(
                name = object.name(),
                iso_box = %object.iso_abs_box(),
                "object lies outside the visibility root"
            );
        }
        self.updated |= added;
        added
    }

    /// Unindex an object, keeping it stored.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live object.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        if self.objects.expect(id).quad.is_none() {
            return false;
        }
        let root = self.tree.root();
        let removed = self.tree.remove_object(root, id, &mut self.objects);
        self.updated |= removed;
        removed
    }

    /// Re-home an object after its geometry changed.
    ///
    /// Returns `false` when it no longer fits in the root cell; the object is
    /// then unindexed, so queries never see it under a node that does not
    /// contain it. An unindexed object is indexed.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live object.
    pub fn update_object(&mut self, id: ObjectId) -> bool {
        let root = self.tree.root();
        let updated = self.tree.update_object(root, id, &mut self.objects);
        if !updated {
            warn!(
                name = self.objects.expect(id).name(),
                "updated object no longer fits the visibility root"
            );
        }
        self.updated |= updated;
        updated
    }

    /// Detach every object from the tree, keeping them stored and keeping
    /// the tree shape. Also empties the draw list.
    pub fn clear(&mut self) {
        self.draw_list.clear();
        let root = self.tree.root();
        self.tree.clear(root, &mut self.objects);
    }

    /// Split a node into four children. See [`Quad`] for the layout.
    pub fn split(&mut self, q: QuadId) -> bool {
        let split = self.tree.split(q, &mut self.objects);
        self.updated |= split;
        split
    }

    /// Collapse a node's subtree back into the node.
    pub fn merge(&mut self, q: QuadId) -> bool {
        let merged = self.tree.merge(q, &mut self.objects);
        self.updated |= merged;
        merged
    }

    /// Merge sparse subtrees bottom-up; returns the number of merges.
    ///
    /// A split node collapses when all its children are leaves and its
    /// subtree holds at most `max_objects` objects (or none, when
    /// `max_objects` is 0).
    pub fn compact(&mut self) -> usize {
        let merges = self.tree.compact(&mut self.objects);
        if merges > 0 {
            trace!(merges, nodes = self.tree.node_count(), "compacted visibility tree");
            self.updated = true;
        }
        merges
    }

    // --- queries ---

    /// Whether any indexed object's iso bounds intersect `area`.
    pub fn is_object_intersect(&self, area: &Box2i) -> bool {
        self.tree
            .is_object_intersect(self.tree.root(), area, &self.objects)
    }

    /// Whether the iso footprint of `id` overlaps the footprint of any other
    /// indexed object.
    ///
    /// Footprints that only touch along an edge or at a corner count as
    /// overlapping; tile footprints are usually inset by one unit so that
    /// neighbors on a grid do not collide.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live object.
    pub fn is_object_base_intersect(&self, id: ObjectId) -> bool {
        let from = self.objects.expect(id);
        self.is_footprint_intersect(from, Some(id), &|_| true)
    }

    /// Footprint overlap test for a candidate object that need not be stored.
    ///
    /// `skip` excludes one indexed object (usually the candidate's own id when
    /// validating a move); `filter` selects which objects count as obstacles.
    pub fn is_footprint_intersect(
        &self,
        candidate: &Object,
        skip: Option<ObjectId>,
        filter: &dyn Fn(ObjectId) -> bool,
    ) -> bool {
        self.tree
            .find_base_intersect(
                self.tree.root(),
                &candidate.iso_abs_base_rect(),
                &candidate.iso_abs_box(),
                skip,
                filter,
                &self.objects,
            )
            .is_some()
    }

    /// First indexed object accepted by `filter` whose footprint overlaps
    /// `footprint` (iso space, absolute).
    pub fn find_footprint_overlap(
        &self,
        footprint: &Rect<i32>,
        skip: Option<ObjectId>,
        filter: &dyn Fn(ObjectId) -> bool,
    ) -> Option<ObjectId> {
        self.tree.find_base_intersect(
            self.tree.root(),
            footprint,
            &footprint.bounds(),
            skip,
            filter,
            &self.objects,
        )
    }

    /// Collect every indexed object whose iso bounds intersect `viewport`
    /// into the draw list.
    ///
    /// Returns the number of objects examined in nodes touching the
    /// viewport, accepted or not. The list, readable through
    /// [`draw_list`](Self::draw_list), is in tree order (node pre-order, then
    /// insertion order within a node) and stays valid until the next call.
    #[instrument(level = "trace", skip(self), fields(visible))]
    pub fn check_visible_object(&mut self, viewport: &Box2i) -> usize {
        self.draw_list.clear();
        let mut examined = 0;
        self.tree.find_visible_objects(
            self.tree.root(),
            viewport,
            &mut self.draw_list,
            &mut examined,
            &self.objects,
        );
        tracing::Span::current().record("visible", self.draw_list.len());
        examined
    }

    /// Result of the last [`check_visible_object`](Self::check_visible_object).
    pub fn draw_list(&self) -> &[ObjectId] {
        &self.draw_list
    }

    /// The draw list sorted back to front with [`compare`].
    pub fn sorted_draw_list(&self) -> Vec<ObjectId> {
        let mut list = self.draw_list.clone();
        list.sort_by(|&a, &b| compare(self.objects.expect(a), self.objects.expect(b)));
        list
    }

    /// Whether the index changed since the last
    /// [`clear_updated`](Self::clear_updated).
    pub fn has_updated(&self) -> bool {
        self.updated
    }

    /// Reset the change flag.
    pub fn clear_updated(&mut self) {
        self.updated = false;
    }

    // --- inspection ---

    /// Root node id.
    pub fn root(&self) -> QuadId {
        self.tree.root()
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `q` was freed by a merge.
    #[track_caller]
    pub fn quad(&self, q: QuadId) -> &Quad {
        self.get_quad(q)
            .unwrap_or_else(|| panic!("dangling QuadId {q:?}"))
    }

    /// Look up a node, returning `None` once it has been freed.
    pub fn get_quad(&self, q: QuadId) -> Option<&Quad> {
        self.tree.get(q)
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    /// Number of live leaves.
    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }

    /// Indented dump of the tree for debugging. Not a stable format.
    pub fn tree_view(&self) -> String {
        self.tree.tree_view(&self.objects)
    }
}
