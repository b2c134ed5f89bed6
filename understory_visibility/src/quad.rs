// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree nodes and the arena that owns them.
//!
//! Nodes live in a generational arena addressed by [`QuadId`]. A split node
//! owns exactly four children, one per quadrant of its box. Objects are stored
//! at the shallowest node whose box fully contains their iso AABB, so split
//! nodes may hold objects that straddle their children.

use std::fmt::Write as _;

use tracing::trace;
use understory_iso::{Box2i, Rect};

use crate::object::{ObjectId, ObjectStore};

/// Identifier for a quadtree node.
///
/// Generational like [`ObjectId`]: once a node is freed by a merge, ids that
/// pointed at it stop resolving.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct QuadId(u32, u32);

impl QuadId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One quadtree node.
#[derive(Clone, Debug)]
pub struct Quad {
    abs_box: Box2i,
    parent: Option<QuadId>,
    children: Option<[QuadId; 4]>,
    objects: Vec<ObjectId>,
    depth: u32,
}

impl Quad {
    fn new(abs_box: Box2i, parent: Option<QuadId>, depth: u32) -> Self {
        Self {
            abs_box,
            parent,
            children: None,
            objects: Vec::new(),
            depth,
        }
    }

    /// Iso-space box covered by this node.
    pub fn abs_box(&self) -> Box2i {
        self.abs_box
    }

    /// Parent node; `None` for the root.
    pub fn parent(&self) -> Option<QuadId> {
        self.parent
    }

    /// Children ordered top-left, top-right, bottom-left, bottom-right.
    pub fn children(&self) -> Option<[QuadId; 4]> {
        self.children
    }

    /// Objects stored directly at this node.
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Distance from the root (root is 0).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether this node has children.
    pub fn is_split(&self) -> bool {
        self.children.is_some()
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    quad: Option<Quad>,
}

/// Arena of quadtree nodes plus the split policy.
#[derive(Debug)]
pub(crate) struct QuadTree {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    root: QuadId,
    max_depth: u32,
    max_objects: usize,
}

impl QuadTree {
    pub(crate) fn new(root_box: Box2i, max_depth: u32, max_objects: usize) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            root: QuadId::new(0, 0),
            max_depth,
            max_objects,
        };
        tree.root = tree.alloc(Quad::new(root_box, None, 0));
        tree
    }

    pub(crate) fn root(&self) -> QuadId {
        self.root
    }

    pub(crate) fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub(crate) fn max_objects(&self) -> usize {
        self.max_objects
    }

    pub(crate) fn get(&self, id: QuadId) -> Option<&Quad> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.quad.as_ref()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub(crate) fn leaf_count(&self) -> usize {
        self.slots
            .iter()
            .filter_map(|s| s.quad.as_ref())
            .filter(|q| !q.is_split())
            .count()
    }

    /// Split `q` into four quadrants and push down every held object that
    /// fits entirely inside one of them.
    ///
    /// No-op (returns `false`) at `max_depth`, on an already split node, or
    /// when the box is too small to halve.
    pub(crate) fn split(&mut self, q: QuadId, objects: &mut ObjectStore) -> bool {
        let node = self.node(q);
        if node.depth >= self.max_depth || node.is_split() {
            return false;
        }
        let abs_box = node.abs_box;
        let depth = node.depth;
        if abs_box.size().x < 2 || abs_box.size().y < 2 {
            return false;
        }

        let children = abs_box
            .quadrants()
            .map(|b| self.alloc(Quad::new(b, Some(q), depth + 1)));

        let held = std::mem::take(&mut self.node_mut(q).objects);
        let mut kept = Vec::with_capacity(held.len());
        for id in held {
            let key = objects.expect(id).iso_abs_box();
            let target = children
                .iter()
                .copied()
                .find(|&c| self.node(c).abs_box.contains(&key));
            match target {
                Some(child) => {
                    self.node_mut(child).objects.push(id);
                    objects.expect_mut(id).quad = Some(child);
                }
                None => kept.push(id),
            }
        }

        let node = self.node_mut(q);
        node.objects = kept;
        node.children = Some(children);
        trace!(depth, kept = node.objects.len(), "split quad {}", abs_box);
        true
    }

    /// Collapse the subtree under `q` back into `q`.
    pub(crate) fn merge(&mut self, q: QuadId, objects: &mut ObjectStore) -> bool {
        let Some(children) = self.node_mut(q).children.take() else {
            return false;
        };
        let mut gathered = Vec::new();
        for child in children {
            self.fill_with_objects(child, &mut gathered, objects);
        }
        for &id in &gathered {
            objects.expect_mut(id).quad = Some(q);
        }
        let node = self.node_mut(q);
        trace!(
            depth = node.depth,
            pulled = gathered.len(),
            "merge quad {}",
            node.abs_box
        );
        node.objects.extend(gathered);
        true
    }

    /// Free `q` and its subtree, moving every held object into `out`.
    fn fill_with_objects(&mut self, q: QuadId, out: &mut Vec<ObjectId>, objects: &mut ObjectStore) {
        let node = self.free(q);
        for &id in &node.objects {
            objects.expect_mut(id).quad = None;
        }
        out.extend(node.objects);
        if let Some(children) = node.children {
            for child in children {
                self.fill_with_objects(child, out, objects);
            }
        }
    }

    /// Merge every split node whose children are leaves and whose subtree
    /// holds no more than `max_objects` objects (only empty subtrees when
    /// `max_objects` is 0). Works bottom-up so collapses cascade.
    /// Returns the number of merges.
    pub(crate) fn compact(&mut self, objects: &mut ObjectStore) -> usize {
        let mut merges = 0;
        self.compact_node(self.root, objects, &mut merges);
        merges
    }

    fn compact_node(&mut self, q: QuadId, objects: &mut ObjectStore, merges: &mut usize) -> usize {
        let node = self.node(q);
        let mut total = node.objects.len();
        let Some(children) = node.children else {
            return total;
        };
        let mut all_leaves = true;
        for child in children {
            total += self.compact_node(child, objects, merges);
            all_leaves &= !self.node(child).is_split();
        }
        let fits = total == 0 || (self.max_objects > 0 && total <= self.max_objects);
        if all_leaves && fits && self.merge(q, objects) {
            *merges += 1;
        }
        total
    }

    /// Index `id` under `q`. See [`place`](Self::place) for the descent.
    pub(crate) fn add_object(&mut self, q: QuadId, id: ObjectId, objects: &mut ObjectStore) -> bool {
        let key = objects.expect(id).iso_abs_box();
        let Some(target) = self.place(q, &key, objects) else {
            return false;
        };
        self.link(target, id, objects);
        true
    }

    /// Re-home `id` after its geometry changed.
    ///
    /// Same descent as [`add_object`](Self::add_object); when the containing
    /// node differs from the object's back-reference, the object is unlinked
    /// from the old node directly instead of searching the tree.
    /// Returns `false` when `q` no longer contains it; the object is then
    /// unlinked, since its old node no longer contains it either.
    pub(crate) fn update_object(
        &mut self,
        q: QuadId,
        id: ObjectId,
        objects: &mut ObjectStore,
    ) -> bool {
        if self.add_object(q, id, objects) {
            return true;
        }
        self.unlink(id, objects);
        false
    }

    /// Find the node `id` belongs in, splitting full leaves on the way down.
    ///
    /// Returns `None` when `q` does not contain `key`, without side effects.
    fn place(&mut self, q: QuadId, key: &Box2i, objects: &mut ObjectStore) -> Option<QuadId> {
        if !self.node(q).abs_box.contains(key) {
            return None;
        }
        if self.is_full(q) {
            self.split(q, objects);
        }
        if let Some(children) = self.node(q).children {
            for child in children {
                if let Some(found) = self.place(child, key, objects) {
                    return Some(found);
                }
            }
        }
        Some(q)
    }

    fn is_full(&self, q: QuadId) -> bool {
        let node = self.node(q);
        !node.is_split()
            && self.max_objects > 0
            && node.objects.len() >= self.max_objects
            && node.depth + 1 < self.max_depth
    }

    /// Make `target` the node holding `id`, unlinking it from its previous
    /// node through the back-reference.
    fn link(&mut self, target: QuadId, id: ObjectId, objects: &mut ObjectStore) {
        if objects.expect(id).quad == Some(target) {
            return;
        }
        self.unlink(id, objects);
        self.node_mut(target).objects.push(id);
        objects.expect_mut(id).quad = Some(target);
    }

    /// Detach `id` from the node its back-reference names, if any.
    fn unlink(&mut self, id: ObjectId, objects: &mut ObjectStore) {
        let Some(prev) = objects.expect_mut(id).quad.take() else {
            return;
        };
        let list = &mut self.node_mut(prev).objects;
        if let Some(i) = list.iter().position(|&o| o == id) {
            list.remove(i);
        }
    }

    /// Remove `id` from the subtree at `q` by identity search.
    pub(crate) fn remove_object(
        &mut self,
        q: QuadId,
        id: ObjectId,
        objects: &mut ObjectStore,
    ) -> bool {
        let node = self.node_mut(q);
        if let Some(i) = node.objects.iter().position(|&o| o == id) {
            node.objects.remove(i);
            objects.expect_mut(id).quad = None;
            return true;
        }
        let Some(children) = node.children else {
            return false;
        };
        children
            .into_iter()
            .any(|child| self.remove_object(child, id, objects))
    }

    /// Whether any object's iso AABB under `q` intersects `area`.
    pub(crate) fn is_object_intersect(&self, q: QuadId, area: &Box2i, objects: &ObjectStore) -> bool {
        let node = self.node(q);
        // Objects are contained by their node, so a disjoint node holds no hit.
        if !node.abs_box.intersects(area) {
            return false;
        }
        if node
            .objects
            .iter()
            .any(|&id| objects.expect(id).iso_abs_box().intersects(area))
        {
            return true;
        }
        node.children.is_some_and(|children| {
            children
                .iter()
                .any(|&child| self.is_object_intersect(child, area, objects))
        })
    }

    /// First object under `q` accepted by `filter` whose iso footprint
    /// overlaps `rect`, skipping `skip`.
    ///
    /// `key` is the AABB used to prune subtrees; it must cover `rect`.
    /// Footprints that only share an edge or a corner count as overlapping.
    pub(crate) fn find_base_intersect(
        &self,
        q: QuadId,
        rect: &Rect<i32>,
        key: &Box2i,
        skip: Option<ObjectId>,
        filter: &dyn Fn(ObjectId) -> bool,
        objects: &ObjectStore,
    ) -> Option<ObjectId> {
        let node = self.node(q);
        if !(node.abs_box.intersects(key) || node.abs_box.contains(key)) {
            return None;
        }
        let hit = node.objects.iter().copied().find(|&id| {
            Some(id) != skip
                && filter(id)
                && footprints_overlap(rect, &objects.expect(id).iso_abs_base_rect())
        });
        if hit.is_some() {
            return hit;
        }
        node.children?
            .into_iter()
            .find_map(|child| self.find_base_intersect(child, rect, key, skip, filter, objects))
    }

    /// Append every object under `q` whose iso AABB intersects `viewport`.
    ///
    /// `examined` is bumped for every object tested in an intersecting node,
    /// whether or not it was accepted.
    pub(crate) fn find_visible_objects(
        &self,
        q: QuadId,
        viewport: &Box2i,
        out: &mut Vec<ObjectId>,
        examined: &mut usize,
        objects: &ObjectStore,
    ) {
        let node = self.node(q);
        if !node.abs_box.intersects(viewport) {
            return;
        }
        for &id in &node.objects {
            *examined += 1;
            if objects.expect(id).iso_abs_box().intersects(viewport) {
                out.push(id);
            }
        }
        if let Some(children) = node.children {
            for child in children {
                self.find_visible_objects(child, viewport, out, examined, objects);
            }
        }
    }

    /// Detach every object from every node, keeping the tree shape.
    pub(crate) fn clear(&mut self, q: QuadId, objects: &mut ObjectStore) {
        let node = self.node_mut(q);
        for id in node.objects.drain(..) {
            objects.expect_mut(id).quad = None;
        }
        if let Some(children) = node.children {
            for child in children {
                self.clear(child, objects);
            }
        }
    }

    pub(crate) fn tree_view(&self, objects: &ObjectStore) -> String {
        let mut out = String::new();
        self.write_tree(self.root, objects, &mut out);
        out
    }

    fn write_tree(&self, q: QuadId, objects: &ObjectStore, out: &mut String) {
        let node = self.node(q);
        let indent = "  ".repeat(node.depth as usize);
        let _ = writeln!(
            out,
            "{indent}quad depth={} box={} objects={}{}",
            node.depth,
            node.abs_box,
            node.objects.len(),
            if node.is_split() { " split" } else { "" },
        );
        for &id in &node.objects {
            let object = objects.expect(id);
            let _ = writeln!(
                out,
                "{indent}  - {} iso={}",
                object.name(),
                object.iso_abs_box()
            );
        }
        if let Some(children) = node.children {
            for child in children {
                self.write_tree(child, objects, out);
            }
        }
    }

    // --- internals ---

    fn alloc(&mut self, quad: Quad) -> QuadId {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation += 1;
            slot.quad = Some(quad);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "QuadId uses 32-bit indices by design."
            )]
            return QuadId::new(idx as u32, slot.generation);
        }
        self.slots.push(Slot {
            generation: 1,
            quad: Some(quad),
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "QuadId uses 32-bit indices by design."
        )]
        QuadId::new((self.slots.len() - 1) as u32, 1)
    }

    fn free(&mut self, id: QuadId) -> Quad {
        let quad = self.slots[id.idx()].quad.take().expect("dangling QuadId");
        self.free_list.push(id.idx());
        quad
    }

    fn node(&self, id: QuadId) -> &Quad {
        self.get(id).expect("dangling QuadId")
    }

    fn node_mut(&mut self, id: QuadId) -> &mut Quad {
        let slot = &mut self.slots[id.idx()];
        debug_assert_eq!(slot.generation, id.1, "stale QuadId");
        slot.quad.as_mut().expect("dangling QuadId")
    }
}

/// Symmetric containment-or-overlap test between two iso footprints.
///
/// The reduced edge test only walks two edges of its receiver, so it runs in
/// both directions; two footprints laid across each other have no corner
/// inside the other.
fn footprints_overlap(a: &Rect<i32>, b: &Rect<i32>) -> bool {
    a.intersects_reduced(b)
        || b.intersects_reduced(a)
        || a.contains_rect(b)
        || b.contains_rect(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;
    use understory_iso::Vector2i;

    fn iso_object(store: &mut ObjectStore, name: &str, iso_box: Box2i) -> ObjectId {
        store.insert(Object::with_iso_box(name, iso_box))
    }

    fn reachable(tree: &QuadTree, q: QuadId, out: &mut Vec<ObjectId>) {
        let node = tree.node(q);
        out.extend_from_slice(&node.objects);
        if let Some(children) = node.children {
            for child in children {
                reachable(tree, child, out);
            }
        }
    }

    #[test]
    fn split_pushes_down_only_fully_contained_objects() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 0);
        let root = tree.root();
        let inside = iso_object(&mut store, "inside", Box2i::from_xywh(40, 40, 4, 4));
        let straddle = iso_object(&mut store, "straddle", Box2i::from_xywh(30, 2, 4, 4));
        assert!(tree.add_object(root, inside, &mut store));
        assert!(tree.add_object(root, straddle, &mut store));

        let mut before = Vec::new();
        reachable(&tree, root, &mut before);
        assert!(tree.split(root, &mut store));
        let mut after = Vec::new();
        reachable(&tree, root, &mut after);
        before.sort();
        after.sort();
        assert_eq!(before, after, "split must not lose objects");

        let [_, _, _, br] = tree.node(root).children.unwrap();
        assert_eq!(tree.node(root).objects, vec![straddle]);
        assert_eq!(tree.node(br).objects, vec![inside]);
        assert_eq!(store.expect(inside).quad, Some(br));
        assert_eq!(store.expect(straddle).quad, Some(root));
        assert_eq!(tree.node(br).depth, 1);
        assert_eq!(tree.node(br).abs_box, Box2i::from_xywh(32, 32, 32, 32));
    }

    #[test]
    fn split_respects_depth_limit_and_tiny_boxes() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 0, 0);
        assert!(!tree.split(tree.root(), &mut store));

        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 1, 1), 8, 0);
        assert!(!tree.split(tree.root(), &mut store));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn merge_pulls_subtree_back_and_frees_nodes() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 0);
        let root = tree.root();
        let a = iso_object(&mut store, "a", Box2i::from_xywh(1, 1, 2, 2));
        tree.add_object(root, a, &mut store);
        tree.split(root, &mut store);
        let [tl, ..] = tree.node(root).children.unwrap();
        tree.split(tl, &mut store);
        assert_eq!(tree.node_count(), 9);
        assert_ne!(store.expect(a).quad, Some(root));

        assert!(tree.merge(root, &mut store));
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.node(root).objects, vec![a]);
        assert_eq!(store.expect(a).quad, Some(root));
        assert!(tree.get(tl).is_none(), "freed node id must go stale");
        assert!(!tree.merge(root, &mut store));
    }

    #[test]
    fn freed_slots_are_reused_with_new_generation() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 0);
        let root = tree.root();
        tree.split(root, &mut store);
        let old = tree.node(root).children.unwrap();
        tree.merge(root, &mut store);
        tree.split(root, &mut store);
        let new = tree.node(root).children.unwrap();
        for (o, n) in old.iter().zip(new.iter()) {
            assert_ne!(o, n);
            assert!(tree.get(*o).is_none());
            assert!(tree.get(*n).is_some());
        }
    }

    #[test]
    fn add_outside_root_has_no_side_effects() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 1);
        let root = tree.root();
        let a = iso_object(&mut store, "a", Box2i::from_xywh(1, 1, 2, 2));
        assert!(tree.add_object(root, a, &mut store));
        // The root is full; an object it cannot hold must not trigger a split.
        let far = iso_object(&mut store, "far", Box2i::from_xywh(100, 100, 2, 2));
        assert!(!tree.add_object(root, far, &mut store));
        assert!(!tree.node(root).is_split());
        assert_eq!(store.expect(far).quad, None);
    }

    #[test]
    fn update_moves_between_nodes_via_back_reference() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 0);
        let root = tree.root();
        tree.split(root, &mut store);
        let [tl, _, _, br] = tree.node(root).children.unwrap();
        let a = iso_object(&mut store, "a", Box2i::from_xywh(1, 1, 2, 2));
        assert!(tree.add_object(root, a, &mut store));
        assert_eq!(store.expect(a).quad, Some(tl));

        // Ortho (72, 24) projects to iso (48, 48).
        store.expect_mut(a).set_pos(Vector2i::new(72, 24));
        assert_eq!(store.expect(a).iso_abs_box(), Box2i::from_xywh(49, 49, 2, 2));
        assert!(tree.update_object(root, a, &mut store));
        assert_eq!(store.expect(a).quad, Some(br));
        assert!(tree.node(tl).objects.is_empty());
        assert_eq!(tree.node(br).objects, vec![a]);

        // Unchanged geometry keeps the object in place.
        assert!(tree.update_object(root, a, &mut store));
        assert_eq!(tree.node(br).objects, vec![a]);
    }

    #[test]
    fn failed_update_unlinks_the_object() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 256, 256), 4, 0);
        let root = tree.root();
        tree.split(root, &mut store);
        let [tl, ..] = tree.node(root).children.unwrap();
        let a = iso_object(&mut store, "a", Box2i::from_xywh(10, 10, 4, 4));
        assert!(tree.add_object(root, a, &mut store));
        assert_eq!(store.expect(a).quad, Some(tl));

        // Ortho (250, 0) projects to iso (250, 125), past the right edge.
        store.expect_mut(a).set_pos(Vector2i::new(250, 0));
        assert!(!tree.update_object(root, a, &mut store));
        assert_eq!(store.expect(a).quad, None);
        assert!(tree.node(tl).objects.is_empty());

        let mut out = Vec::new();
        reachable(&tree, root, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn footprint_overlap_covers_crossing_footprints() {
        // A plus sign: no corner of either footprint lies inside the other.
        let tall = Rect::from_box(&Box2i::from_xywh(0, 0, 10, 100));
        let bar = Rect::from_box(&Box2i::from_xywh(-5, 40, 20, 10));
        assert!(footprints_overlap(&tall, &bar));
        assert!(footprints_overlap(&bar, &tall));

        let apart = Rect::from_box(&Box2i::from_xywh(50, 40, 20, 10));
        assert!(!footprints_overlap(&tall, &apart));
        assert!(!footprints_overlap(&apart, &tall));
    }

    #[test]
    fn remove_searches_the_subtree() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 0);
        let root = tree.root();
        tree.split(root, &mut store);
        let a = iso_object(&mut store, "a", Box2i::from_xywh(50, 1, 2, 2));
        tree.add_object(root, a, &mut store);
        assert!(tree.remove_object(root, a, &mut store));
        assert_eq!(store.expect(a).quad, None);
        assert!(!tree.remove_object(root, a, &mut store));
    }

    #[test]
    fn visible_counter_counts_every_examined_object() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 0);
        let root = tree.root();
        let near = iso_object(&mut store, "near", Box2i::from_xywh(1, 1, 2, 2));
        let far = iso_object(&mut store, "far", Box2i::from_xywh(20, 20, 2, 2));
        tree.add_object(root, near, &mut store);
        tree.add_object(root, far, &mut store);

        let mut out = Vec::new();
        let mut examined = 0;
        let viewport = Box2i::from_xywh(0, 0, 8, 8);
        tree.find_visible_objects(root, &viewport, &mut out, &mut examined, &store);
        assert_eq!(out, vec![near]);
        // Both were examined in the root, though only one was accepted.
        assert_eq!(examined, 2);
    }

    #[test]
    fn compact_collapses_sparse_subtrees() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 2);
        let root = tree.root();
        tree.split(root, &mut store);
        let [tl, ..] = tree.node(root).children.unwrap();
        tree.split(tl, &mut store);
        let a = iso_object(&mut store, "a", Box2i::from_xywh(1, 1, 2, 2));
        tree.add_object(root, a, &mut store);
        assert_eq!(tree.node_count(), 9);

        assert_eq!(tree.compact(&mut store), 2);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(store.expect(a).quad, Some(root));
    }

    #[test]
    fn tree_view_lists_nodes_and_objects() {
        let mut store = ObjectStore::default();
        let mut tree = QuadTree::new(Box2i::from_xywh(0, 0, 64, 64), 4, 0);
        let root = tree.root();
        let a = iso_object(&mut store, "barrel", Box2i::from_xywh(1, 1, 2, 2));
        tree.add_object(root, a, &mut store);
        tree.split(root, &mut store);
        let view = tree.tree_view(&store);
        assert!(view.starts_with("quad depth=0 box=[0, 0, 64x64] objects=0 split\n"));
        assert!(view.contains("  quad depth=1 box=[0, 0, 32x32] objects=1\n"));
        assert!(view.contains("    - barrel iso=[1, 1, 2x2]\n"));
        assert_eq!(view.lines().count(), 6);
    }
}
