// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use cyclone_core::{BodyId, Vec3};
use rustc_hash::FxHashMap;
use tracing::trace;

use super::{BroadPhase, PotentialContact};
use crate::types::sphere::BoundingSphere;

/// Index of a node in a [`Bvh`] arena.
///
/// Ids are only valid until the node is removed; freed slots are recycled by
/// later insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Arena slot of the node.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node holds: one body, or exactly two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Bottom of the hierarchy.
    Leaf(BodyId),
    /// Interior node.
    Branch([NodeId; 2]),
}

/// Node of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    parent: Option<NodeId>,
    volume: BoundingSphere,
    kind: NodeKind,
}

impl BvhNode {
    /// Parent node; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Volume enclosing everything below this node.
    pub fn volume(&self) -> BoundingSphere {
        self.volume
    }

    /// Leaf or branch payload.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns `true` for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Body held by a leaf.
    pub fn body(&self) -> Option<BodyId> {
        match self.kind {
            NodeKind::Leaf(body) => Some(body),
            NodeKind::Branch(_) => None,
        }
    }

    /// Children of a branch.
    pub fn children(&self) -> Option<[NodeId; 2]> {
        match self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Branch(children) => Some(children),
        }
    }
}

/// Bounding volume hierarchy over rigid bodies.
///
/// Invariants:
/// - Every branch has exactly two children whose `parent` is that branch.
/// - Every branch volume equals [`BoundingSphere::enclosing`] of its
///   children, re-established bottom-up after each insert and removal.
/// - Each body appears in exactly one leaf.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<Option<BvhNode>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    leaves: FxHashMap<BodyId, NodeId>,
}

impl Bvh {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node, if any body is present.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node at `id`, if live.
    pub fn node(&self, id: NodeId) -> Option<&BvhNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Leaf holding `body`.
    pub fn leaf_of(&self, body: BodyId) -> Option<NodeId> {
        self.leaves.get(&body).copied()
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns `true` if the hierarchy holds no bodies.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` if `body` is present.
    pub fn contains(&self, body: BodyId) -> bool {
        self.leaves.contains_key(&body)
    }

    /// Inserts `body` with `volume` and returns its leaf.
    ///
    /// Descends towards the child whose volume grows least to include the new
    /// one (ties go to the second child), then splits the leaf reached into
    /// two fresh leaves. A body that is already present is moved instead.
    pub fn insert(&mut self, body: BodyId, volume: BoundingSphere) -> NodeId {
        if self.contains(body) {
            self.remove_body(body);
        }

        let Some(mut current) = self.root else {
            let id = self.alloc(BvhNode {
                parent: None,
                volume,
                kind: NodeKind::Leaf(body),
            });
            self.root = Some(id);
            self.leaves.insert(body, id);
            trace!(body = body.raw(), node = id.0, "bvh root leaf");
            return id;
        };

        loop {
            let Some(node) = self.node(current).copied() else {
                // Unreachable while the invariants hold; keep the tree intact.
                return current;
            };
            match node.kind {
                NodeKind::Branch([a, b]) => {
                    current = if self.volume_of(a).growth(&volume)
                        < self.volume_of(b).growth(&volume)
                    {
                        a
                    } else {
                        b
                    };
                }
                NodeKind::Leaf(existing) => {
                    let first = self.alloc(BvhNode {
                        parent: Some(current),
                        volume: node.volume,
                        kind: NodeKind::Leaf(existing),
                    });
                    let second = self.alloc(BvhNode {
                        parent: Some(current),
                        volume,
                        kind: NodeKind::Leaf(body),
                    });
                    self.leaves.insert(existing, first);
                    self.leaves.insert(body, second);
                    if let Some(slot) = self.slot_mut(current) {
                        slot.kind = NodeKind::Branch([first, second]);
                    }
                    self.refit_from(current);
                    trace!(body = body.raw(), node = second.0, split = current.0, "bvh insert");
                    return second;
                }
            }
        }
    }

    /// Removes the node at `id` together with its subtree.
    ///
    /// The sibling is promoted into the parent slot, so the parent keeps its
    /// id and the sibling's slot is freed. Returns `false` for a dead id.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node(id).copied() else {
            return false;
        };
        let Some(parent) = node.parent else {
            self.free_subtree(id);
            self.root = None;
            trace!(node = id.0, "bvh cleared");
            return true;
        };
        let Some([first, second]) = self.node(parent).and_then(BvhNode::children) else {
            return false;
        };
        let sibling = if first == id { second } else { first };
        let Some(promoted) = self.node(sibling).copied() else {
            return false;
        };

        if let Some(slot) = self.slot_mut(parent) {
            slot.volume = promoted.volume;
            slot.kind = promoted.kind;
        }
        match promoted.kind {
            NodeKind::Leaf(body) => {
                self.leaves.insert(body, parent);
            }
            NodeKind::Branch(children) => {
                for child in children {
                    if let Some(slot) = self.slot_mut(child) {
                        slot.parent = Some(parent);
                    }
                }
            }
        }
        self.release(sibling);
        self.free_subtree(id);
        self.refit_from(parent);
        trace!(node = id.0, promoted = sibling.0, into = parent.0, "bvh remove");
        true
    }

    /// Removes the leaf holding `body`; returns `false` if absent.
    pub fn remove_body(&mut self, body: BodyId) -> bool {
        match self.leaf_of(body) {
            Some(leaf) => self.remove(leaf),
            None => false,
        }
    }

    /// Replaces the volume of `body`, inserting it if absent, and returns its
    /// new leaf.
    pub fn update(&mut self, body: BodyId, volume: BoundingSphere) -> NodeId {
        self.insert(body, volume)
    }

    /// Appends up to `limit` potential contacts between any two bodies in the
    /// hierarchy and returns how many were appended.
    ///
    /// Each branch reports the pairs across its two children, then the pairs
    /// inside each child.
    pub fn potential_contacts(&self, limit: usize, out: &mut Vec<PotentialContact>) -> usize {
        match self.root {
            Some(root) => self.contacts_within(root, limit, out),
            None => 0,
        }
    }

    /// Appends up to `limit` potential contacts between the bodies below `a`
    /// and those below `b` and returns how many were appended.
    ///
    /// Descends into the larger branch first; a leaf is never descended.
    /// The two subtrees must be disjoint: passing the same node twice, or a
    /// node together with one of its ancestors, appends nothing and returns
    /// `0`.
    pub fn potential_contacts_with(
        &self,
        a: NodeId,
        b: NodeId,
        limit: usize,
        out: &mut Vec<PotentialContact>,
    ) -> usize {
        if self.is_ancestor_or_self(a, b) || self.is_ancestor_or_self(b, a) {
            return 0;
        }
        self.pairs_between(a, b, limit, out)
    }

    /// Returns `true` when `ancestor` is `node` or lies on its parent chain.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.node(id).and_then(BvhNode::parent);
        }
        false
    }

    fn pairs_between(
        &self,
        a: NodeId,
        b: NodeId,
        limit: usize,
        out: &mut Vec<PotentialContact>,
    ) -> usize {
        if limit == 0 {
            return 0;
        }
        let (Some(na), Some(nb)) = (self.node(a), self.node(b)) else {
            return 0;
        };
        if !na.volume.overlaps(&nb.volume) {
            return 0;
        }

        match (na.kind, nb.kind) {
            (NodeKind::Leaf(x), NodeKind::Leaf(y)) => {
                out.push(PotentialContact::new(x, y));
                1
            }
            (NodeKind::Branch([c0, c1]), NodeKind::Leaf(_)) => self.split_first(c0, c1, b, limit, out),
            (NodeKind::Leaf(_), NodeKind::Branch([c0, c1])) => {
                self.split_second(a, c0, c1, limit, out)
            }
            (NodeKind::Branch([c0, c1]), NodeKind::Branch([d0, d1])) => {
                if na.volume.size() >= nb.volume.size() {
                    self.split_first(c0, c1, b, limit, out)
                } else {
                    self.split_second(a, d0, d1, limit, out)
                }
            }
        }
    }

    fn split_first(
        &self,
        c0: NodeId,
        c1: NodeId,
        other: NodeId,
        limit: usize,
        out: &mut Vec<PotentialContact>,
    ) -> usize {
        let count = self.pairs_between(c0, other, limit, out);
        count + self.pairs_between(c1, other, limit - count, out)
    }

    fn split_second(
        &self,
        node: NodeId,
        d0: NodeId,
        d1: NodeId,
        limit: usize,
        out: &mut Vec<PotentialContact>,
    ) -> usize {
        let count = self.pairs_between(node, d0, limit, out);
        count + self.pairs_between(node, d1, limit - count, out)
    }

    fn contacts_within(&self, id: NodeId, limit: usize, out: &mut Vec<PotentialContact>) -> usize {
        if limit == 0 {
            return 0;
        }
        let Some([a, b]) = self.node(id).and_then(BvhNode::children) else {
            return 0;
        };
        let mut count = self.pairs_between(a, b, limit, out);
        count += self.contacts_within(a, limit - count, out);
        count += self.contacts_within(b, limit - count, out);
        count
    }

    fn volume_of(&self, id: NodeId) -> BoundingSphere {
        self.node(id)
            .map_or_else(|| BoundingSphere::new(Vec3::ZERO, 0.0), |n| n.volume)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut BvhNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn alloc(&mut self, node: BvhNode) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = Some(node);
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id.index()) {
            if slot.take().is_some() {
                self.free.push(id);
            }
        }
    }

    /// Frees `id` and everything below it, dropping their bodies.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current).copied() else {
                continue;
            };
            match node.kind {
                NodeKind::Leaf(body) => {
                    if self.leaves.get(&body) == Some(&current) {
                        self.leaves.remove(&body);
                    }
                }
                NodeKind::Branch(children) => stack.extend(children),
            }
            self.release(current);
        }
    }

    /// Recomputes branch volumes from `id` up to the root.
    fn refit_from(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(at) = current {
            let Some(node) = self.node(at).copied() else {
                return;
            };
            if let NodeKind::Branch([a, b]) = node.kind {
                let merged = BoundingSphere::enclosing(&self.volume_of(a), &self.volume_of(b));
                if let Some(slot) = self.slot_mut(at) {
                    slot.volume = merged;
                }
            }
            current = node.parent;
        }
    }
}

impl BroadPhase for Bvh {
    fn upsert(&mut self, body: BodyId, volume: BoundingSphere) {
        self.update(body, volume);
    }

    fn remove(&mut self, body: BodyId) -> bool {
        self.remove_body(body)
    }

    fn potential_contacts(&self, limit: usize, out: &mut Vec<PotentialContact>) -> usize {
        Bvh::potential_contacts(self, limit, out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cyclone_core::Handle;

    fn unit(x: f64) -> BoundingSphere {
        BoundingSphere::new(Vec3::new(x, 0.0, 0.0), 1.0)
    }

    #[test]
    fn freed_slots_are_recycled() {
        let mut bvh = Bvh::new();
        bvh.insert(Handle::from_raw(0), unit(0.0));
        bvh.insert(Handle::from_raw(1), unit(1.0));
        assert_eq!(bvh.nodes.len(), 3);
        assert!(bvh.remove_body(Handle::from_raw(1)));
        assert_eq!(bvh.free.len(), 2);
        bvh.insert(Handle::from_raw(2), unit(2.0));
        assert_eq!(bvh.nodes.len(), 3);
        assert!(bvh.free.is_empty());
    }

    #[test]
    fn removing_the_root_clears_everything() {
        let mut bvh = Bvh::new();
        for i in 0..4 {
            bvh.insert(Handle::from_raw(i), unit(f64::from(i)));
        }
        let root = bvh.root().unwrap();
        assert!(bvh.remove(root));
        assert!(bvh.is_empty());
        assert_eq!(bvh.len(), 0);
        assert_eq!(bvh.free.len(), bvh.nodes.len());
    }
}
