// extensions/transform.rs
//
// Retained node hierarchy keyed by EntityId. Nodes carry a local transform plus
// alpha and visibility; `propagate` writes the composed world values back onto
// the scene's entities. Tweens animate the local values.
//
// Usage:
//   graph.register(panel, LocalTransform::at(Vec2::new(360.0, 900.0)));
//   graph.register(label, LocalTransform::at(Vec2::new(0.0, -40.0)));
//   graph.set_parent(label, Some(panel));
//   graph.propagate(&mut scene);

use std::collections::HashMap;
use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// Transform and display state of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub offset: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    /// Multiplied down the hierarchy.
    pub alpha: f32,
    /// A hidden node hides its whole subtree.
    pub visible: bool,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            alpha: 1.0,
            visible: true,
        }
    }
}

impl LocalTransform {
    pub fn at(offset: Vec2) -> Self {
        Self { offset, ..Self::default() }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Composed world-space transform of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    pub pos: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub alpha: f32,
    pub visible: bool,
}

impl WorldTransform {
    const IDENTITY: WorldTransform = WorldTransform {
        pos: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
        alpha: 1.0,
        visible: true,
    };

    fn then(&self, local: &LocalTransform) -> WorldTransform {
        WorldTransform {
            pos: self.apply(local.offset),
            rotation: self.rotation + local.rotation,
            scale: self.scale * local.scale,
            alpha: self.alpha * local.alpha,
            visible: self.visible && local.visible,
        }
    }

    /// Map a point from this node's space into world space.
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.pos + Vec2::from_angle(self.rotation).rotate(point * self.scale)
    }

    /// Map a world point into this node's space.
    pub fn invert(&self, point: Vec2) -> Vec2 {
        let unrotated = Vec2::from_angle(-self.rotation).rotate(point - self.pos);
        let sx = if self.scale.x == 0.0 { 1.0 } else { self.scale.x };
        let sy = if self.scale.y == 0.0 { 1.0 } else { self.scale.y };
        Vec2::new(unrotated.x / sx, unrotated.y / sy)
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    local: LocalTransform,
}

/// Parent/child hierarchy over scene entities.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<EntityId, Node>,
    /// Top-level nodes in registration order.
    roots: Vec<EntityId>,
    dirty: bool,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node as a root with the given local transform.
    /// Re-registering replaces the local transform and keeps the links.
    pub fn register(&mut self, id: EntityId, local: LocalTransform) {
        let is_new = !self.nodes.contains_key(&id);
        self.nodes.entry(id).or_default().local = local;
        if is_new {
            self.roots.push(id);
        }
        self.dirty = true;
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Re-parent a node. `None` makes it a root again.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        if !self.nodes.contains_key(&child) {
            self.register(child, LocalTransform::default());
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(&p) {
                self.register(p, LocalTransform::default());
            }
        }

        if let Some(old) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old) {
                old_node.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }
        self.dirty = true;
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn local(&self, id: EntityId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local)
    }

    /// Mutable access to a node's local transform; marks the graph dirty.
    pub fn local_mut(&mut self, id: EntityId) -> Option<&mut LocalTransform> {
        let node = self.nodes.get_mut(&id)?;
        self.dirty = true;
        Some(&mut node.local)
    }

    /// Convenience setters used all over game code.
    pub fn set_offset(&mut self, id: EntityId, offset: Vec2) {
        if let Some(local) = self.local_mut(id) {
            local.offset = offset;
        }
    }

    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        if let Some(local) = self.local_mut(id) {
            local.visible = visible;
        }
    }

    /// The node and all of its descendants, parents before children.
    pub fn subtree(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(&next) else { continue };
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Remove a node and its whole subtree. Returns the removed ids.
    pub fn remove_tree(&mut self, id: EntityId) -> Vec<EntityId> {
        let removed = self.subtree(id);
        if let Some(parent) = self.parent(id) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        for gone in &removed {
            self.nodes.remove(gone);
        }
        self.roots.retain(|r| !removed.contains(r));
        self.dirty = true;
        removed
    }

    /// Compose the world transform of a node from its ancestors' locals.
    pub fn world(&self, id: EntityId) -> Option<WorldTransform> {
        let node = self.nodes.get(&id)?;
        let base = match node.parent {
            Some(p) => self.world(p)?,
            None => WorldTransform::IDENTITY,
        };
        Some(base.then(&node.local))
    }

    /// Map a point in `id`'s local space to world space.
    pub fn to_world(&self, id: EntityId, point: Vec2) -> Vec2 {
        self.world(id).map_or(point, |w| w.apply(point))
    }

    /// Map a world point into `id`'s local space.
    pub fn to_local(&self, id: EntityId, point: Vec2) -> Vec2 {
        self.world(id).map_or(point, |w| w.invert(point))
    }

    /// Write composed world transforms onto scene entities.
    pub fn propagate(&mut self, scene: &mut Scene) {
        if !self.dirty {
            return;
        }
        for &root in &self.roots {
            self.propagate_from(root, WorldTransform::IDENTITY, scene);
        }
        self.dirty = false;
    }

    fn propagate_from(&self, id: EntityId, parent: WorldTransform, scene: &mut Scene) {
        let Some(node) = self.nodes.get(&id) else { return };
        let world = parent.then(&node.local);

        if let Some(entity) = scene.get_mut(id) {
            entity.pos = world.pos;
            entity.rotation = world.rotation;
            entity.scale = world.scale;
            entity.opacity = world.alpha;
            entity.active = world.visible;
        }

        for &child in &node.children {
            self.propagate_from(child, world, scene);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use std::f32::consts::FRAC_PI_2;

    fn pair() -> (TransformGraph, EntityId, EntityId) {
        let mut graph = TransformGraph::new();
        let parent = EntityId(1);
        let child = EntityId(2);
        graph.register(parent, LocalTransform::at(Vec2::new(100.0, 100.0)));
        graph.register(child, LocalTransform::at(Vec2::new(50.0, 0.0)));
        graph.set_parent(child, Some(parent));
        (graph, parent, child)
    }

    #[test]
    fn propagate_composes_offsets() {
        let (mut graph, parent, child) = pair();
        let mut scene = Scene::new();
        scene.spawn(Entity::new(parent));
        scene.spawn(Entity::new(child));

        graph.propagate(&mut scene);
        assert_eq!(scene.get(child).unwrap().pos, Vec2::new(150.0, 100.0));
        assert!(!graph.is_dirty());
    }

    #[test]
    fn hidden_parent_hides_children_and_alpha_multiplies() {
        let (mut graph, parent, child) = pair();
        let mut scene = Scene::new();
        scene.spawn(Entity::new(parent));
        scene.spawn(Entity::new(child));

        graph.local_mut(parent).unwrap().alpha = 0.5;
        graph.local_mut(child).unwrap().alpha = 0.5;
        graph.propagate(&mut scene);
        assert!((scene.get(child).unwrap().opacity - 0.25).abs() < 1e-6);

        graph.set_visible(parent, false);
        graph.propagate(&mut scene);
        assert!(!scene.get(child).unwrap().active);
    }

    #[test]
    fn to_local_inverts_to_world() {
        let (mut graph, parent, child) = pair();
        graph.local_mut(parent).unwrap().rotation = FRAC_PI_2;
        graph.local_mut(parent).unwrap().scale = Vec2::splat(2.0);

        let world = graph.to_world(child, Vec2::new(3.0, 4.0));
        let back = graph.to_local(child, world);
        assert!((back - Vec2::new(3.0, 4.0)).length() < 1e-3);

        // Child offset (50, 0) scaled by 2 and rotated 90° lands below the parent.
        let origin = graph.to_world(child, Vec2::ZERO);
        assert!((origin - Vec2::new(100.0, 200.0)).length() < 1e-3);
    }

    #[test]
    fn remove_tree_drops_descendants() {
        let (mut graph, parent, child) = pair();
        let grandchild = EntityId(3);
        graph.register(grandchild, LocalTransform::default());
        graph.set_parent(grandchild, Some(child));

        let removed = graph.remove_tree(child);
        assert_eq!(removed, vec![child, grandchild]);
        assert!(graph.children(parent).is_empty());
        assert!(!graph.contains(grandchild));
    }
}
