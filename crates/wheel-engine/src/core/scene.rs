use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Simple entity storage using a flat Vec.
/// Designed for small entity counts (a screenful of UI, not a particle field).
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(128),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    ///
    /// Keeps spawn order intact: draw order within a layer depends on it.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Topmost active entity whose hit area contains `point`.
    ///
    /// Higher layers win; within a layer the most recently spawned entity wins,
    /// matching draw order.
    pub fn hit_test(&self, point: Vec2) -> Option<EntityId> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.hit_by(point))
            .max_by_key(|(idx, e)| (e.layer, *idx))
            .map(|(_, e)| e.id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::HitArea;
    use crate::components::layer::RenderLayer;

    fn button(id: u32, pos: Vec2, layer: RenderLayer) -> Entity {
        Entity::new(EntityId(id))
            .with_pos(pos)
            .with_layer(layer)
            .with_hit(HitArea::Circle { radius: 20.0 })
    }

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec2::new(10.0, 20.0)));
        assert_eq!(scene.get(id).unwrap().pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn despawn_keeps_order() {
        let mut scene = Scene::new();
        for i in 1..=3 {
            scene.spawn(Entity::new(EntityId(i)));
        }
        scene.despawn(EntityId(1));
        let ids: Vec<_> = scene.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(3)]);
    }

    #[test]
    fn hit_test_prefers_higher_layer() {
        let mut scene = Scene::new();
        scene.spawn(button(1, Vec2::ZERO, RenderLayer::UI));
        scene.spawn(button(2, Vec2::ZERO, RenderLayer::Wheel));
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), Some(EntityId(1)));
    }

    #[test]
    fn hit_test_prefers_later_spawn_within_layer() {
        let mut scene = Scene::new();
        scene.spawn(button(1, Vec2::ZERO, RenderLayer::Wheel));
        scene.spawn(button(2, Vec2::new(10.0, 0.0), RenderLayer::Wheel));
        assert_eq!(scene.hit_test(Vec2::new(5.0, 0.0)), Some(EntityId(2)));
        assert_eq!(scene.hit_test(Vec2::new(100.0, 0.0)), None);
    }
}
