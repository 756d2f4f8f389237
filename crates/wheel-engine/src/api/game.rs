use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::Entity;
use crate::core::rng::GameRng;
use crate::core::scene::Scene;
use crate::extensions::transform::{LocalTransform, TransformGraph};
use crate::input::queue::InputQueue;
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorState;

/// Engine configuration, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    pub max_instances: usize,
    pub max_vector_vertices: usize,
    /// Game events per frame.
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 720.0,
            world_height: 1280.0,
            max_instances: 512,
            max_vector_vertices: 16384,
            max_events: 32,
        }
    }
}

/// The contract every game fulfils.
pub trait Game {
    /// Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the initial scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. `input` holds everything the host pushed since the
    /// previous step.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable engine state handed to `Game::init` and `Game::update`.
pub struct EngineContext {
    pub scene: Scene,
    pub graph: TransformGraph,
    #[cfg(feature = "vectors")]
    pub vectors: VectorState,
    pub events: Vec<GameEvent>,
    pub rng: GameRng,
    next_id: u32,
}

impl EngineContext {
    pub fn new(seed: u64) -> Self {
        Self {
            scene: Scene::new(),
            graph: TransformGraph::new(),
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
            events: Vec::new(),
            rng: GameRng::new(seed),
            next_id: 1,
        }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn an entity into the scene and the transform graph, under `parent`
    /// when given. The entity's own id is kept.
    pub fn spawn_child(
        &mut self,
        parent: Option<EntityId>,
        entity: Entity,
        local: LocalTransform,
    ) -> EntityId {
        let id = entity.id;
        self.scene.spawn(entity);
        self.graph.register(id, local);
        if parent.is_some() {
            self.graph.set_parent(id, parent);
        }
        id
    }

    /// Allocate an id, then spawn like `spawn_child`.
    pub fn spawn_node(
        &mut self,
        parent: Option<EntityId>,
        build: impl FnOnce(Entity) -> Entity,
        local: LocalTransform,
    ) -> EntityId {
        let id = self.next_id();
        self.spawn_child(parent, build(Entity::new(id)), local)
    }

    /// Remove an entity and all of its graph descendants from the scene.
    pub fn despawn_tree(&mut self, id: EntityId) {
        let mut removed = self.graph.remove_tree(id);
        if removed.is_empty() {
            removed.push(id);
        }
        for gone in removed {
            self.scene.despawn(gone);
        }
    }

    /// Queue an event for the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear events at the start of a host frame. Vector geometry is cleared
    /// per step instead, so a frame without steps keeps last frame's shapes.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(GameRng::DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn spawn_child_links_graph_and_scene() {
        let mut ctx = EngineContext::default();
        let root = ctx.spawn_node(None, |e| e.with_tag("root"), LocalTransform::at(Vec2::new(360.0, 900.0)));
        let child = ctx.spawn_node(Some(root), |e| e, LocalTransform::at(Vec2::new(0.0, -180.0)));

        ctx.graph.propagate(&mut ctx.scene);
        assert_eq!(ctx.scene.get(child).unwrap().pos, Vec2::new(360.0, 720.0));
        assert_eq!(ctx.graph.parent(child), Some(root));
    }

    #[test]
    fn despawn_tree_removes_descendants() {
        let mut ctx = EngineContext::default();
        let root = ctx.spawn_node(None, |e| e, LocalTransform::default());
        let child = ctx.spawn_node(Some(root), |e| e, LocalTransform::default());
        let loose = ctx.next_id();
        ctx.scene.spawn(Entity::new(loose));

        ctx.despawn_tree(root);
        assert!(ctx.scene.get(child).is_none());
        assert!(ctx.scene.get(root).is_none());

        ctx.despawn_tree(loose);
        assert!(ctx.scene.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut ctx = EngineContext::default();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_ne!(a, b);
    }
}
