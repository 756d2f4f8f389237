// input/pointer.rs
//
// Turns raw pointer events into targeted ones using the scene's hit areas.
// `Enter` fires when the pointer moves onto a different hit target, which is
// what drag-to-select gestures listen for.

use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::queue::InputEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Press anywhere on the stage; `target` is the topmost hit entity.
    Down { pos: Vec2, target: Option<EntityId> },
    /// Pointer moved onto `target`.
    Enter { pos: Vec2, target: EntityId },
    Move { pos: Vec2 },
    /// Release anywhere; `over` is the entity under the pointer, if any.
    Up { pos: Vec2, over: Option<EntityId> },
}

#[derive(Debug, Default)]
pub struct PointerRouter {
    pressed: bool,
    hovered: Option<EntityId>,
    last_pos: Vec2,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn position(&self) -> Vec2 {
        self.last_pos
    }

    /// Route one raw event. Custom events produce nothing here.
    pub fn route(&mut self, event: &InputEvent, scene: &Scene) -> Vec<PointerEvent> {
        match *event {
            InputEvent::PointerDown { pos } => {
                let target = scene.hit_test(pos);
                self.pressed = true;
                self.hovered = target;
                self.last_pos = pos;
                vec![PointerEvent::Down { pos, target }]
            }
            InputEvent::PointerMove { pos } => {
                self.last_pos = pos;
                let target = scene.hit_test(pos);
                let mut out = Vec::with_capacity(2);
                if target != self.hovered {
                    self.hovered = target;
                    if let Some(target) = target {
                        out.push(PointerEvent::Enter { pos, target });
                    }
                }
                out.push(PointerEvent::Move { pos });
                out
            }
            InputEvent::PointerUp { pos } => {
                self.pressed = false;
                self.last_pos = pos;
                let over = scene.hit_test(pos);
                self.hovered = over;
                vec![PointerEvent::Up { pos, over }]
            }
            InputEvent::Custom { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::{Entity, HitArea};

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.spawn(
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(0.0, 0.0))
                .with_hit(HitArea::Circle { radius: 10.0 }),
        );
        scene.spawn(
            Entity::new(EntityId(2))
                .with_pos(Vec2::new(50.0, 0.0))
                .with_hit(HitArea::Circle { radius: 10.0 }),
        );
        scene
    }

    #[test]
    fn enter_fires_once_per_new_target() {
        let scene = scene();
        let mut router = PointerRouter::new();

        let down = router.route(&InputEvent::PointerDown { pos: Vec2::ZERO }, &scene);
        assert_eq!(down, vec![PointerEvent::Down { pos: Vec2::ZERO, target: Some(EntityId(1)) }]);

        // Still over the same token: only a move.
        let moved = router.route(&InputEvent::PointerMove { pos: Vec2::new(3.0, 0.0) }, &scene);
        assert_eq!(moved.len(), 1);

        let over_second = Vec2::new(48.0, 0.0);
        let moved = router.route(&InputEvent::PointerMove { pos: over_second }, &scene);
        assert_eq!(moved[0], PointerEvent::Enter { pos: over_second, target: EntityId(2) });

        // Leaving to empty space and coming back re-enters.
        router.route(&InputEvent::PointerMove { pos: Vec2::new(25.0, 0.0) }, &scene);
        let back = router.route(&InputEvent::PointerMove { pos: Vec2::ZERO }, &scene);
        assert!(matches!(back[0], PointerEvent::Enter { target: EntityId(1), .. }));
    }

    #[test]
    fn release_reports_entity_under_pointer() {
        let scene = scene();
        let mut router = PointerRouter::new();
        router.route(&InputEvent::PointerDown { pos: Vec2::ZERO }, &scene);
        let up = router.route(&InputEvent::PointerUp { pos: Vec2::new(200.0, 0.0) }, &scene);
        assert_eq!(up, vec![PointerEvent::Up { pos: Vec2::new(200.0, 0.0), over: None }]);
        assert!(!router.is_pressed());
    }
}
