use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::layer::RenderLayer;
use crate::components::sprite::SpriteComponent;
use crate::components::text::TextComponent;

/// Pointer-sensitive region around an entity's world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitArea {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl HitArea {
    /// Whether `point` falls inside the area centred at `center`, scaled by `scale`.
    pub fn contains(&self, center: Vec2, scale: Vec2, point: Vec2) -> bool {
        let d = point - center;
        match *self {
            HitArea::Circle { radius } => {
                let r = radius * scale.x.abs().max(scale.y.abs());
                d.length_squared() <= r * r
            }
            HitArea::Rect { half_extents } => {
                let h = half_extents * scale.abs();
                d.x.abs() <= h.x && d.y.abs() <= h.y
            }
        }
    }
}

/// Fat Entity: a single struct with optional components.
///
/// `pos`, `rotation`, `scale` and `opacity` are world-space values. Entities that
/// live in a `TransformGraph` get them rewritten on every propagate.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Inactive entities are neither drawn nor hit-tested.
    pub active: bool,
    /// Position in world space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Scale multiplier (1.0 = drawn at `size`).
    pub scale: Vec2,
    /// Inherited opacity multiplier applied on top of sprite/text alpha.
    pub opacity: f32,
    /// Rendered sprite size in world units at scale 1.
    pub size: Vec2,
    /// Draw layer.
    pub layer: RenderLayer,
    pub sprite: Option<SpriteComponent>,
    pub text: Option<TextComponent>,
    /// Entities without a hit area are transparent to the pointer.
    pub hit: Option<HitArea>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            opacity: 1.0,
            size: Vec2::ONE,
            layer: RenderLayer::default(),
            sprite: None,
            text: None,
            hit: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_text(mut self, text: TextComponent) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_hit(mut self, hit: HitArea) -> Self {
        self.hit = Some(hit);
        self
    }

    /// Whether a pointer at `point` lands on this entity.
    pub fn hit_by(&self, point: Vec2) -> bool {
        self.active
            && self
                .hit
                .map_or(false, |area| area.contains(self.pos, self.scale, point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_hit_scales_with_entity() {
        let area = HitArea::Circle { radius: 10.0 };
        assert!(area.contains(Vec2::ZERO, Vec2::ONE, Vec2::new(9.0, 0.0)));
        assert!(!area.contains(Vec2::ZERO, Vec2::ONE, Vec2::new(11.0, 0.0)));
        assert!(area.contains(Vec2::ZERO, Vec2::splat(1.5), Vec2::new(14.0, 0.0)));
    }

    #[test]
    fn inactive_entity_is_not_hit() {
        let mut e = Entity::new(EntityId(1)).with_hit(HitArea::Rect { half_extents: Vec2::splat(5.0) });
        assert!(e.hit_by(Vec2::new(4.0, -4.0)));
        e.active = false;
        assert!(!e.hit_by(Vec2::new(4.0, -4.0)));
    }
}
