use crate::components::entity::Entity;
use crate::components::layer::RenderLayer;
use crate::renderer::instance::{LayerBatch, RenderBuffer, RenderInstance};
use crate::systems::text::{layout_glyphs, FontConfig};

/// Build the render buffer from the scene's entities.
///
/// Instances are grouped by layer, back to front, keeping spawn order inside a
/// layer. Every layer gets a batch even when empty. An entity with both a
/// sprite and text draws the sprite first, text on top.
pub fn build_render_buffer<'a, I>(entities: I, font: &FontConfig, buffer: &mut RenderBuffer)
where
    I: Iterator<Item = &'a Entity> + Clone,
{
    buffer.clear();

    for layer in RenderLayer::ALL {
        let first = buffer.instances.len();

        for entity in entities.clone().filter(|e| e.active && e.layer == layer) {
            if entity.opacity <= 0.0 {
                continue;
            }
            if let Some(sprite) = &entity.sprite {
                let alpha = sprite.alpha * sprite.tint.a * entity.opacity;
                if alpha > 0.0 {
                    buffer.push(RenderInstance {
                        x: entity.pos.x,
                        y: entity.pos.y,
                        rotation: entity.rotation,
                        width: entity.size.x * entity.scale.x,
                        height: entity.size.y * entity.scale.y,
                        atlas: sprite.atlas.0 as f32,
                        col: sprite.col,
                        row: sprite.row,
                        alpha,
                        r: sprite.tint.r,
                        g: sprite.tint.g,
                        b: sprite.tint.b,
                    });
                }
            }
            if let Some(text) = &entity.text {
                let alpha = text.color.a * entity.opacity;
                if alpha <= 0.0 {
                    continue;
                }
                for glyph in layout_glyphs(text, entity.pos, entity.scale, entity.rotation, font) {
                    buffer.push(RenderInstance {
                        x: glyph.pos.x,
                        y: glyph.pos.y,
                        rotation: entity.rotation,
                        width: glyph.size,
                        height: glyph.size,
                        atlas: font.atlas.0 as f32,
                        col: glyph.col,
                        row: glyph.row,
                        alpha,
                        r: text.color.r,
                        g: text.color.g,
                        b: text.color.b,
                    });
                }
            }
        }

        buffer.batches.push(LayerBatch {
            layer: layer.as_u8() as f32,
            first_instance: first as f32,
            instance_count: (buffer.instances.len() - first) as f32,
            first_vertex: 0.0,
            vertex_count: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Color, EntityId};
    use crate::components::sprite::{AtlasId, SpriteComponent};
    use crate::components::text::TextComponent;
    use glam::Vec2;

    #[test]
    fn instances_are_grouped_by_layer() {
        let entities = vec![
            Entity::new(EntityId(1))
                .with_layer(RenderLayer::UI)
                .with_size(Vec2::splat(10.0))
                .with_sprite(SpriteComponent::default()),
            Entity::new(EntityId(2))
                .with_layer(RenderLayer::Board)
                .with_size(Vec2::new(80.0, 80.0))
                .with_sprite(SpriteComponent { atlas: AtlasId(0), col: 2.0, ..Default::default() }),
        ];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &FontConfig::default(), &mut buffer);

        assert_eq!(buffer.instance_count(), 2);
        assert_eq!(buffer.batches.len(), RenderLayer::COUNT);
        assert_eq!(buffer.instances[0].col, 2.0);
        assert_eq!(buffer.instances[0].width, 80.0);
        let ui = buffer.batch(RenderLayer::UI).unwrap();
        assert_eq!((ui.first_instance, ui.instance_count), (1.0, 1.0));
    }

    #[test]
    fn text_adds_one_instance_per_glyph_after_sprite() {
        let entity = Entity::new(EntityId(1))
            .with_size(Vec2::splat(80.0))
            .with_sprite(SpriteComponent::default().with_tint(Color::hex(0xFFFAE6)))
            .with_text(TextComponent::new("GO", 40.0, Color::hex(0xFFA500)));

        let mut buffer = RenderBuffer::new();
        let font = FontConfig::default();
        build_render_buffer(std::iter::once(&entity), &font, &mut buffer);

        assert_eq!(buffer.instance_count(), 3);
        assert_eq!(buffer.instances[1].atlas, font.atlas.0 as f32);
        assert_eq!(buffer.instances[2].g, Color::hex(0xFFA500).g);
    }

    #[test]
    fn hidden_and_transparent_entities_are_skipped() {
        let mut hidden = Entity::new(EntityId(1)).with_sprite(SpriteComponent::default());
        hidden.active = false;
        let mut faded = Entity::new(EntityId(2)).with_sprite(SpriteComponent::default());
        faded.opacity = 0.0;

        let entities = vec![hidden, faded];
        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &FontConfig::default(), &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }
}
