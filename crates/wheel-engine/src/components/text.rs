use crate::api::types::Color;

/// A centred run of bitmap-font text drawn at the entity's position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextComponent {
    pub content: String,
    /// Glyph height in world units at scale 1.
    pub size: f32,
    pub color: Color,
}

impl TextComponent {
    pub fn new(content: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            content: content.into(),
            size,
            color,
        }
    }
}
