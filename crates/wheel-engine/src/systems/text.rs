//! Bitmap font glyph layout.
//!
//! Text entities are not expanded into child entities; the render system asks
//! this module for glyph quads every frame. Font atlases are grids of glyphs in
//! ASCII order starting at `start_char`.

use crate::components::sprite::AtlasId;
use crate::components::text::TextComponent;
use glam::Vec2;

/// Layout parameters of a bitmap font atlas.
#[derive(Debug, Clone)]
pub struct FontConfig {
    pub atlas: AtlasId,
    pub cols: u32,
    pub rows: u32,
    /// First ASCII code in the atlas (typically 32 = space).
    pub start_char: u8,
    /// Horizontal advance as a fraction of glyph size.
    pub spacing: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            atlas: AtlasId(1), // atlas 0 = game sprites, atlas 1 = font
            cols: 16,
            rows: 6,
            start_char: 32,
            spacing: 0.6,
        }
    }
}

impl FontConfig {
    pub fn new(atlas: AtlasId) -> Self {
        Self { atlas, ..Default::default() }
    }

    pub fn with_grid(mut self, cols: u32, rows: u32) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }
}

/// Grid cell (col, row) of a character, `None` outside the atlas.
pub fn char_to_grid(c: char, font: &FontConfig) -> Option<(f32, f32)> {
    let ascii = c as u32;
    let start = font.start_char as u32;
    if ascii < start {
        return None;
    }
    let index = ascii - start;
    if index >= font.cols * font.rows {
        return None;
    }
    Some(((index % font.cols) as f32, (index / font.cols) as f32))
}

/// Advance width of `content` at glyph size `size`.
pub fn text_width(content: &str, size: f32, font: &FontConfig) -> f32 {
    content.chars().count() as f32 * size * font.spacing
}

/// One placed glyph, centre in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub pos: Vec2,
    pub size: f32,
    pub col: f32,
    pub row: f32,
}

/// Lay out a text component centred on `center`, scaled and rotated with its
/// entity. Unprintable characters keep their advance but emit no glyph.
pub fn layout_glyphs(
    text: &TextComponent,
    center: Vec2,
    scale: Vec2,
    rotation: f32,
    font: &FontConfig,
) -> Vec<Glyph> {
    let advance = text.size * font.spacing;
    let width = text_width(&text.content, text.size, font);
    let glyph_size = text.size * scale.x.abs().max(scale.y.abs());
    let rot = Vec2::from_angle(rotation);

    let mut glyphs = Vec::with_capacity(text.content.len());
    let mut cursor = -width / 2.0 + advance / 2.0;
    for c in text.content.chars() {
        if let Some((col, row)) = char_to_grid(c, font) {
            let local = Vec2::new(cursor, 0.0) * scale;
            glyphs.push(Glyph {
                pos: center + rot.rotate(local),
                size: glyph_size,
                col,
                row,
            });
        }
        cursor += advance;
    }
    glyphs
}
