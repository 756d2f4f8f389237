use std::collections::HashMap;
use glam::Vec2;
use crate::assets::manifest::AssetManifest;
use crate::components::sprite::{AtlasId, SpriteComponent};
use crate::systems::text::FontConfig;

/// Name-based sprite lookup built from an `AssetManifest`.
pub struct SpriteRegistry {
    sprites: HashMap<String, (SpriteComponent, Option<Vec2>)>,
    font: FontConfig,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
            font: FontConfig::default(),
        }
    }

    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let sprites = manifest
            .sprites
            .iter()
            .map(|(name, desc)| {
                let sprite = SpriteComponent {
                    atlas: AtlasId(desc.atlas),
                    col: desc.col as f32,
                    row: desc.row as f32,
                    ..Default::default()
                };
                (name.clone(), (sprite, desc.size.map(Vec2::from)))
            })
            .collect();

        let font = manifest.font.as_ref().map_or_else(FontConfig::default, |f| {
            FontConfig::new(AtlasId(f.atlas))
                .with_grid(f.cols, f.rows)
                .with_spacing(f.spacing)
        });

        Self { sprites, font }
    }

    pub fn get(&self, name: &str) -> Option<&SpriteComponent> {
        self.sprites.get(name).map(|(sprite, _)| sprite)
    }

    /// Sprite by name; unknown names fall back to the default cell with a warning.
    pub fn sprite(&self, name: &str) -> SpriteComponent {
        match self.get(name) {
            Some(sprite) => sprite.clone(),
            None => {
                log::warn!("unknown sprite '{name}', using default cell");
                SpriteComponent::default()
            }
        }
    }

    /// Natural size declared in the manifest.
    pub fn size(&self, name: &str) -> Option<Vec2> {
        self.sprites.get(name).and_then(|(_, size)| *size)
    }

    pub fn font(&self) -> &FontConfig {
        &self.font
    }
}

impl Default for SpriteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
