use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Atlases, named sprites and the bitmap font of a game, parsed from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetManifest {
    pub atlases: Vec<AtlasDescriptor>,
    #[serde(default)]
    pub sprites: HashMap<String, SpriteDescriptor>,
    #[serde(default)]
    pub font: Option<FontDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    pub name: String,
    pub cols: u32,
    pub rows: u32,
    /// Image path relative to the manifest.
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Index into `atlases`.
    pub atlas: u32,
    pub col: u32,
    pub row: u32,
    /// Natural size in world units, when the art has one.
    #[serde(default)]
    pub size: Option<[f32; 2]>,
}

/// Grid layout of a bitmap font atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub atlas: u32,
    pub cols: u32,
    pub rows: u32,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
}

fn default_spacing() -> f32 {
    0.6
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
