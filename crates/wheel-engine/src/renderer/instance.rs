use bytemuck::{Pod, Zeroable};
use crate::components::layer::RenderLayer;

/// Per-instance sprite data as the host reads it. 12 floats = 48 bytes.
///
/// `width`/`height` are the rendered size in world units; the host stretches
/// the atlas cell over that quad and multiplies by `r, g, b, alpha`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub atlas: f32,
    pub col: f32,
    pub row: f32,
    pub alpha: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Draw ranges of one render layer. 5 floats on the wire.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LayerBatch {
    pub layer: f32,
    pub first_instance: f32,
    pub instance_count: f32,
    pub first_vertex: f32,
    pub vertex_count: f32,
}

impl LayerBatch {
    pub const FLOATS: usize = 5;
}

/// Instances sorted by layer plus one batch per layer, back to front.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    pub batches: Vec<LayerBatch>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(512),
            batches: Vec::with_capacity(RenderLayer::COUNT),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn batch(&self, layer: RenderLayer) -> Option<&LayerBatch> {
        self.batches.iter().find(|b| b.layer as u8 == layer.as_u8())
    }

    /// Fill in vertex ranges from per-layer vector vertex counts. Vertices are
    /// laid out layer after layer in the same order as the batches.
    pub fn set_vector_counts(&mut self, counts: [usize; RenderLayer::COUNT]) {
        let mut first = 0usize;
        for batch in &mut self.batches {
            let count = counts.get(batch.layer as usize).copied().unwrap_or(0);
            batch.first_vertex = first as f32;
            batch.vertex_count = count as f32;
            first += count;
        }
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
