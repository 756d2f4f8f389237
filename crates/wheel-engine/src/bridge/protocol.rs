/// Frame buffer layout shared with the host page.
///
/// Layout (all values f32):
/// ```text
/// [Header: 16 floats]
/// [Instances: max_instances × 12 floats]
/// [Vector vertices: max_vector_vertices × 6 floats]
/// [Layer batches: RenderLayer::COUNT × 5 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities go into the header every frame so the host can derive offsets
/// without a second source of truth. Per layer the host draws the batch's
/// vertices first, then its instances.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::components::layer::RenderLayer;
use crate::renderer::instance::{LayerBatch, RenderInstance};

pub const HEADER_FLOATS: usize = 16;

pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_WORLD_WIDTH: usize = 2;
pub const HEADER_WORLD_HEIGHT: usize = 3;
pub const HEADER_MAX_INSTANCES: usize = 4;
pub const HEADER_INSTANCE_COUNT: usize = 5;
pub const HEADER_MAX_VECTOR_VERTICES: usize = 6;
pub const HEADER_VECTOR_VERTEX_COUNT: usize = 7;
pub const HEADER_MAX_BATCHES: usize = 8;
pub const HEADER_BATCH_COUNT: usize = 9;
pub const HEADER_MAX_EVENTS: usize = 10;
pub const HEADER_EVENT_COUNT: usize = 11;

pub const PROTOCOL_VERSION: f32 = 2.0;

pub const VECTOR_VERTEX_FLOATS: usize = 6;

/// Section sizes and offsets derived from capacities.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_vector_vertices: usize,
    pub max_batches: usize,
    pub max_events: usize,

    pub instance_data_offset: usize,
    pub vector_data_offset: usize,
    pub batch_data_offset: usize,
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_instances: usize, max_vector_vertices: usize, max_events: usize) -> Self {
        let max_batches = RenderLayer::COUNT;
        let instance_data_offset = HEADER_FLOATS;
        let vector_data_offset = instance_data_offset + max_instances * RenderInstance::FLOATS;
        let batch_data_offset = vector_data_offset + max_vector_vertices * VECTOR_VERTEX_FLOATS;
        let event_data_offset = batch_data_offset + max_batches * LayerBatch::FLOATS;
        let buffer_total_floats = event_data_offset + max_events * GameEvent::FLOATS;

        Self {
            max_instances,
            max_vector_vertices,
            max_batches,
            max_events,
            instance_data_offset,
            vector_data_offset,
            batch_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_vector_vertices, config.max_events)
    }
}

/// Everything that goes into one frame.
pub struct FrameData<'a> {
    pub frame_counter: u32,
    pub world_width: f32,
    pub world_height: f32,
    pub instances: &'a [RenderInstance],
    pub batches: &'a [LayerBatch],
    /// Per-layer flat vertex lists, in batch order.
    pub vector_layers: &'a [&'a [f32]],
    pub events: &'a [GameEvent],
}

/// Sizes actually written after clamping to capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameCounts {
    pub instances: usize,
    pub vertices: usize,
    pub batches: usize,
    pub events: usize,
}

/// Pack a frame into `buf` (which must be `layout.buffer_total_floats` long).
/// Overflowing sections are truncated and batch ranges clamped to match.
pub fn write_frame(buf: &mut [f32], layout: &ProtocolLayout, frame: &FrameData<'_>) -> FrameCounts {
    debug_assert!(buf.len() >= layout.buffer_total_floats);

    let instances = frame.instances.len().min(layout.max_instances);
    let inst_floats: &[f32] = bytemuck::cast_slice(&frame.instances[..instances]);
    let start = layout.instance_data_offset;
    buf[start..start + inst_floats.len()].copy_from_slice(inst_floats);

    let mut vertices = 0usize;
    let mut cursor = layout.vector_data_offset;
    for layer in frame.vector_layers {
        let room = layout.max_vector_vertices - vertices;
        let take = (layer.len() / VECTOR_VERTEX_FLOATS).min(room);
        let floats = take * VECTOR_VERTEX_FLOATS;
        buf[cursor..cursor + floats].copy_from_slice(&layer[..floats]);
        cursor += floats;
        vertices += take;
    }

    let batches = frame.batches.len().min(layout.max_batches);
    for (i, batch) in frame.batches[..batches].iter().enumerate() {
        let mut b = *batch;
        clamp_range(&mut b.first_instance, &mut b.instance_count, instances);
        clamp_range(&mut b.first_vertex, &mut b.vertex_count, vertices);
        let at = layout.batch_data_offset + i * LayerBatch::FLOATS;
        buf[at..at + LayerBatch::FLOATS].copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(&b)));
    }

    let events = frame.events.len().min(layout.max_events);
    let ev_floats: &[f32] = bytemuck::cast_slice(&frame.events[..events]);
    let start = layout.event_data_offset;
    buf[start..start + ev_floats.len()].copy_from_slice(ev_floats);

    buf[HEADER_FRAME_COUNTER] = frame.frame_counter as f32;
    buf[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    buf[HEADER_WORLD_WIDTH] = frame.world_width;
    buf[HEADER_WORLD_HEIGHT] = frame.world_height;
    buf[HEADER_MAX_INSTANCES] = layout.max_instances as f32;
    buf[HEADER_INSTANCE_COUNT] = instances as f32;
    buf[HEADER_MAX_VECTOR_VERTICES] = layout.max_vector_vertices as f32;
    buf[HEADER_VECTOR_VERTEX_COUNT] = vertices as f32;
    buf[HEADER_MAX_BATCHES] = layout.max_batches as f32;
    buf[HEADER_BATCH_COUNT] = batches as f32;
    buf[HEADER_MAX_EVENTS] = layout.max_events as f32;
    buf[HEADER_EVENT_COUNT] = events as f32;

    FrameCounts { instances, vertices, batches, events }
}

fn clamp_range(first: &mut f32, count: &mut f32, limit: usize) {
    let limit = limit as f32;
    *first = first.min(limit);
    *count = count.min(limit - *first).max(0.0);
}
