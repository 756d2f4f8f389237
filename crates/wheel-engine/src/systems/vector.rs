//! Lyon-based vector shape tessellation.
//!
//! Shapes are tessellated on the CPU into flat triangle lists, one buffer per
//! render layer, so the host can interleave vector geometry with sprites.
//! Everything is rebuilt every frame.
//!
//! ```ignore
//! ctx.vectors.fill_circle(RenderLayer::Wheel, center, 130.0, Color::WHITE.with_alpha(0.7));
//! ctx.vectors.fill_rounded_rect(RenderLayer::Overlay, pill_center, Vec2::new(120.0, 50.0), 20.0, ORANGE);
//! ctx.vectors.stroke_polyline(RenderLayer::Wheel, &trail, 10.0, ORANGE);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::{point, Box2D};
use lyon::path::builder::BorderRadii;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor, LineCap,
    LineJoin, StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor,
    VertexBuffers,
};
use crate::api::types::Color;
use crate::components::layer::RenderLayer;

/// Per-vertex data, 6 floats = 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(x: f32, y: f32, color: Color) -> Self {
        Self { x, y, r: color.r, g: color.g, b: color.b, a: color.a }
    }
}

struct FillCtor {
    color: Color,
}

impl FillVertexConstructor<VectorVertex> for FillCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(p.x, p.y, self.color)
    }
}

struct StrokeCtor {
    color: Color,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(p.x, p.y, self.color)
    }
}

const TOLERANCE: f32 = 0.5;

/// Tessellators plus per-layer output buffers.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    layers: [Vec<f32>; RenderLayer::COUNT],
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            layers: std::array::from_fn(|_| Vec::with_capacity(1024 * VectorVertex::FLOATS)),
        }
    }

    /// Drop last frame's geometry.
    pub fn clear(&mut self) {
        for buf in &mut self.layers {
            buf.clear();
        }
    }

    /// Flat `[x, y, r, g, b, a]*` triangle list for one layer.
    pub fn layer_vertices(&self, layer: RenderLayer) -> &[f32] {
        &self.layers[layer.index()]
    }

    pub fn layer_vertex_count(&self, layer: RenderLayer) -> usize {
        self.layers[layer.index()].len() / VectorVertex::FLOATS
    }

    /// Total vertices across all layers.
    pub fn vertex_count(&self) -> usize {
        self.layers.iter().map(|b| b.len()).sum::<usize>() / VectorVertex::FLOATS
    }

    fn flush(&mut self, layer: RenderLayer) {
        let out = &mut self.layers[layer.index()];
        for &idx in &self.geometry.indices {
            let v = &self.geometry.vertices[idx as usize];
            out.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    pub fn fill_circle(&mut self, layer: RenderLayer, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.fill_path(layer, &builder.build(), color);
    }

    /// Rounded rectangle centred on `center`.
    pub fn fill_rounded_rect(
        &mut self,
        layer: RenderLayer,
        center: Vec2,
        size: Vec2,
        radius: f32,
        color: Color,
    ) {
        if size.x <= 0.0 || size.y <= 0.0 || color.a <= 0.0 {
            return;
        }
        let half = size / 2.0;
        let rect = Box2D::new(
            point(center.x - half.x, center.y - half.y),
            point(center.x + half.x, center.y + half.y),
        );
        let radius = radius.clamp(0.0, half.x.min(half.y));
        let mut builder = Path::builder();
        builder.add_rounded_rectangle(&rect, &BorderRadii::new(radius), Winding::Positive);
        self.fill_path(layer, &builder.build(), color);
    }

    pub fn fill_path(&mut self, layer: RenderLayer, path: &Path, color: Color) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, FillCtor { color }),
        );
        match result {
            Ok(_) => self.flush(layer),
            Err(err) => {
                log::warn!("fill tessellation failed: {err:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    /// Open polyline with round caps and joins.
    pub fn stroke_polyline(&mut self, layer: RenderLayer, points: &[Vec2], width: f32, color: Color) {
        if points.len() < 2 || width <= 0.0 || color.a <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(false);
        let path = builder.build();

        let options = StrokeOptions::tolerance(TOLERANCE)
            .with_line_width(width)
            .with_line_cap(LineCap::Round)
            .with_line_join(LineJoin::Round);
        let result = self.stroke_tess.tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, StrokeCtor { color }),
        );
        match result {
            Ok(_) => self.flush(layer),
            Err(err) => {
                log::warn!("stroke tessellation failed: {err:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn vector_vertex_is_24_bytes() {
        assert_eq!(size_of::<VectorVertex>(), VectorVertex::STRIDE_BYTES);
    }

    #[test]
    fn shapes_land_in_their_layer() {
        let mut state = VectorState::new();
        state.fill_circle(RenderLayer::Wheel, Vec2::ZERO, 130.0, Color::WHITE.with_alpha(0.7));
        state.fill_rounded_rect(
            RenderLayer::Overlay,
            Vec2::new(0.0, -180.0),
            Vec2::new(120.0, 50.0),
            20.0,
            Color::hex(0xFFA500),
        );

        assert!(state.layer_vertex_count(RenderLayer::Wheel) > 0);
        assert!(state.layer_vertex_count(RenderLayer::Overlay) > 0);
        assert_eq!(state.layer_vertex_count(RenderLayer::Board), 0);
        assert_eq!(state.layer_vertices(RenderLayer::Wheel).len() % VectorVertex::FLOATS, 0);
    }

    #[test]
    fn stroke_polyline_needs_two_points() {
        let mut state = VectorState::new();
        state.stroke_polyline(RenderLayer::Wheel, &[Vec2::ZERO], 10.0, Color::WHITE);
        assert_eq!(state.vertex_count(), 0);

        state.stroke_polyline(
            RenderLayer::Wheel,
            &[Vec2::ZERO, Vec2::new(85.0, 0.0), Vec2::new(0.0, 85.0)],
            10.0,
            Color::WHITE,
        );
        assert!(state.vertex_count() > 0);
    }

    #[test]
    fn invisible_shapes_are_skipped() {
        let mut state = VectorState::new();
        state.fill_circle(RenderLayer::Wheel, Vec2::ZERO, 10.0, Color::TRANSPARENT);
        state.fill_rounded_rect(RenderLayer::Wheel, Vec2::ZERO, Vec2::ZERO, 5.0, Color::WHITE);
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn clear_resets_every_layer() {
        let mut state = VectorState::new();
        state.fill_circle(RenderLayer::Backdrop, Vec2::ZERO, 10.0, Color::WHITE);
        state.fill_circle(RenderLayer::UI, Vec2::ZERO, 10.0, Color::WHITE);
        state.clear();
        assert_eq!(state.vertex_count(), 0);
    }
}
