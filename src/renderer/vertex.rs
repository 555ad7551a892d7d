//! GPU-side data layouts

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Flat-colored vertex in canvas pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn at(pos: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: pos.to_array(),
            color,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Canvas pixels (origin top-left, y down) to clip space:
/// `ndc = position * scale + offset`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ViewUniform {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

impl ViewUniform {
    pub fn for_canvas(logical_size: (f32, f32)) -> Self {
        let (w, h) = logical_size;
        Self {
            scale: [2.0 / w.max(1.0), -2.0 / h.max(1.0)],
            offset: [-1.0, 1.0],
        }
    }

    /// Same mapping the vertex shader applies
    pub fn to_ndc(&self, pos: Vec2) -> Vec2 {
        pos * Vec2::from(self.scale) + Vec2::from(self.offset)
    }
}
