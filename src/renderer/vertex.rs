use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// The fixed vertex format every sprite quad uses: 3D position, RGB color
/// (kept for the shader interface, not driven by gameplay), 2D texture
/// coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

pub const VERTEX_BUFFER_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: size_of::<Vertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &[
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: offset_of!(Vertex, pos) as u64,
            shader_location: 0,
        },
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: offset_of!(Vertex, color) as u64,
            shader_location: 1,
        },
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: offset_of!(Vertex, uv) as u64,
            shader_location: 2,
        },
    ],
};

/// Texture coordinates for the four quad corners in TR, BR, BL, TL order.
pub type QuadUv = [[f32; 2]; 4];

pub const UV_UPRIGHT: QuadUv = [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];

/// The horizontal zapper reuses the vertical texture turned on its side.
pub const UV_ROTATED: QuadUv = [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

const MULTICOLOR: [[f32; 3]; 4] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
];

/// A centered quad as two triangles in TR/BR/BL, TR/BL/TL order.
pub fn quad(half_w: f32, half_h: f32, colors: [[f32; 3]; 4], uv: QuadUv) -> [Vertex; 6] {
    let corners = [
        [half_w, half_h, 0.0],
        [half_w, -half_h, 0.0],
        [-half_w, -half_h, 0.0],
        [-half_w, half_h, 0.0],
    ];
    let vertex = |i: usize| Vertex {
        pos: corners[i],
        color: colors[i],
        uv: uv[i],
    };

    [vertex(0), vertex(1), vertex(2), vertex(0), vertex(2), vertex(3)]
}

pub fn flat_quad(half_w: f32, half_h: f32, color: [f32; 3]) -> [Vertex; 6] {
    quad(half_w, half_h, [color; 4], UV_UPRIGHT)
}

pub fn multicolor_quad(half_w: f32, half_h: f32) -> [Vertex; 6] {
    quad(half_w, half_h, MULTICOLOR, UV_UPRIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_triangles_share_the_diagonal() {
        let verts = flat_quad(0.5, 0.25, [1.0, 1.0, 1.0]);

        // Both triangles contain the top-right and bottom-left corners.
        assert_eq!(verts[0].pos, [0.5, 0.25, 0.0]);
        assert_eq!(verts[3].pos, [0.5, 0.25, 0.0]);
        assert_eq!(verts[2].pos, [-0.5, -0.25, 0.0]);
        assert_eq!(verts[4].pos, [-0.5, -0.25, 0.0]);
    }

    #[test]
    fn upright_uv_puts_the_texture_top_at_v_zero() {
        let verts = flat_quad(1.0, 1.0, [0.0; 3]);
        // Top-right corner samples (1, 0).
        assert_eq!(verts[0].uv, [1.0, 0.0]);
        // Bottom-left samples (0, 1).
        assert_eq!(verts[2].uv, [0.0, 1.0]);
    }
}
