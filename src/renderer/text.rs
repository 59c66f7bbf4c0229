use bytemuck::NoUninit;
use fontdue::{Font, FontSettings};
use glam::Vec3;
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingResource, BindingType, BlendState, Buffer, BufferBindingType,
    BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites, Extent3d, FragmentState,
    FrontFace, MultisampleState, Origin3d, PipelineCompilationOptions, PipelineLayoutDescriptor,
    PolygonMode, PrimitiveState, PrimitiveTopology, RenderPipeline, RenderPipelineDescriptor,
    Sampler, ShaderStages, TexelCopyBufferLayout, TexelCopyTextureInfo, TextureAspect,
    TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType, TextureUsages,
    TextureViewDescriptor, TextureViewDimension, VertexAttribute, VertexBufferLayout,
    VertexFormat, VertexState, VertexStepMode, include_wgsl,
};

use crate::game::InitError;
use crate::renderer::RenderContext;

const ASCII_GLYPHS: usize = 128;

/// One pre-rasterized glyph: metrics in pixels, plus a bind group for its
/// single-channel texture. Glyphs with an empty bitmap (space, controls)
/// keep their advance but have nothing to draw.
#[derive(Debug)]
pub(in crate::renderer) struct Glyph {
    pub bind_group: Option<BindGroup>,
    pub advance: f32,
    width: f32,
    height: f32,
    xmin: f32,
    ymin: f32,
}

impl Glyph {
    /// The glyph quad at a text cursor, scaled from pixels into NDC.
    /// Vertex format is xy position plus uv; the bitmap top is at v = 0.
    pub fn quad(&self, x: f32, y: f32, scale: f32) -> [[f32; 4]; 6] {
        let x0 = x + self.xmin * scale;
        let y0 = y + self.ymin * scale;
        let w = self.width * scale;
        let h = self.height * scale;

        [
            [x0, y0 + h, 0.0, 0.0],
            [x0, y0, 0.0, 1.0],
            [x0 + w, y0, 1.0, 1.0],
            [x0, y0 + h, 0.0, 0.0],
            [x0 + w, y0, 1.0, 1.0],
            [x0 + w, y0 + h, 1.0, 0.0],
        ]
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub(in crate::renderer) struct TextUniform {
    pub color: Vec3,
    pub _pad: f32,
}

/// Draws HUD strings as one textured quad per glyph, the glyphs having been
/// rasterized up front from a TTF with `fontdue`.
#[derive(Debug)]
pub struct TextRenderer {
    pub(in crate::renderer) pipeline: RenderPipeline,
    pub(in crate::renderer) vertex_buf: Buffer,
    pub(in crate::renderer) color_buf: Buffer,
    pub(in crate::renderer) color_bind_group: BindGroup,
    glyphs: Vec<Glyph>,
}

impl TextRenderer {
    /// Rasterizes the first 128 ASCII characters at `pixel_size` and builds
    /// the text pipeline. Font problems are fatal.
    pub fn new(
        font_path: &str,
        pixel_size: f32,
        sampler: &Sampler,
        ctx: RenderContext,
    ) -> Result<Self, InitError> {
        let font_data = std::fs::read(font_path)?;
        let font =
            Font::from_bytes(font_data, FontSettings::default()).map_err(InitError::FontFace)?;

        let glyph_layout = ctx
            .device
            .create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("text glyph bind group layout"),
                entries: &[
                    BindGroupLayoutEntry {
                        binding: 0,
                        ty: BindingType::Texture {
                            sample_type: TextureSampleType::Float { filterable: true },
                            view_dimension: TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                        visibility: ShaderStages::FRAGMENT,
                    },
                    BindGroupLayoutEntry {
                        binding: 1,
                        ty: BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                        visibility: ShaderStages::FRAGMENT,
                    },
                ],
            });

        let glyphs = (0..ASCII_GLYPHS)
            .map(|code| {
                let (metrics, bitmap) = font.rasterize(code as u8 as char, pixel_size);

                let bind_group = (metrics.width > 0 && metrics.height > 0).then(|| {
                    let texture = ctx.device.create_texture(&TextureDescriptor {
                        label: Some("text glyph texture"),
                        size: Extent3d {
                            width: metrics.width as u32,
                            height: metrics.height as u32,
                            depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: TextureDimension::D2,
                        format: TextureFormat::R8Unorm,
                        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
                        view_formats: &[],
                    });

                    ctx.queue.write_texture(
                        TexelCopyTextureInfo {
                            texture: &texture,
                            aspect: TextureAspect::All,
                            mip_level: 0,
                            origin: Origin3d::ZERO,
                        },
                        &bitmap,
                        TexelCopyBufferLayout {
                            offset: 0,
                            bytes_per_row: Some(metrics.width as u32),
                            rows_per_image: Some(metrics.height as u32),
                        },
                        texture.size(),
                    );

                    ctx.device.create_bind_group(&BindGroupDescriptor {
                        label: Some("text glyph bind group"),
                        layout: &glyph_layout,
                        entries: &[
                            BindGroupEntry {
                                binding: 0,
                                resource: BindingResource::TextureView(
                                    &texture.create_view(&TextureViewDescriptor::default()),
                                ),
                            },
                            BindGroupEntry {
                                binding: 1,
                                resource: BindingResource::Sampler(sampler),
                            },
                        ],
                    })
                });

                Glyph {
                    bind_group,
                    advance: metrics.advance_width,
                    width: metrics.width as f32,
                    height: metrics.height as f32,
                    xmin: metrics.xmin as f32,
                    ymin: metrics.ymin as f32,
                }
            })
            .collect();

        let vertex_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("text vertex buffer"),
            size: (6 * 4 * size_of::<f32>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let color_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("text color uniform buffer"),
            size: size_of::<TextUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let color_layout = ctx
            .device
            .create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("text color bind group layout"),
                entries: &[BindGroupLayoutEntry {
                    binding: 0,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                    visibility: ShaderStages::FRAGMENT,
                }],
            });

        let color_bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("text color bind group"),
            layout: &color_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: color_buf.as_entire_binding(),
            }],
        });

        let shader = ctx.device.create_shader_module(include_wgsl!("text.wgsl"));

        let pipeline = ctx
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("text pipeline"),
                cache: None,
                depth_stencil: None,
                layout: Some(
                    &ctx.device
                        .create_pipeline_layout(&PipelineLayoutDescriptor {
                            label: Some("text pipeline layout"),
                            bind_group_layouts: &[&color_layout, &glyph_layout],
                            push_constant_ranges: &[],
                        }),
                ),
                multiview: None,
                primitive: PrimitiveState {
                    front_face: FrontFace::Ccw,
                    conservative: false,
                    cull_mode: None,
                    polygon_mode: PolygonMode::Fill,
                    strip_index_format: None,
                    topology: PrimitiveTopology::TriangleList,
                    unclipped_depth: false,
                },
                vertex: VertexState {
                    module: &shader,
                    entry_point: None,
                    compilation_options: PipelineCompilationOptions::default(),
                    buffers: &[TEXT_VERTEX_BUFFER_LAYOUT],
                },
                fragment: Some(FragmentState {
                    module: &shader,
                    targets: &[Some(ColorTargetState {
                        blend: Some(BlendState::ALPHA_BLENDING),
                        format: ctx.surface_format,
                        write_mask: ColorWrites::all(),
                    })],
                    entry_point: None,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                multisample: MultisampleState::default(),
            });

        Ok(Self {
            pipeline,
            vertex_buf,
            color_buf,
            color_bind_group,
            glyphs,
        })
    }

    pub(in crate::renderer) fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(ch as usize)
    }
}

const TEXT_VERTEX_BUFFER_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: (4 * size_of::<f32>()) as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &[VertexAttribute {
        format: VertexFormat::Float32x4,
        offset: 0,
        shader_location: 0,
    }],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(width: f32, height: f32, xmin: f32, ymin: f32, advance: f32) -> Glyph {
        Glyph {
            bind_group: None,
            advance,
            width,
            height,
            xmin,
            ymin,
        }
    }

    #[test]
    fn quad_applies_bearing_and_scale() {
        use approx::assert_relative_eq;

        let glyph = glyph(20.0, 30.0, 2.0, -5.0, 24.0);
        let verts = glyph.quad(0.5, 0.0, 0.001);

        // Bottom-left corner: x + xmin*scale, y + ymin*scale.
        assert_relative_eq!(verts[1][0], 0.502, epsilon = 1e-6);
        assert_relative_eq!(verts[1][1], -0.005, epsilon = 1e-6);
        // Top-right corner adds the scaled bitmap size.
        assert_relative_eq!(verts[5][0], 0.522, epsilon = 1e-6);
        assert_relative_eq!(verts[5][1], 0.025, epsilon = 1e-6);
    }

    #[test]
    fn bitmap_top_samples_v_zero() {
        let glyph = glyph(10.0, 10.0, 0.0, 0.0, 10.0);
        let verts = glyph.quad(0.0, 0.0, 1.0);

        for v in verts {
            if v[1] == 10.0 {
                assert_eq!(v[3], 0.0);
            } else {
                assert_eq!(v[3], 1.0);
            }
        }
    }
}
