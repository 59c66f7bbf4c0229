use bytemuck::NoUninit;
use glam::Mat4;
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, BlendState, Buffer, BufferBindingType, BufferDescriptor,
    BufferUsages, ColorTargetState, ColorWrites, Device, FilterMode, FragmentState, FrontFace,
    MultisampleState, PipelineCompilationOptions, PipelineLayoutDescriptor,
    PolygonMode, PrimitiveState, PrimitiveTopology, Queue, RenderPipeline,
    RenderPipelineDescriptor, SamplerBindingType, SamplerDescriptor, ShaderStages, TextureFormat,
    TextureSampleType, TextureViewDimension, VertexState, include_wgsl,
    util::{BufferInitDescriptor, DeviceExt},
};

use crate::asset_path;
use crate::game::{GameContext, InitError};
use crate::renderer::{
    SCR_RATIO, TextRenderer, Texture, UV_ROTATED, VERTEX_BUFFER_LAYOUT, flat_quad,
    multicolor_quad, quad,
};

const FONT_PIXEL_SIZE: f32 = 48.0;

const PLAYER_HALF: f32 = 0.075;
const ZAPPER_HALF: f32 = 0.075;
const ZAPPER_RATIO: f32 = 5.5;
const DIAGONAL_ZAPPER_HALF: f32 = 0.2;
const COIN_HALF: f32 = 0.075;
const PILLAR_HALF_W: f32 = 0.15;
const PILLAR_HALF_H: f32 = 0.5;
const SPRITE_COLOR: [f32; 3] = [1.0, 0.83, 0.0];

/// Which pre-built quad geometry to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Background,
    Player,
    Zapper(usize),
    Coin,
    /// Zero-size quad standing in for a consumed coin.
    Blank,
    Pillar,
}

/// Which loaded texture to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureId {
    Background,
    PlayerRun(usize),
    Zapper,
    DiagonalZapper,
    Coin,
    Pillar,
    GameOver,
    GameWin,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
}

/// Per-draw uniforms: the sprite model, the projection (identity, geometry
/// is authored in NDC) and the smoothstep blend scalar.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub(in crate::renderer) struct SpriteUniform {
    pub model: Mat4,
    pub proj: Mat4,
    pub smoothstep: f32,
    pub _pad: [f32; 3],
}

/// Owns every graphics object: the sprite pipeline, the shape vertex
/// buffers, the loaded textures, and the text renderer.
#[derive(Debug)]
pub struct Renderer {
    pub(in crate::renderer) uniform_buf: Buffer,
    pub(in crate::renderer) uniform_bind_group: BindGroup,
    pub(in crate::renderer) pipeline: RenderPipeline,
    pub(in crate::renderer) shapes: Shapes,
    pub(in crate::renderer) textures: Textures,
    pub(in crate::renderer) text: TextRenderer,
    pub(in crate::renderer) proj: Mat4,
}

#[derive(Debug)]
pub(in crate::renderer) struct Shapes {
    background: Buffer,
    player: Buffer,
    zappers: [Buffer; 4],
    coin: Buffer,
    blank: Buffer,
    pillar: Buffer,
}

impl Shapes {
    pub fn get(&self, shape: Shape) -> &Buffer {
        match shape {
            Shape::Background => &self.background,
            Shape::Player => &self.player,
            Shape::Zapper(style) => &self.zappers[style],
            Shape::Coin => &self.coin,
            Shape::Blank => &self.blank,
            Shape::Pillar => &self.pillar,
        }
    }
}

#[derive(Debug)]
pub(in crate::renderer) struct Textures {
    background: Texture,
    player_run: [Texture; 3],
    zapper: Texture,
    diagonal_zapper: Texture,
    coin: Texture,
    pillar: Texture,
    game_over: Texture,
    game_win: Texture,
}

impl Textures {
    pub fn get(&self, id: TextureId) -> &Texture {
        match id {
            TextureId::Background => &self.background,
            TextureId::PlayerRun(frame) => &self.player_run[frame],
            TextureId::Zapper => &self.zapper,
            TextureId::DiagonalZapper => &self.diagonal_zapper,
            TextureId::Coin => &self.coin,
            TextureId::Pillar => &self.pillar,
            TextureId::GameOver => &self.game_over,
            TextureId::GameWin => &self.game_win,
        }
    }
}

impl Renderer {
    pub fn new(ctx: RenderContext) -> Result<Self, InitError> {
        let sampler = ctx.device.create_sampler(&SamplerDescriptor {
            label: Some("renderer sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            anisotropy_clamp: 1,
            border_color: None,
            compare: None,
            lod_max_clamp: 1.0,
            lod_min_clamp: 1.0,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Nearest,
        });

        let uniform_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("sprite uniform buffer"),
            size: size_of::<SpriteUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = ctx
            .device
            .create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("sprite uniform bind group layout"),
                entries: &[BindGroupLayoutEntry {
                    binding: 0,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                    visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                }],
            });

        let uniform_bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("sprite uniform bind group"),
            layout: &uniform_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            }],
        });

        let texture_layout = ctx
            .device
            .create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("sprite texture bind group layout"),
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
                        ty: BindingType::Sampler(SamplerBindingType::Filtering),
                        count: None,
                        visibility: ShaderStages::FRAGMENT,
                    },
                ],
            });

        let shader = ctx.device.create_shader_module(include_wgsl!("render.wgsl"));

        let pipeline = ctx
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("sprite pipeline"),
                cache: None,
                depth_stencil: None,
                layout: Some(
                    &ctx.device
                        .create_pipeline_layout(&PipelineLayoutDescriptor {
                            label: Some("sprite pipeline layout"),
                            bind_group_layouts: &[&uniform_layout, &texture_layout],
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
                    buffers: &[VERTEX_BUFFER_LAYOUT],
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

        let shape_buf = |verts: [crate::renderer::Vertex; 6], label: &str| {
            ctx.device.create_buffer_init(&BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&verts),
                usage: BufferUsages::VERTEX,
            })
        };

        let vertical = flat_quad(ZAPPER_HALF, ZAPPER_HALF * ZAPPER_RATIO, SPRITE_COLOR);
        let horizontal = quad(
            ZAPPER_HALF * ZAPPER_RATIO / SCR_RATIO,
            ZAPPER_HALF * SCR_RATIO,
            [SPRITE_COLOR; 4],
            UV_ROTATED,
        );
        let diagonal = flat_quad(
            DIAGONAL_ZAPPER_HALF,
            DIAGONAL_ZAPPER_HALF * SCR_RATIO,
            SPRITE_COLOR,
        );

        let shapes = Shapes {
            background: shape_buf(multicolor_quad(1.0, 1.0), "background vertex buffer"),
            player: shape_buf(
                flat_quad(PLAYER_HALF, PLAYER_HALF * SCR_RATIO, SPRITE_COLOR),
                "player vertex buffer",
            ),
            zappers: [
                shape_buf(vertical, "zapper vertex buffer"),
                shape_buf(vertical, "zapper vertex buffer"),
                shape_buf(horizontal, "zapper vertex buffer"),
                shape_buf(diagonal, "zapper vertex buffer"),
            ],
            coin: shape_buf(
                multicolor_quad(COIN_HALF, COIN_HALF * SCR_RATIO),
                "coin vertex buffer",
            ),
            blank: shape_buf(flat_quad(0.0, 0.0, SPRITE_COLOR), "blank vertex buffer"),
            pillar: shape_buf(
                multicolor_quad(PILLAR_HALF_W, PILLAR_HALF_H),
                "pillar vertex buffer",
            ),
        };

        let load = |path| Texture::load(path, &texture_layout, &sampler, ctx);

        let textures = Textures {
            background: load(asset_path!("background.png")),
            player_run: [
                load(asset_path!("player/playerRun1.png")),
                load(asset_path!("player/playerRun2.png")),
                load(asset_path!("player/playerRun3.png")),
            ],
            zapper: load(asset_path!("zapper.png")),
            diagonal_zapper: load(asset_path!("diagonalZapper.png")),
            coin: load(asset_path!("coin.png")),
            pillar: load(asset_path!("pillar.png")),
            game_over: load(asset_path!("gameover.png")),
            game_win: load(asset_path!("gamewin.png")),
        };

        let text = TextRenderer::new(asset_path!("Ubuntu-B.ttf"), FONT_PIXEL_SIZE, &sampler, ctx)?;

        Ok(Self {
            uniform_buf,
            uniform_bind_group,
            pipeline,
            shapes,
            textures,
            text,
            proj: Mat4::IDENTITY,
        })
    }
}

impl<'a> From<GameContext<'a>> for RenderContext<'a> {
    fn from(value: GameContext<'a>) -> Self {
        Self {
            device: value.device,
            queue: value.queue,
            surface_format: value.surface_format,
        }
    }
}
