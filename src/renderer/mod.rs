mod frame;
mod renderer;
mod text;
mod texture;
mod vertex;
pub use frame::*;
pub use renderer::*;
pub use text::*;
pub use texture::*;
pub use vertex::*;

pub const SCR_WIDTH: u32 = 2500;
pub const SCR_HEIGHT: u32 = 1500;
pub const SCR_RATIO: f32 = SCR_WIDTH as f32 / SCR_HEIGHT as f32;

pub(in crate::renderer) const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};
