use image::{DynamicImage, EncodableLayout};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindingResource, Extent3d,
    Origin3d, Sampler, TexelCopyBufferLayout, TexelCopyTextureInfo, TextureAspect,
    TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureViewDescriptor,
};

use crate::renderer::RenderContext;

/// One sprite texture and its bind group.
#[derive(Debug)]
pub struct Texture {
    bind_group: BindGroup,
}

impl Texture {
    /// Loads an image from disk into an sRGB texture. A decode failure is
    /// not fatal: it is logged and the quad samples an unwritten texture.
    pub fn load(
        path: &str,
        layout: &BindGroupLayout,
        sampler: &Sampler,
        ctx: RenderContext,
    ) -> Self {
        let image = match image::open(path) {
            Ok(image) => Some(image),
            Err(err) => {
                log::error!("failed to load texture {path}: {err}");
                None
            }
        };

        let (width, height) = image
            .as_ref()
            .map(|image| (image.width(), image.height()))
            .unwrap_or((1, 1));

        let texture = ctx.device.create_texture(&TextureDescriptor {
            label: Some("sprite texture"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if let Some(image) = image {
            // RGBA sources upload as-is; RGB (and anything else) are
            // expanded to four channels first.
            let rgba = match image {
                DynamicImage::ImageRgba8(rgba) => rgba,
                other => other.to_rgba8(),
            };

            ctx.queue.write_texture(
                TexelCopyTextureInfo {
                    texture: &texture,
                    aspect: TextureAspect::All,
                    mip_level: 0,
                    origin: Origin3d::ZERO,
                },
                rgba.as_bytes(),
                TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4),
                    rows_per_image: Some(height),
                },
                texture.size(),
            );
        }

        let bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("sprite texture bind group"),
            layout,
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
        });

        Self { bind_group }
    }

    pub(in crate::renderer) fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }
}
