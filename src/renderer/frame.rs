use bytemuck::bytes_of;
use glam::{Mat4, Vec3};
use wgpu::{
    CommandEncoder, CommandEncoderDescriptor, LoadOp, Operations, RenderPass,
    RenderPassColorAttachment, RenderPassDescriptor, StoreOp, TextureView,
};

use crate::renderer::{
    CLEAR_COLOR, RenderContext, Renderer, Shape, SpriteUniform, TextUniform, TextureId,
};

/// One frame being drawn into a surface texture. The first draw clears the
/// target; later draws load it, so submit order is paint order.
pub struct RenderFrame<'a> {
    renderer: &'a mut Renderer,
    ctx: &'a RenderContext<'a>,
    target: &'a TextureView,
    has_rendered: bool,
}

impl Renderer {
    pub fn render_frame(
        &mut self,
        target: &TextureView,
        ctx: &RenderContext,
        f: impl FnOnce(&mut RenderFrame),
    ) {
        let mut frame = RenderFrame {
            renderer: self,
            ctx,
            target,
            has_rendered: false,
        };

        f(&mut frame);

        // A frame with no draws still clears to the background color.
        if !frame.has_rendered {
            let mut encoder = ctx
                .device
                .create_command_encoder(&CommandEncoderDescriptor::default());
            drop(frame.begin_pass(&mut encoder, false));
            ctx.queue.submit([encoder.finish()]);
        }
    }
}

impl<'a> RenderFrame<'a> {
    pub fn draw_sprite(&mut self, shape: Shape, texture: TextureId, model: Mat4, smoothstep: f32) {
        let uniform = SpriteUniform {
            model,
            proj: self.renderer.proj,
            smoothstep,
            _pad: [0.0; 3],
        };
        self.ctx
            .queue
            .write_buffer(&self.renderer.uniform_buf, 0, bytes_of(&uniform));

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());

        let mut pass = self.begin_pass(&mut encoder, self.has_rendered);

        pass.set_pipeline(&self.renderer.pipeline);
        pass.set_bind_group(0, &self.renderer.uniform_bind_group, &[]);
        pass.set_bind_group(1, self.renderer.textures.get(texture).bind_group(), &[]);
        pass.set_vertex_buffer(0, self.renderer.shapes.get(shape).slice(..));
        pass.draw(0..6, 0..1);

        drop(pass);

        self.ctx.queue.submit([encoder.finish()]);
        self.has_rendered = true;
    }

    /// Draws a line of text with its baseline origin at `(x, y)` in NDC.
    /// `scale` converts glyph pixels to NDC units. The pen advances past
    /// glyphs with no bitmap (spaces) without drawing them.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, scale: f32, color: Vec3) {
        self.ctx.queue.write_buffer(
            &self.renderer.text.color_buf,
            0,
            bytes_of(&TextUniform { color, _pad: 0.0 }),
        );

        let mut cursor_x = x;

        for ch in text.chars() {
            let Some(glyph) = self.renderer.text.glyph(ch) else {
                continue;
            };

            if let Some(bind_group) = &glyph.bind_group {
                self.ctx.queue.write_buffer(
                    &self.renderer.text.vertex_buf,
                    0,
                    bytes_of(&glyph.quad(cursor_x, y, scale)),
                );

                let mut encoder = self
                    .ctx
                    .device
                    .create_command_encoder(&CommandEncoderDescriptor::default());

                let mut pass = self.begin_pass(&mut encoder, self.has_rendered);

                pass.set_pipeline(&self.renderer.text.pipeline);
                pass.set_bind_group(0, &self.renderer.text.color_bind_group, &[]);
                pass.set_bind_group(1, bind_group, &[]);
                pass.set_vertex_buffer(0, self.renderer.text.vertex_buf.slice(..));
                pass.draw(0..6, 0..1);

                drop(pass);

                self.ctx.queue.submit([encoder.finish()]);
                self.has_rendered = true;
            }

            cursor_x += glyph.advance * scale;
        }
    }

    fn begin_pass<'e>(&self, encoder: &'e mut CommandEncoder, load: bool) -> RenderPass<'e> {
        let load_op = if load {
            LoadOp::Load
        } else {
            LoadOp::Clear(CLEAR_COLOR)
        };

        encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("renderer render pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: self.target,
                ops: Operations {
                    load: load_op,
                    store: StoreOp::Store,
                },
                depth_slice: None,
                resolve_target: None,
            })],
            timestamp_writes: None,
            occlusion_query_set: None,
            depth_stencil_attachment: None,
        })
    }
}
