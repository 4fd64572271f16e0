//! The rendering orchestrator. Owns the GPU context, the point pipeline and
//! the egui renderer used by the HUD.

pub mod context;
pub mod pipelines;
pub mod sprite;

use self::{
    context::GfxContext,
    pipelines::points::{PointUniforms, PointsPipeline, FOG_COLOR},
};
use crate::scene::SceneState;
use std::sync::Arc;
use wavefield::PointCloud;
use winit::window::Window;

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub points: PointsPipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, cloud: &PointCloud) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;

        let points = PointsPipeline::new(&gfx.device, &gfx.queue, gfx.config.format, cloud);

        let egui_renderer =
            egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        log::info!("Point pipeline ready: {} instances", cloud.len());

        Ok(Self {
            gfx,
            points,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
        }
    }

    /// Uploads what changed in `scene` and draws the cloud into `swap_view`.
    pub fn render(&mut self, swap_view: &wgpu::TextureView, scene: &mut SceneState) {
        if scene.take_dirty() {
            self.points
                .upload_positions(&self.gfx.queue, scene.cloud.positions());
        }
        self.points
            .write_uniforms(&self.gfx.queue, &PointUniforms::from_scene(scene));

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Points Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Clear to the fog colour.
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: FOG_COLOR[0] as f64,
                            g: FOG_COLOR[1] as f64,
                            b: FOG_COLOR[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.points.draw(&mut pass);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
