use crate::{
    config::Config,
    frame_loop::{CancelToken, FrameLoop, WallClock},
    input::InputController,
    renderer::Renderer,
    scene::{SceneState, Viewport},
    ui::{self, FpsMeter},
};
use anyhow::Result;
use std::{sync::Arc, time::Instant};
use wavefield::GridSpec;
use winit::{event::WindowEvent, window::Window};

pub struct App {
    pub renderer: Renderer,
    pub scene: SceneState,
    pub input: InputController,
    pub frame_loop: FrameLoop<WallClock>,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub show_hud: bool,
    fps: FpsMeter,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let size = window.inner_size();
        let viewport = Viewport::with_scale(
            size.width.max(1),
            size.height.max(1),
            window.scale_factor(),
        );
        let scene = SceneState::with_viewport(GridSpec::default(), viewport);
        let renderer = Renderer::new(window.clone(), &scene.cloud).await?;
        let input = InputController::new(viewport.logical_height(), config.page_height);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            renderer,
            scene,
            input,
            frame_loop: FrameLoop::new(WallClock),
            egui_ctx,
            egui_state,
            show_hud: config.hud,
            fps: FpsMeter::new(Instant::now()),
        })
    }

    /// Stops the frame loop; the event loop exits on its next pass.
    pub fn cancel_token(&self) -> CancelToken {
        self.frame_loop.token()
    }

    pub fn toggle_hud(&mut self) {
        self.show_hud = !self.show_hud;
        log::debug!("HUD {}", if self.show_hud { "shown" } else { "hidden" });
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.scene.on_resize(new_size.width, new_size.height);
            self.input.resize(self.scene.viewport().logical_height());
        }
    }

    /// Returns `true` when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        if self.show_hud {
            let response = self.egui_state.on_window_event(window, event);
            if response.consumed {
                return true;
            }
        }

        self.input.handle_event(event, &mut self.scene);

        match event {
            WindowEvent::Resized(physical_size) => self.resize(*physical_size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scene.on_scale_factor(*scale_factor);
                self.input.resize(self.scene.viewport().logical_height());
            }
            _ => {}
        }

        false
    }

    /// Advances the scene one frame. Returns `false` once the loop is cancelled.
    pub fn advance(&mut self) -> bool {
        self.frame_loop.tick(&mut self.scene)
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(&swap_view, &mut self.scene);
        let fps = self.fps.record(Instant::now());

        if self.show_hud {
            self.render_hud(window, &swap_view, fps);
        }

        frame.present();

        Ok(())
    }

    fn render_hud(&mut self, window: &Window, swap_view: &wgpu::TextureView, fps: f32) {
        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        ui::draw_hud(&self.egui_ctx, &self.scene, fps);

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("HUD Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
    }
}
