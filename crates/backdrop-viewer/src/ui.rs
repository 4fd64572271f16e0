//! Statistics overlay drawn with egui.

use crate::scene::SceneState;
use std::time::{Duration, Instant};

/// How long frames are counted before the rate is refreshed.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Frames-per-second averaged over [`FPS_WINDOW`].
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsMeter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Counts one frame presented at `now`; returns the current rate.
    pub fn record(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= FPS_WINDOW {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

pub fn draw_hud(ctx: &egui::Context, scene: &SceneState, fps: f32) {
    let cam = scene.camera.position;
    let lines = [
        format!("frame   {}", scene.frame()),
        format!("fps     {:.1}", fps),
        format!("points  {}", scene.cloud.len()),
        format!("camera  ({:.1}, {:.1}, {:.1})", cam.x, cam.y, cam.z),
        format!("spin    {:.3} rad", scene.rotation.spin),
        format!("tilt    {:.3} rad", scene.rotation.tilt),
    ];

    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_black_alpha(160))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    for line in &lines {
                        ui.label(
                            egui::RichText::new(line)
                                .monospace()
                                .color(egui::Color32::LIGHT_GRAY),
                        );
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_refreshes_after_window() {
        let start = Instant::now();
        let mut meter = FpsMeter::new(start);

        for n in 1..30 {
            meter.record(start + Duration::from_millis(n * 16));
        }
        assert_eq!(meter.fps(), 0.0);

        let rate = meter.record(start + Duration::from_millis(500));
        assert!((rate - 60.0).abs() < 0.01);
    }
}
