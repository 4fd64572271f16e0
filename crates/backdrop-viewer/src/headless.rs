//! Windowless driver: runs the frame loop with a sink that only counts uploads.

use crate::{
    config::Config,
    frame_loop::{Clock, FrameLoop, FrameSink, SteppedClock, WallClock},
    scene::SceneState,
};
use std::convert::Infallible;

/// Frames between debug log lines.
const LOG_EVERY: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub frames: u64,
    /// Frames whose positions would have been uploaded.
    pub uploads: u64,
    pub points: usize,
    /// Lowest and highest height after the last frame.
    pub height_range: (f32, f32),
}

/// Stands in for the GPU: consumes the dirty flag the way an upload would.
#[derive(Debug, Default)]
pub struct UploadCounter {
    pub uploads: u64,
}

impl FrameSink for UploadCounter {
    type Error = Infallible;

    fn present(&mut self, scene: &mut SceneState) -> Result<(), Self::Error> {
        if scene.take_dirty() {
            self.uploads += 1;
        }

        if scene.frame() % LOG_EVERY == 0 {
            let (lo, hi) = scene.cloud.height_range();
            log::debug!(
                "frame {} t={:.4} spin={:.3} heights=[{:.2}, {:.2}]",
                scene.frame(),
                scene.time(),
                scene.rotation.spin,
                lo,
                hi
            );
        }
        Ok(())
    }
}

/// Runs `frames` ticks on `scene` with `clock`.
pub fn drive<C: Clock>(clock: C, scene: &mut SceneState, frames: u64) -> HeadlessReport {
    let mut frame_loop = FrameLoop::new(clock);
    let mut sink = UploadCounter::default();

    let frames = frame_loop
        .run(scene, &mut sink, Some(frames))
        .unwrap_or_else(|never| match never {});

    HeadlessReport {
        frames,
        uploads: sink.uploads,
        points: scene.cloud.len(),
        height_range: scene.cloud.height_range(),
    }
}

/// Builds a scene at the configured window size and runs the configured frame count.
pub fn run(config: &Config) -> HeadlessReport {
    let mut scene = SceneState::new(config.width, config.height);

    match config.time_step {
        Some(step) => {
            log::info!("Headless: {} frames, fixed step {}", config.frames, step);
            drive(SteppedClock::new(0.0, step), &mut scene, config.frames)
        }
        None => {
            log::info!("Headless: {} frames, wall clock", config.frames);
            drive(WallClock, &mut scene, config.frames)
        }
    }
}
