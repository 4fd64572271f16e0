//! End-to-end frame runs without a window or GPU.

use backdrop_viewer::{
    frame_loop::{FrameLoop, FrameSink, SteppedClock},
    headless,
    input::InputController,
    scene::{SceneState, SPIN_PER_FRAME},
};
use std::convert::Infallible;

/// Checks every presented frame against the one before it.
struct FrameChecker {
    planar: Vec<(f32, f32)>,
    last_heights: Vec<f32>,
    frames: u64,
}

impl FrameChecker {
    fn new(scene: &SceneState) -> Self {
        let positions = scene.cloud.positions();
        Self {
            planar: positions.chunks_exact(3).map(|p| (p[0], p[2])).collect(),
            last_heights: positions.chunks_exact(3).map(|p| p[1]).collect(),
            frames: 0,
        }
    }
}

impl FrameSink for FrameChecker {
    type Error = Infallible;

    fn present(&mut self, scene: &mut SceneState) -> Result<(), Self::Error> {
        let positions = scene.cloud.positions();
        assert_eq!(positions.len(), 200 * 200 * 3);
        assert_eq!(scene.cloud.colors().len(), positions.len());

        let heights: Vec<f32> = positions.chunks_exact(3).map(|p| p[1]).collect();
        for (p, &(x, z)) in positions.chunks_exact(3).zip(&self.planar) {
            assert_eq!(p[0], x);
            assert_eq!(p[2], z);
            assert!(p[1].is_finite());
        }

        assert_ne!(heights, self.last_heights, "frame {} did not move", scene.frame());
        assert!(scene.take_dirty());

        self.last_heights = heights;
        self.frames += 1;
        Ok(())
    }
}

#[test]
fn thousand_frames_animate_heights_only() {
    let mut scene = SceneState::new(1280, 720);
    let colors = scene.cloud.colors().to_vec();
    let mut checker = FrameChecker::new(&scene);
    let mut frame_loop = FrameLoop::new(SteppedClock::new(0.0, 1.0 / 60.0));

    let frames = frame_loop
        .run(&mut scene, &mut checker, Some(1000))
        .unwrap_or_else(|never| match never {});

    assert_eq!(frames, 1000);
    assert_eq!(checker.frames, 1000);
    assert_eq!(scene.frame(), 1000);
    assert_eq!(scene.cloud.colors(), &colors[..]);
    assert!((scene.rotation.spin - 1000.0 * SPIN_PER_FRAME).abs() < 1e-9);
}

#[test]
fn input_between_frames_is_seen_by_next_tick() {
    let mut scene = SceneState::new(1000, 800);
    let mut input = InputController::new(800.0, 3.0);
    let mut frame_loop = FrameLoop::new(SteppedClock::new(100.0, 0.02));
    let token = frame_loop.token();

    assert!(frame_loop.tick(&mut scene));
    scene.on_pointer_move(900.0, 100.0); // goal (20, 15)
    input.handle_wheel(800.0, &mut scene); // half of a 1600 px page

    let before = scene.camera.position;
    assert!(frame_loop.tick(&mut scene));
    let after = scene.camera.position;

    assert_eq!(after.x, before.x + (20.0 - before.x) * 0.05);
    assert_eq!(after.y, before.y + (15.0 - before.y) * 0.05);
    assert_eq!(scene.rotation.tilt, std::f64::consts::PI);

    token.cancel();
    assert!(!frame_loop.tick(&mut scene));
    assert_eq!(scene.frame(), 2);
}

#[test]
fn headless_driver_reports_run() {
    let mut scene = SceneState::new(640, 480);
    let report = headless::drive(SteppedClock::new(0.0, 0.5), &mut scene, 20);

    assert_eq!(report.frames, 20);
    assert_eq!(report.uploads, 20);
    assert_eq!(report.points, 40_000);
    assert!(report.height_range.0.is_finite() && report.height_range.1.is_finite());
}
