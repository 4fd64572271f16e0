//! Frame scheduling.
//!
//! The window's redraw cycle (or a headless driver) calls [`FrameLoop::tick`]
//! once per display frame. A [`CancelToken`] stops the loop deterministically;
//! after cancellation `tick` refuses to advance the scene.

use crate::scene::SceneState;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds to animation-time units.
pub const TIME_SCALE: f64 = 0.0005;

/// Source of the animation time scalar for each frame.
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Whole Unix-epoch milliseconds scaled by [`TIME_SCALE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl WallClock {
    /// Sub-millisecond parts of `since_epoch` are dropped.
    #[inline]
    pub fn scale(since_epoch: Duration) -> f64 {
        since_epoch.as_millis() as f64 * TIME_SCALE
    }
}

impl Clock for WallClock {
    fn now(&mut self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(Self::scale)
            .unwrap_or(0.0)
    }
}

/// Fixed increments from a start time, for reproducible runs.
#[derive(Debug, Clone, Copy)]
pub struct SteppedClock {
    next: f64,
    step: f64,
}

impl SteppedClock {
    pub fn new(start: f64, step: f64) -> Self {
        Self { next: start, step }
    }
}

impl Clock for SteppedClock {
    fn now(&mut self) -> f64 {
        let t = self.next;
        self.next += self.step;
        t
    }
}

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Consumes a frame after the scene has advanced (GPU upload + draw, or a stand-in).
pub trait FrameSink {
    type Error;

    fn present(&mut self, scene: &mut SceneState) -> Result<(), Self::Error>;
}

pub struct FrameLoop<C> {
    clock: C,
    token: CancelToken,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            token: CancelToken::new(),
        }
    }

    /// Handle that stops this loop.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Advances the scene one frame. Returns `false` once cancelled.
    pub fn tick(&mut self, scene: &mut SceneState) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        let time = self.clock.now();
        scene.tick(time);
        true
    }

    /// Ticks and presents until cancelled or `max_frames` frames have run.
    /// Returns the number of frames presented.
    pub fn run<S: FrameSink>(
        &mut self,
        scene: &mut SceneState,
        sink: &mut S,
        max_frames: Option<u64>,
    ) -> Result<u64, S::Error> {
        let mut frames = 0u64;
        while max_frames.map_or(true, |max| frames < max) && self.tick(scene) {
            sink.present(scene)?;
            frames += 1;
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavefield::GridSpec;

    struct CancelAfter {
        token: CancelToken,
        after: u64,
        seen: u64,
    }

    impl FrameSink for CancelAfter {
        type Error = std::convert::Infallible;

        fn present(&mut self, _scene: &mut SceneState) -> Result<(), Self::Error> {
            self.seen += 1;
            if self.seen == self.after {
                self.token.cancel();
            }
            Ok(())
        }
    }

    struct Failing;

    impl FrameSink for Failing {
        type Error = &'static str;

        fn present(&mut self, scene: &mut SceneState) -> Result<(), Self::Error> {
            if scene.frame() == 3 {
                Err("surface lost")
            } else {
                Ok(())
            }
        }
    }

    fn scene() -> SceneState {
        SceneState::with_grid(GridSpec::new(8, 8, 2.0), 640, 480)
    }

    #[test]
    fn stepped_clock_advances_by_step() {
        let mut clock = SteppedClock::new(2.0, 0.5);
        assert_eq!(clock.now(), 2.0);
        assert_eq!(clock.now(), 2.5);
        assert_eq!(clock.now(), 3.0);
    }

    #[test]
    fn wall_clock_is_scaled_epoch_millis() {
        let t = WallClock.now();
        // Any date after 2020 is well past 1.5e12 ms.
        assert!(t > 1.5e12 * TIME_SCALE);
    }

    #[test]
    fn wall_clock_truncates_to_whole_millis() {
        let d = Duration::from_micros(1_700_000_000_123_999);
        assert_eq!(WallClock::scale(d), 1_700_000_000_123.0 * TIME_SCALE);
        assert_eq!(WallClock::scale(Duration::from_micros(999)), 0.0);
    }

    #[test]
    fn cancel_stops_the_loop() {
        let mut frame_loop = FrameLoop::new(SteppedClock::new(0.0, 0.1));
        let mut sink = CancelAfter {
            token: frame_loop.token(),
            after: 5,
            seen: 0,
        };
        let mut scene = scene();

        let frames = frame_loop.run(&mut scene, &mut sink, None);
        assert_eq!(frames, Ok(5));
        assert_eq!(scene.frame(), 5);
        assert!(!frame_loop.tick(&mut scene));
        assert_eq!(scene.frame(), 5);
    }

    #[test]
    fn max_frames_bounds_the_run() {
        let mut frame_loop = FrameLoop::new(SteppedClock::new(0.0, 0.1));
        let mut sink = CancelAfter {
            token: CancelToken::new(),
            after: u64::MAX,
            seen: 0,
        };
        let mut scene = scene();

        assert_eq!(frame_loop.run(&mut scene, &mut sink, Some(12)), Ok(12));
        assert!((scene.time() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn sink_errors_propagate() {
        let mut frame_loop = FrameLoop::new(SteppedClock::new(0.0, 1.0));
        let mut scene = scene();
        assert_eq!(frame_loop.run(&mut scene, &mut Failing, Some(10)), Err("surface lost"));
        assert_eq!(scene.frame(), 3);
    }
}
