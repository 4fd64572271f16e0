//! Owned state of the animated backdrop.
//!
//! Everything one frame needs lives in [`SceneState`]: the point buffers, the
//! camera, both rotation angles, the last pointer offset and the viewport. The
//! frame tick and the input handlers take it by `&mut`, so there is no hidden
//! shared state and no locking.

use crate::camera::Camera;
use glam::{Mat4, Vec3};
use std::f64::consts::{FRAC_PI_4, TAU};
use wavefield::{GridSpec, PointCloud};

/// Spin added about the vertical axis every frame, radians.
pub const SPIN_PER_FRAME: f64 = 0.001;
/// Tilt about X before any scroll input, radians.
pub const START_TILT: f64 = FRAC_PI_4;
/// Pixel offset from the viewport centre to camera goal units.
pub const POINTER_SCALE: f64 = 0.05;

/// Drawable area. `width`/`height` are physical pixels; the cached centre is in
/// logical pixels, the unit pointer positions arrive in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub scale_factor: f64,
    pub half_width: f64,
    pub half_height: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_scale(width, height, 1.0)
    }

    pub fn with_scale(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            width,
            height,
            scale_factor,
            half_width: width as f64 / scale_factor / 2.0,
            half_height: height as f64 / scale_factor / 2.0,
        }
    }

    /// Height in logical pixels.
    #[inline]
    pub fn logical_height(&self) -> f64 {
        self.height as f64 / self.scale_factor
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Orientation of the cloud. The two angles are driven independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// About Y; advanced every frame.
    pub spin: f64,
    /// About X; overwritten from the scroll position.
    pub tilt: f64,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            spin: 0.0,
            tilt: START_TILT,
        }
    }
}

impl Rotation {
    /// Model matrix in XYZ Euler order.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.tilt as f32) * Mat4::from_rotation_y(self.spin as f32)
    }
}

/// Last pointer offset from the viewport centre, already scaled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

pub struct SceneState {
    pub cloud: PointCloud,
    pub camera: Camera,
    pub rotation: Rotation,
    pub pointer: Pointer,
    viewport: Viewport,
    positions_dirty: bool,
    frame: u64,
    time: f64,
}

impl SceneState {
    /// Builds the default 200 x 200 lattice for a `width` x `height` viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_grid(GridSpec::default(), width, height)
    }

    pub fn with_grid(grid: GridSpec, width: u32, height: u32) -> Self {
        Self::with_viewport(grid, Viewport::new(width, height))
    }

    pub fn with_viewport(grid: GridSpec, viewport: Viewport) -> Self {
        let (width, height) = (viewport.width, viewport.height);
        let cloud = PointCloud::new(grid);

        log::debug!(
            "Scene created: {} points ({}x{} lattice), viewport {}x{}",
            cloud.len(),
            grid.width,
            grid.depth,
            width,
            height
        );

        Self {
            cloud,
            camera: Camera::new(viewport.aspect()),
            rotation: Rotation::default(),
            pointer: Pointer::default(),
            viewport,
            // The creation-time heights still need their first upload.
            positions_dirty: true,
            frame: 0,
            time: 0.0,
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of ticks run so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Animation time of the last tick.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Model transform of the cloud.
    #[inline]
    pub fn model(&self) -> Mat4 {
        self.rotation.matrix()
    }

    /// Records the pointer at logical window position `(x, y)` relative to the
    /// current centre.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Pointer {
            x: ((x - self.viewport.half_width) * POINTER_SCALE) as f32,
            y: ((y - self.viewport.half_height) * POINTER_SCALE) as f32,
        };
    }

    /// Adopts a new viewport size. Zero-sized (minimised) windows are ignored.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport::with_scale(width, height, self.viewport.scale_factor);
        self.camera.set_aspect(self.viewport.aspect());
    }

    /// Moving to a display with another DPI changes the logical centre only.
    pub fn on_scale_factor(&mut self, scale_factor: f64) {
        let Viewport { width, height, .. } = self.viewport;
        self.viewport = Viewport::with_scale(width, height, scale_factor);
    }

    /// Sets the tilt from a page scroll of `scroll_y` out of `scrollable` pixels.
    pub fn on_scroll(&mut self, scroll_y: f64, scrollable: f64) {
        let fraction = if scrollable > 0.0 {
            scroll_y / scrollable
        } else {
            0.0
        };
        self.rotation.tilt = fraction * TAU;
    }

    /// Advances one frame at animation time `time`.
    pub fn tick(&mut self, time: f64) {
        self.rotation.spin += SPIN_PER_FRAME;

        self.camera.follow(self.pointer.x, -self.pointer.y);
        self.camera.look_at(Vec3::ZERO);

        self.cloud.animate(time);
        self.positions_dirty = true;

        self.time = time;
        self.frame += 1;
    }

    /// Returns whether positions changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.positions_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scene() -> SceneState {
        SceneState::with_grid(GridSpec::new(16, 16, 2.0), 800, 600)
    }

    #[test]
    fn starts_tilted_and_still() {
        let scene = small_scene();
        assert_eq!(scene.rotation.spin, 0.0);
        assert_eq!(scene.rotation.tilt, FRAC_PI_4);
        assert_eq!(scene.frame(), 0);
        assert_eq!(scene.camera.target, crate::camera::START_TARGET);
    }

    #[test]
    fn pointer_offset_is_scaled_from_centre() {
        let mut scene = small_scene();
        scene.on_pointer_move(500.0, 100.0);
        assert_eq!(scene.pointer.x, ((500.0 - 400.0) * 0.05) as f32);
        assert_eq!(scene.pointer.y, ((100.0 - 300.0) * 0.05) as f32);
    }

    #[test]
    fn pointer_after_resize_uses_new_centre() {
        let mut scene = small_scene();
        scene.on_resize(1920, 1080);
        scene.on_pointer_move(960.0, 540.0);
        assert_eq!(scene.pointer, Pointer { x: 0.0, y: 0.0 });

        scene.on_pointer_move(1000.0, 500.0);
        assert_eq!(scene.pointer.x, 2.0);
        assert_eq!(scene.pointer.y, -2.0);
        assert_eq!(scene.camera.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn pointer_on_hidpi_uses_logical_pixels() {
        // 1280 x 720 logical window at 2x.
        let mut scene =
            SceneState::with_viewport(GridSpec::new(4, 4, 2.0), Viewport::with_scale(2560, 1440, 2.0));
        assert_eq!(scene.viewport().half_width, 640.0);
        assert_eq!(scene.viewport().logical_height(), 720.0);

        scene.on_pointer_move(1280.0, 360.0);
        assert_eq!(scene.pointer, Pointer { x: 32.0, y: 0.0 });

        scene.on_resize(1920, 1080);
        scene.on_pointer_move(960.0, 0.0);
        assert_eq!(scene.pointer, Pointer { x: 24.0, y: -13.5 });

        scene.on_scale_factor(1.0);
        scene.on_pointer_move(1920.0, 540.0);
        assert_eq!(scene.pointer, Pointer { x: 48.0, y: 0.0 });
    }

    #[test]
    fn zero_resize_is_ignored() {
        let mut scene = small_scene();
        scene.on_resize(0, 720);
        assert_eq!(scene.viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn scroll_overwrites_tilt() {
        let mut scene = small_scene();
        for fraction in [0.0, 0.25, 0.5, 0.9, 1.0] {
            scene.on_scroll(fraction * 2400.0, 2400.0);
            assert_eq!(scene.rotation.tilt, fraction * TAU);
            assert!((0.0..=TAU).contains(&scene.rotation.tilt));
        }
        scene.on_scroll(600.0, 2400.0);
        scene.on_scroll(600.0, 2400.0);
        assert_eq!(scene.rotation.tilt, 0.25 * TAU);
    }

    #[test]
    fn scroll_without_scrollable_page_is_flat() {
        let mut scene = small_scene();
        scene.on_scroll(0.0, 0.0);
        assert_eq!(scene.rotation.tilt, 0.0);
    }

    #[test]
    fn tick_spins_and_follows_pointer() {
        let mut scene = small_scene();
        scene.on_scroll(1200.0, 2400.0);
        scene.on_pointer_move(600.0, 500.0);
        let tilt = scene.rotation.tilt;

        scene.tick(1.0);
        scene.tick(1.1);

        assert!((scene.rotation.spin - 2.0 * SPIN_PER_FRAME).abs() < 1e-15);
        assert_eq!(scene.rotation.tilt, tilt);
        assert_eq!(scene.camera.target, Vec3::ZERO);
        // Goal is (10, -10): x moves down from 40, y moves down from 60.
        assert!(scene.camera.position.x < 40.0 && scene.camera.position.x > 10.0);
        assert!(scene.camera.position.y < 60.0 && scene.camera.position.y > -10.0);
        assert_eq!(scene.frame(), 2);
        assert_eq!(scene.time(), 1.1);
    }

    #[test]
    fn dirty_flag_is_consumed() {
        let mut scene = small_scene();
        assert!(scene.take_dirty());
        assert!(!scene.take_dirty());
        scene.tick(0.5);
        assert!(scene.take_dirty());
        assert!(!scene.take_dirty());
    }
}
