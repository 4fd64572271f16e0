//! Translates window events into scene input.

use crate::scene::SceneState;
use winit::event::{MouseScrollDelta, WindowEvent};

/// Pixels scrolled per wheel line.
pub const LINE_HEIGHT_PX: f64 = 100.0;

/// A virtual page the viewport scrolls over, standing in for a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageScroll {
    /// Page length as a multiple of the viewport height.
    page_factor: f64,
    viewport_height: f64,
    scroll_y: f64,
}

impl PageScroll {
    pub fn new(viewport_height: f64, page_factor: f64) -> Self {
        Self {
            page_factor,
            viewport_height,
            scroll_y: 0.0,
        }
    }

    /// Page length minus one viewport; zero when the page fits.
    pub fn scrollable(&self) -> f64 {
        (self.viewport_height * self.page_factor - self.viewport_height).max(0.0)
    }

    #[inline]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Scrolls by `dy` pixels (positive = down the page) and returns the new offset.
    pub fn scroll_by(&mut self, dy: f64) -> f64 {
        self.scroll_y = (self.scroll_y + dy).clamp(0.0, self.scrollable());
        self.scroll_y
    }

    /// Re-derives the page for a new viewport height, keeping the offset in range.
    pub fn resize(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
        self.scroll_y = self.scroll_y.clamp(0.0, self.scrollable());
    }
}

pub struct InputController {
    scroll: PageScroll,
}

impl InputController {
    pub fn new(viewport_height: f64, page_factor: f64) -> Self {
        Self {
            scroll: PageScroll::new(viewport_height, page_factor),
        }
    }

    pub fn scroll(&self) -> &PageScroll {
        &self.scroll
    }

    /// Handles pointer and wheel events in logical pixels. Resizes go through [`InputController::resize`].
    pub fn handle_event(&mut self, event: &WindowEvent, scene: &mut SceneState) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(scene.viewport().scale_factor);
                scene.on_pointer_move(logical.x, logical.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel-down reports a negative y; the page moves down.
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -(*y as f64) * LINE_HEIGHT_PX,
                    MouseScrollDelta::PixelDelta(pos) => {
                        -pos.to_logical::<f64>(scene.viewport().scale_factor).y
                    }
                };

                self.handle_wheel(dy, scene);
            }
            _ => {}
        }
    }

    /// Scrolls the page and notifies the scene when the offset actually moved.
    pub fn handle_wheel(&mut self, dy: f64, scene: &mut SceneState) {
        let before = self.scroll.scroll_y();
        let after = self.scroll.scroll_by(dy);
        if after != before {
            scene.on_scroll(after, self.scroll.scrollable());
        }
    }

    /// Page geometry follows the logical viewport height; the scroll handler is not re-fired.
    pub fn resize(&mut self, viewport_height: f64) {
        self.scroll.resize(viewport_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_4, TAU};
    use wavefield::GridSpec;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn page_scroll_clamps_to_page() {
        let mut page = PageScroll::new(600.0, 4.0);
        assert_eq!(page.scrollable(), 1800.0);
        assert_eq!(page.scroll_by(-50.0), 0.0);
        assert_eq!(page.scroll_by(700.0), 700.0);
        assert_eq!(page.scroll_by(5_000.0), 1800.0);

        page.resize(300.0);
        assert_eq!(page.scrollable(), 900.0);
        assert_eq!(page.scroll_y(), 900.0);
    }

    #[test]
    fn single_screen_page_cannot_scroll() {
        let mut page = PageScroll::new(600.0, 1.0);
        assert_eq!(page.scrollable(), 0.0);
        assert_eq!(page.scroll_by(100.0), 0.0);
    }

    #[test]
    fn wheel_drives_tilt() {
        let mut scene = SceneState::with_grid(GridSpec::new(4, 4, 2.0), 800, 600);
        let mut input = InputController::new(600.0, 4.0);

        input.handle_wheel(900.0, &mut scene);
        assert_eq!(input.scroll().scroll_y(), 900.0);
        assert_eq!(scene.rotation.tilt, 0.5 * TAU);

        input.handle_wheel(10_000.0, &mut scene);
        assert_eq!(input.scroll().scroll_y(), 1800.0);
        assert_eq!(scene.rotation.tilt, TAU);
    }

    #[test]
    fn cursor_events_are_converted_to_logical_pixels() {
        // 1280 x 720 logical window at 2x; cursor on the right edge, mid height.
        let mut scene = SceneState::with_viewport(
            GridSpec::new(4, 4, 2.0),
            crate::scene::Viewport::with_scale(2560, 1440, 2.0),
        );
        let mut input = InputController::new(scene.viewport().logical_height(), 4.0);

        let event = WindowEvent::CursorMoved {
            device_id: unsafe { winit::event::DeviceId::dummy() },
            position: PhysicalPosition::new(2560.0, 720.0),
        };
        input.handle_event(&event, &mut scene);

        assert_eq!(scene.pointer.x, (1280.0 / 2.0 * 0.05) as f32);
        assert_eq!(scene.pointer.y, 0.0);
    }

    #[test]
    fn pixel_wheel_deltas_are_logical() {
        let mut scene = SceneState::with_viewport(
            GridSpec::new(4, 4, 2.0),
            crate::scene::Viewport::with_scale(1600, 1200, 2.0),
        );
        let mut input = InputController::new(scene.viewport().logical_height(), 4.0);

        let event = WindowEvent::MouseWheel {
            device_id: unsafe { winit::event::DeviceId::dummy() },
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -1800.0)),
            phase: winit::event::TouchPhase::Moved,
        };
        input.handle_event(&event, &mut scene);

        assert_eq!(input.scroll().scroll_y(), 900.0);
        assert_eq!(scene.rotation.tilt, 0.5 * TAU);
    }

    #[test]
    fn wheel_at_top_does_not_fire() {
        let mut scene = SceneState::with_grid(GridSpec::new(4, 4, 2.0), 800, 600);
        let mut input = InputController::new(600.0, 4.0);

        input.handle_wheel(-300.0, &mut scene);
        assert_eq!(scene.rotation.tilt, FRAC_PI_4);
    }
}
