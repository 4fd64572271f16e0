use clap::Parser;
use thiserror::Error;

/// `backdrop_viewer` - an animated point-cloud backdrop.
///
/// Renders a 200 x 200 lattice of points rippling under a radial wave. The
/// camera drifts toward the pointer and the mouse wheel tilts the cloud as if
/// scrolling down a page.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Initial window width in logical pixels.
    #[arg(long, env = "BACKDROP_WIDTH", default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, env = "BACKDROP_HEIGHT", default_value_t = 720)]
    pub height: u32,

    /// Window title.
    #[arg(long, env = "BACKDROP_TITLE", default_value = "Point Cloud Backdrop")]
    pub title: String,

    /// Length of the virtual page the wheel scrolls over, in viewport heights.
    ///
    /// Scrolling from the top of the page to the bottom tilts the cloud one
    /// full turn. A value of 1 disables scrolling.
    #[arg(long, env = "BACKDROP_PAGE_HEIGHT", default_value_t = 4.0)]
    pub page_height: f64,

    /// Show the statistics overlay at start (F1 toggles it).
    #[arg(long, env = "BACKDROP_HUD")]
    pub hud: bool,

    /// Run the frame loop without opening a window.
    #[arg(long)]
    pub headless: bool,

    /// Number of frames to run in headless mode.
    #[arg(long, default_value_t = 1000)]
    pub frames: u64,

    /// Fixed animation-time increment per headless frame.
    ///
    /// When absent, headless runs read the wall clock like the windowed mode.
    #[arg(long)]
    pub time_step: Option<f64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window size must be non-zero, got {width}x{height}")]
    EmptyWindow { width: u32, height: u32 },

    #[error("page height must be at least 1 viewport, got {0}")]
    PageTooShort(f64),

    #[error("time step must be finite and non-negative, got {0}")]
    BadTimeStep(f64),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.width,
                height: self.height,
            });
        }

        // `!(x >= 1.0)` also rejects NaN.
        if !(self.page_height >= 1.0) {
            return Err(ConfigError::PageTooShort(self.page_height));
        }

        if let Some(step) = self.time_step {
            if !step.is_finite() || step < 0.0 {
                return Err(ConfigError::BadTimeStep(step));
            }
        }

        Ok(())
    }
}
