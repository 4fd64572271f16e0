//! Soft circular point sprite, rasterised on the CPU at startup.

/// Edge length of the sprite texture in pixels.
pub const SPRITE_SIZE: u32 = 64;

/// Radial alpha stops `(offset, alpha)`; linear in between, 0 past the edge.
const ALPHA_STOPS: [(f64, f64); 3] = [(0.0, 1.0), (0.5, 0.8), (1.0, 0.0)];

/// Square RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub size: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Bytes per row of `rgba`.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.size * 4
    }

    /// Alpha byte of pixel `(x, y)`.
    #[inline]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.rgba[((y * self.size + x) * 4 + 3) as usize]
    }
}

fn gradient_alpha(t: f64) -> f64 {
    if t <= 0.0 {
        return ALPHA_STOPS[0].1;
    }
    for pair in ALPHA_STOPS.windows(2) {
        let (t0, a0) = pair[0];
        let (t1, a1) = pair[1];
        if t <= t1 {
            let k = (t - t0) / (t1 - t0);
            return a0 + (a1 - a0) * k;
        }
    }
    0.0
}

/// White disc of side `size` whose alpha fades from the centre to the rim.
pub fn soft_disc(size: u32) -> SpriteImage {
    let half = size as f64 / 2.0;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    for py in 0..size {
        for px in 0..size {
            // Sample at pixel centres.
            let dx = px as f64 + 0.5 - half;
            let dy = py as f64 + 0.5 - half;
            let t = if half > 0.0 {
                (dx * dx + dy * dy).sqrt() / half
            } else {
                1.0
            };
            let alpha = (gradient_alpha(t).clamp(0.0, 1.0) * 255.0).round() as u8;
            rgba.extend_from_slice(&[255, 255, 255, alpha]);
        }
    }

    SpriteImage { size, rgba }
}
