//! Height field: radial ripple plus a modulated sine wave.
//!
//! Two separate variants: the initial one runs once when the cloud is built
//! and samples the wave on grid indices; the animated one runs every frame and
//! samples it on world coordinates.

use crate::grid::Cell;

/// Peak height of the radial term.
pub const AMPLITUDE: f64 = 40.0;
/// Planar distance to ripple-argument scale.
pub const RADIAL_SCALE: f64 = 0.15;
/// Added to the animated denominator so it never reaches zero.
pub const DENOM_EPSILON: f64 = 0.0001;
pub const WAVE_FREQUENCY: f64 = 0.1;
pub const WAVE_AMPLITUDE: f64 = 8.0;

/// Height of `cell` at creation time (time = 0).
#[inline]
pub fn initial_height(cell: &Cell) -> f64 {
    let r = (cell.x * cell.x + cell.z * cell.z).sqrt() * RADIAL_SCALE;
    let radial = if r == 0.0 {
        AMPLITUDE
    } else {
        (r.sin() / r) * AMPLITUDE
    };

    let wave = (cell.i as f64 * WAVE_FREQUENCY).sin()
        * (cell.j as f64 * WAVE_FREQUENCY).cos()
        * WAVE_AMPLITUDE;

    radial + wave
}

/// Height at world position `(x, z)` for animation time `time`.
///
/// `time` is folded into the ripple argument and then subtracted again in the
/// denominator. The expression is evaluated literally, so the result carries
/// whatever rounding `(base + time) - time` produces.
#[inline]
pub fn animated_height(x: f64, z: f64, time: f64) -> f64 {
    let base = (x * x + z * z).sqrt() * RADIAL_SCALE;
    let r = base + time;
    let radial = if base == 0.0 {
        AMPLITUDE
    } else {
        (r.sin() / (r - time + DENOM_EPSILON)) * AMPLITUDE
    };

    let wave = ((x + time) * WAVE_FREQUENCY).sin()
        * ((z + time) * WAVE_FREQUENCY).cos()
        * WAVE_AMPLITUDE;

    radial + wave
}
