/// Share of brightness lost between the centre and the lattice diagonal.
pub const FALLOFF: f64 = 0.7;

/// Grayscale level for a point at planar `(x, z)` on a lattice `width` wide.
///
/// 1.0 at the origin, falling linearly with distance; stays above 0.3 for
/// every point of a centred lattice.
#[inline]
pub fn grayscale(x: f64, z: f64, width: usize) -> f64 {
    let dist = (x * x + z * z).sqrt();
    let max_dist = std::f64::consts::SQRT_2 * width as f64;
    1.0 - (dist / max_dist) * FALLOFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_is_white_and_corner_stays_positive() {
        assert_eq!(grayscale(0.0, 0.0, 200), 1.0);
        let corner = grayscale(-200.0, -200.0, 200);
        assert!((corner - 0.3).abs() < 1e-12);
    }
}
