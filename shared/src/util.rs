use std::f64::consts::TAU;

/// Wraps an angle into `[0, 2π)`.
#[inline(always)]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Heading in radians pointing from `from` to `to`.
#[inline(always)]
pub fn heading_towards(from: (f64, f64), to: (f64, f64)) -> f64 {
    (to.1 - from.1).atan2(to.0 - from.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_wrap_angle_in_range() {
        let angles = [0.0, PI / 4.0, PI, 3.0 * PI / 2.0, 2.0 * PI, 10.0 * PI, -PI / 2.0];
        for &angle in &angles {
            let wrapped = wrap_angle(angle);
            assert!(
                (0.0..TAU).contains(&wrapped),
                "Wrapped angle out of range for input: {}",
                angle
            );
            assert!(
                (wrapped.sin() - angle.sin()).abs() < 1e-9,
                "Wrapping changed direction for input: {}",
                angle
            );
        }
    }

    #[test]
    fn test_wrap_angle_tiny_negative() {
        let wrapped = wrap_angle(-1e-18);
        assert!(wrapped < TAU);
    }

    #[test]
    fn test_heading_towards_axes() {
        assert!((heading_towards((0.0, 0.0), (1.0, 0.0)) - 0.0).abs() < 1e-12);
        assert!((heading_towards((0.0, 0.0), (0.0, 1.0)) - PI / 2.0).abs() < 1e-12);
        assert!((heading_towards((430.0, 300.0), (400.0, 300.0)) - PI).abs() < 1e-12);
    }
}
