//! Normalization Utilities
//!
//! Shared clamps and interpolations used by the feature mapper and the
//! scorers. Everything here is total: out-of-range input is clamped, never
//! rejected.

/// Clamp to the unit interval
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// `max(0, 1 - value / scale)`, the inverse-linear ramp used for drainage terms
#[inline]
pub fn inverse_ramp(value: f64, scale: f64) -> f64 {
    (1.0 - value / scale).max(0.0)
}

/// Piecewise linear interpolation through ascending breakpoints
///
/// Algorithm:
/// 1. Below the first breakpoint returns the first output, above the last
///    returns the last output
/// 2. Otherwise find bracketing points [x_i, x_i+1] where x_i <= value <= x_i+1
/// 3. Interpolate: y_i + fraction × (y_i+1 - y_i)
pub fn piecewise_linear(value: f64, points: &[(f64, f64)]) -> f64 {
    let Some(&(first_x, first_y)) = points.first() else {
        return 0.0;
    };
    let (last_x, last_y) = points[points.len() - 1];

    if value <= first_x {
        return first_y;
    }
    if value >= last_x {
        return last_y;
    }

    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x0 <= value && value <= x1 {
            let fraction = if x1 - x0 > 0.0 {
                (value - x0) / (x1 - x0)
            } else {
                0.0
            };
            return y0 + fraction * (y1 - y0);
        }
    }

    last_y
}

/// Round to two decimals for presentation
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Probability in [0,1] to a presentation percentage in [0,100]
pub fn to_percent(probability: f64) -> f64 {
    round2(clamp_unit(probability) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_piecewise_linear_edges() {
        let points = [(0.0, 0.0), (150.0, 0.15), (300.0, 1.0)];

        assert_relative_eq!(piecewise_linear(-20.0, &points), 0.0, epsilon = 1e-12);
        assert_relative_eq!(piecewise_linear(450.0, &points), 1.0, epsilon = 1e-12);
        assert_relative_eq!(piecewise_linear(75.0, &points), 0.075, epsilon = 1e-12);
        assert_relative_eq!(piecewise_linear(150.0, &points), 0.15, epsilon = 1e-12);
        assert_relative_eq!(piecewise_linear(225.0, &points), 0.575, epsilon = 1e-12);
    }

    #[test]
    fn test_piecewise_linear_empty() {
        assert_eq!(piecewise_linear(10.0, &[]), 0.0);
    }

    #[test]
    fn test_inverse_ramp() {
        assert_relative_eq!(inverse_ramp(0.0, 120.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(inverse_ramp(60.0, 120.0), 0.5, epsilon = 1e-12);
        assert_eq!(inverse_ramp(200.0, 120.0), 0.0);
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(0.602_929), 60.29);
        assert_eq!(to_percent(1.7), 100.0);
        assert_eq!(to_percent(-0.2), 0.0);
    }
}
