//! Sinusoidal driver for every periodic motion (bob, limb swing)

use std::f64::consts::TAU;

/// Value of a sinusoid swinging between `min` and `max` at `time` seconds
///
/// `frequency` is in cycles per second and `phase_degrees` shifts the wave.
/// Pure: identical arguments always give the identical value.
#[inline]
pub fn oscillate(frequency: f64, min: f64, max: f64, phase_degrees: f64, time: f64) -> f64 {
    let amplitude = 0.5 * (max - min);
    let midpoint = 0.5 * (max + min);
    midpoint + amplitude * (TAU * frequency * time + phase_degrees.to_radians()).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_at_zero_phase() {
        assert!((oscillate(2.0, 0.0, 20.0, 0.0, 0.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_period_hits_max() {
        // 1 Hz: a quarter second is a quarter cycle
        assert!((oscillate(1.0, -70.0, 50.0, 0.0, 0.25) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_180_mirrors() {
        let a = oscillate(2.0, -20.0, 80.0, 0.0, 0.1);
        let b = oscillate(2.0, -20.0, 80.0, 180.0, 0.1);
        assert!((a + b - 60.0).abs() < 1e-9);
    }
}
