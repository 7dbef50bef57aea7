use crate::core::animation::errors::{AnimationError, ensure_finite};
use crate::core::data::complex::Complex;
use crate::core::fractals::variant::DEFAULT_JULIA_C;

pub const DEFAULT_SPEED_RE: f64 = 0.005;
pub const DEFAULT_SPEED_IM: f64 = 0.003;
pub const DEFAULT_MIN: f64 = -1.0;
pub const DEFAULT_MAX: f64 = 1.0;

/// Moves the Julia constant in a straight line, bouncing off the walls of the
/// `[min, max]` square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedOscillation {
    c: Complex,
    speed_re: f64,
    speed_im: f64,
    min: f64,
    max: f64,
}

impl Default for BoundedOscillation {
    fn default() -> Self {
        Self {
            c: DEFAULT_JULIA_C,
            speed_re: DEFAULT_SPEED_RE,
            speed_im: DEFAULT_SPEED_IM,
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

impl BoundedOscillation {
    /// The starting point is clamped into the bounds.
    pub fn new(
        c: Complex,
        speed_re: f64,
        speed_im: f64,
        min: f64,
        max: f64,
    ) -> Result<Self, AnimationError> {
        ensure_finite("c_re", c.real)?;
        ensure_finite("c_im", c.imag)?;
        ensure_finite("speed_re", speed_re)?;
        ensure_finite("speed_im", speed_im)?;
        ensure_finite("min", min)?;
        ensure_finite("max", max)?;

        if min > max {
            return Err(AnimationError::InvertedBounds { min, max });
        }

        Ok(Self {
            c: Complex::new(c.real.clamp(min, max), c.imag.clamp(min, max)),
            speed_re,
            speed_im,
            min,
            max,
        })
    }

    #[must_use]
    pub fn c(&self) -> Complex {
        self.c
    }

    #[must_use]
    pub fn speed(&self) -> (f64, f64) {
        (self.speed_re, self.speed_im)
    }

    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Advances one step and returns the new constant.
    pub fn step(&mut self) -> Complex {
        let (real, speed_re) = bounce(self.c.real, self.speed_re, self.min, self.max);
        let (imag, speed_im) = bounce(self.c.imag, self.speed_im, self.min, self.max);

        self.c = Complex::new(real, imag);
        self.speed_re = speed_re;
        self.speed_im = speed_im;
        self.c
    }
}

/// One axis of the bounce: the overshoot past a wall is folded back inside
/// and the speed reverses.
fn bounce(value: f64, speed: f64, min: f64, max: f64) -> (f64, f64) {
    let next = value + speed;

    if next > max {
        ((max - (next - max)).clamp(min, max), -speed)
    } else if next < min {
        ((min + (min - next)).clamp(min, max), -speed)
    } else {
        (next, speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_animation_start() {
        let oscillation = BoundedOscillation::default();

        assert_eq!(oscillation.c(), Complex::new(-0.599, 0.99));
        assert_eq!(oscillation.speed(), (0.005, 0.003));
        assert_eq!(oscillation.bounds(), (-1.0, 1.0));
    }

    #[test]
    fn test_step_adds_speed_inside_bounds() {
        let mut oscillation = BoundedOscillation::default();

        let c = oscillation.step();

        assert!((c.real - -0.594).abs() < 1e-12);
        assert!((c.imag - 0.993).abs() < 1e-12);
    }

    #[test]
    fn test_crossing_reflects_and_flips_speed() {
        let mut oscillation =
            BoundedOscillation::new(Complex::new(0.98, 0.0), 0.05, 0.0, -1.0, 1.0).unwrap();

        let c = oscillation.step();

        assert!((c.real - 0.97).abs() < 1e-12);
        assert_eq!(oscillation.speed().0, -0.05);
    }

    #[test]
    fn test_values_stay_in_bounds_with_one_flip_per_crossing() {
        let mut oscillation = BoundedOscillation::default();
        let mut previous_speed = oscillation.speed();
        let mut flips = (0, 0);
        let mut crossings = (0, 0);

        for _ in 0..5000 {
            let before = oscillation.c();
            let c = oscillation.step();
            let speed = oscillation.speed();

            assert!((-1.0..=1.0).contains(&c.real), "re {}", c.real);
            assert!((-1.0..=1.0).contains(&c.imag), "im {}", c.imag);

            let wanted = before.real + previous_speed.0;
            if !(-1.0..=1.0).contains(&wanted) {
                crossings.0 += 1;
            }
            let wanted = before.imag + previous_speed.1;
            if !(-1.0..=1.0).contains(&wanted) {
                crossings.1 += 1;
            }
            if speed.0.signum() != previous_speed.0.signum() {
                flips.0 += 1;
            }
            if speed.1.signum() != previous_speed.1.signum() {
                flips.1 += 1;
            }

            previous_speed = speed;
        }

        assert!(crossings.0 > 0 && crossings.1 > 0);
        assert_eq!(flips, crossings);
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        assert_eq!(
            BoundedOscillation::new(Complex::ZERO, 0.1, 0.1, 1.0, -1.0),
            Err(AnimationError::InvertedBounds {
                min: 1.0,
                max: -1.0
            })
        );
    }

    #[test]
    fn test_new_rejects_non_finite_speed() {
        assert!(BoundedOscillation::new(Complex::ZERO, f64::NAN, 0.1, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_new_clamps_start_into_bounds() {
        let oscillation =
            BoundedOscillation::new(Complex::new(5.0, -5.0), 0.1, 0.1, -1.0, 1.0).unwrap();

        assert_eq!(oscillation.c(), Complex::new(1.0, -1.0));
    }

    #[test]
    fn test_degenerate_bounds_pin_the_value() {
        let mut oscillation =
            BoundedOscillation::new(Complex::ZERO, 0.1, 0.2, 0.0, 0.0).unwrap();

        assert_eq!(oscillation.step(), Complex::ZERO);
        assert_eq!(oscillation.step(), Complex::ZERO);
    }
}
