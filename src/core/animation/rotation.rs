use crate::core::animation::errors::{AnimationError, ensure_finite};
use crate::core::data::complex::Complex;
use std::f64::consts::TAU;

pub const DEFAULT_RADIUS: f64 = 0.7885;
pub const DEFAULT_ANGULAR_SPEED: f64 = 0.01;

/// Walks the Julia constant around a circle centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    angle: f64,
    radius: f64,
    angular_speed: f64,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            angle: 0.0,
            radius: DEFAULT_RADIUS,
            angular_speed: DEFAULT_ANGULAR_SPEED,
        }
    }
}

impl Rotation {
    pub fn new(angle: f64, radius: f64, angular_speed: f64) -> Result<Self, AnimationError> {
        Ok(Self {
            angle: wrap_angle(ensure_finite("angle", angle)?),
            radius: ensure_finite("radius", radius)?,
            angular_speed: ensure_finite("angular_speed", angular_speed)?,
        })
    }

    /// Always in `[0, 2π)`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    #[must_use]
    pub fn c(&self) -> Complex {
        Complex::from_polar(self.radius, self.angle)
    }

    /// Advances one step and returns the new constant.
    pub fn step(&mut self) -> Complex {
        self.angle = wrap_angle(self.angle + self.angular_speed);
        self.c()
    }
}

fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);

    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
