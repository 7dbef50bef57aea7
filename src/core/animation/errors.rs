use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AnimationError {
    #[error("oscillation bounds are inverted: min {min} > max {max}")]
    InvertedBounds { min: f64, max: f64 },
    #[error("animation value {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("animation cadence must be positive")]
    ZeroCadence,
}

pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64, AnimationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnimationError::NonFinite { name, value })
    }
}
