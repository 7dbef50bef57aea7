use crate::core::data::point::Point;
use std::error::Error;

/// Computes the raw per-pixel value (an iteration count for escape-time
/// fractals) that a colour map turns into a colour.
pub trait FractalAlgorithm {
    type Success;
    type Failure: Error;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure>;
}
