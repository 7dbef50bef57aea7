use crate::core::data::colour::Colour;
use std::error::Error;

/// Turns an algorithm's per-pixel value into an RGB colour.
pub trait ColourMap<T> {
    type Failure: Error;

    fn map(&self, value: T) -> Result<Colour, Self::Failure>;

    /// Human-readable name for logs and selection lists.
    fn display_name(&self) -> &str;
}
