pub mod banded;
pub mod grayscale;
