use crate::core::data::complex::Complex;
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;
use crate::core::fractals::variant::FractalVariant;
use crate::core::viewport::pixel_mapping::PixelMapping;
use thiserror::Error;

pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FractalParamsError {
    #[error("maximum iterations must be greater than zero")]
    ZeroMaxIterations,
}

/// Everything a worker needs to colour a pixel besides the view.
///
/// Tasks receive a copy, so later edits never reach work in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParams {
    variant: FractalVariant,
    max_iterations: u32,
    colour_map: ColourMapKinds,
    pixel_mapping: PixelMapping,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self::for_variant(FractalVariant::default(), DEFAULT_MAX_ITERATIONS)
    }
}

impl FractalParams {
    pub fn new(variant: FractalVariant, max_iterations: u32) -> Result<Self, FractalParamsError> {
        if max_iterations == 0 {
            return Err(FractalParamsError::ZeroMaxIterations);
        }

        Ok(Self::for_variant(variant, max_iterations))
    }

    fn for_variant(variant: FractalVariant, max_iterations: u32) -> Self {
        Self {
            variant,
            max_iterations,
            colour_map: variant.default_colour_map(),
            pixel_mapping: variant.default_pixel_mapping(),
        }
    }

    #[must_use]
    pub fn variant(&self) -> FractalVariant {
        self.variant
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn colour_map(&self) -> ColourMapKinds {
        self.colour_map
    }

    #[must_use]
    pub fn pixel_mapping(&self) -> PixelMapping {
        self.pixel_mapping
    }

    /// Switches family and resets the colour map and pixel mapping to the
    /// family's defaults.
    pub fn set_variant(&mut self, variant: FractalVariant) {
        self.variant = variant;
        self.colour_map = variant.default_colour_map();
        self.pixel_mapping = variant.default_pixel_mapping();
    }

    /// Updates the Julia constant. Returns `false` for Mandelbrot.
    pub fn set_julia_c(&mut self, c: Complex) -> bool {
        match &mut self.variant {
            FractalVariant::Julia { c: current } => {
                *current = c;
                true
            }
            FractalVariant::Mandelbrot => false,
        }
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) -> Result<(), FractalParamsError> {
        if max_iterations == 0 {
            return Err(FractalParamsError::ZeroMaxIterations);
        }

        self.max_iterations = max_iterations;
        Ok(())
    }

    pub fn set_colour_map(&mut self, colour_map: ColourMapKinds) {
        self.colour_map = colour_map;
    }

    pub fn set_pixel_mapping(&mut self, pixel_mapping: PixelMapping) {
        self.pixel_mapping = pixel_mapping;
    }
}

/// Clamps a requested iteration cap into `1..=u32::MAX`.
#[must_use]
pub fn clamp_max_iterations(requested: i64) -> u32 {
    u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fractals::variant::DEFAULT_JULIA_C;

    #[test]
    fn test_max_iterations_must_be_greater_than_zero() {
        assert_eq!(
            FractalParams::new(FractalVariant::Mandelbrot, 0),
            Err(FractalParamsError::ZeroMaxIterations)
        );
    }

    #[test]
    fn test_new_takes_variant_defaults() {
        let params = FractalParams::new(FractalVariant::Mandelbrot, 300).unwrap();

        assert_eq!(params.max_iterations(), 300);
        assert_eq!(params.colour_map(), ColourMapKinds::Grayscale);
        assert_eq!(params.pixel_mapping(), PixelMapping::Standard);
    }

    #[test]
    fn test_set_variant_resets_policies() {
        let mut params = FractalParams::default();
        params.set_colour_map(ColourMapKinds::Grayscale);

        params.set_variant(FractalVariant::default());

        assert_eq!(params.colour_map(), ColourMapKinds::Banded);
        assert_eq!(params.pixel_mapping(), PixelMapping::WarpedJulia);
    }

    #[test]
    fn test_set_julia_c_only_applies_to_julia() {
        let mut params = FractalParams::default();
        let c = Complex::new(0.1, 0.2);

        assert!(params.set_julia_c(c));
        assert_eq!(params.variant().julia_c(), Some(c));

        params.set_variant(FractalVariant::Mandelbrot);
        assert!(!params.set_julia_c(DEFAULT_JULIA_C));
        assert_eq!(params.variant(), FractalVariant::Mandelbrot);
    }

    #[test]
    fn test_set_max_iterations_rejects_zero_and_keeps_value() {
        let mut params = FractalParams::default();

        assert!(params.set_max_iterations(0).is_err());
        assert_eq!(params.max_iterations(), DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_clamp_max_iterations() {
        assert_eq!(clamp_max_iterations(-5), 1);
        assert_eq!(clamp_max_iterations(0), 1);
        assert_eq!(clamp_max_iterations(1), 1);
        assert_eq!(clamp_max_iterations(300), 300);
        assert_eq!(clamp_max_iterations(i64::MAX), u32::MAX);
    }
}
