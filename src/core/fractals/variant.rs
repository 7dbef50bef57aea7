use crate::core::actions::partition::partition::PartitionKind;
use crate::core::data::complex::Complex;
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;
use crate::core::viewport::pixel_mapping::PixelMapping;

pub const DEFAULT_JULIA_C: Complex = Complex::new(-0.599, 0.99);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractalKinds {
    Mandelbrot,
    #[default]
    Julia,
}

impl FractalKinds {
    pub const ALL: &'static [Self] = &[Self::Julia, Self::Mandelbrot];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia => "Julia",
        }
    }
}

impl std::fmt::Display for FractalKinds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).display_name())
    }
}

impl std::str::FromStr for FractalKinds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown fractal '{s}'"))
    }
}

/// Which escape-time family is iterated, together with its parameter.
///
/// The variant also selects the default colour map, pixel mapping and
/// partitioning used to render it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FractalVariant {
    /// `z0 = 0`, `c` taken from the pixel.
    Mandelbrot,
    /// `z0` taken from the pixel, fixed `c`.
    Julia { c: Complex },
}

impl Default for FractalVariant {
    fn default() -> Self {
        Self::Julia { c: DEFAULT_JULIA_C }
    }
}

impl FractalVariant {
    #[must_use]
    pub fn from_kind(kind: FractalKinds) -> Self {
        match kind {
            FractalKinds::Mandelbrot => Self::Mandelbrot,
            FractalKinds::Julia => Self::default(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FractalKinds {
        match self {
            Self::Mandelbrot => FractalKinds::Mandelbrot,
            Self::Julia { .. } => FractalKinds::Julia,
        }
    }

    #[must_use]
    pub fn julia_c(&self) -> Option<Complex> {
        match self {
            Self::Mandelbrot => None,
            Self::Julia { c } => Some(*c),
        }
    }

    #[must_use]
    pub fn default_colour_map(&self) -> ColourMapKinds {
        match self {
            Self::Mandelbrot => ColourMapKinds::Grayscale,
            Self::Julia { .. } => ColourMapKinds::Banded,
        }
    }

    #[must_use]
    pub fn default_pixel_mapping(&self) -> PixelMapping {
        match self {
            Self::Mandelbrot => PixelMapping::Standard,
            Self::Julia { .. } => PixelMapping::WarpedJulia,
        }
    }

    #[must_use]
    pub fn default_partition(&self) -> PartitionKind {
        match self {
            Self::Mandelbrot => PartitionKind::Tiles,
            Self::Julia { .. } => PartitionKind::Bands,
        }
    }

    /// Splits a plane point into the iteration's `(z0, c)` pair.
    #[inline]
    #[must_use]
    pub fn seed(&self, point: Complex) -> (Complex, Complex) {
        match self {
            Self::Mandelbrot => (Complex::ZERO, point),
            Self::Julia { c } => (point, *c),
        }
    }
}
