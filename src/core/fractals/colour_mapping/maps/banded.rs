use crate::core::actions::render_tile::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;
use crate::core::fractals::colour_mapping::errors::ColourMapError;
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;
use crate::core::fractals::colour_mapping::map::FractalColourMap;

/// Packs the escape count into the green and blue channels as
/// `iter | iter << 8`, so colours cycle in bands as the count grows.
#[derive(Debug)]
pub struct Banded {
    max_iterations: u32,
}

impl ColourMap<u32> for Banded {
    type Failure = ColourMapError;

    fn map(&self, iterations: u32) -> Result<Colour, ColourMapError> {
        if iterations > self.max_iterations {
            return Err(ColourMapError::IterationsExceedMax {
                iterations,
                max_iterations: self.max_iterations,
            });
        }

        if iterations == self.max_iterations {
            return Ok(Colour::BLACK);
        }

        Ok(Colour::from_packed_rgb(iterations | (iterations << 8)))
    }

    fn display_name(&self) -> &str {
        self.kind().display_name()
    }
}

impl FractalColourMap for Banded {
    fn kind(&self) -> ColourMapKinds {
        ColourMapKinds::Banded
    }
}

impl Banded {
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }
}
