use crate::core::actions::render_tile::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;
use crate::core::fractals::colour_mapping::errors::ColourMapError;
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;
use crate::core::fractals::colour_mapping::map::FractalColourMap;

/// White outside, darkening with escape time, black inside the set.
#[derive(Debug)]
pub struct Grayscale {
    max_iterations: u32,
}

impl ColourMap<u32> for Grayscale {
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

        let shade = u64::from(iterations) * 255 / u64::from(self.max_iterations);
        let value = 255u64.saturating_sub(shade).min(255) as u8;

        Ok(Colour::gray(value))
    }

    fn display_name(&self) -> &str {
        self.kind().display_name()
    }
}

impl FractalColourMap for Grayscale {
    fn kind(&self) -> ColourMapKinds {
        ColourMapKinds::Grayscale
    }
}

impl Grayscale {
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }
}
