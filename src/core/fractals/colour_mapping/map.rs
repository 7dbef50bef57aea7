use crate::core::actions::render_tile::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;
use crate::core::fractals::colour_mapping::errors::ColourMapError;
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;

pub trait FractalColourMap: ColourMap<u32, Failure = ColourMapError> + Send + Sync {
    fn kind(&self) -> ColourMapKinds;
}

impl ColourMap<u32> for Box<dyn FractalColourMap> {
    type Failure = ColourMapError;

    fn map(&self, value: u32) -> Result<Colour, ColourMapError> {
        (**self).map(value)
    }

    fn display_name(&self) -> &str {
        (**self).display_name()
    }
}
