use crate::core::fractals::colour_mapping::{
    kinds::ColourMapKinds,
    map::FractalColourMap,
    maps::{banded::Banded, grayscale::Grayscale},
};

#[must_use]
pub fn colour_map_factory(kind: ColourMapKinds, max_iterations: u32) -> Box<dyn FractalColourMap> {
    match kind {
        ColourMapKinds::Banded => Box::new(Banded::new(max_iterations)),
        ColourMapKinds::Grayscale => Box::new(Grayscale::new(max_iterations)),
    }
}
