use crate::core::actions::render_tile::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::point::Point;
use crate::core::fractals::escape_time::escape_time;
use crate::core::fractals::params::FractalParams;
use crate::core::viewport::view_transform::ViewTransform;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EscapeTimeError {
    #[error("pixel ({}, {}) is outside the {width}x{height} view", .point.x, .point.y)]
    PixelOutsideView { point: Point, width: u32, height: u32 },
    #[error("pixel ({}, {}) maps to a non-finite plane point", .point.x, .point.y)]
    NonFinitePoint { point: Point },
}

/// Escape-time iteration for one frozen set of parameters and view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeTimeAlgorithm {
    params: FractalParams,
    view: ViewTransform,
}

impl FractalAlgorithm for EscapeTimeAlgorithm {
    type Success = u32;
    type Failure = EscapeTimeError;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure> {
        if pixel.x >= self.view.pixel_width() || pixel.y >= self.view.pixel_height() {
            return Err(EscapeTimeError::PixelOutsideView {
                point: pixel,
                width: self.view.pixel_width(),
                height: self.view.pixel_height(),
            });
        }

        let point = self
            .params
            .pixel_mapping()
            .map(&self.view, pixel.x, pixel.y);

        if !point.is_finite() {
            return Err(EscapeTimeError::NonFinitePoint { point: pixel });
        }

        let (z0, c) = self.params.variant().seed(point);

        Ok(escape_time(z0, c, self.params.max_iterations()))
    }
}

impl EscapeTimeAlgorithm {
    #[must_use]
    pub fn new(params: FractalParams, view: ViewTransform) -> Self {
        Self { params, view }
    }

    #[must_use]
    pub fn params(&self) -> &FractalParams {
        &self.params
    }

    #[must_use]
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }
}
