use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_PIXELS, CancelToken, Cancelled};
use crate::core::actions::render_tile::ports::colour_map::ColourMap;
use crate::core::actions::render_tile::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::colour::Colour;
use crate::core::data::frame_buffer::BYTES_PER_PIXEL;
use crate::core::data::point::Point;
use crate::core::data::tile::Tile;
use std::error::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderTileError<A: Error + 'static, M: Error + 'static> {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("fractal algorithm failed: {0}")]
    Algorithm(#[source] A),
    #[error("colour map failed: {0}")]
    ColourMap(#[source] M),
}

impl<A: Error + 'static, M: Error + 'static> RenderTileError<A, M> {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Computes and colours every pixel of `tile`, returning row-major RGB bytes
/// ready to blit.
///
/// The token is polled at the start of each row and every
/// [`CANCEL_CHECK_INTERVAL_PIXELS`] pixels within a row, so a superseded
/// task stops without finishing the tile.
pub fn render_tile<Alg, CMap, C>(
    tile: Tile,
    algorithm: &Alg,
    colour_map: &CMap,
    cancel: &C,
) -> Result<Vec<u8>, RenderTileError<Alg::Failure, CMap::Failure>>
where
    Alg: FractalAlgorithm<Success = u32> + ?Sized,
    CMap: ColourMap<u32> + ?Sized,
    Alg::Failure: 'static,
    CMap::Failure: 'static,
    C: CancelToken + ?Sized,
{
    let mut data = Vec::with_capacity(tile.pixel_count() * BYTES_PER_PIXEL);

    for row in 0..tile.height() {
        cancel.check()?;
        let y = tile.y().saturating_add(row);

        for column in 0..tile.width() {
            if column > 0 && column as usize % CANCEL_CHECK_INTERVAL_PIXELS == 0 {
                cancel.check()?;
            }

            let pixel = Point {
                x: tile.x().saturating_add(column),
                y,
            };
            let iterations = algorithm
                .compute(pixel)
                .map_err(RenderTileError::Algorithm)?;
            let Colour { r, g, b } = colour_map
                .map(iterations)
                .map_err(RenderTileError::ColourMap)?;

            data.extend_from_slice(&[r, g, b]);
        }
    }

    Ok(data)
}
