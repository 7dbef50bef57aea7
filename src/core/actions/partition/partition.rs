use crate::core::data::tile::{Tile, TileError};
use std::num::NonZeroU32;

pub const DEFAULT_TILE_SIZE: u32 = 50;

/// How one frame is split into independent tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
    /// One horizontal band per worker, rendered off-screen and swapped in
    /// once every band is done.
    Bands,
    /// Fixed square tiles composed straight into the displayed frame.
    Tiles,
}

impl PartitionKind {
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Bands => "Bands",
            Self::Tiles => "Tiles",
        }
    }
}

impl std::fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).display_name())
    }
}

/// Splits the frame into at most `max_bands` full-width bands.
///
/// The band count is capped at the frame height; the last band takes the
/// leftover rows.
pub fn partition_bands(width: u32, height: u32, max_bands: NonZeroU32) -> Result<Vec<Tile>, TileError> {
    let frame = Tile::full_frame(width, height)?;
    let count = max_bands.get().min(frame.height());
    let band_height = frame.height() / count;

    (0..count)
        .map(|band| {
            let y = band * band_height;
            let rows = if band == count - 1 {
                frame.height() - y
            } else {
                band_height
            };

            Tile::new(0, y, frame.width(), rows)
        })
        .collect()
}

/// Splits the frame into `tile_size` squares in row-major order, clipping the
/// last column and row at the frame edges.
pub fn partition_tiles(width: u32, height: u32, tile_size: NonZeroU32) -> Result<Vec<Tile>, TileError> {
    let frame = Tile::full_frame(width, height)?;
    let size = tile_size.get();

    let mut tiles = Vec::new();

    for y in (0..frame.height()).step_by(size as usize) {
        for x in (0..frame.width()).step_by(size as usize) {
            if let Some(tile) = Tile::new(x, y, size, size)?.clip_to(width, height) {
                tiles.push(tile);
            }
        }
    }

    Ok(tiles)
}

pub fn partition(
    kind: PartitionKind,
    width: u32,
    height: u32,
    workers: NonZeroU32,
    tile_size: NonZeroU32,
) -> Result<Vec<Tile>, TileError> {
    match kind {
        PartitionKind::Bands => partition_bands(width, height, workers),
        PartitionKind::Tiles => partition_tiles(width, height, tile_size),
    }
}
