//! Conversion from the engine's RGB frames to the RGBA surfaces that
//! presentation backends draw.

use crate::core::data::frame_buffer::{BYTES_PER_PIXEL, FrameBuffer};
use crate::core::data::tile::Tile;
use thiserror::Error;

pub const RGBA_BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelFormatError {
    #[error("surface holds {surface_len} bytes, {expected_len} needed")]
    SurfaceSizeMismatch {
        expected_len: usize,
        surface_len: usize,
    },
    #[error("tile {tile:?} does not fit a {surface_width}x{surface_height} surface")]
    TileOutsideSurface {
        tile: Tile,
        surface_width: u32,
        surface_height: u32,
    },
    #[error("tile data holds {data_len} bytes, {expected_len} needed")]
    TileDataMismatch { expected_len: usize, data_len: usize },
}

/// Copies a whole frame into an RGBA surface of the same dimensions,
/// with opaque alpha.
pub fn copy_frame_to_rgba(frame: &FrameBuffer, surface: &mut [u8]) -> Result<(), PixelFormatError> {
    let expected_len = frame.width() as usize * frame.height() as usize * RGBA_BYTES_PER_PIXEL;
    if surface.len() != expected_len {
        return Err(PixelFormatError::SurfaceSizeMismatch {
            expected_len,
            surface_len: surface.len(),
        });
    }

    copy_rgb_row(frame.data(), surface);
    Ok(())
}

/// Writes one tile's row-major RGB pixels into its place on an RGBA
/// surface `surface_width` pixels wide.
pub fn blit_tile_to_rgba(
    tile: Tile,
    pixels: &[u8],
    surface: &mut [u8],
    surface_width: u32,
) -> Result<(), PixelFormatError> {
    let surface_height = match surface_width {
        0 => 0,
        width => u32::try_from(surface.len() / RGBA_BYTES_PER_PIXEL / width as usize).unwrap_or(u32::MAX),
    };
    if !tile.fits_within(surface_width, surface_height) {
        return Err(PixelFormatError::TileOutsideSurface {
            tile,
            surface_width,
            surface_height,
        });
    }

    let expected_len = tile.pixel_count() * BYTES_PER_PIXEL;
    if pixels.len() != expected_len {
        return Err(PixelFormatError::TileDataMismatch {
            expected_len,
            data_len: pixels.len(),
        });
    }

    let src_stride = tile.width() as usize * BYTES_PER_PIXEL;
    let dst_stride = tile.width() as usize * RGBA_BYTES_PER_PIXEL;

    for (row, src_row) in pixels.chunks_exact(src_stride).enumerate() {
        let y = tile.y() as usize + row;
        let start = (y * surface_width as usize + tile.x() as usize) * RGBA_BYTES_PER_PIXEL;
        copy_rgb_row(src_row, &mut surface[start..start + dst_stride]);
    }

    Ok(())
}

fn copy_rgb_row(src: &[u8], dst: &mut [u8]) {
    for (src_pixel, dst_pixel) in src
        .chunks_exact(BYTES_PER_PIXEL)
        .zip(dst.chunks_exact_mut(RGBA_BYTES_PER_PIXEL))
    {
        dst_pixel[..BYTES_PER_PIXEL].copy_from_slice(src_pixel);
        dst_pixel[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::colour::Colour;

    #[test]
    fn test_copy_frame_sets_opaque_alpha() {
        let mut frame = FrameBuffer::new(2, 1).unwrap();
        frame
            .blit(Tile::new(0, 0, 2, 1).unwrap(), &[255, 0, 0, 10, 20, 30])
            .unwrap();
        let mut surface = vec![0; 8];

        copy_frame_to_rgba(&frame, &mut surface).unwrap();

        assert_eq!(surface, vec![255, 0, 0, 255, 10, 20, 30, 255]);
    }

    #[test]
    fn test_copy_frame_rejects_wrong_surface() {
        let frame = FrameBuffer::new(2, 2).unwrap();
        let mut surface = vec![0; 12];

        assert_eq!(
            copy_frame_to_rgba(&frame, &mut surface),
            Err(PixelFormatError::SurfaceSizeMismatch {
                expected_len: 16,
                surface_len: 12
            })
        );
    }

    #[test]
    fn test_blit_tile_lands_in_place() {
        let mut surface = vec![0; 3 * 3 * RGBA_BYTES_PER_PIXEL];
        let tile = Tile::new(1, 1, 2, 2).unwrap();
        let white = Colour::WHITE;
        let pixels: Vec<u8> = (0..4).flat_map(|_| [white.r, white.g, white.b]).collect();

        blit_tile_to_rgba(tile, &pixels, &mut surface, 3).unwrap();

        for y in 0..3 {
            for x in 0..3 {
                let offset = (y * 3 + x) * RGBA_BYTES_PER_PIXEL;
                let expected = if x >= 1 && y >= 1 { [255, 255, 255, 255] } else { [0, 0, 0, 0] };
                assert_eq!(surface[offset..offset + 4], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_blit_tile_outside_surface_is_rejected() {
        let mut surface = vec![0; 2 * 2 * RGBA_BYTES_PER_PIXEL];
        let tile = Tile::new(1, 1, 2, 2).unwrap();

        assert!(matches!(
            blit_tile_to_rgba(tile, &[0; 12], &mut surface, 2),
            Err(PixelFormatError::TileOutsideSurface { .. })
        ));
    }

    #[test]
    fn test_blit_tile_rejects_short_data() {
        let mut surface = vec![0; 2 * 2 * RGBA_BYTES_PER_PIXEL];
        let tile = Tile::new(0, 0, 2, 2).unwrap();

        assert_eq!(
            blit_tile_to_rgba(tile, &[0; 9], &mut surface, 2),
            Err(PixelFormatError::TileDataMismatch {
                expected_len: 12,
                data_len: 9
            })
        );
    }
}
