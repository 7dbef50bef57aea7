use crate::core::data::colour::Colour;
use crate::core::data::tile::Tile;
use thiserror::Error;

pub const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameBufferError {
    #[error("frame buffer size must be positive: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("tile {tile:?} outside of {frame_width}x{frame_height} frame")]
    TileOutsideBounds {
        tile: Tile,
        frame_width: u32,
        frame_height: u32,
    },
    #[error("tile data size {data_size} does not match expected {expected_size}")]
    DataSizeMismatch {
        expected_size: usize,
        data_size: usize,
    },
}

/// Row-major RGB pixel storage for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Allocates a black frame.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameBufferError> {
        if width == 0 || height == 0 {
            return Err(FrameBufferError::InvalidSize { width, height });
        }

        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = self.index(x, y);

        Some(Colour {
            r: self.data[index],
            g: self.data[index + 1],
            b: self.data[index + 2],
        })
    }

    /// Copies a tile's row-major RGB data into the frame.
    ///
    /// The frame is left untouched when the tile does not fit or the data has
    /// the wrong length.
    pub fn blit(&mut self, tile: Tile, data: &[u8]) -> Result<(), FrameBufferError> {
        if !tile.fits_within(self.width, self.height) {
            return Err(FrameBufferError::TileOutsideBounds {
                tile,
                frame_width: self.width,
                frame_height: self.height,
            });
        }

        let expected_size = tile.pixel_count() * BYTES_PER_PIXEL;
        if data.len() != expected_size {
            return Err(FrameBufferError::DataSizeMismatch {
                expected_size,
                data_size: data.len(),
            });
        }

        let row_bytes = tile.width() as usize * BYTES_PER_PIXEL;

        for (row, src) in data.chunks_exact(row_bytes).enumerate() {
            let start = self.index(tile.x(), tile.y() + row as u32);
            self.data[start..start + row_bytes].copy_from_slice(src);
        }

        Ok(())
    }

    /// Copies a region of the frame out as row-major RGB data.
    pub fn region(&self, tile: Tile) -> Result<Vec<u8>, FrameBufferError> {
        if !tile.fits_within(self.width, self.height) {
            return Err(FrameBufferError::TileOutsideBounds {
                tile,
                frame_width: self.width,
                frame_height: self.height,
            });
        }

        let row_bytes = tile.width() as usize * BYTES_PER_PIXEL;
        let mut region = Vec::with_capacity(tile.pixel_count() * BYTES_PER_PIXEL);

        for row in 0..tile.height() {
            let start = self.index(tile.x(), tile.y() + row);
            region.extend_from_slice(&self.data[start..start + row_bytes]);
        }

        Ok(region)
    }

    /// Makes `self` an exact copy of `source`, reusing the existing allocation
    /// when it is large enough.
    pub fn copy_from(&mut self, source: &FrameBuffer) {
        self.width = source.width;
        self.height = source.height;
        self.data.clone_from(&source.data);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(tile: Tile, value: u8) -> Vec<u8> {
        vec![value; tile.pixel_count() * BYTES_PER_PIXEL]
    }

    #[test]
    fn test_new_creates_black_frame() {
        let frame = FrameBuffer::new(10, 4).unwrap();

        assert_eq!(frame.data().len(), 120); // 10 * 4 * 3
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert_eq!(
            FrameBuffer::new(0, 10),
            Err(FrameBufferError::InvalidSize {
                width: 0,
                height: 10
            })
        );
        assert!(FrameBuffer::new(10, 0).is_err());
    }

    #[test]
    fn test_blit_writes_only_the_tile_region() {
        let mut frame = FrameBuffer::new(4, 4).unwrap();
        let tile = Tile::new(1, 2, 2, 2).unwrap();

        frame.blit(tile, &filled(tile, 200)).unwrap();

        for y in 0..4 {
            for x in 0..4 {
                let inside = (1..3).contains(&x) && (2..4).contains(&y);
                let expected = if inside { 200 } else { 0 };
                assert_eq!(frame.pixel(x, y), Some(Colour::gray(expected)), "({x},{y})");
            }
        }
    }

    #[test]
    fn test_blit_preserves_channel_order() {
        let mut frame = FrameBuffer::new(2, 2).unwrap();
        let tile = Tile::new(1, 1, 1, 1).unwrap();

        frame.blit(tile, &[10, 20, 30]).unwrap();

        assert_eq!(frame.pixel(1, 1), Some(Colour { r: 10, g: 20, b: 30 }));
        assert_eq!(&frame.data()[9..12], &[10, 20, 30]);
    }

    #[test]
    fn test_blit_rejects_tile_outside_frame() {
        let mut frame = FrameBuffer::new(4, 4).unwrap();
        let tile = Tile::new(3, 3, 2, 2).unwrap();

        let result = frame.blit(tile, &filled(tile, 1));

        assert_eq!(
            result,
            Err(FrameBufferError::TileOutsideBounds {
                tile,
                frame_width: 4,
                frame_height: 4
            })
        );
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_blit_rejects_wrong_data_length() {
        let mut frame = FrameBuffer::new(4, 4).unwrap();
        let tile = Tile::new(0, 0, 2, 2).unwrap();

        let result = frame.blit(tile, &[1, 2, 3]);

        assert_eq!(
            result,
            Err(FrameBufferError::DataSizeMismatch {
                expected_size: 12,
                data_size: 3
            })
        );
    }

    #[test]
    fn test_region_reads_back_blitted_data() {
        let mut frame = FrameBuffer::new(5, 5).unwrap();
        let tile = Tile::new(2, 1, 3, 2).unwrap();
        let data: Vec<u8> = (0..18).collect();

        frame.blit(tile, &data).unwrap();

        assert_eq!(frame.region(tile).unwrap(), data);
    }

    #[test]
    fn test_copy_from_matches_source() {
        let mut source = FrameBuffer::new(3, 2).unwrap();
        let tile = Tile::new(0, 1, 3, 1).unwrap();
        source.blit(tile, &filled(tile, 9)).unwrap();
        let mut target = FrameBuffer::default();

        target.copy_from(&source);

        assert_eq!(target, source);
    }

    #[test]
    fn test_pixel_outside_frame_is_none() {
        let frame = FrameBuffer::new(2, 2).unwrap();

        assert_eq!(frame.pixel(2, 0), None);
        assert_eq!(frame.pixel(0, 2), None);
    }
}
