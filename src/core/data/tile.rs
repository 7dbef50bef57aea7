use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("tile size must be positive: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// A rectangular region of the output image, in pixels.
///
/// `x` and `y` are the top-left corner; the tile covers `[x, x + width)` by
/// `[y, y + height)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self, TileError> {
        if width == 0 || height == 0 {
            return Err(TileError::InvalidSize { width, height });
        }

        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// The tile covering a whole `width` x `height` image.
    pub fn full_frame(width: u32, height: u32) -> Result<Self, TileError> {
        Self::new(0, 0, width, height)
    }

    #[must_use]
    pub fn x(&self) -> u32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> u32 {
        self.y
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Exclusive right edge.
    #[must_use]
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
    }

    /// Clips the tile to a `width` x `height` image. Returns `None` when nothing
    /// of the tile lies inside the image.
    #[must_use]
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Self> {
        if self.x >= width || self.y >= height {
            return None;
        }

        let clipped_width = self.width.min(width - self.x);
        let clipped_height = self.height.min(height - self.y);

        Self::new(self.x, self.y, clipped_width, clipped_height).ok()
    }
}
