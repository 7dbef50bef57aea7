use crate::core::data::complex::Complex;
use crate::core::viewport::view_transform::ViewTransform;

/// How a device pixel becomes a point of the complex plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelMapping {
    /// Follows the view transform, so it tracks pan and zoom.
    #[default]
    Standard,
    /// Fixed stretch used by the animated Julia view. Both axes are scaled
    /// by the image width and zoom/pan are ignored.
    WarpedJulia,
}

impl PixelMapping {
    pub const ALL: &'static [Self] = &[Self::Standard, Self::WarpedJulia];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::WarpedJulia => "Warped Julia",
        }
    }

    #[must_use]
    pub fn map(self, view: &ViewTransform, x: u32, y: u32) -> Complex {
        match self {
            Self::Standard => view.pixel_to_complex(f64::from(x), f64::from(y)),
            Self::WarpedJulia => warped_julia(view.pixel_width(), x, y),
        }
    }
}

impl std::fmt::Display for PixelMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).display_name())
    }
}

fn warped_julia(width: u32, x: u32, y: u32) -> Complex {
    // Integer half-width, matching the pixel grid centre.
    let half_width = i64::from(width / 2);
    let scale = 0.5 * f64::from(width);

    Complex {
        real: 1.5 * (i64::from(x) - half_width) as f64 / scale,
        imag: (i64::from(y) - half_width) as f64 / scale,
    }
}
