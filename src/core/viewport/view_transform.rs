use crate::core::data::complex::Complex;
use thiserror::Error;

pub const DEFAULT_ZOOM: f64 = 1.0;
pub const DEFAULT_OFFSET: Complex = Complex::new(-0.5, 0.0);

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ViewTransformError {
    #[error("zoom must be positive and finite, got {zoom}")]
    InvalidZoom { zoom: f64 },
    #[error("zoom factor must be positive and finite, got {factor}")]
    InvalidZoomFactor { factor: f64 },
    #[error("offset must be finite, got ({offset_x}, {offset_y})")]
    InvalidOffset { offset_x: f64, offset_y: f64 },
    #[error("pixel dimensions must be positive: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Which image extent one unit of zoom is measured against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ScaleReference {
    #[default]
    Width,
    ShortSide,
}

/// Affine mapping between device pixels and the complex plane.
///
/// At zoom 1 the reference extent spans two units of the plane, centred on the
/// offset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    zoom: f64,
    offset: Complex,
    pixel_width: u32,
    pixel_height: u32,
    scale_reference: ScaleReference,
}

impl ViewTransform {
    pub fn new(pixel_width: u32, pixel_height: u32) -> Result<Self, ViewTransformError> {
        validate_dimensions(pixel_width, pixel_height)?;

        Ok(Self {
            zoom: DEFAULT_ZOOM,
            offset: DEFAULT_OFFSET,
            pixel_width,
            pixel_height,
            scale_reference: ScaleReference::default(),
        })
    }

    #[must_use]
    pub fn with_scale_reference(mut self, scale_reference: ScaleReference) -> Self {
        self.scale_reference = scale_reference;
        self
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn offset(&self) -> Complex {
        self.offset
    }

    #[must_use]
    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    #[must_use]
    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    #[must_use]
    pub fn scale_reference(&self) -> ScaleReference {
        self.scale_reference
    }

    /// The extent `S` that one unit of zoom is measured against.
    #[must_use]
    pub fn scale_extent(&self) -> f64 {
        match self.scale_reference {
            ScaleReference::Width => f64::from(self.pixel_width),
            ScaleReference::ShortSide => f64::from(self.pixel_width.min(self.pixel_height)),
        }
    }

    #[must_use]
    pub fn pixel_to_complex(&self, x: f64, y: f64) -> Complex {
        let units_per_pixel = self.units_per_pixel();

        Complex {
            real: (x - f64::from(self.pixel_width) / 2.0) * units_per_pixel + self.offset.real,
            imag: (y - f64::from(self.pixel_height) / 2.0) * units_per_pixel + self.offset.imag,
        }
    }

    /// Inverse of [`Self::pixel_to_complex`].
    #[must_use]
    pub fn complex_to_pixel(&self, point: Complex) -> (f64, f64) {
        let pixels_per_unit = self.pixels_per_unit();

        (
            (point.real - self.offset.real) * pixels_per_unit + f64::from(self.pixel_width) / 2.0,
            (point.imag - self.offset.imag) * pixels_per_unit + f64::from(self.pixel_height) / 2.0,
        )
    }

    pub fn set_viewport(
        &mut self,
        zoom: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Result<(), ViewTransformError> {
        validate_zoom(zoom)?;
        validate_offset(offset_x, offset_y)?;

        self.zoom = zoom;
        self.offset = Complex::new(offset_x, offset_y);
        Ok(())
    }

    pub fn resize(&mut self, pixel_width: u32, pixel_height: u32) -> Result<(), ViewTransformError> {
        validate_dimensions(pixel_width, pixel_height)?;

        self.pixel_width = pixel_width;
        self.pixel_height = pixel_height;
        Ok(())
    }

    /// Shifts the view by a drag of `(dx, dy)` pixels: content follows the
    /// cursor, so the offset moves the opposite way.
    pub fn pan(&mut self, dx_pixels: f64, dy_pixels: f64) -> Result<(), ViewTransformError> {
        let units_per_pixel = self.units_per_pixel();
        let offset_x = self.offset.real - dx_pixels * units_per_pixel;
        let offset_y = self.offset.imag - dy_pixels * units_per_pixel;

        validate_offset(offset_x, offset_y)?;
        self.offset = Complex::new(offset_x, offset_y);
        Ok(())
    }

    /// Multiplies the zoom by `factor` keeping the plane point under
    /// `(px, py)` at that pixel.
    pub fn zoom_at(&mut self, px: f64, py: f64, factor: f64) -> Result<(), ViewTransformError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewTransformError::InvalidZoomFactor { factor });
        }

        let anchor = self.pixel_to_complex(px, py);
        let zoom = self.zoom * factor;
        validate_zoom(zoom)?;

        let offset_x = anchor.real + (self.offset.real - anchor.real) / factor;
        let offset_y = anchor.imag + (self.offset.imag - anchor.imag) / factor;
        validate_offset(offset_x, offset_y)?;

        self.zoom = zoom;
        self.offset = Complex::new(offset_x, offset_y);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.zoom = DEFAULT_ZOOM;
        self.offset = DEFAULT_OFFSET;
    }

    fn units_per_pixel(&self) -> f64 {
        1.0 / self.pixels_per_unit()
    }

    fn pixels_per_unit(&self) -> f64 {
        0.5 * self.zoom * self.scale_extent()
    }
}

fn validate_zoom(zoom: f64) -> Result<(), ViewTransformError> {
    if !zoom.is_finite() || zoom <= 0.0 {
        return Err(ViewTransformError::InvalidZoom { zoom });
    }

    Ok(())
}

fn validate_offset(offset_x: f64, offset_y: f64) -> Result<(), ViewTransformError> {
    if !offset_x.is_finite() || !offset_y.is_finite() {
        return Err(ViewTransformError::InvalidOffset { offset_x, offset_y });
    }

    Ok(())
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), ViewTransformError> {
    if width == 0 || height == 0 {
        return Err(ViewTransformError::InvalidDimensions { width, height });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_centre_pixel_maps_to_offset() {
        let view = ViewTransform::new(800, 600).unwrap();
        let centre = view.pixel_to_complex(400.0, 300.0);

        assert_eq!(centre, DEFAULT_OFFSET);
    }

    #[test]
    fn test_width_spans_two_units_at_zoom_one() {
        let view = ViewTransform::new(800, 600).unwrap();

        let left = view.pixel_to_complex(0.0, 300.0);
        let right = view.pixel_to_complex(800.0, 300.0);

        assert_close(right.real - left.real, 2.0);
    }

    #[test]
    fn test_short_side_reference_uses_smaller_extent() {
        let view = ViewTransform::new(800, 600)
            .unwrap()
            .with_scale_reference(ScaleReference::ShortSide);

        let top = view.pixel_to_complex(400.0, 0.0);
        let bottom = view.pixel_to_complex(400.0, 600.0);

        assert_eq!(view.scale_extent(), 600.0);
        assert_close(bottom.imag - top.imag, 2.0);
    }

    #[test]
    fn test_round_trip_pixel_complex_pixel() {
        let mut view = ViewTransform::new(640, 480).unwrap();
        view.set_viewport(37.5, -0.743, 0.131).unwrap();

        for &(px, py) in &[(0.0, 0.0), (639.0, 479.0), (123.25, 400.5), (320.0, 240.0)] {
            let (x, y) = view.complex_to_pixel(view.pixel_to_complex(px, py));
            assert!((x - px).abs() < 1e-6, "x: {x} vs {px}");
            assert!((y - py).abs() < 1e-6, "y: {y} vs {py}");
        }
    }

    #[test]
    fn test_zoom_at_keeps_point_under_cursor_fixed() {
        let mut view = ViewTransform::new(1000, 700).unwrap();
        let (px, py) = (812.0, 95.0);
        let before = view.pixel_to_complex(px, py);

        view.zoom_at(px, py, 1.5).unwrap();
        let after_zoom_in = view.pixel_to_complex(px, py);

        view.zoom_at(px, py, 1.0 / 1.5).unwrap();
        let after_zoom_out = view.pixel_to_complex(px, py);

        assert_close(after_zoom_in.real, before.real);
        assert_close(after_zoom_in.imag, before.imag);
        assert_close(after_zoom_out.real, before.real);
        assert_close(after_zoom_out.imag, before.imag);
        assert_close(view.zoom(), 1.0);
    }

    #[test]
    fn test_zoom_at_multiplies_zoom() {
        let mut view = ViewTransform::new(100, 100).unwrap();

        view.zoom_at(50.0, 50.0, 4.0).unwrap();

        assert_eq!(view.zoom(), 4.0);
    }

    #[test]
    fn test_zoom_at_rejects_invalid_factor_and_keeps_state() {
        let mut view = ViewTransform::new(100, 100).unwrap();
        let before = view;

        assert_eq!(
            view.zoom_at(10.0, 10.0, 0.0),
            Err(ViewTransformError::InvalidZoomFactor { factor: 0.0 })
        );
        assert!(view.zoom_at(10.0, 10.0, f64::NAN).is_err());
        assert!(view.zoom_at(10.0, 10.0, -2.0).is_err());
        assert_eq!(view, before);
    }

    #[test]
    fn test_pan_moves_content_with_the_drag() {
        let mut view = ViewTransform::new(200, 200).unwrap();
        let grabbed = view.pixel_to_complex(50.0, 60.0);

        view.pan(30.0, -20.0).unwrap();

        let under_cursor = view.pixel_to_complex(80.0, 40.0);
        assert_close(under_cursor.real, grabbed.real);
        assert_close(under_cursor.imag, grabbed.imag);
    }

    #[test]
    fn test_pan_scales_with_zoom() {
        let mut view = ViewTransform::new(200, 200).unwrap();
        view.set_viewport(2.0, 0.0, 0.0).unwrap();

        view.pan(100.0, 0.0).unwrap();

        // 0.5 * zoom * S = 200 pixels per unit
        assert_close(view.offset().real, -0.5);
        assert_close(view.offset().imag, 0.0);
    }

    #[test]
    fn test_set_viewport_rejects_non_positive_zoom() {
        let mut view = ViewTransform::new(100, 100).unwrap();

        assert_eq!(
            view.set_viewport(0.0, 0.0, 0.0),
            Err(ViewTransformError::InvalidZoom { zoom: 0.0 })
        );
        assert!(view.set_viewport(-1.0, 0.0, 0.0).is_err());
        assert!(view.set_viewport(1.0, f64::INFINITY, 0.0).is_err());
        assert_eq!(view.zoom(), DEFAULT_ZOOM);
        assert_eq!(view.offset(), DEFAULT_OFFSET);
    }

    #[test]
    fn test_resize_rejects_zero_and_keeps_dimensions() {
        let mut view = ViewTransform::new(100, 50).unwrap();

        assert_eq!(
            view.resize(0, 10),
            Err(ViewTransformError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
        assert_eq!(view.pixel_width(), 100);
        assert_eq!(view.pixel_height(), 50);
    }

    #[test]
    fn test_reset_restores_default_view() {
        let mut view = ViewTransform::new(100, 100).unwrap();
        view.set_viewport(12.0, 1.0, 2.0).unwrap();

        view.reset();

        assert_eq!(view.zoom(), DEFAULT_ZOOM);
        assert_eq!(view.offset(), DEFAULT_OFFSET);
    }
}
