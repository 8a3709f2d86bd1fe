use crate::error::FaceCropError;

/// Pixel dimensions of an image surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Construct a size from pixel dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, i.e. the surface cannot host
    /// geometry.
    pub fn is_zero(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub(crate) fn ensure_nonzero(&self) -> Result<(), FaceCropError> {
        if self.is_zero() {
            return Err(FaceCropError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Axis-aligned rectangle in pixel coordinates.
///
/// A `Rect` is meaningful only together with the coordinate space it lives
/// in: *source space* (the decoded image at natural resolution) or *display
/// space* (the image as rendered inside the crop widget). [`map_to_display`]
/// and [`map_to_source`] convert between the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Construct a rectangle from its top-left corner and dimensions.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point `(cx, cy)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Covered area in square pixels.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Shift the rectangle so it lies within `[0, bounds.width] ×
    /// [0, bounds.height]`, shrinking it first if it is larger than the
    /// bounds on either axis.
    pub fn clamp_within(&self, bounds: Size) -> Rect {
        let width = self.width.min(bounds.width as f64);
        let height = self.height.min(bounds.height as f64);
        let x = self.x.max(0.0).min(bounds.width as f64 - width);
        let y = self.y.max(0.0).min(bounds.height as f64 - height);
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// Map a source-space rectangle into the widget's display space.
///
/// The horizontal and vertical scale factors are independent; a widget that
/// letterboxes or otherwise resizes non-uniformly is still mapped correctly.
pub fn map_to_display(rect: Rect, source: Size, display: Size) -> Result<Rect, FaceCropError> {
    source.ensure_nonzero()?;
    display.ensure_nonzero()?;

    let scale_x = source.width as f64 / display.width as f64;
    let scale_y = source.height as f64 / display.height as f64;

    Ok(Rect {
        x: rect.x / scale_x,
        y: rect.y / scale_y,
        width: rect.width / scale_x,
        height: rect.height / scale_y,
    })
}

/// Inverse of [`map_to_display`]: take a display-space rectangle back to
/// source space. Widgets use this to rasterize the crop selection from the
/// full-resolution image.
pub fn map_to_source(rect: Rect, source: Size, display: Size) -> Result<Rect, FaceCropError> {
    source.ensure_nonzero()?;
    display.ensure_nonzero()?;

    let scale_x = source.width as f64 / display.width as f64;
    let scale_y = source.height as f64 / display.height as f64;

    Ok(Rect {
        x: rect.x * scale_x,
        y: rect.y * scale_y,
        width: rect.width * scale_x,
        height: rect.height * scale_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_face_box_from_source_to_display() {
        // 800x600 source shown at 400x300: everything halves.
        let face = Rect::new(300.0, 200.0, 100.0, 100.0);
        let mapped = map_to_display(
            face,
            Size::new(800, 600),
            Size::new(400, 300),
        )
        .unwrap();
        assert_eq!(mapped, Rect::new(150.0, 100.0, 50.0, 50.0));
    }

    #[test]
    fn independent_axis_scales() {
        let rect = Rect::new(100.0, 100.0, 200.0, 200.0);
        let mapped = map_to_display(
            rect,
            Size::new(1000, 500),
            Size::new(500, 500),
        )
        .unwrap();
        // x halves, y is untouched.
        assert_eq!(mapped, Rect::new(50.0, 100.0, 100.0, 200.0));
    }

    #[test]
    fn display_roundtrip_recovers_source_rect() {
        let source = Size::new(1920, 1080);
        let display = Size::new(633, 356);
        let rect = Rect::new(412.0, 77.0, 301.0, 299.0);
        let there = map_to_display(rect, source, display).unwrap();
        let back = map_to_source(there, source, display).unwrap();
        assert!((back.x - rect.x).abs() < 1e-9);
        assert!((back.y - rect.y).abs() < 1e-9);
        assert!((back.width - rect.width).abs() < 1e-9);
        assert!((back.height - rect.height).abs() < 1e-9);
    }

    #[test]
    fn zero_sized_display_is_rejected() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let err = map_to_display(rect, Size::new(800, 600), Size::new(0, 300)).unwrap_err();
        assert!(matches!(
            err,
            FaceCropError::InvalidDimension {
                width: 0,
                height: 300
            }
        ));
    }

    #[test]
    fn zero_sized_source_is_rejected() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(map_to_display(rect, Size::new(800, 0), Size::new(400, 300)).is_err());
        assert!(map_to_source(rect, Size::new(800, 0), Size::new(400, 300)).is_err());
    }

    #[test]
    fn clamp_shifts_overhanging_rect_into_bounds() {
        let bounds = Size::new(100, 100);
        let rect = Rect::new(80.0, -10.0, 40.0, 40.0);
        let clamped = rect.clamp_within(bounds);
        assert_eq!(clamped, Rect::new(60.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn clamp_shrinks_oversized_rect() {
        let bounds = Size::new(100, 50);
        let rect = Rect::new(0.0, 0.0, 300.0, 300.0);
        let clamped = rect.clamp_within(bounds);
        assert_eq!(clamped, Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn center_of_rect() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.center(), (25.0, 40.0));
    }
}
