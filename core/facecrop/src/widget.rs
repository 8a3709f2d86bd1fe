use image::RgbaImage;

use crate::error::FaceCropError;
use crate::geometry::{map_to_source, Rect, Size};

/// Image metrics of a crop widget that has finished laying out its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
    /// Natural (source-space) dimensions of the decoded image.
    pub natural: Size,
    /// Dimensions of the image as rendered inside the widget.
    pub display: Size,
}

/// Capability set of an interactive crop widget, passed by explicit handle.
///
/// `layout` doubles as the readiness signal: it returns `None` until the
/// widget has both decoded the image's natural size and rendered it at its
/// display size. Callers must not derive geometry before that point — there
/// is no fixed-delay guessing anywhere in this crate.
pub trait CropWidget {
    /// Current image metrics, or `None` while layout is still in progress.
    fn layout(&self) -> Option<ImageLayout>;

    /// Apply a crop box, expressed in display space.
    fn set_crop_box(&mut self, rect: Rect);

    /// The crop box currently applied, in display space.
    fn crop_box(&self) -> Option<Rect>;

    /// Rasterize the current crop region from the source image.
    fn cropped_image(&self) -> Result<RgbaImage, FaceCropError>;
}

/// In-memory reference widget over a decoded image.
///
/// Behaves like the real thing from the library's point of view: layout must
/// be finished explicitly before any metrics are visible, and with no crop
/// box applied the whole image is selected (the original component mounts
/// its widget with `autoCropArea = 1`).
#[derive(Debug)]
pub struct ImageWidget {
    image: RgbaImage,
    display: Size,
    crop: Option<Rect>,
    laid_out: bool,
}

impl ImageWidget {
    /// Wrap an already-decoded image rendered at `display` size.
    pub fn new(image: RgbaImage, display: Size) -> Result<Self, FaceCropError> {
        let natural = Size::new(image.width(), image.height());
        natural.ensure_nonzero()?;
        display.ensure_nonzero()?;
        Ok(Self {
            image,
            display,
            crop: None,
            laid_out: false,
        })
    }

    /// Decode raw image bytes (PNG or JPEG) and wrap the result.
    pub fn from_bytes(bytes: &[u8], display: Size) -> Result<Self, FaceCropError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| FaceCropError::Decode(e.to_string()))?;
        Self::new(decoded.to_rgba8(), display)
    }

    /// Mark layout as complete. Until this is called the widget reports no
    /// metrics and geometry cannot be applied to it.
    pub fn finish_layout(&mut self) {
        self.laid_out = true;
    }

    /// Natural (source-space) dimensions of the wrapped image.
    pub fn natural_size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    /// The decoded source image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl CropWidget for ImageWidget {
    fn layout(&self) -> Option<ImageLayout> {
        self.laid_out.then(|| ImageLayout {
            natural: self.natural_size(),
            display: self.display,
        })
    }

    fn set_crop_box(&mut self, rect: Rect) {
        self.crop = Some(rect);
    }

    fn crop_box(&self) -> Option<Rect> {
        self.crop
    }

    fn cropped_image(&self) -> Result<RgbaImage, FaceCropError> {
        let natural = self.natural_size();
        let region = match self.crop {
            Some(display_rect) => {
                let source_rect = map_to_source(display_rect, natural, self.display)?
                    .clamp_within(natural);
                if source_rect.area() < 1.0 {
                    return Err(FaceCropError::EmptyCrop);
                }
                source_rect
            }
            // No selection: the whole image.
            None => Rect::new(0.0, 0.0, natural.width as f64, natural.height as f64),
        };

        let x = region.x.round() as u32;
        let y = region.y.round() as u32;
        let width = (region.width.round() as u32).max(1).min(natural.width - x);
        let height = (region.height.round() as u32).max(1).min(natural.height - y);

        Ok(image::imageops::crop_imm(&self.image, x, y, width, height).to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        let mut img = RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255]);
        }
        img
    }

    #[test]
    fn layout_hidden_until_finished() {
        let mut widget = ImageWidget::new(gradient(800, 600), Size::new(400, 300)).unwrap();
        assert!(widget.layout().is_none());
        widget.finish_layout();
        let layout = widget.layout().unwrap();
        assert_eq!(layout.natural, Size::new(800, 600));
        assert_eq!(layout.display, Size::new(400, 300));
    }

    #[test]
    fn zero_display_size_is_rejected() {
        let err = ImageWidget::new(gradient(10, 10), Size::new(0, 300)).unwrap_err();
        assert!(matches!(err, FaceCropError::InvalidDimension { .. }));
    }

    #[test]
    fn decode_failure_surfaces_as_decode_error() {
        let err = ImageWidget::from_bytes(b"not an image", Size::new(100, 100)).unwrap_err();
        assert!(matches!(err, FaceCropError::Decode(_)));
    }

    #[test]
    fn no_crop_box_selects_whole_image() {
        let widget = ImageWidget::new(gradient(64, 48), Size::new(32, 24)).unwrap();
        let cropped = widget.cropped_image().unwrap();
        assert_eq!((cropped.width(), cropped.height()), (64, 48));
    }

    #[test]
    fn crop_box_is_mapped_back_to_source_pixels() {
        // 800x600 shown at 400x300: a 50x50 display box at (150, 100)
        // covers source pixels starting at (300, 200).
        let mut widget = ImageWidget::new(gradient(800, 600), Size::new(400, 300)).unwrap();
        widget.set_crop_box(Rect::new(150.0, 100.0, 50.0, 50.0));
        let cropped = widget.cropped_image().unwrap();
        assert_eq!((cropped.width(), cropped.height()), (100, 100));
        // Top-left pixel of the crop is source pixel (300, 200).
        assert_eq!(cropped.get_pixel(0, 0).0[0], (300 % 256) as u8);
        assert_eq!(cropped.get_pixel(0, 0).0[1], 200);
    }

    #[test]
    fn zero_area_crop_box_is_rejected() {
        let mut widget = ImageWidget::new(gradient(100, 100), Size::new(100, 100)).unwrap();
        widget.set_crop_box(Rect::new(10.0, 10.0, 0.0, 20.0));
        let err = widget.cropped_image().unwrap_err();
        assert!(matches!(err, FaceCropError::EmptyCrop));
    }

    #[test]
    fn overhanging_crop_box_is_clamped() {
        let mut widget = ImageWidget::new(gradient(100, 100), Size::new(100, 100)).unwrap();
        widget.set_crop_box(Rect::new(80.0, 80.0, 50.0, 50.0));
        let cropped = widget.cropped_image().unwrap();
        assert_eq!((cropped.width(), cropped.height()), (50, 50));
    }
}
