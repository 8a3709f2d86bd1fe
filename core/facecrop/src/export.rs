use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::FaceCropError;
use crate::{AspectRatio, ExportedImage, MaskMode};

/// Rasterize a cropped region into its terminal PNG form.
///
/// Rectangular exports are stretched to exactly the target size of `aspect`,
/// regardless of the crop's own proportions — a crop whose ratio differs
/// from the target is distorted, not letterboxed. Circular exports are a
/// square of side `min(width, height)` with the corners outside the
/// inscribed circle fully transparent; the aspect target table does not
/// apply to them.
///
/// Identical inputs produce byte-identical PNG output.
pub fn render_export(
    cropped: &RgbaImage,
    aspect: AspectRatio,
    mask: MaskMode,
) -> Result<ExportedImage, FaceCropError> {
    if cropped.width() == 0 || cropped.height() == 0 {
        return Err(FaceCropError::EmptyCrop);
    }

    let output = match mask {
        MaskMode::None => {
            let target = aspect.target_size();
            imageops::resize(cropped, target.width, target.height, FilterType::Lanczos3)
        }
        MaskMode::Circle => {
            let side = cropped.width().min(cropped.height());
            let mut square = imageops::resize(cropped, side, side, FilterType::Lanczos3);
            apply_circle_mask(&mut square);
            square
        }
    };

    let data = encode_png(&output)?;
    Ok(ExportedImage {
        data,
        width: output.width(),
        height: output.height(),
        filename: mask.filename(),
    })
}

/// Zero the alpha of every pixel whose center lies outside the circle
/// inscribed in the (square) image.
fn apply_circle_mask(image: &mut RgbaImage) {
    let radius = image.width() as f64 / 2.0;
    let limit = radius * radius;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - radius;
        let dy = y as f64 + 0.5 - radius;
        if dx * dx + dy * dy > limit {
            pixel.0[3] = 0;
        }
    }
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, FaceCropError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| FaceCropError::Encode(e.to_string()))?;
    Ok(buffer)
}
