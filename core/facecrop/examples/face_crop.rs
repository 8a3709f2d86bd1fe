//! Run the full crop cycle on a synthetic portrait.
//!
//! Usage:
//!   cargo run --example face_crop
//!
//! Writes `cropped-face.png` and `circular-cropped-image.png` to the
//! current directory.

use facecrop::{
    AspectRatio, CropSession, FaceBounds, FaceDetector, FaceModel, ImageWidget, MaskMode, Size,
};
use image::{Rgba, RgbaImage};

/// Detector that "finds" the dark disc painted by `synthetic_portrait`.
struct FixedDetector;

impl FaceDetector for FixedDetector {
    fn detect(&self, _gray: &[u8], _width: u32, _height: u32) -> Vec<FaceBounds> {
        vec![FaceBounds {
            x: 330.0,
            y: 160.0,
            width: 140.0,
            height: 140.0,
            confidence: 9.0,
        }]
    }
}

/// Light background with a dark disc standing in for a face.
fn synthetic_portrait(width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([225, 215, 200, 255]));
    let (cx, cy, r) = (400.0, 230.0, 70.0);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        if dx * dx + dy * dy < r * r {
            *pixel = Rgba([120, 90, 70, 255]);
        }
    }
    img
}

fn main() {
    let image = synthetic_portrait(800, 600);

    let mut widget = ImageWidget::new(image.clone(), Size::new(400, 300)).unwrap();
    widget.finish_layout();

    let model = FaceModel::loaded(Box::new(FixedDetector));
    let mut session = CropSession::new(widget);

    let faces = session.detect(&model, &image).unwrap();
    println!("detected {faces} face(s)");

    let applied = session.align_crop_box().unwrap();
    println!(
        "crop box (display space): {:.0},{:.0} {:.0}x{:.0}",
        applied.x, applied.y, applied.width, applied.height
    );

    session.set_aspect_ratio(AspectRatio::Square).unwrap();
    for mask in [MaskMode::None, MaskMode::Circle] {
        let exported = session.export(mask).unwrap();
        std::fs::write(exported.filename, &exported.data).unwrap();
        println!(
            "wrote {} ({}x{}, {} bytes)",
            exported.filename,
            exported.width,
            exported.height,
            exported.data.len()
        );
    }
}
