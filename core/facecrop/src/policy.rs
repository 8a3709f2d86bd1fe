use crate::error::FaceCropError;
use crate::face_detector::{best_face, FaceBounds};
use crate::geometry::{Rect, Size};
use crate::{AspectRatio, CropStrategy};

/// Decide the crop box for the given detections, in source space.
///
/// With no detections the result is the largest centered rectangle matching
/// `aspect` within `source` — absence of a face is a fallback, not a
/// failure. Otherwise the highest-confidence detection anchors the box
/// according to `strategy`. The result always lies within
/// `[0, source.width] × [0, source.height]`.
pub fn select_crop_box(
    detections: &[FaceBounds],
    source: Size,
    aspect: AspectRatio,
    strategy: CropStrategy,
) -> Result<Rect, FaceCropError> {
    source.ensure_nonzero()?;

    let Some(face) = best_face(detections) else {
        return Ok(centered_default(source, aspect));
    };

    let boxed = match strategy {
        CropStrategy::Tight => face.rect(),
        CropStrategy::PaddedCentered { pad_factor } => {
            let (cx, cy) = face.rect().center();
            let width = (face.width * pad_factor).min(source.width as f64);
            let height = (face.height * pad_factor).min(source.height as f64);
            Rect::new(cx - width / 2.0, cy - height / 2.0, width, height)
        }
    };

    Ok(boxed.clamp_within(source))
}

/// Largest rectangle matching `aspect` that fits in `source`, centered on
/// both axes.
pub fn centered_default(source: Size, aspect: AspectRatio) -> Rect {
    let ratio = aspect.ratio();
    let (width, height) = if source.aspect() > ratio {
        // Source is wider than the target ratio: constrain by height.
        (source.height as f64 * ratio, source.height as f64)
    } else {
        (source.width as f64, source.width as f64 / ratio)
    };

    Rect::new(
        (source.width as f64 - width) / 2.0,
        (source.height as f64 - height) / 2.0,
        width,
        height,
    )
}
