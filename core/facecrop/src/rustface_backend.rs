use std::io::Cursor;
use std::path::Path;

use crate::error::FaceCropError;
use crate::face_detector::{FaceBounds, FaceDetector};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The SeetaFace model is supplied by the caller, either as a file path or
/// as raw bytes; no model is bundled with this crate.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace model from a file on disk.
    pub fn from_model_file(path: impl AsRef<Path>) -> Result<Self, FaceCropError> {
        let bytes =
            std::fs::read(path.as_ref()).map_err(|e| FaceCropError::ModelLoad(e.to_string()))?;
        Self::from_model_bytes(&bytes)
    }

    /// Load a SeetaFace model from an in-memory buffer.
    pub fn from_model_bytes(bytes: &[u8]) -> Result<Self, FaceCropError> {
        let model = rustface::read_model(Cursor::new(bytes))
            .map_err(|e| FaceCropError::ModelLoad(e.to_string()))?;
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect()
    }
}
