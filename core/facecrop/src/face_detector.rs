/// Bounding box of a detected face, in source-image pixel coordinates.
#[derive(Debug, Clone)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

impl FaceBounds {
    pub(crate) fn rect(&self) -> crate::geometry::Rect {
        crate::geometry::Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to plug in any detection engine (ONNX, dlib, a
/// remote service) and hand it to [`crate::FaceModel::finish_loading`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height`
    /// bytes. Detections are returned in the backend's own order; callers
    /// that need a single face should use [`best_face`].
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds>;
}

/// Pick the highest-confidence detection, with the first box winning ties.
/// Returns `None` for an empty slice.
pub fn best_face(detections: &[FaceBounds]) -> Option<&FaceBounds> {
    detections
        .iter()
        .reduce(|best, cand| if cand.confidence > best.confidence { cand } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(confidence: f64) -> FaceBounds {
        FaceBounds {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            confidence,
        }
    }

    #[test]
    fn best_face_prefers_highest_confidence() {
        let faces = vec![face(1.0), face(9.0), face(3.0)];
        let best = best_face(&faces).unwrap();
        assert_eq!(best.confidence, 9.0);
    }

    #[test]
    fn best_face_tie_keeps_first() {
        let mut first = face(5.0);
        first.x = 1.0;
        let faces = vec![first, face(5.0)];
        assert_eq!(best_face(&faces).unwrap().x, 1.0);
    }

    #[test]
    fn best_face_empty_is_none() {
        assert!(best_face(&[]).is_none());
    }
}
