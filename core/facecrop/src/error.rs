use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaceCropError {
    #[error("image surface has zero dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("face detection model has not finished loading")]
    ModelNotReady,

    #[error("crop widget has not finished laying out the current image")]
    LayoutNotReady,

    #[error("crop region has zero area")]
    EmptyCrop,

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("failed to load face detection model: {0}")]
    ModelLoad(String),
}

impl FaceCropError {
    /// Whether the operation may succeed if simply retried once the
    /// precondition is satisfied (model loaded, layout finished). All other
    /// errors require new input from the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelNotReady | Self::LayoutNotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_errors_are_retryable() {
        assert!(FaceCropError::ModelNotReady.is_retryable());
        assert!(FaceCropError::LayoutNotReady.is_retryable());
    }

    #[test]
    fn input_errors_are_not_retryable() {
        assert!(!FaceCropError::EmptyCrop.is_retryable());
        assert!(
            !FaceCropError::InvalidDimension {
                width: 0,
                height: 10
            }
            .is_retryable()
        );
        assert!(!FaceCropError::Decode("bad".into()).is_retryable());
    }
}
