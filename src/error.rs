use thiserror::Error;

/// Failure of a single analysis call. Both kinds end up as the
/// `{"error": ...}` object; the distinction matters to HTTP status codes.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("{0}")]
    Processing(String),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input is empty")]
    Empty,
    #[error("image is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

impl AnalyzeError {
    pub(crate) fn processing(message: impl Into<String>) -> Self {
        AnalyzeError::Processing(message.into())
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, AnalyzeError::Decode(_))
    }
}
