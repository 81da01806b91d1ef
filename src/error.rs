use thiserror::Error;

pub type Result<T> = std::result::Result<T, FramepickError>;

#[derive(Debug, Error)]
pub enum FramepickError {
    #[error("empty batch: at least one frame is required")]
    EmptyBatch,
    #[error("unsupported mask shape {shape:?}: {reason}")]
    MaskShape {
        shape: Vec<usize>,
        reason: &'static str,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("failed to serialize bounding boxes: {0}")]
    Json(#[from] serde_json::Error),
}

impl FramepickError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
