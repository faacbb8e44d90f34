use thiserror::Error;

/// Failures raised by the camera, the pre-trained model and the online classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabError {
    #[error("Failed to load model: {0}")]
    LoadFailed(String),
    #[error("Camera unavailable: {0}")]
    CameraDenied(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}
