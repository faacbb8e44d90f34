use crate::device_camera::interface::Frame;
use crate::error::LabError;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub probability: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferMode {
    /// Raw per-label scores before normalisation.
    #[cfg_attr(not(test), allow(dead_code))]
    Logits,
    /// Intermediate feature vector, suitable as online classifier input.
    Embedding,
}

/// Feature vector produced by the pre-trained model for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation(pub Vec<f32>);

impl Activation {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub trait ImageClassifier: Send + Sync {
    /// Labels ranked by descending probability.
    fn classify(&self, frame: &Frame) -> Result<Vec<Classification>, LabError>;
    fn infer(&self, frame: &Frame, mode: InferMode) -> Result<Activation, LabError>;
}

pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn ImageClassifier>, LabError>;
}
