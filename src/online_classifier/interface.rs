use crate::error::LabError;
use crate::image_classifier::interface::Activation;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassPrediction {
    /// Index of the winning class, as passed to `add_example`.
    pub label: usize,
    /// Confidence per known class index, each in `[0, 1]`.
    pub confidences: BTreeMap<usize, f32>,
}

impl ClassPrediction {
    pub fn confidence(&self) -> f32 {
        self.confidences.get(&self.label).copied().unwrap_or(0.0)
    }
}

/// Learns labelled activations at runtime and classifies new ones by
/// similarity to what it has seen.
pub trait OnlineClassifier: Send {
    fn add_example(&mut self, activation: Activation, class_index: usize) -> Result<(), LabError>;
    /// Number of distinct classes with at least one example.
    fn num_classes(&self) -> usize;
    fn predict_class(&self, activation: &Activation) -> Result<ClassPrediction, LabError>;
}

pub trait OnlineClassifierFactory: Send + Sync {
    /// Always a fresh classifier with no examples.
    fn create(&self) -> Box<dyn OnlineClassifier>;
}
