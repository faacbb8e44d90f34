use crate::device_camera::interface::Frame;
use crate::error::LabError;
use crate::image_classifier::interface::{
    Activation, Classification, ImageClassifier, InferMode, ModelLoader,
};
use crate::library::logger::interface::Logger;
use std::sync::Arc;

const BINS_PER_CHANNEL: usize = 4;
const EMBEDDING_LEN: usize = BINS_PER_CHANNEL * BINS_PER_CHANNEL * BINS_PER_CHANNEL;
const SHARPNESS: f32 = 12.0;
// Distance between black and white in RGB space.
const MAX_DISTANCE: f32 = 441.673;

const PROTOTYPES: [(&str, [u8; 3]); 10] = [
    ("banana", [227, 207, 87]),
    ("tomato", [214, 48, 39]),
    ("lime", [120, 190, 33]),
    ("orange", [245, 140, 30]),
    ("sky", [110, 170, 230]),
    ("grape", [111, 45, 168]),
    ("coal", [30, 30, 30]),
    ("snow", [245, 245, 245]),
    ("chocolate", [90, 55, 30]),
    ("flamingo", [240, 130, 170]),
];

/// Pre-trained stand-in that recognises a fixed set of objects by their
/// dominant colour. Embeddings are joint RGB histograms.
#[derive(Debug, Default)]
pub struct ImageClassifierColorPrototype;

impl ImageClassifierColorPrototype {
    pub fn new() -> Self {
        Self
    }

    fn mean_color(frame: &Frame) -> Result<[f32; 3], LabError> {
        let pixels = (frame.width() * frame.height()) as usize;
        if pixels == 0 {
            return Err(LabError::InferenceFailed("empty frame".to_string()));
        }

        let mut sum = [0u64; 3];
        for pixel in frame.image().pixels() {
            for (total, &channel) in sum.iter_mut().zip(pixel.0.iter()) {
                *total += channel as u64;
            }
        }
        Ok(sum.map(|total| total as f32 / pixels as f32))
    }

    fn logits(frame: &Frame) -> Result<Vec<f32>, LabError> {
        let mean = Self::mean_color(frame)?;
        Ok(PROTOTYPES
            .iter()
            .map(|(_, rgb)| {
                let distance = rgb
                    .iter()
                    .zip(mean.iter())
                    .map(|(&p, &m)| (p as f32 - m).powi(2))
                    .sum::<f32>()
                    .sqrt();
                -SHARPNESS * distance / MAX_DISTANCE
            })
            .collect())
    }

    fn histogram(frame: &Frame) -> Result<Vec<f32>, LabError> {
        let pixels = (frame.width() * frame.height()) as usize;
        if pixels == 0 {
            return Err(LabError::InferenceFailed("empty frame".to_string()));
        }

        let mut bins = vec![0f32; EMBEDDING_LEN];
        let bin_width = 256 / BINS_PER_CHANNEL;
        for pixel in frame.image().pixels() {
            let [r, g, b] = pixel.0.map(|c| c as usize / bin_width);
            bins[(r * BINS_PER_CHANNEL + g) * BINS_PER_CHANNEL + b] += 1.0;
        }
        for bin in bins.iter_mut() {
            *bin /= pixels as f32;
        }
        Ok(bins)
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

impl ImageClassifier for ImageClassifierColorPrototype {
    fn classify(&self, frame: &Frame) -> Result<Vec<Classification>, LabError> {
        let probabilities = softmax(&Self::logits(frame)?);

        let mut classifications: Vec<Classification> = PROTOTYPES
            .iter()
            .zip(probabilities)
            .map(|((label, _), probability)| Classification {
                label: label.to_string(),
                probability,
            })
            .collect();
        classifications.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        Ok(classifications)
    }

    fn infer(&self, frame: &Frame, mode: InferMode) -> Result<Activation, LabError> {
        match mode {
            InferMode::Logits => Self::logits(frame).map(Activation),
            InferMode::Embedding => Self::histogram(frame).map(Activation),
        }
    }
}

pub struct ColorPrototypeLoader {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ColorPrototypeLoader {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("model").with_namespace("color_prototype"),
        }
    }
}

impl ModelLoader for ColorPrototypeLoader {
    fn load(&self) -> Result<Arc<dyn ImageClassifier>, LabError> {
        let _ = self.logger.info(&format!(
            "Loaded colour prototype model with {} labels",
            PROTOTYPES.len()
        ));
        Ok(Arc::new(ImageClassifierColorPrototype::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_camera::interface::FrameTracker;
    use image::{Rgb, RgbImage};

    fn solid(rgb: [u8; 3]) -> Frame {
        FrameTracker::new().issue(RgbImage::from_pixel(6, 6, Rgb(rgb)))
    }

    #[test]
    fn test_classify_ranks_closest_prototype_first() {
        let model = ImageClassifierColorPrototype::new();

        let ranked = model.classify(&solid([220, 50, 40])).unwrap();

        assert_eq!(ranked[0].label, "tomato");
        assert_eq!(ranked.len(), PROTOTYPES.len());
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].probability >= pair[1].probability));
        let total: f32 = ranked.iter().map(|c| c.probability).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_embedding_is_normalised_histogram() {
        let model = ImageClassifierColorPrototype::new();

        let activation = model
            .infer(&solid([255, 0, 0]), InferMode::Embedding)
            .unwrap();

        assert_eq!(activation.len(), EMBEDDING_LEN);
        // red lands in the last red bin, first green and blue bins
        assert_eq!(activation.as_slice()[3 * 16], 1.0);
        assert_eq!(activation.as_slice().iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_logits_have_one_entry_per_label() {
        let model = ImageClassifierColorPrototype::new();

        let activation = model.infer(&solid([0, 0, 0]), InferMode::Logits).unwrap();

        assert_eq!(activation.len(), PROTOTYPES.len());
        assert!(activation.as_slice().iter().all(|&l| l <= 0.0));
    }
}
