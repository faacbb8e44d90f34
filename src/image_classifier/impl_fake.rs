use crate::device_camera::interface::Frame;
use crate::error::LabError;
use crate::image_classifier::interface::{
    Activation, Classification, ImageClassifier, InferMode, ModelLoader,
};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

const OBJECTS: [&str; 18] = [
    "dog", "cat", "person", "car", "chair", "table", "bird", "tree", "bicycle", "book", "laptop",
    "phone", "cup", "bottle", "keyboard", "mouse", "plant", "clock",
];

/// Answers with a scripted ranking, or a random object when nothing is scripted.
/// Embeddings are the frame's mean colour scaled to `[0, 1]`.
pub struct ImageClassifierFake {
    scripted: Mutex<Option<Vec<Classification>>>,
    error: Mutex<Option<LabError>>,
    delay: Mutex<Duration>,
}

impl ImageClassifierFake {
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(None),
            error: Mutex::new(None),
            delay: Mutex::new(Duration::ZERO),
        }
    }

    #[cfg(test)]
    pub fn with_classifications(classifications: Vec<Classification>) -> Self {
        let fake = Self::new();
        *fake.scripted.lock().unwrap_or_else(PoisonError::into_inner) = Some(classifications);
        fake
    }

    #[cfg(test)]
    pub fn set_error(&self, error: Option<LabError>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Every classify and infer call takes at least this long.
    #[cfg(test)]
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    fn check_error(&self) -> Result<(), LabError> {
        let delay = *self.delay.lock().unwrap_or_else(PoisonError::into_inner);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        match self
            .error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn random_classification() -> Result<Vec<Classification>, LabError> {
        let mut rng = rand::rng();
        let index_dist = Uniform::new(0, OBJECTS.len())
            .map_err(|e| LabError::InferenceFailed(e.to_string()))?;
        let confidence_dist =
            Uniform::new(0.0, 1.0).map_err(|e| LabError::InferenceFailed(e.to_string()))?;

        Ok(vec![Classification {
            label: OBJECTS[index_dist.sample(&mut rng)].to_string(),
            probability: confidence_dist.sample(&mut rng),
        }])
    }
}

impl Default for ImageClassifierFake {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(&self, _frame: &Frame) -> Result<Vec<Classification>, LabError> {
        self.check_error()?;
        match self
            .scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            Some(classifications) => Ok(classifications),
            None => Self::random_classification(),
        }
    }

    fn infer(&self, frame: &Frame, _mode: InferMode) -> Result<Activation, LabError> {
        self.check_error()?;
        let pixels = (frame.width() * frame.height()).max(1) as f32;
        let mut mean = vec![0f32; 3];
        for pixel in frame.image().pixels() {
            for (total, &channel) in mean.iter_mut().zip(pixel.0.iter()) {
                *total += channel as f32 / 255.0;
            }
        }
        Ok(Activation(mean.into_iter().map(|m| m / pixels).collect()))
    }
}

pub struct ModelLoaderFake {
    classifier: Arc<ImageClassifierFake>,
    error: Mutex<Option<LabError>>,
    loads: AtomicUsize,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ModelLoaderFake {
    pub fn new(
        classifier: Arc<ImageClassifierFake>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            classifier,
            error: Mutex::new(None),
            loads: AtomicUsize::new(0),
            logger: logger.with_namespace("model").with_namespace("fake"),
        }
    }

    #[cfg(test)]
    pub fn set_error(&self, error: Option<LabError>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }

    #[cfg(test)]
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelLoader for ModelLoaderFake {
    fn load(&self) -> Result<Arc<dyn ImageClassifier>, LabError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self
            .error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            let _ = self.logger.warn(&format!("Model load failed: {}", error));
            return Err(error);
        }
        let _ = self.logger.info("Loaded fake model");
        Ok(self.classifier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_camera::interface::FrameTracker;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_scripted_classifications() {
        let fake = ImageClassifierFake::with_classifications(vec![Classification {
            label: "Bottle".to_string(),
            probability: 0.83,
        }]);
        let frame = FrameTracker::new().issue(RgbImage::new(1, 1));

        let ranked = fake.classify(&frame).unwrap();

        assert_eq!(ranked[0].label, "Bottle");
    }

    #[test]
    fn test_random_classification_is_a_known_object() {
        let fake = ImageClassifierFake::new();
        let frame = FrameTracker::new().issue(RgbImage::new(1, 1));

        let ranked = fake.classify(&frame).unwrap();

        assert!(OBJECTS.contains(&ranked[0].label.as_str()));
        assert!((0.0..1.0).contains(&ranked[0].probability));
    }

    #[test]
    fn test_infer_returns_mean_colour() {
        let fake = ImageClassifierFake::new();
        let frame = FrameTracker::new().issue(RgbImage::from_pixel(1, 1, Rgb([255, 0, 51])));

        let activation = fake.infer(&frame, InferMode::Embedding).unwrap();

        assert_eq!(activation, Activation(vec![1.0, 0.0, 0.2]));
    }

    #[test]
    fn test_loader_error() {
        let loader = ModelLoaderFake::new(
            Arc::new(ImageClassifierFake::new()),
            Arc::new(LoggerFake::new()),
        );
        loader.set_error(Some(LabError::LoadFailed("offline".to_string())));

        assert!(matches!(loader.load(), Err(LabError::LoadFailed(_))));
        assert_eq!(loader.loads(), 1);
    }
}
