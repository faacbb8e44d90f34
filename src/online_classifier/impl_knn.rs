use crate::error::LabError;
use crate::image_classifier::interface::Activation;
use crate::online_classifier::interface::{
    ClassPrediction, OnlineClassifier, OnlineClassifierFactory,
};
use std::collections::BTreeMap;

/// k-nearest-neighbour classifier over cosine similarity. Confidences are the
/// share of the k votes each class received.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    examples: Vec<(Activation, usize)>,
}

impl KnnClassifier {
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            examples: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl OnlineClassifier for KnnClassifier {
    fn add_example(&mut self, activation: Activation, class_index: usize) -> Result<(), LabError> {
        if activation.is_empty() {
            return Err(LabError::InferenceFailed("empty activation".to_string()));
        }
        if let Some((first, _)) = self.examples.first() {
            if first.len() != activation.len() {
                return Err(LabError::InferenceFailed(format!(
                    "activation has {} values, expected {}",
                    activation.len(),
                    first.len()
                )));
            }
        }
        self.examples.push((activation, class_index));
        Ok(())
    }

    fn num_classes(&self) -> usize {
        let mut classes: Vec<usize> = self.examples.iter().map(|(_, class)| *class).collect();
        classes.sort_unstable();
        classes.dedup();
        classes.len()
    }

    fn predict_class(&self, activation: &Activation) -> Result<ClassPrediction, LabError> {
        if self.examples.is_empty() {
            return Err(LabError::InferenceFailed(
                "no examples have been added".to_string(),
            ));
        }

        let mut scored: Vec<(f32, usize)> = Vec::with_capacity(self.examples.len());
        for (example, class) in &self.examples {
            if example.len() != activation.len() {
                return Err(LabError::InferenceFailed(format!(
                    "activation has {} values, expected {}",
                    activation.len(),
                    example.len()
                )));
            }
            scored.push((
                cosine_similarity(example.as_slice(), activation.as_slice()),
                *class,
            ));
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let k = self.k.min(scored.len());
        let mut votes: BTreeMap<usize, usize> = self
            .examples
            .iter()
            .map(|(_, class)| (*class, 0))
            .collect();
        for (_, class) in scored.iter().take(k) {
            *votes.entry(*class).or_default() += 1;
        }

        // lowest class index wins ties
        let label = votes
            .iter()
            .fold(None, |best: Option<(usize, usize)>, (&class, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((class, count)),
            })
            .map(|(class, _)| class)
            .unwrap_or_default();

        let confidences = votes
            .into_iter()
            .map(|(class, count)| (class, count as f32 / k as f32))
            .collect();

        Ok(ClassPrediction { label, confidences })
    }
}

pub struct KnnClassifierFactory {
    k: usize,
}

impl KnnClassifierFactory {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl OnlineClassifierFactory for KnnClassifierFactory {
    fn create(&self) -> Box<dyn OnlineClassifier> {
        Box::new(KnnClassifier::new(self.k))
    }
}
