use crate::camera_lab::core::{Mode, Model, Prediction};

pub const WAITING_MESSAGE: &str = "Waiting for an image to predict...";
pub const SPECIFY_CLASSES_MESSAGE: &str = "Please specify two classes to enable prediction";
pub const ADD_EXAMPLES_MESSAGE: &str = "Please add examples to enable prediction";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    PrettySure,
    KindaSure,
    NotSoSure,
    NoIdea,
}

impl ConfidenceBand {
    pub fn from_probability(probability: f32) -> Self {
        if probability > 0.8 {
            ConfidenceBand::PrettySure
        } else if probability > 0.5 {
            ConfidenceBand::KindaSure
        } else if probability > 0.2 {
            ConfidenceBand::NotSoSure
        } else {
            ConfidenceBand::NoIdea
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            ConfidenceBand::PrettySure => "and I am pretty sure",
            ConfidenceBand::KindaSure => "and I am kinda sure",
            ConfidenceBand::NotSoSure => "but I am not so sure",
            ConfidenceBand::NoIdea => "but I have really no idea",
        }
    }
}

pub fn result_message(prediction: &Prediction) -> String {
    format!(
        "I think it might be a {} {}.",
        prediction.label,
        ConfidenceBand::from_probability(prediction.confidence).phrase()
    )
}

/// Missing class names win over missing examples, which win over a prediction.
pub fn status_message(
    prediction: Option<&Prediction>,
    has_empty_classes: bool,
    no_examples: bool,
    mode: Mode,
) -> String {
    match (mode, prediction) {
        (Mode::Default, Some(prediction)) => result_message(prediction),
        (Mode::Default, None) => WAITING_MESSAGE.to_string(),
        (Mode::Training, _) if has_empty_classes => SPECIFY_CLASSES_MESSAGE.to_string(),
        (Mode::Training, _) if no_examples => ADD_EXAMPLES_MESSAGE.to_string(),
        (Mode::Training, Some(prediction)) => result_message(prediction),
        (Mode::Training, None) => WAITING_MESSAGE.to_string(),
    }
}

impl Model {
    pub fn status_message(&self) -> String {
        status_message(
            self.prediction.as_ref(),
            self.has_empty_classes(),
            self.has_no_examples(),
            self.mode,
        )
    }
}
