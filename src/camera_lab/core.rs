use crate::config::Config;
use crate::error::LabError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Classify with the pre-trained model only.
    #[default]
    Default,
    /// Collect examples for two user-named classes and classify with them.
    Training,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSlot {
    First,
    Second,
}

impl ClassSlot {
    pub fn index(self) -> usize {
        match self {
            ClassSlot::First => 0,
            ClassSlot::Second => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    /// Confidence is clamped to `[0, 1]`; NaN becomes 0.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            label: label.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Activate,
    ClassifyFixed,
    AddExample(ClassSlot),
    PredictOnline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    LoadFailed,
    CameraDenied,
    InferenceFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    /// What the Retry button runs again.
    pub retry: Action,
}

impl Failure {
    pub fn new(error: LabError, retry: Action) -> Self {
        let kind = match error {
            LabError::LoadFailed(_) => FailureKind::LoadFailed,
            LabError::CameraDenied(_) => FailureKind::CameraDenied,
            LabError::InferenceFailed(_) => FailureKind::InferenceFailed,
        };
        Self {
            kind,
            message: error.to_string(),
            retry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CameraPhase {
    #[default]
    Idle,
    Loading,
    Active,
    Failed(Failure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flash {
    pub visible: bool,
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub mode: Mode,
    pub phase: CameraPhase,
    pub class_labels: [String; 2],
    /// Examples recorded per slot since the camera was activated.
    pub examples: [usize; 2],
    pub num_classes: usize,
    pub prediction: Option<Prediction>,
    pub in_flight: Option<Action>,
    pub flash: Flash,
    /// Inference failure raised while the camera is active.
    pub error: Option<Failure>,
}

impl Model {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn is_training(&self) -> bool {
        self.mode == Mode::Training
    }

    pub fn is_active(&self) -> bool {
        self.phase == CameraPhase::Active
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn class_label(&self, slot: ClassSlot) -> &str {
        &self.class_labels[slot.index()]
    }

    pub fn has_empty_classes(&self) -> bool {
        self.is_training() && self.class_labels.iter().any(|label| label.is_empty())
    }

    pub fn has_no_examples(&self) -> bool {
        !self.is_active() || self.num_classes == 0
    }

    pub fn can_toggle_camera(&self) -> bool {
        !self.is_busy()
    }

    pub fn can_add_example(&self, slot: ClassSlot) -> bool {
        self.is_training()
            && self.is_active()
            && !self.is_busy()
            && !self.class_label(slot).is_empty()
    }

    pub fn can_predict(&self) -> bool {
        if !self.is_active() || self.is_busy() {
            return false;
        }
        match self.mode {
            Mode::Default => true,
            Mode::Training => !self.has_empty_classes() && self.num_classes > 0,
        }
    }

    pub fn can_retry(&self) -> bool {
        !self.is_busy() && self.failure().is_some()
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.phase {
            CameraPhase::Failed(failure) => Some(failure),
            _ => self.error.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    CameraTogglePressed,
    ClassLabelChanged(ClassSlot, String),
    AddExamplePressed(ClassSlot),
    PredictPressed,
    RetryPressed,
    DismissErrorPressed,
    SessionOpened(Result<(), LabError>),
    FixedClassifyDone(Result<Prediction, LabError>),
    /// Carries the classifier's class count after the example was stored.
    ExampleAdded(ClassSlot, Result<usize, LabError>),
    /// `None` when the classifier had no classes and nothing was predicted.
    OnlinePredictDone(Result<Option<Prediction>, LabError>),
    FlashElapsed { token: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenSession { online_classifier: bool },
    CloseSession,
    ClassifyFixed,
    AddExample { slot: ClassSlot },
    PredictOnline { class_labels: [String; 2] },
    ScheduleFlashOff { token: u64 },
}

impl Effect {
    /// Runs on the caller's thread instead of a worker.
    pub fn is_synchronous(&self) -> bool {
        matches!(self, Effect::CloseSession)
    }
}

pub fn init(mode: Mode) -> (Model, Vec<Effect>) {
    (Model::new(mode), vec![])
}

pub fn transition(config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match msg {
        Msg::CameraTogglePressed => toggle_camera(model),
        Msg::ClassLabelChanged(slot, label) => {
            let mut model = model;
            model.class_labels[slot.index()] = label;
            (model, vec![])
        }
        Msg::AddExamplePressed(slot) => {
            if !model.can_add_example(slot) {
                return (model, vec![]);
            }
            start_action(model, Action::AddExample(slot))
        }
        Msg::PredictPressed => {
            if !model.can_predict() {
                return (model, vec![]);
            }
            let action = match model.mode {
                Mode::Default => Action::ClassifyFixed,
                Mode::Training => Action::PredictOnline,
            };
            start_action(model, action)
        }
        Msg::RetryPressed => retry(config, model),
        Msg::DismissErrorPressed => {
            let mut model = model;
            model.error = None;
            if matches!(model.phase, CameraPhase::Failed(_)) && !model.is_busy() {
                model.phase = CameraPhase::Idle;
            }
            (model, vec![])
        }
        Msg::SessionOpened(result) => {
            if model.phase != CameraPhase::Loading {
                return (model, vec![]);
            }
            let mut model = model;
            model.in_flight = None;
            model.phase = match result {
                Ok(()) => CameraPhase::Active,
                Err(error) => CameraPhase::Failed(Failure::new(error, Action::Activate)),
            };
            (model, vec![])
        }
        Msg::FixedClassifyDone(result) => finish_action(model, Action::ClassifyFixed, |model| {
            result.map(|prediction| model.prediction = Some(prediction))
        }),
        Msg::ExampleAdded(slot, result) => {
            finish_action(model, Action::AddExample(slot), |model| {
                result.map(|num_classes| {
                    model.examples[slot.index()] += 1;
                    model.num_classes = num_classes;
                })
            })
        }
        Msg::OnlinePredictDone(result) => finish_action(model, Action::PredictOnline, |model| {
            result.map(|prediction| {
                if let Some(prediction) = prediction {
                    model.prediction = Some(prediction);
                }
            })
        }),
        Msg::FlashElapsed { token } => {
            let mut model = model;
            if model.flash.token == token {
                model.flash.visible = false;
            }
            (model, vec![])
        }
    }
}

fn toggle_camera(model: Model) -> (Model, Vec<Effect>) {
    if !model.can_toggle_camera() {
        return (model, vec![]);
    }
    match model.phase {
        CameraPhase::Active => (
            Model {
                phase: CameraPhase::Idle,
                prediction: None,
                examples: [0, 0],
                num_classes: 0,
                error: None,
                ..model
            },
            vec![Effect::CloseSession],
        ),
        CameraPhase::Idle | CameraPhase::Failed(_) => activate(model),
        // Loading always has an action in flight, so this is unreachable in practice.
        CameraPhase::Loading => (model, vec![]),
    }
}

fn activate(model: Model) -> (Model, Vec<Effect>) {
    let online_classifier = model.is_training();
    (
        Model {
            phase: CameraPhase::Loading,
            in_flight: Some(Action::Activate),
            prediction: None,
            examples: [0, 0],
            num_classes: 0,
            error: None,
            ..model
        },
        vec![Effect::OpenSession { online_classifier }],
    )
}

fn retry(config: &Config, model: Model) -> (Model, Vec<Effect>) {
    if !model.can_retry() {
        return (model, vec![]);
    }
    if matches!(model.phase, CameraPhase::Failed(_)) {
        return activate(model);
    }
    let Some(failure) = model.error.clone() else {
        return (model, vec![]);
    };
    let mut model = model;
    model.error = None;
    match failure.retry {
        Action::AddExample(slot) => transition(config, model, Msg::AddExamplePressed(slot)),
        Action::ClassifyFixed | Action::PredictOnline => {
            transition(config, model, Msg::PredictPressed)
        }
        Action::Activate => activate(model),
    }
}

/// Takes the action slot, flashes, and emits the effect that does the work.
fn start_action(model: Model, action: Action) -> (Model, Vec<Effect>) {
    let mut model = model;
    model.in_flight = Some(action);
    model.error = None;
    model.flash = Flash {
        visible: true,
        token: model.flash.token + 1,
    };

    let work = match action {
        Action::ClassifyFixed => Effect::ClassifyFixed,
        Action::AddExample(slot) => Effect::AddExample { slot },
        Action::PredictOnline => Effect::PredictOnline {
            class_labels: model.class_labels.clone(),
        },
        Action::Activate => Effect::OpenSession {
            online_classifier: model.is_training(),
        },
    };

    let token = model.flash.token;
    (model, vec![work, Effect::ScheduleFlashOff { token }])
}

/// Releases the action slot if `action` holds it and records a failure.
fn finish_action(
    model: Model,
    action: Action,
    apply: impl FnOnce(&mut Model) -> Result<(), LabError>,
) -> (Model, Vec<Effect>) {
    if model.in_flight != Some(action) {
        return (model, vec![]);
    }
    let mut model = model;
    model.in_flight = None;
    if let Err(error) = apply(&mut model) {
        model.error = Some(Failure::new(error, action));
    }
    (model, vec![])
}
