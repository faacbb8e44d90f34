use crate::camera_lab::core::{
    init, transition, Action, CameraPhase, ClassSlot, Effect, FailureKind, Mode, Model, Msg,
    Prediction,
};
use crate::config::Config;
use crate::error::LabError;

fn run(model: Model, msgs: Vec<Msg>) -> (Model, Vec<Effect>) {
    let config = Config::default();
    msgs.into_iter()
        .fold((model, vec![]), |(model, _), msg| transition(&config, model, msg))
}

fn active(mode: Mode) -> Model {
    let (model, _) = run(
        Model::new(mode),
        vec![Msg::CameraTogglePressed, Msg::SessionOpened(Ok(()))],
    );
    model
}

fn trained() -> Model {
    let (model, _) = run(
        active(Mode::Training),
        vec![
            Msg::ClassLabelChanged(ClassSlot::First, "Bottle".to_string()),
            Msg::ClassLabelChanged(ClassSlot::Second, "Pencil".to_string()),
            Msg::AddExamplePressed(ClassSlot::First),
            Msg::ExampleAdded(ClassSlot::First, Ok(1)),
        ],
    );
    model
}

#[test]
fn test_init() {
    let (model, effects) = init(Mode::Training);

    assert_eq!(model.mode, Mode::Training);
    assert_eq!(model.phase, CameraPhase::Idle);
    assert_eq!(model.class_labels, [String::new(), String::new()]);
    assert_eq!(model.examples, [0, 0]);
    assert!(effects.is_empty());
}

#[test]
fn test_activation_flow() {
    let config = Config::default();
    let (model, effects) = transition(&config, Model::new(Mode::Default), Msg::CameraTogglePressed);

    assert_eq!(model.phase, CameraPhase::Loading);
    assert_eq!(model.in_flight, Some(Action::Activate));
    assert_eq!(
        effects,
        vec![Effect::OpenSession {
            online_classifier: false
        }]
    );

    let (model, effects) = transition(&config, model, Msg::SessionOpened(Ok(())));

    assert!(model.is_active());
    assert!(!model.is_busy());
    assert!(effects.is_empty());
}

#[test]
fn test_training_activation_asks_for_online_classifier() {
    let (_, effects) = run(Model::new(Mode::Training), vec![Msg::CameraTogglePressed]);

    assert_eq!(
        effects,
        vec![Effect::OpenSession {
            online_classifier: true
        }]
    );
}

#[test]
fn test_toggle_ignored_while_loading() {
    let (model, effects) = run(
        Model::new(Mode::Default),
        vec![Msg::CameraTogglePressed, Msg::CameraTogglePressed],
    );

    assert_eq!(model.phase, CameraPhase::Loading);
    assert!(effects.is_empty());
}

#[test]
fn test_denied_camera_is_a_distinct_failure() {
    let (model, _) = run(
        Model::new(Mode::Default),
        vec![
            Msg::CameraTogglePressed,
            Msg::SessionOpened(Err(LabError::CameraDenied("permission denied".to_string()))),
        ],
    );

    let failure = model.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::CameraDenied);
    assert_eq!(failure.retry, Action::Activate);
    assert!(matches!(model.phase, CameraPhase::Failed(_)));
    assert!(!model.is_busy());
    assert!(model.can_retry());
    assert!(!model.can_predict());
}

#[test]
fn test_load_failure_retry_activates_again() {
    let (model, effects) = run(
        Model::new(Mode::Training),
        vec![
            Msg::CameraTogglePressed,
            Msg::SessionOpened(Err(LabError::LoadFailed("network".to_string()))),
            Msg::RetryPressed,
        ],
    );

    assert_eq!(model.phase, CameraPhase::Loading);
    assert_eq!(
        effects,
        vec![Effect::OpenSession {
            online_classifier: true
        }]
    );
}

#[test]
fn test_dismiss_failed_activation_returns_to_idle() {
    let (model, _) = run(
        Model::new(Mode::Default),
        vec![
            Msg::CameraTogglePressed,
            Msg::SessionOpened(Err(LabError::LoadFailed("network".to_string()))),
            Msg::DismissErrorPressed,
        ],
    );

    assert_eq!(model.phase, CameraPhase::Idle);
    assert!(model.failure().is_none());
}

#[test]
fn test_late_session_after_toggle_off_is_ignored() {
    let (model, effects) = run(
        active(Mode::Default),
        vec![Msg::CameraTogglePressed, Msg::SessionOpened(Ok(()))],
    );

    assert_eq!(model.phase, CameraPhase::Idle);
    assert!(effects.is_empty());
}

#[test]
fn test_toggle_off_resets_examples_and_prediction() {
    let (model, effects) = run(
        trained(),
        vec![
            Msg::PredictPressed,
            Msg::OnlinePredictDone(Ok(Some(Prediction::new("Bottle", 1.0)))),
            Msg::CameraTogglePressed,
        ],
    );

    assert_eq!(effects, vec![Effect::CloseSession]);
    assert_eq!(model.phase, CameraPhase::Idle);
    assert_eq!(model.examples, [0, 0]);
    assert_eq!(model.num_classes, 0);
    assert_eq!(model.prediction, None);
    assert_eq!(model.class_labels[0], "Bottle");
}

#[test]
fn test_predict_in_default_mode_classifies_with_fixed_model() {
    let config = Config::default();
    let (model, effects) = transition(&config, active(Mode::Default), Msg::PredictPressed);

    assert_eq!(model.in_flight, Some(Action::ClassifyFixed));
    assert!(model.flash.visible);
    assert_eq!(
        effects,
        vec![
            Effect::ClassifyFixed,
            Effect::ScheduleFlashOff {
                token: model.flash.token
            }
        ]
    );

    let (model, _) = transition(
        &config,
        model,
        Msg::FixedClassifyDone(Ok(Prediction::new("Bottle", 0.83))),
    );

    assert_eq!(model.prediction, Some(Prediction::new("Bottle", 0.83)));
    assert!(!model.is_busy());
}

#[test]
fn test_single_action_slot() {
    let config = Config::default();
    let (model, _) = transition(&config, trained(), Msg::PredictPressed);

    let (model, effects) = transition(&config, model, Msg::AddExamplePressed(ClassSlot::Second));
    assert!(effects.is_empty());
    let (model, effects) = transition(&config, model, Msg::PredictPressed);
    assert!(effects.is_empty());
    let (model, effects) = transition(&config, model, Msg::CameraTogglePressed);
    assert!(effects.is_empty());

    assert_eq!(model.in_flight, Some(Action::PredictOnline));
    assert!(model.is_active());
}

#[test]
fn test_completion_for_other_action_is_ignored() {
    let config = Config::default();
    let (model, _) = transition(&config, trained(), Msg::PredictPressed);

    let (model, _) = transition(&config, model, Msg::ExampleAdded(ClassSlot::First, Ok(2)));

    assert_eq!(model.examples, [1, 0]);
    assert_eq!(model.in_flight, Some(Action::PredictOnline));
}

#[test]
fn test_add_example_counts_per_slot() {
    let (model, effects) = run(trained(), vec![Msg::AddExamplePressed(ClassSlot::Second)]);

    assert_eq!(
        effects[0],
        Effect::AddExample {
            slot: ClassSlot::Second
        }
    );

    let (model, _) = run(model, vec![Msg::ExampleAdded(ClassSlot::Second, Ok(2))]);

    assert_eq!(model.examples, [1, 1]);
    assert_eq!(model.num_classes, 2);
}

#[test]
fn test_add_example_requires_class_name() {
    let (model, effects) = run(
        active(Mode::Training),
        vec![
            Msg::ClassLabelChanged(ClassSlot::First, "Bottle".to_string()),
            Msg::AddExamplePressed(ClassSlot::Second),
        ],
    );

    assert!(effects.is_empty());
    assert!(model.can_add_example(ClassSlot::First));
    assert!(!model.can_add_example(ClassSlot::Second));
}

#[test]
fn test_predict_online_carries_current_labels() {
    let (_, effects) = run(trained(), vec![Msg::PredictPressed]);

    assert_eq!(
        effects[0],
        Effect::PredictOnline {
            class_labels: ["Bottle".to_string(), "Pencil".to_string()]
        }
    );
}

#[test]
fn test_skipped_online_prediction_keeps_old_prediction() {
    let (model, _) = run(
        trained(),
        vec![
            Msg::PredictPressed,
            Msg::OnlinePredictDone(Ok(Some(Prediction::new("Pencil", 0.6)))),
            Msg::PredictPressed,
            Msg::OnlinePredictDone(Ok(None)),
        ],
    );

    assert_eq!(model.prediction, Some(Prediction::new("Pencil", 0.6)));
    assert!(!model.is_busy());
}

#[test]
fn test_inference_failure_is_recorded_and_retried() {
    let config = Config::default();
    let (model, _) = run(
        trained(),
        vec![
            Msg::AddExamplePressed(ClassSlot::Second),
            Msg::ExampleAdded(
                ClassSlot::Second,
                Err(LabError::InferenceFailed("boom".to_string())),
            ),
        ],
    );

    let failure = model.error.clone().unwrap();
    assert_eq!(failure.kind, FailureKind::InferenceFailed);
    assert_eq!(failure.retry, Action::AddExample(ClassSlot::Second));
    assert!(model.is_active());
    assert_eq!(model.examples, [1, 0]);

    let (model, effects) = transition(&config, model, Msg::RetryPressed);

    assert!(model.error.is_none());
    assert_eq!(model.in_flight, Some(Action::AddExample(ClassSlot::Second)));
    assert_eq!(
        effects[0],
        Effect::AddExample {
            slot: ClassSlot::Second
        }
    );
}

#[test]
fn test_dismiss_inference_failure_keeps_camera() {
    let (model, _) = run(
        active(Mode::Default),
        vec![
            Msg::PredictPressed,
            Msg::FixedClassifyDone(Err(LabError::InferenceFailed("boom".to_string()))),
            Msg::DismissErrorPressed,
        ],
    );

    assert!(model.error.is_none());
    assert!(model.is_active());
}

#[test]
fn test_stale_flash_timer_is_ignored() {
    let (model, _) = run(active(Mode::Default), vec![Msg::PredictPressed]);
    let first = model.flash.token;
    let (model, _) = run(
        model,
        vec![
            Msg::FixedClassifyDone(Ok(Prediction::new("Bottle", 0.9))),
            Msg::PredictPressed,
        ],
    );

    let (model, _) = run(model, vec![Msg::FlashElapsed { token: first }]);
    assert!(model.flash.visible);

    let current = model.flash.token;
    let (model, _) = run(model, vec![Msg::FlashElapsed { token: current }]);
    assert!(!model.flash.visible);
}

#[test]
fn test_button_enablement() {
    let idle = Model::new(Mode::Training);
    assert!(idle.can_toggle_camera());
    assert!(!idle.can_predict());
    assert!(!idle.can_add_example(ClassSlot::First));

    let (named, _) = run(
        active(Mode::Training),
        vec![
            Msg::ClassLabelChanged(ClassSlot::First, "Bottle".to_string()),
            Msg::ClassLabelChanged(ClassSlot::Second, "Pencil".to_string()),
        ],
    );
    assert!(named.can_add_example(ClassSlot::First));
    assert!(named.can_add_example(ClassSlot::Second));
    assert!(!named.can_predict());

    assert!(trained().can_predict());

    let (cleared, _) = run(
        trained(),
        vec![Msg::ClassLabelChanged(ClassSlot::Second, String::new())],
    );
    assert!(!cleared.can_predict());

    assert!(active(Mode::Default).can_predict());
    assert!(!Model::new(Mode::Default).can_predict());
}

#[test]
fn test_prediction_confidence_is_clamped() {
    assert_eq!(Prediction::new("a", 1.5).confidence, 1.0);
    assert_eq!(Prediction::new("a", -0.2).confidence, 0.0);
    assert_eq!(Prediction::new("a", f32::NAN).confidence, 0.0);
}
