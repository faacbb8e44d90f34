use crate::camera_lab::core::{ClassSlot, Effect, Msg, Prediction};
use crate::camera_lab::main::LabDevices;
use crate::camera_lab::scheduler::Scheduler;
use crate::config::Config;
use crate::device_camera::interface::CameraStream;
use crate::error::LabError;
use crate::image_classifier::interface::{ImageClassifier, InferMode};
use crate::library::logger::interface::Logger;
use crate::online_classifier::interface::OnlineClassifier;
use image::RgbImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

/// Handles that exist only while the camera is on.
pub struct Session {
    stream: Box<dyn CameraStream>,
    model: Arc<dyn ImageClassifier>,
    online: Option<Box<dyn OnlineClassifier>>,
}

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    devices: LabDevices,
    session: Arc<Mutex<Option<Session>>>,
    msg_sender: Sender<Msg>,
    scheduler: Arc<dyn Scheduler>,
    torn_down: Arc<AtomicBool>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        devices: LabDevices,
        msg_sender: Sender<Msg>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            config,
            logger,
            devices,
            session: Arc::new(Mutex::new(None)),
            msg_sender,
            scheduler,
            torn_down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::OpenSession { online_classifier } => {
                let opened = self.open_session(online_classifier);
                self.report("Opening camera session", &opened);
                self.send(Msg::SessionOpened(opened));
            }
            Effect::CloseSession => self.close_session(),
            Effect::ClassifyFixed => {
                let classified = self.classify_fixed();
                self.report("Classifying frame", &classified);
                self.release_if_torn_down();
                self.send(Msg::FixedClassifyDone(classified));
            }
            Effect::AddExample { slot } => {
                let added = self.add_example(slot);
                self.report("Adding example", &added);
                self.release_if_torn_down();
                self.send(Msg::ExampleAdded(slot, added));
            }
            Effect::PredictOnline { class_labels } => {
                let predicted = self.predict_online(&class_labels);
                self.report("Predicting with trained classes", &predicted);
                self.release_if_torn_down();
                self.scheduler.next_frame();
                self.send(Msg::OnlinePredictDone(predicted));
            }
            Effect::ScheduleFlashOff { token } => {
                std::thread::sleep(self.config.flash_duration());
                if self.is_torn_down() {
                    let _ = self.logger.info("Flash timer cancelled");
                    return;
                }
                self.send(Msg::FlashElapsed { token });
            }
        }
    }

    /// Releases the camera and stops pending timers from reporting back.
    /// Never blocks: a session held by a running action is released by that
    /// action's worker once it finishes.
    pub fn tear_down(&self) {
        self.torn_down.store(true, Ordering::SeqCst);
        let mut guard = match self.session.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                let _ = self
                    .logger
                    .info("Session busy, releasing after the running action");
                return;
            }
        };
        if guard.take().is_some() {
            let _ = self.logger.info("Camera and models released");
        }
    }

    /// Grabs one frame for display without blocking on a running action.
    pub fn preview(&self) -> Option<RgbImage> {
        let guard = match self.session.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        let frame = guard.as_ref()?.stream.capture().ok()?;
        let image = frame.image().clone();
        frame.dispose();
        Some(image)
    }

    /// Frames captured during the current session that are still held.
    #[cfg(test)]
    pub fn live_frames(&self) -> usize {
        self.lock_session()
            .as_ref()
            .map(|session| session.stream.live_frames())
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub fn has_session(&self) -> bool {
        self.lock_session().is_some()
    }

    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    fn report<T>(&self, action: &str, result: &Result<T, LabError>) {
        if let Err(error) = result {
            self.logger.failure(action, error);
        }
    }

    fn send(&self, msg: Msg) {
        if self.msg_sender.send(msg).is_err() {
            let _ = self.logger.warn("Lab is gone, dropping message");
            return;
        }
        self.scheduler.wake();
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_session(&self, online_classifier: bool) -> Result<(), LabError> {
        let online = online_classifier.then(|| self.devices.classifier_factory.create());
        let model = self.devices.model_loader.load()?;
        let stream = self.devices.camera.open(&self.config.camera_options())?;

        let session = Session {
            stream,
            model,
            online,
        };

        if self.is_torn_down() {
            let _ = self.logger.info("Lab closed while loading, releasing camera");
            return Ok(());
        }

        *self.lock_session() = Some(session);
        Ok(())
    }

    /// Runs after a worker has let go of the session.
    fn release_if_torn_down(&self) {
        if !self.is_torn_down() {
            return;
        }
        if self.lock_session().take().is_some() {
            let _ = self
                .logger
                .info("Camera and models released after the running action");
        }
    }

    fn close_session(&self) {
        if self.lock_session().take().is_some() {
            let _ = self.logger.info("Camera and models released");
        }
    }

    fn classify_fixed(&self) -> Result<Prediction, LabError> {
        let guard = self.lock_session();
        let session = guard.as_ref().ok_or_else(not_active)?;

        let frame = session.stream.capture()?;
        let ranked = session.model.classify(&frame);
        frame.dispose();

        let top = ranked?
            .into_iter()
            .next()
            .ok_or_else(|| LabError::InferenceFailed("model returned no labels".to_string()))?;
        Ok(Prediction::new(top.label, top.probability))
    }

    fn add_example(&self, slot: ClassSlot) -> Result<usize, LabError> {
        let mut guard = self.lock_session();
        let session = guard.as_mut().ok_or_else(not_active)?;
        let online = session.online.as_mut().ok_or_else(no_online_classifier)?;

        let frame = session.stream.capture()?;
        let activation = session.model.infer(&frame, InferMode::Embedding);
        frame.dispose();

        online.add_example(activation?, slot.index())?;
        Ok(online.num_classes())
    }

    fn predict_online(&self, class_labels: &[String; 2]) -> Result<Option<Prediction>, LabError> {
        let guard = self.lock_session();
        let session = guard.as_ref().ok_or_else(not_active)?;
        let online = session.online.as_ref().ok_or_else(no_online_classifier)?;

        if online.num_classes() == 0 {
            let _ = self.logger.info("No classes learned yet, skipping prediction");
            return Ok(None);
        }

        let frame = session.stream.capture()?;
        let activation = session.model.infer(&frame, InferMode::Embedding);
        frame.dispose();

        let predicted = online.predict_class(&activation?)?;
        let label = class_labels.get(predicted.label).ok_or_else(|| {
            LabError::InferenceFailed(format!("unknown class index {}", predicted.label))
        })?;

        Ok(Some(Prediction::new(label.clone(), predicted.confidence())))
    }
}

fn not_active() -> LabError {
    LabError::InferenceFailed("camera is not active".to_string())
}

fn no_online_classifier() -> LabError {
    LabError::InferenceFailed("no classifier to train".to_string())
}
