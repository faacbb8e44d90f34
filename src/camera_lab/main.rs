use crate::camera_lab::core::{init, transition, Effect, Mode, Model, Msg};
use crate::camera_lab::run_effect::RunEffect;
use crate::camera_lab::scheduler::Scheduler;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::image_classifier::interface::ModelLoader;
use crate::library::logger::interface::Logger;
use crate::online_classifier::interface::OnlineClassifierFactory;
use image::RgbImage;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

#[derive(Clone)]
pub struct LabDevices {
    pub camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub model_loader: Arc<dyn ModelLoader>,
    pub classifier_factory: Arc<dyn OnlineClassifierFactory>,
}

/// One mounted camera lab. Owns the model, applies messages and hands the
/// resulting effects to `RunEffect`. Dropping it releases the camera.
pub struct CameraLab {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    model: Model,
    msg_receiver: Receiver<Msg>,
    run_effect: RunEffect,
}

impl CameraLab {
    pub fn new(
        mode: Mode,
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        devices: LabDevices,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let logger = logger.with_namespace("camera_lab");
        let (msg_sender, msg_receiver) = channel();
        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            devices,
            msg_sender,
            scheduler,
        );
        let (model, effects) = init(mode);

        let lab = Self {
            config,
            logger,
            model,
            msg_receiver,
            run_effect,
        };
        lab.execute_effects(effects);
        lab
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let _ = self.logger.info(&format!(
            "\nold model:\n\t{:?}\n\nmsg:\n\t{:?}",
            self.model, msg,
        ));

        let (new_model, effects) = transition(&self.config, self.model.clone(), msg);

        let _ = self.logger.info(&format!(
            "\nnew model:\n\t{:?}\n\neffects:\n\t{:?}",
            new_model, effects
        ));

        self.model = new_model;
        self.execute_effects(effects);
    }

    /// Applies every message that has arrived so far. Returns how many.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.msg_receiver.try_recv() {
            self.dispatch(msg);
            handled += 1;
        }
        handled
    }

    /// Waits for at most `timeout` for one message and applies it.
    #[cfg(test)]
    pub fn poll_timeout(&mut self, timeout: std::time::Duration) -> bool {
        match self.msg_receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch(msg);
                true
            }
            Err(_) => false,
        }
    }

    pub fn preview(&self) -> Option<RgbImage> {
        if !self.model.is_active() {
            return None;
        }
        self.run_effect.preview()
    }

    #[cfg(test)]
    pub fn live_frames(&self) -> usize {
        self.run_effect.live_frames()
    }

    #[cfg(test)]
    pub fn has_session(&self) -> bool {
        self.run_effect.has_session()
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            if effect.is_synchronous() {
                self.run_effect.run_effect(effect);
                continue;
            }
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }
}

impl Drop for CameraLab {
    fn drop(&mut self) {
        let _ = self.logger.info("Tearing down");
        self.run_effect.tear_down();
    }
}
