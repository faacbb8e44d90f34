use crate::camera_lab::main::{CameraLab, LabDevices};
use crate::camera_lab::render::LabView;
use crate::camera_lab::scheduler::Scheduler;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::shell::route::Route;
use eframe::egui;
use std::sync::Arc;

/// A mounted route: its heading and a camera lab in the route's mode.
pub struct Page {
    pub route: Route,
    lab: CameraLab,
    view: LabView,
}

impl Page {
    pub fn new(
        route: Route,
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        devices: LabDevices,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let lab = CameraLab::new(
            route.mode(),
            config,
            logger.with_namespace(route.path()),
            devices,
            scheduler,
        );
        Self {
            route,
            lab,
            view: LabView::new(),
        }
    }

    pub fn poll(&mut self) {
        self.lab.poll();
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.label(
            egui::RichText::new(self.route.heading())
                .size(30.0)
                .strong(),
        );
        ui.add_space(24.0);
        self.view.show(&mut self.lab, ui);
    }
}
