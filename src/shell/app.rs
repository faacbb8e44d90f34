use crate::camera_lab::main::LabDevices;
use crate::camera_lab::scheduler::{Scheduler, SchedulerEgui};
use crate::config::Config;
use crate::design_system::style;
use crate::library::logger::interface::Logger;
use crate::shell::page::Page;
use crate::shell::route::{Route, NAVIGATION};
use eframe::egui;
use std::sync::Arc;

pub const APP_TITLE: &str = "Machine Learning Web App";
pub const APP_NAME: &str = "smartive Lab - DiFe 21";
pub const APP_DESCRIPTION: &str = "Digital Festival 2021 Lab 'Machine Learning Web App'";
const HOMEPAGE: &str = "https://smartive.ch/";

const NAV_HEIGHT: f32 = 64.0;
const CONTENT_WIDTH: f32 = 680.0;
const UNDERLINE_SECS: f32 = 0.25;

pub struct ShellApp {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    devices: LabDevices,
    scheduler: Arc<dyn Scheduler>,
    page: Page,
}

impl ShellApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        route: Route,
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        devices: LabDevices,
    ) -> Self {
        style::apply_visuals(&cc.egui_ctx);
        let scheduler: Arc<dyn Scheduler> = Arc::new(SchedulerEgui::new(cc.egui_ctx.clone()));
        let logger = logger.with_namespace("shell");
        let _ = logger.info(&format!("{} ({}) starting on {}", APP_TITLE, APP_NAME, route.path()));

        let page = Page::new(
            route,
            config.clone(),
            logger.clone(),
            devices.clone(),
            scheduler.clone(),
        );

        Self {
            config,
            logger,
            devices,
            scheduler,
            page,
        }
    }

    /// Replaces the mounted page. The old page's camera is released.
    fn navigate(&mut self, route: Route) {
        if route == self.page.route {
            return;
        }
        let _ = self
            .logger
            .info(&format!("Navigating {} -> {}", self.page.route.path(), route.path()));
        self.page = Page::new(
            route,
            self.config.clone(),
            self.logger.clone(),
            self.devices.clone(),
            self.scheduler.clone(),
        );
    }

    fn show_navigation(&self, ui: &mut egui::Ui) -> Option<Route> {
        let palette = style::palette();
        let current_path = self.page.route.path();
        let mut clicked = None;
        let mut active_rect = None;

        ui.horizontal_centered(|ui| {
            ui.hyperlink_to(
                egui::RichText::new("smartive").size(20.0).strong(),
                HOMEPAGE,
            )
            .on_hover_text(APP_DESCRIPTION);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 32.0;
                for route in NAVIGATION.iter().rev() {
                    let active = route.is_active(current_path);
                    let color = if active {
                        palette.text_primary
                    } else {
                        palette.text_muted
                    };
                    let entry = egui::Label::new(
                        egui::RichText::new(route.nav_name()).size(14.0).color(color),
                    )
                    .sense(egui::Sense::click());
                    let response = ui.add(entry);
                    if active {
                        active_rect = Some(response.rect);
                    }
                    if response.clicked() {
                        clicked = Some(*route);
                    }
                }
            });
        });

        if let Some(rect) = active_rect {
            let ctx = ui.ctx();
            let left = ctx.animate_value_with_time(
                egui::Id::new("nav-underline-left"),
                rect.left(),
                UNDERLINE_SECS,
            );
            let right = ctx.animate_value_with_time(
                egui::Id::new("nav-underline-right"),
                rect.right(),
                UNDERLINE_SECS,
            );
            let y = ui.max_rect().bottom() - 1.0;
            ui.painter().line_segment(
                [egui::pos2(left - 4.0, y), egui::pos2(right + 4.0, y)],
                egui::Stroke::new(2.0, palette.accent_hover),
            );
        }

        clicked
    }
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.page.poll();

        let palette = style::palette();
        let navigation = egui::TopBottomPanel::top("navigation")
            .exact_height(NAV_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(palette.bg_surface)
                    .inner_margin(egui::Margin::symmetric(24.0, 0.0)),
            )
            .show(ctx, |ui| self.show_navigation(ui))
            .inner;

        if let Some(route) = navigation {
            self.navigate(route);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(CONTENT_WIDTH);
                    ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                        self.page.show(ui);
                    });
                });
            });
        });
    }
}
