use crate::camera_lab::core::{CameraPhase, ClassSlot, FailureKind, Model, Msg};
use crate::camera_lab::main::CameraLab;
use crate::design_system::button::{Button, ButtonVariant};
use crate::design_system::input::TextInput;
use crate::design_system::style;
use eframe::egui;
use std::time::Duration;

const CAMERA_SIZE: egui::Vec2 = egui::vec2(640.0, 400.0);
const PREVIEW_INTERVAL: Duration = Duration::from_millis(33);
const FLASH_OPACITY: f32 = 0.7;
const FLASH_FADE_SECS: f32 = 0.1;

const CLASS_INPUTS: [(ClassSlot, &str, &str, &str); 2] = [
    (ClassSlot::First, "class1", "Class 1", "e.g. Bottle"),
    (ClassSlot::Second, "class2", "Class 2", "e.g. Pencil"),
];

/// Largest rect with the image's aspect ratio that fits centred in `bounds`.
pub fn fit_within(image_size: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / image_size.x).min(bounds.height() / image_size.y);
    egui::Rect::from_center_size(bounds.center(), image_size * scale)
}

pub fn failure_title(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::LoadFailed => "The model could not be loaded.",
        FailureKind::CameraDenied => "The camera could not be opened.",
        FailureKind::InferenceFailed => "The image could not be processed.",
    }
}

#[derive(Default)]
pub struct LabView {
    preview: Option<egui::TextureHandle>,
}

impl LabView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, lab: &mut CameraLab, ui: &mut egui::Ui) {
        self.refresh_preview(lab, ui.ctx());

        let model = lab.model().clone();
        let mut msgs = Vec::new();

        ui.spacing_mut().item_spacing.y = 16.0;

        if model.is_training() {
            show_class_inputs(&model, ui, &mut msgs);
        }
        self.show_camera(&model, ui, &mut msgs);

        if ui
            .add(
                Button::new("Predict image")
                    .variant(ButtonVariant::Large)
                    .disabled(!model.can_predict()),
            )
            .clicked()
        {
            msgs.push(Msg::PredictPressed);
        }

        if let Some(error) = &model.error {
            show_failure(error.kind, &error.message, &model, ui, &mut msgs);
        }

        ui.label(egui::RichText::new(model.status_message()).size(15.0));

        for msg in msgs {
            lab.dispatch(msg);
        }
    }

    fn refresh_preview(&mut self, lab: &CameraLab, ctx: &egui::Context) {
        if !lab.model().is_active() {
            self.preview = None;
            return;
        }
        ctx.request_repaint_after(PREVIEW_INTERVAL);

        let Some(image) = lab.preview() else {
            return;
        };
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, image.as_raw());
        match &mut self.preview {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.preview = Some(ctx.load_texture(
                    "camera-preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ))
            }
        }
    }

    fn show_camera(&self, model: &Model, ui: &mut egui::Ui, msgs: &mut Vec<Msg>) {
        let palette = style::palette();
        let width = ui.available_width().min(CAMERA_SIZE.x);
        let size = egui::vec2(width, width * CAMERA_SIZE.y / CAMERA_SIZE.x);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        ui.painter().rect_filled(rect, 8.0, palette.bg_camera);

        match &model.phase {
            CameraPhase::Active => {
                if let Some(texture) = &self.preview {
                    let image_rect = fit_within(texture.size_vec2(), rect);
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter()
                        .image(texture.id(), image_rect, uv, egui::Color32::WHITE);
                }
                let corner = egui::Rect::from_min_size(
                    rect.right_top() + egui::vec2(-148.0, 8.0),
                    egui::vec2(140.0, 32.0),
                );
                let toggle = Button::new("Camera off").disabled(!model.can_toggle_camera());
                if ui.put(corner, toggle).clicked() {
                    msgs.push(Msg::CameraTogglePressed);
                }
            }
            CameraPhase::Idle | CameraPhase::Loading => {
                paint_placeholder(ui, rect, palette.camera_placeholder);
                let center = egui::Rect::from_center_size(rect.center(), egui::vec2(160.0, 36.0));
                if model.phase == CameraPhase::Loading {
                    ui.put(center, egui::Spinner::new().size(20.0));
                } else if ui.put(center, Button::new("Activate camera")).clicked() {
                    msgs.push(Msg::CameraTogglePressed);
                }
            }
            CameraPhase::Failed(failure) => {
                paint_placeholder(ui, rect, palette.camera_placeholder);
                let panel = egui::Rect::from_center_size(rect.center(), egui::vec2(360.0, 120.0));
                let mut panel_ui = ui.child_ui(panel, egui::Layout::top_down(egui::Align::Center));
                show_failure(failure.kind, &failure.message, model, &mut panel_ui, msgs);
            }
        }

        let opacity = ui.ctx().animate_bool_with_time(
            egui::Id::new("camera-flash"),
            model.flash.visible,
            FLASH_FADE_SECS,
        ) * FLASH_OPACITY;
        if opacity > 0.0 {
            ui.painter().rect_filled(
                rect,
                8.0,
                egui::Color32::from_white_alpha((opacity * 255.0) as u8),
            );
        }
    }
}

fn paint_placeholder(ui: &egui::Ui, rect: egui::Rect, color: egui::Color32) {
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "📷",
        egui::FontId::proportional(rect.height() * 0.4),
        color,
    );
}

fn show_class_inputs(model: &Model, ui: &mut egui::Ui, msgs: &mut Vec<Msg>) {
    for (slot, id, label, placeholder) in CLASS_INPUTS {
        ui.horizontal(|ui| {
            let input = TextInput::new(id, label, model.class_label(slot)).placeholder(placeholder);
            if let Some(text) = input.show(ui) {
                msgs.push(Msg::ClassLabelChanged(slot, text));
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                let examples = model.examples[slot.index()];
                let text = if examples == 0 {
                    "Add example".to_string()
                } else {
                    format!("Add example ({})", examples)
                };
                let add = Button::new(text).disabled(!model.can_add_example(slot));
                if ui.add(add).clicked() {
                    msgs.push(Msg::AddExamplePressed(slot));
                }
            });
        });
    }
}

fn show_failure(
    kind: FailureKind,
    message: &str,
    model: &Model,
    ui: &mut egui::Ui,
    msgs: &mut Vec<Msg>,
) {
    let palette = style::palette();
    ui.label(
        egui::RichText::new(failure_title(kind))
            .color(palette.error)
            .strong(),
    );
    ui.label(egui::RichText::new(message).color(palette.text_muted));
    ui.horizontal(|ui| {
        if ui
            .add(Button::new("Retry").disabled(!model.can_retry()))
            .clicked()
        {
            msgs.push(Msg::RetryPressed);
        }
        if ui.add(Button::new("Dismiss")).clicked() {
            msgs.push(Msg::DismissErrorPressed);
        }
    });
}
