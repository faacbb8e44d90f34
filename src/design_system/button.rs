use crate::design_system::style;
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Default,
    Large,
}

impl ButtonVariant {
    pub fn padding(self) -> egui::Vec2 {
        match self {
            ButtonVariant::Default => egui::vec2(16.0, 10.0),
            ButtonVariant::Large => egui::vec2(16.0, 12.0),
        }
    }

    pub fn text_size(self) -> f32 {
        match self {
            ButtonVariant::Default => 12.0,
            ButtonVariant::Large => 16.0,
        }
    }
}

/// Solid accent button. A disabled button is muted and ignores input.
pub struct Button {
    label: String,
    disabled: bool,
    variant: ButtonVariant,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            variant: ButtonVariant::Default,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }
}

impl egui::Widget for Button {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let palette = style::palette();
        let text_color = if self.disabled {
            palette.disabled_text
        } else {
            egui::Color32::WHITE
        };
        let text = egui::RichText::new(self.label)
            .size(self.variant.text_size())
            .color(text_color)
            .strong();

        ui.scope(|ui| {
            ui.spacing_mut().button_padding = self.variant.padding();
            let widgets = &mut ui.visuals_mut().widgets;
            widgets.inactive.weak_bg_fill = palette.accent;
            widgets.hovered.weak_bg_fill = palette.accent_hover;
            widgets.active.weak_bg_fill = palette.accent_hover;
            widgets.noninteractive.weak_bg_fill = palette.disabled_fill;
            for visuals in [
                &mut widgets.inactive,
                &mut widgets.hovered,
                &mut widgets.active,
            ] {
                visuals.bg_stroke = egui::Stroke::NONE;
            }

            let button = if self.disabled {
                egui::Button::new(text).fill(palette.disabled_fill)
            } else {
                egui::Button::new(text)
            };
            ui.add_enabled(!self.disabled, button)
        })
        .inner
    }
}
