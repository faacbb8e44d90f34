use crate::design_system::style;
use eframe::egui;

/// Labelled single-line text field. The caller owns the value and gets the
/// raw new text back on every edit.
pub struct TextInput<'a> {
    id: &'a str,
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
}

impl<'a> TextInput<'a> {
    pub fn new(id: &'a str, label: &'a str, value: &'a str) -> Self {
        Self {
            id,
            label,
            placeholder: "",
            value,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<String> {
        let palette = style::palette();
        let mut text = self.value.to_string();

        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new(self.label)
                    .size(13.0)
                    .color(palette.text_label),
            );
            let response = ui.add(
                egui::TextEdit::singleline(&mut text)
                    .id(egui::Id::new(self.id))
                    .hint_text(self.placeholder)
                    .desired_width(240.0),
            );
            response.changed().then_some(text)
        })
        .inner
    }
}
