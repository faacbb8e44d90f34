use eframe::egui::{self, Color32, Rounding, Stroke};

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_page: Color32,
    pub bg_surface: Color32,
    pub bg_camera: Color32,
    pub camera_placeholder: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_label: Color32,
    pub accent: Color32,
    pub accent_hover: Color32,
    pub disabled_fill: Color32,
    pub disabled_text: Color32,
    pub error: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_page: Color32::from_rgb(243, 244, 246),
        bg_surface: Color32::WHITE,
        bg_camera: Color32::from_rgb(249, 250, 251),
        camera_placeholder: Color32::from_rgb(229, 231, 235),
        text_primary: Color32::from_rgb(17, 24, 39),
        text_muted: Color32::from_rgb(107, 114, 128),
        text_label: Color32::from_rgb(55, 65, 81),
        accent: Color32::from_rgb(96, 165, 250),
        accent_hover: Color32::from_rgb(59, 130, 246),
        disabled_fill: Color32::from_rgb(209, 213, 219),
        disabled_text: Color32::from_rgb(107, 114, 128),
        error: Color32::from_rgb(220, 38, 38),
    }
}

pub fn apply_visuals(ctx: &egui::Context) {
    let palette = palette();
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = palette.bg_page;
    visuals.window_fill = palette.bg_surface;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_hover);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);
    visuals.widgets.active.rounding = Rounding::same(4.0);
    ctx.set_visuals(visuals);
}
