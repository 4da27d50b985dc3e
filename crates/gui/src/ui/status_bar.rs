use egui::Ui;
use shared::StateTag;

use crate::i18n::t;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &AppState) {
    let viewer_state = state.viewer.state();

    ui.horizontal(|ui| {
        match viewer_state.tag() {
            StateTag::Idle => {
                ui.weak(t("status.idle"));
            }
            StateTag::Loading => {
                ui.colored_label(egui::Color32::from_rgb(255, 200, 100), t("status.loading"));
            }
            StateTag::Ready => {
                ui.colored_label(egui::Color32::from_rgb(120, 220, 120), t("status.ready"));
            }
            StateTag::Failed => {
                ui.colored_label(egui::Color32::from_rgb(255, 110, 110), t("status.failed"));
            }
        }

        if let Some(file) = viewer_state.file() {
            ui.separator();
            ui.label(file.name());
        }

        if let Some(model) = viewer_state.model() {
            let triangles = model.mesh().map_or(0, |m| m.triangle_count());
            ui.separator();
            ui.weak(format!("{}: {triangles}", t("status.triangles")));
            ui.separator();
            ui.weak(model.format.to_string());
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("STL Viewer v", env!("CARGO_PKG_VERSION")));
        });
    });
}
