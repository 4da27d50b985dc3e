//! Left panel: file selection and details of the loaded file

use egui::Ui;
use shared::{SelectionError, StateTag};

use crate::app::open_file_dialog;
use crate::i18n::t;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading(t("file.heading"));
    ui.separator();

    drop_zone(ui, state);

    if let Some(rejection) = &state.rejection {
        ui.add_space(6.0);
        let headline = match rejection {
            SelectionError::NotStl { .. } => t("file.not_stl"),
            SelectionError::TooLarge { .. } => t("file.too_large"),
        };
        ui.colored_label(egui::Color32::from_rgb(255, 170, 90), headline);
        ui.weak(rejection.to_string());
    }

    let Some(file) = state.viewer.state().file().cloned() else {
        return;
    };

    ui.add_space(10.0);
    egui::Grid::new("file_props")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label(format!("{}:", t("file.name")));
            ui.strong(file.name());
            ui.end_row();

            ui.label(format!("{}:", t("file.size")));
            ui.monospace(file.size_label());
            ui.end_row();

            if let Some(model) = state.viewer.state().model() {
                ui.label(format!("{}:", t("file.format")));
                ui.label(model.format.to_string());
                ui.end_row();

                if let Some(mesh) = model.mesh() {
                    ui.label(format!("{}:", t("file.triangles")));
                    ui.monospace(mesh.triangle_count().to_string());
                    ui.end_row();

                    ui.label(format!("{}:", t("file.vertices")));
                    let unique = mesh.indexed.as_ref().map_or(mesh.vertex_count(), |g| g.positions.len());
                    ui.monospace(unique.to_string());
                    ui.end_row();
                }
            }
        });

    if state.viewer.state().tag() == StateTag::Loading {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.spinner();
            ui.weak(t("file.loading"));
        });
    }

    ui.add_space(10.0);
    if ui.button(t("file.clear")).clicked() {
        state.clear();
    }
}

fn drop_zone(ui: &mut Ui, state: &mut AppState) {
    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let stroke_color = if hovering {
        egui::Color32::from_rgb(0, 212, 255)
    } else {
        egui::Color32::from_gray(80)
    };

    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.0, stroke_color))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.weak(t("file.drop_hint"));
                ui.weak(t("file.or"));
                if ui.button(t("file.browse")).clicked() {
                    open_file_dialog(state);
                }
            });
        });
}
