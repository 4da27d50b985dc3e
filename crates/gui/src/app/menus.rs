//! Application menu bar and settings window

use eframe::egui;
use stl_viewer_lib::geometry::NormalMode;
use stl_viewer_lib::ingest::FileSelection;

use crate::i18n::{lang, set_lang, t};
use crate::state::{AppState, Language, SizeLimitPolicy, Units, ViewerSettings};
use crate::viewport::ViewportPanel;

const MB: u64 = 1024 * 1024;

/// Ask for an STL file and start loading it
pub fn open_file_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title(t("menu.open_title"))
        .add_filter("STL", &["stl", "STL"])
        .pick_file()
    else {
        return;
    };

    match FileSelection::from_path(&path) {
        Ok(selection) => state.open(selection),
        Err(e) => tracing::error!("Failed to open {}: {e}", path.display()),
    }
}

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.open")).clicked() {
            ui.close_menu();
            open_file_dialog(state);
        }
        let has_model = state.viewer.state().file().is_some();
        if ui
            .add_enabled(has_model, egui::Button::new(t("menu.clear")))
            .clicked()
        {
            state.clear();
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.file_panel, t("menu.file_panel"));
        ui.checkbox(&mut state.panels.dimensions, t("menu.dimensions"));
        ui.checkbox(&mut state.panels.controls_hint, t("menu.controls_hint"));
        ui.separator();
        ui.checkbox(&mut state.settings.grid.visible, t("menu.grid"));
        ui.checkbox(&mut state.settings.axes.visible, t("menu.axes"));
        ui.separator();
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera();
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for &language in Language::all() {
                if ui
                    .selectable_label(lang() == language, language.display_name())
                    .clicked()
                {
                    set_lang(language);
                    state.settings.ui.language = language;
                    state.settings.save();
                    ui.close_menu();
                }
            }
        });
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.settings"), |ui| {
        if ui.button(t("menu.preferences")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(400.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_general_settings(ui, state);
                show_dimension_settings(ui, state);
                show_loading_settings(ui, state);
                show_grid_settings(ui, state);
                show_axes_settings(ui, state);
                show_viewport_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open && state.show_settings_window;
}

fn units_label(units: Units) -> &'static str {
    match units {
        Units::Millimeters => t("settings.mm"),
        Units::Centimeters => t("settings.cm"),
        Units::Meters => t("settings.m"),
        Units::Inches => t("settings.in"),
    }
}

fn show_general_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.general"));
    ui.horizontal(|ui| {
        ui.label(t("settings.units"));
        egui::ComboBox::from_id_salt("units_combo")
            .selected_text(units_label(state.settings.units))
            .show_ui(ui, |ui| {
                for &units in Units::all() {
                    ui.selectable_value(&mut state.settings.units, units, units_label(units));
                }
            });
    });
    ui.add_space(10.0);
}

fn show_dimension_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.dimensions"));

    ui.horizontal(|ui| {
        ui.label(t("settings.dim_precision"));
        ui.add(
            egui::DragValue::new(&mut state.settings.dimensions.precision)
                .speed(1.0)
                .range(0..=6),
        );
    });

    ui.checkbox(&mut state.settings.dimensions.show_units, t("settings.dim_show_units"));
    ui.add_space(10.0);
}

fn show_loading_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let loading = &mut state.settings.loading;
    ui.heading(t("settings.loading"));

    ui.horizontal(|ui| {
        let mut limited = loading.size_limit_bytes.is_some();
        if ui.checkbox(&mut limited, t("settings.size_limit")).changed() {
            loading.size_limit_bytes = limited.then_some(256 * MB);
        }
        if let Some(limit) = loading.size_limit_bytes.as_mut() {
            let mut mb = *limit / MB;
            if ui
                .add(egui::DragValue::new(&mut mb).speed(1).range(1..=4096).suffix(" MB"))
                .changed()
            {
                *limit = mb * MB;
            }
        }
    });

    ui.add_enabled_ui(loading.size_limit_bytes.is_some(), |ui| {
        ui.horizontal(|ui| {
            ui.label(t("settings.policy"));
            ui.radio_value(&mut loading.size_limit_policy, SizeLimitPolicy::Reject, t("settings.policy_reject"));
            ui.radio_value(&mut loading.size_limit_policy, SizeLimitPolicy::Warn, t("settings.policy_warn"));
        });
    });

    ui.checkbox(&mut loading.require_stl_extension, t("settings.require_ext"));

    ui.horizontal(|ui| {
        ui.label(t("settings.normals"));
        ui.radio_value(&mut loading.normal_mode, NormalMode::Smooth, t("settings.normals_smooth"));
        ui.radio_value(&mut loading.normal_mode, NormalMode::Flat, t("settings.normals_flat"));
    });
    ui.add_enabled(
        loading.normal_mode == NormalMode::Smooth,
        egui::Checkbox::new(&mut loading.build_index, t("settings.build_index")),
    );
    ui.add_space(10.0);
}

fn show_grid_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.grid"));
    ui.checkbox(&mut state.settings.grid.visible, t("settings.grid_visible"));
    ui.checkbox(&mut state.settings.grid.fit_to_model, t("settings.grid_fit"));

    ui.add_enabled_ui(!state.settings.grid.fit_to_model, |ui| {
        ui.horizontal(|ui| {
            ui.label(t("settings.grid_size"));
            ui.add(
                egui::DragValue::new(&mut state.settings.grid.size)
                    .speed(0.1)
                    .range(0.01..=1000.0)
                    .suffix(format!(" {}", state.settings.units.abbrev())),
            );
        });
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_range"));
        ui.add(
            egui::DragValue::new(&mut state.settings.grid.range)
                .speed(1)
                .range(1..=50),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_opacity"));
        ui.add(egui::Slider::new(&mut state.settings.grid.opacity, 0.0..=1.0));
    });
    ui.add_space(10.0);
}

fn show_axes_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.axes"));
    ui.checkbox(&mut state.settings.axes.visible, t("settings.axes_visible"));
    ui.checkbox(&mut state.settings.axes.show_labels, t("settings.axes_labels"));

    ui.horizontal(|ui| {
        ui.label(t("settings.axes_length"));
        ui.add(
            egui::DragValue::new(&mut state.settings.axes.length)
                .speed(0.05)
                .range(0.1..=1.0),
        );
    });
    ui.add_space(10.0);
}

fn color_row(ui: &mut egui::Ui, label: &str, rgb: &mut [u8; 3]) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut color = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
        if ui.color_edit_button_srgba(&mut color).changed() {
            *rgb = [color.r(), color.g(), color.b()];
        }
    });
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.viewport"));
    color_row(ui, t("settings.bg_color"), &mut state.settings.viewport.background_color);
    color_row(ui, t("settings.model_color"), &mut state.settings.viewport.model_color);
    ui.checkbox(&mut state.settings.viewport.antialiasing, t("settings.antialiasing"));
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.language"));
        egui::ComboBox::from_id_salt("language_combo")
            .selected_text(state.settings.ui.language.display_name())
            .show_ui(ui, |ui| {
                for &language in Language::all() {
                    ui.selectable_value(&mut state.settings.ui.language, language, language.display_name());
                }
            });
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            set_lang(state.settings.ui.language);
            state.apply_settings();
        }
        if ui.button(t("settings.reset")).clicked() {
            state.settings = ViewerSettings::default();
        }
        if ui.button(t("settings.close")).clicked() {
            state.show_settings_window = false;
        }
    });
}
