//! Viewport overlay drawing (axis labels, readouts, load status)

use egui::{Painter, Ui};
use shared::StateTag;

use crate::i18n::t;
use crate::state::AppState;

use super::camera::ArcBallCamera;

const PANEL_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 150);
const TEXT: egui::Color32 = egui::Color32::from_rgb(200, 200, 210);

/// Draw axis labels at the tips of the axes
pub fn draw_axis_labels(painter: &Painter, rect: egui::Rect, camera: &ArcBallCamera, length: f32) {
    let tip = length * 1.07;
    let labels = [
        ([tip, 0.0, 0.0], "X", egui::Color32::from_rgb(220, 70, 70)),
        ([0.0, tip, 0.0], "Y", egui::Color32::from_rgb(70, 200, 70)),
        ([0.0, 0.0, tip], "Z", egui::Color32::from_rgb(70, 110, 220)),
    ];

    for (pos, label, color) in &labels {
        if let Some(screen) = camera.project(*pos, rect) {
            if rect.contains(screen) {
                painter.text(
                    screen,
                    egui::Align2::LEFT_BOTTOM,
                    *label,
                    egui::FontId::monospace(12.0),
                    *color,
                );
            }
        }
    }
}

/// Width/height/depth box in the top-left corner
pub fn draw_dimensions(painter: &Painter, rect: egui::Rect, state: &AppState) {
    let Some(dims) = state.viewer.state().dimensions() else {
        return;
    };
    let readout = state.settings.dimensions.readout(&dims, state.settings.units);

    let text = format!(
        "{}\n{}: {}\n{}: {}\n{}: {}",
        t("view.dimensions"),
        t("view.width"),
        readout.width,
        t("view.height"),
        readout.height,
        t("view.depth"),
        readout.depth,
    );
    let galley = painter.layout_no_wrap(text, egui::FontId::monospace(12.0), TEXT);
    let box_rect = egui::Rect::from_min_size(
        rect.min + egui::vec2(8.0, 8.0),
        galley.size() + egui::vec2(16.0, 12.0),
    );
    painter.rect_filled(box_rect, 4.0, PANEL_FILL);
    painter.galley(box_rect.min + egui::vec2(8.0, 6.0), galley, TEXT);
}

/// Centered status: spinner while loading, banner on failure, hint when idle
pub fn draw_load_status(ui: &mut Ui, rect: egui::Rect, state: &AppState) {
    let viewer_state = state.viewer.state();
    match viewer_state.tag() {
        StateTag::Idle => {
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                t("view.empty"),
                egui::FontId::proportional(16.0),
                egui::Color32::from_rgb(120, 120, 130),
            );
        }
        StateTag::Loading => {
            let spinner_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(36.0, 36.0));
            ui.put(spinner_rect, egui::Spinner::new().size(36.0));
            ui.painter().text(
                rect.center() + egui::vec2(0.0, 32.0),
                egui::Align2::CENTER_TOP,
                t("view.loading"),
                egui::FontId::proportional(13.0),
                TEXT,
            );
        }
        StateTag::Failed => {
            if let Some(failure) = viewer_state.failure() {
                let key = format!("error.{}", failure.kind.as_str());
                let mut text = format!("{}\n{}", t("view.load_failed"), t(&key));
                if let Some(detail) = &failure.detail {
                    text.push('\n');
                    text.push_str(detail);
                }
                draw_banner(ui.painter(), rect, text);
            }
        }
        StateTag::Ready => {}
    }
}

fn draw_banner(painter: &Painter, rect: egui::Rect, text: String) {
    let color = egui::Color32::from_rgb(255, 140, 140);
    let galley = painter.layout(
        text,
        egui::FontId::proportional(13.0),
        color,
        (rect.width() - 64.0).max(120.0),
    );
    let banner = egui::Rect::from_center_size(rect.center(), galley.size() + egui::vec2(24.0, 16.0));
    painter.rect_filled(banner, 6.0, egui::Color32::from_rgba_premultiplied(60, 10, 10, 210));
    painter.galley(banner.min + egui::vec2(12.0, 8.0), galley, color);
}

/// Mouse controls reminder along the bottom edge
pub fn draw_controls_hint(painter: &Painter, rect: egui::Rect) {
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 12.0),
        egui::Align2::CENTER_BOTTOM,
        t("view.controls"),
        egui::FontId::proportional(11.0),
        egui::Color32::from_rgb(100, 100, 110),
    );
}
