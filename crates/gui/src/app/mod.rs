//! Main application module

mod keyboard;
mod menus;
mod styles;

pub use menus::open_file_dialog;

use std::sync::Arc;

use eframe::egui;
use stl_viewer_lib::ingest::FileSelection;
use tokio::runtime::Handle;

use crate::state::{AppState, ViewerSettings};
use crate::ui::{file_panel, status_bar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct ViewerApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl ViewerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: Handle,
        settings: ViewerSettings,
        initial_file: Option<FileSelection>,
    ) -> Self {
        crate::i18n::set_lang(settings.ui.language);
        let mut state = AppState::new(runtime, settings);

        // Wake the UI when a load finishes in the background
        let ctx = cc.egui_ctx.clone();
        state.viewer.set_notifier(Arc::new(move || ctx.request_repaint()));

        // Apply initial styles with font size from settings
        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        if let Some(selection) = initial_file {
            state.open(selection);
        }

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            last_font_size,
        }
    }

    /// Route files dropped onto the window through normal selection
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Only the first file counts; the viewer shows one model at a time
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        let selection = if let Some(path) = &file.path {
            match FileSelection::from_path(path) {
                Ok(selection) => selection,
                Err(e) => {
                    tracing::error!("Cannot open dropped file {}: {e}", path.display());
                    return;
                }
            }
        } else if let Some(bytes) = file.bytes {
            FileSelection::from_bytes(file.name, bytes)
        } else {
            return;
        };

        self.state.open(selection);
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        self.state.viewer.poll();
        self.handle_dropped_files(ctx);

        keyboard::handle_keyboard(ctx, &mut self.state, &mut self.viewport);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state, &mut self.viewport);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Left panel: file info ────────────────────────────
        if self.state.panels.file_panel {
            egui::SidePanel::left("file_panel")
                .default_width(230.0)
                .width_range(180.0..=400.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(8)),
                )
                .show(ctx, |ui| {
                    file_panel::show(ui, &mut self.state);
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &self.state);
            });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
        self.state.viewer.clear();
    }
}
