//! 3D viewport panel with OpenGL rendering

mod camera;
mod gl_renderer;
mod overlays;
pub use stl_viewer_lib::viewport::mesh;

use std::sync::{Arc, Mutex};

use egui::Ui;
use shared::BoundingBox;

use crate::state::AppState;
use camera::ArcBallCamera;
use gl_renderer::{GlRenderer, GridParams, ModelKey};
use mesh::MeshData;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    camera: ArcBallCamera,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Render copy of the published model, rebuilt when its key changes
    model: Option<(ModelKey, Arc<MeshData>)>,
    /// Bounds of the model the camera is framed on
    framed: Option<BoundingBox>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::new(),
            gl_renderer: None,
            model: None,
            framed: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Some(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            None => tracing::error!("OpenGL renderer unavailable; the model will not be drawn"),
        }
    }

    /// Release GPU resources on shutdown
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    /// Frame the current model, or return to the default view
    pub fn reset_camera(&mut self) {
        self.camera = match &self.framed {
            Some(bounds) => ArcBallCamera::framing(bounds.diagonal() * 0.5),
            None => ArcBallCamera::new(),
        };
    }

    pub fn show(&mut self, ui: &mut Ui, state: &AppState) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        self.sync_model(state);
        self.handle_camera(&response, ui);

        if !ui.is_rect_visible(rect) {
            return;
        }

        let grid = self.grid_params(state);
        let axes_length = state.settings.axes.length * grid.range as f32 * grid.cell_size;
        self.render_gl(ui, rect, state, grid, axes_length);

        // ── Overlays ─────────────────────────────────────
        let painter = ui.painter_at(rect);
        if state.settings.axes.visible && state.settings.axes.show_labels {
            overlays::draw_axis_labels(&painter, rect, &self.camera, axes_length);
        }
        if state.panels.dimensions {
            overlays::draw_dimensions(&painter, rect, state);
        }
        if state.panels.controls_hint {
            overlays::draw_controls_hint(&painter, rect);
        }
        overlays::draw_load_status(ui, rect, state);
    }

    /// Rebuild the render copy when the published model (or its color) changes
    fn sync_model(&mut self, state: &AppState) {
        let published = state
            .viewer
            .state()
            .model()
            .and_then(|model| model.mesh().map(|mesh| (model, mesh)));

        let Some((model, mesh)) = published else {
            self.model = None;
            self.framed = None;
            return;
        };

        let color = state.settings.viewport.model_color;
        let key: ModelKey = (model.resource.id(), color);
        let current = self.model.as_ref().map(|(k, _)| *k);
        if current == Some(key) {
            return;
        }

        // Centered on the bounding box so the camera orbits the model
        let center = glam::Vec3::from_array(model.bounds.center());
        let rgb = color.map(|c| c as f32 / 255.0);
        self.model = Some((key, Arc::new(MeshData::from_mesh(mesh, -center, rgb))));

        if current.map(|k| k.0) != Some(key.0) {
            self.framed = Some(model.bounds);
            self.reset_camera();
        }
    }

    fn handle_camera(&mut self, response: &egui::Response, ui: &Ui) {
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            self.camera.pan(delta.x, delta.y);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll * 0.002);
            }
        }
    }

    fn grid_params(&self, state: &AppState) -> GridParams {
        let grid = &state.settings.grid;
        GridParams {
            range: grid.range,
            cell_size: grid.cell_size_for(self.framed.map(|b| b.diagonal())),
            opacity: grid.opacity,
            // Model sits on the grid
            y: self.framed.map_or(0.0, |b| -b.dimensions().height * 0.5),
        }
    }

    fn render_gl(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState, grid: GridParams, axes_length: f32) {
        let Some(gl_renderer) = &self.gl_renderer else {
            // No GL context: plain background, overlays still work
            let [r, g, b] = state.settings.viewport.background_color;
            ui.painter().rect_filled(rect, 0.0, egui::Color32::from_rgb(r, g, b));
            return;
        };

        let renderer = gl_renderer.clone();
        let camera = self.camera;
        let model = self.model.clone();
        let grid_visible = state.settings.grid.visible;
        let axes_visible = state.settings.axes.visible;
        let bg_color = state.settings.viewport.background_color;

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];

                if let Ok(mut r) = renderer.lock() {
                    r.update_grid(gl, grid);
                    r.update_axes(gl, axes_length);
                    r.sync_model(gl, model.as_ref().map(|(key, data)| (*key, data.as_ref())));

                    let render_params = gl_renderer::RenderParams {
                        viewport,
                        grid_visible,
                        axes_visible,
                        bg_color,
                    };
                    r.paint(gl, &camera, &render_params);
                }
            })),
        };

        ui.painter().add(callback);
    }
}
