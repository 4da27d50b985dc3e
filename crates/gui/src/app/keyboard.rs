//! Keyboard shortcut handling

use eframe::egui;

use super::menus;
use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState, viewport: &mut ViewportPanel) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (open, clear, reset) = ctx.input(|i| {
        (
            // Ctrl+O: open file
            i.modifiers.command && i.key_pressed(egui::Key::O),
            // Delete / Escape: clear model
            i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Escape),
            // Home: reframe camera
            i.key_pressed(egui::Key::Home),
        )
    });

    // The file dialog blocks, so it runs outside the input lock
    if open {
        menus::open_file_dialog(state);
    }
    if clear {
        state.clear();
    }
    if reset {
        viewport.reset_camera();
    }
}
