//! Keyboard shortcut handling
//!
//! Plain keys (radius, delete, camera reset) belong to the viewport and
//! reach the annotation controller from there. Only command-modified
//! shortcuts are handled here.

use eframe::egui;

use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState, viewport: &ViewportPanel) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    // Ctrl+S: save annotations to the output path
    let save = ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S));
    if save {
        super::save_annotations(state, viewport, None);
    }

    // Ctrl+L: toggle annotation list
    if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::L)) {
        state.settings.ui.show_annotation_list = !state.settings.ui.show_annotation_list;
    }
}
