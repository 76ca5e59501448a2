use egui::Ui;

use crate::state::{AppState, InteractionMode};
use crate::viewport::ViewportPanel;

pub fn show(ui: &mut Ui, state: &AppState, viewport: &ViewportPanel) {
    let controller = viewport.controller();
    ui.horizontal(|ui| {
        ui.weak(format!("Annotations: {}", controller.store().len()));

        ui.separator();

        match controller.selected_point() {
            Some(point) => {
                let dragging = controller.mode() == InteractionMode::Dragging;
                let text = if dragging {
                    format!("Dragging #{}", point.annotation.id)
                } else {
                    format!("Selected #{}", point.annotation.id)
                };
                ui.colored_label(egui::Color32::from_rgb(230, 90, 80), text);
            }
            None => {
                ui.weak("Ready");
            }
        }

        ui.separator();
        ui.weak(format!("Radius: {:.1}", controller.current_radius()));

        if let Some(bounds) = controller.bounds() {
            ui.separator();
            let [x0, x1, y0, y1, z0, z1] = bounds.extents();
            ui.weak(format!(
                "Bounds: x {x0:.1}..{x1:.1}  y {y0:.1}..{y1:.1}  z {z0:.1}..{z1:.1}"
            ));
        }

        // Right-aligned save state
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            match &state.last_save {
                Some(Ok(path)) => {
                    ui.weak(format!("Saved {}", path.display()));
                }
                Some(Err(e)) => {
                    ui.colored_label(egui::Color32::from_rgb(255, 200, 100), format!("Save failed: {e}"));
                }
                None => {
                    ui.weak(state.output_path.display().to_string());
                }
            }
        });
    });
}
