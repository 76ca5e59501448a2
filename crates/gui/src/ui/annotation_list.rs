//! Side panel listing annotations in file order

use egui::Ui;

use crate::viewport::ViewportPanel;

pub fn show(ui: &mut Ui, viewport: &ViewportPanel) {
    let controller = viewport.controller();
    let store = controller.store();
    let selected = controller.selected_index();

    ui.horizontal(|ui| {
        ui.heading("Annotations");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", store.len()));
        });
    });
    ui.separator();

    if store.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak("Click the surface to place a marker");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("annotation_list_scroll")
        .show(ui, |ui| {
            egui::Grid::new("annotation_grid")
                .num_columns(4)
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("id");
                    ui.strong("x");
                    ui.strong("y");
                    ui.strong("z");
                    ui.end_row();

                    for (index, point) in store.iter().enumerate() {
                        let a = &point.annotation;
                        let id = format!("{}", a.id);
                        if selected == Some(index) {
                            ui.colored_label(egui::Color32::from_rgb(230, 90, 80), id);
                        } else {
                            ui.label(id);
                        }
                        ui.monospace(format!("{:.2}", a.x));
                        ui.monospace(format!("{:.2}", a.y));
                        ui.monospace(format!("{:.2}", a.z));
                        ui.end_row();
                    }
                });
        });
}
