//! Application menu bar and settings window

use eframe::egui;

use crate::state::settings::AppSettings;
use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &ViewportPanel) {
    ui.menu_button("File", |ui| {
        if ui.button("Save annotations    Ctrl+S").clicked() {
            ui.close_menu();
            super::save_annotations(state, viewport, None);
        }
        if ui.button("Export annotations as…").clicked() {
            ui.close_menu();
            let file_name = state
                .output_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| crate::state::DEFAULT_OUTPUT.to_string());
            if let Some(path) = rfd::FileDialog::new()
                .set_title("Export annotations")
                .add_filter("JSON", &["json"])
                .set_file_name(file_name)
                .save_file()
            {
                super::save_annotations(state, viewport, Some(path));
            }
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            ui.close_menu();
            // Annotations are written in on_exit
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button("View", |ui| {
        ui.checkbox(&mut state.settings.ui.show_annotation_list, "Annotation list");
        ui.separator();
        let reset = format!("Reset camera    {}", state.settings.keys.reset_camera);
        if ui.button(reset).clicked() {
            viewport.reset_camera();
            ui.close_menu();
        }
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("Settings", |ui| {
        if ui.button("Preferences…").clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new("Settings")
        .open(&mut open)
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_marker_settings(ui, state);
                show_viewport_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open;
}

fn show_marker_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let markers = &mut state.settings.markers;
    ui.heading("Markers");
    ui.weak("Applies from the next session");

    ui.horizontal(|ui| {
        ui.label("Initial radius");
        ui.add(
            egui::DragValue::new(&mut markers.default_radius)
                .speed(0.1)
                .range(0.1..=100.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label("Radius step");
        ui.add(
            egui::DragValue::new(&mut markers.radius_step)
                .speed(0.1)
                .range(0.1..=20.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label("Minimum radius");
        ui.add(
            egui::DragValue::new(&mut markers.min_radius)
                .speed(0.1)
                .range(0.1..=20.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label("Marker color");
        ui.color_edit_button_rgb(&mut markers.default_color);
        ui.label("Selected");
        ui.color_edit_button_rgb(&mut markers.selected_color);
    });

    ui.checkbox(
        &mut state.settings.annotations.renumber_on_move,
        "Renumber annotation when moved",
    );
    ui.add_space(10.0);
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Viewport");
    ui.horizontal(|ui| {
        ui.label("Background color");
        ui.color_edit_button_rgb(&mut state.settings.viewport.background_color);
    });

    ui.horizontal(|ui| {
        ui.label("Label size");
        ui.add(
            egui::DragValue::new(&mut state.settings.viewport.label_font_size)
                .speed(0.5)
                .range(8.0..=48.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Interface");
    ui.horizontal(|ui| {
        ui.label("Font size");
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            state.settings.save();
        }
        if ui.button("Reset").clicked() {
            state.settings = AppSettings::default();
        }
        if ui.button("Close").clicked() {
            state.show_settings_window = false;
        }
    });
}
