//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::path::PathBuf;

use eframe::egui;

use crate::state::AppState;
use crate::surface::Surface;
use crate::ui::{annotation_list, status_bar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct AnnotatorApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl AnnotatorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState, surface: Surface) -> Self {
        // Apply initial styles with font size from settings
        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut viewport = ViewportPanel::new(surface, &state.settings);

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            last_font_size,
        }
    }
}

/// Write annotations to `path`, or to the configured output path
pub(crate) fn save_annotations(state: &mut AppState, viewport: &ViewportPanel, path: Option<PathBuf>) {
    let path = path.unwrap_or_else(|| state.output_path.clone());
    match viewport.save(&path) {
        Ok(()) => state.last_save = Some(Ok(path)),
        Err(e) => {
            tracing::error!("Failed to save annotations to {}: {e}", path.display());
            state.last_save = Some(Err(e.to_string()));
        }
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state, &self.viewport);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state, &self.viewport);
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
                status_bar::show(ui, &self.state, &self.viewport);
            });

        // ── Right panel: annotation list ─────────────────────
        if self.state.settings.ui.show_annotation_list {
            egui::SidePanel::right("annotation_list")
                .default_width(240.0)
                .width_range(160.0..=420.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    annotation_list::show(ui, &self.viewport);
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        let fatal = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.viewport.show(ui, &self.state))
            .inner;

        if let Some(e) = fatal {
            tracing::error!("Annotation session ended: {e}");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        save_annotations(&mut self.state, &self.viewport, None);
        self.state.settings.save();
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}
