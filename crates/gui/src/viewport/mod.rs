//! 3D viewport panel with OpenGL rendering

mod camera;
mod gl_renderer;
pub use landmark_gui_lib::viewport::{mesh, picking};
mod overlays;
mod scene;
mod trackball;

use std::path::Path;
use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::controller::{InputEvent, InteractionController};
use crate::error::{AnnotationError, Result};
use crate::state::settings::AppSettings;
use crate::state::AppState;
use crate::surface::Surface;
use camera::ArcBallCamera;
use gl_renderer::GlRenderer;
use mesh::MeshData;
use scene::ViewportScene;
use trackball::TrackballStyle;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    scene: ViewportScene,
    controller: InteractionController<TrackballStyle>,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Shared with the paint callback
    surface_mesh: Arc<MeshData>,
    surface_version: u64,
}

impl ViewportPanel {
    pub fn new(surface: Surface, settings: &AppSettings) -> Self {
        let surface_mesh = Arc::new(surface.mesh.clone());
        let scene = ViewportScene::new(surface, settings.markers.max_markers);
        let mut controller =
            InteractionController::new(settings, TrackballStyle::new(settings.keys.reset_camera.clone()));
        controller.begin_session(&scene);
        Self {
            scene,
            controller,
            gl_renderer: None,
            surface_mesh,
            surface_version: 1,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("Failed to initialize renderer: {e}"),
        }
    }

    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn reset_camera(&mut self) {
        self.scene.reset_camera();
    }

    pub fn controller(&self) -> &InteractionController<TrackballStyle> {
        &self.controller
    }

    /// Write the annotation file
    pub fn save(&self, path: &Path) -> Result<()> {
        self.controller.save(path)
    }

    /// Show the viewport and feed its input to the annotation controller.
    /// Returns the error that ended the session, if any.
    pub fn show(&mut self, ui: &mut Ui, state: &AppState) -> Option<AnnotationError> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        self.scene.rect = rect;

        for event in self.collect_input(ui, &response) {
            if let Err(e) = self.controller.handle_event(&mut self.scene, &event) {
                if e.is_fatal() {
                    return Some(e);
                }
                tracing::error!("Annotation error: {e}");
            }
        }

        if self.scene.take_redraw_request() || self.controller.camera().is_dragging() {
            ui.ctx().request_repaint();
        }

        if !ui.is_rect_visible(rect) {
            return None;
        }

        self.render_gl(ui, rect, state);

        let painter = ui.painter_at(rect);
        overlays::draw_labels(&painter, rect, &self.scene, state.settings.viewport.label_font_size);
        if self.controller.store().is_empty() {
            overlays::draw_navigation_hint(&painter, rect);
        }
        None
    }

    /// Translate this frame's raw egui events into controller input
    fn collect_input(&self, ui: &Ui, response: &egui::Response) -> Vec<InputEvent> {
        let hovered = response.hovered();
        let typing = ui.ctx().wants_keyboard_input();
        let mut out = Vec::new();

        ui.input(|i| {
            for event in &i.events {
                match event {
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed,
                        ..
                    } => {
                        // Presses must start inside the viewport; releases always count
                        if *pressed && !hovered {
                            continue;
                        }
                        let (x, y) = (pos.x, pos.y);
                        let translated = match (button, pressed) {
                            (egui::PointerButton::Primary, true) => InputEvent::PrimaryDown { x, y },
                            (egui::PointerButton::Primary, false) => InputEvent::PrimaryUp { x, y },
                            (egui::PointerButton::Secondary, true) => InputEvent::SecondaryDown { x, y },
                            (egui::PointerButton::Secondary, false) => InputEvent::SecondaryUp { x, y },
                            _ => continue,
                        };
                        out.push(translated);
                    }
                    egui::Event::PointerMoved(pos) => {
                        out.push(InputEvent::PointerMove { x: pos.x, y: pos.y });
                    }
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } if !typing && !modifiers.command => {
                        out.push(InputEvent::KeyDown {
                            key: key.name().to_string(),
                        });
                    }
                    _ => {}
                }
            }

            let scroll = i.smooth_scroll_delta.y;
            if hovered && scroll.abs() > 0.1 {
                out.push(InputEvent::Scroll { delta: scroll });
            }
        });

        out
    }

    fn render_gl(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let Some(gl_renderer) = &self.gl_renderer else {
            ui.painter().rect_filled(rect, 0.0, egui::Color32::from_rgb(25, 51, 76));
            return;
        };

        let renderer_clone = gl_renderer.clone();
        let camera: ArcBallCamera = self.scene.camera;
        let surface_mesh = self.surface_mesh.clone();
        let surface_version = self.surface_version;
        let spheres = scene::sphere_instances(&self.scene);
        let bg_color = state.settings.viewport.background_color;

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];

                if let Ok(mut r) = renderer_clone.lock() {
                    r.sync_surface(gl, &surface_mesh, surface_version);
                    let params = gl_renderer::RenderParams {
                        viewport,
                        bg_color,
                        spheres: spheres.clone(),
                    };
                    r.paint(gl, &camera, &params);
                }
            })),
        };

        ui.painter().add(callback);
    }
}
