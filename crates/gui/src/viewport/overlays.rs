//! Viewport overlay drawing (marker labels, hints)

use egui::Painter;

use super::scene::ViewportScene;
use crate::scene::Color;

fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgb(
        (c[0].clamp(0.0, 1.0) * 255.0) as u8,
        (c[1].clamp(0.0, 1.0) * 255.0) as u8,
        (c[2].clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Draw every label as screen-space text at its projected anchor.
/// Labels whose anchor is hidden behind the surface are skipped.
pub fn draw_labels(painter: &Painter, rect: egui::Rect, scene: &ViewportScene, font_size: f32) {
    for label in scene.labels() {
        if !scene.is_visible(label.position) {
            continue;
        }
        let Some(screen) = scene.camera.project(label.position.as_vec3(), rect) else {
            continue;
        };
        if !rect.contains(screen) {
            continue;
        }
        painter.text(
            screen + egui::vec2(6.0, -6.0),
            egui::Align2::LEFT_BOTTOM,
            &label.text,
            egui::FontId::proportional(font_size),
            color32(label.color),
        );
    }
}

/// Mouse help shown along the bottom edge
pub fn draw_navigation_hint(painter: &Painter, rect: egui::Rect) {
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 20.0),
        egui::Align2::CENTER_BOTTOM,
        "Left: place / drag marker · Right: delete marker · Up/Down: marker size · Drag background: rotate",
        egui::FontId::proportional(11.0),
        egui::Color32::from_rgb(160, 170, 180),
    );
}
