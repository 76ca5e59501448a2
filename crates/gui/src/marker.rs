//! Marker factory: a sphere glyph plus its numeric label, managed as one unit.

use glam::DVec3;

use crate::error::Result;
use crate::scene::{Color, LabelHandle, MarkerHandle, SceneAdapter};
use crate::state::settings::MarkerSettings;

/// Visual marker of one annotation: sphere and label always move together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub sphere: MarkerHandle,
    pub label: LabelHandle,
}

/// Creates and updates markers through a [`SceneAdapter`]
#[derive(Debug, Clone)]
pub struct MarkerFactory {
    default_color: Color,
    selected_color: Color,
    label_color: Color,
}

impl MarkerFactory {
    pub fn new(settings: &MarkerSettings) -> Self {
        Self {
            default_color: settings.default_color,
            selected_color: settings.selected_color,
            label_color: settings.label_color,
        }
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// Create a sphere at `position` and a label showing `id` on top of it
    pub fn create<S: SceneAdapter + ?Sized>(
        &self,
        scene: &mut S,
        id: u32,
        position: DVec3,
        radius: f64,
        color: Color,
    ) -> Result<Marker> {
        let sphere = scene.add_sphere(position, radius, color)?;
        match scene.add_label(&id.to_string(), position, self.label_color) {
            Ok(label) => Ok(Marker { sphere, label }),
            Err(e) => {
                scene.remove_sphere(sphere);
                Err(e)
            }
        }
    }

    pub fn set_radius<S: SceneAdapter + ?Sized>(&self, scene: &mut S, marker: &Marker, radius: f64) {
        scene.set_sphere_radius(marker.sphere, radius);
    }

    pub fn set_color<S: SceneAdapter + ?Sized>(&self, scene: &mut S, marker: &Marker, color: Color) {
        scene.set_sphere_color(marker.sphere, color);
    }

    /// Recolor to the selection highlight
    pub fn highlight<S: SceneAdapter + ?Sized>(&self, scene: &mut S, marker: &Marker) {
        self.set_color(scene, marker, self.selected_color);
    }

    /// Recolor to the default color
    pub fn restore<S: SceneAdapter + ?Sized>(&self, scene: &mut S, marker: &Marker) {
        self.set_color(scene, marker, self.default_color);
    }

    pub fn set_position<S: SceneAdapter + ?Sized>(&self, scene: &mut S, marker: &Marker, position: DVec3) {
        scene.set_sphere_center(marker.sphere, position);
        scene.set_label_position(marker.label, position);
    }

    pub fn destroy<S: SceneAdapter + ?Sized>(&self, scene: &mut S, marker: &Marker) {
        scene.remove_sphere(marker.sphere);
        scene.remove_label(marker.label);
    }
}
