//! Seam between the annotation engine and the 3D scene that renders it.
//!
//! The scene owns every graphical resource. The engine only refers to
//! spheres and labels through opaque handles and asks the scene to create,
//! mutate or destroy them.

use glam::DVec3;

use crate::bounds::SceneBounds;
use crate::error::Result;

/// RGB color, components in 0.0..=1.0
pub type Color = [f32; 3];

/// Opaque handle of a marker sphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

/// Opaque handle of a camera-facing text label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelHandle(pub u64);

/// Result of resolving a screen position against the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    /// World position under the cursor
    pub position: DVec3,
    /// Marker sphere under the cursor, if the nearest hit was one
    pub hit: Option<MarkerHandle>,
}

/// Visual state of one marker sphere, as held by a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereVisual {
    pub center: DVec3,
    pub radius: f64,
    pub color: Color,
}

/// Visual state of one label, as held by a scene
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVisual {
    pub text: String,
    pub position: DVec3,
    pub color: Color,
}

/// Rendering, picking and primitive management provided by the host scene
pub trait SceneAdapter {
    /// Resolve a screen coordinate. `None` when the ray meets nothing.
    fn pick(&mut self, screen_x: f32, screen_y: f32) -> Option<Pick>;

    /// Like [`SceneAdapter::pick`], but looking through the given marker.
    /// Used while that marker is being dragged.
    fn pick_ignoring(&mut self, screen_x: f32, screen_y: f32, _ignored: MarkerHandle) -> Option<Pick> {
        self.pick(screen_x, screen_y)
    }

    /// Request a redraw of the scene
    fn render(&mut self);

    /// Extent of the displayed surface
    fn scene_bounds(&self) -> Option<SceneBounds>;

    fn add_sphere(&mut self, center: DVec3, radius: f64, color: Color) -> Result<MarkerHandle>;
    fn set_sphere_radius(&mut self, handle: MarkerHandle, radius: f64);
    fn set_sphere_color(&mut self, handle: MarkerHandle, color: Color);
    fn set_sphere_center(&mut self, handle: MarkerHandle, center: DVec3);
    fn remove_sphere(&mut self, handle: MarkerHandle);

    fn add_label(&mut self, text: &str, position: DVec3, color: Color) -> Result<LabelHandle>;
    fn set_label_position(&mut self, handle: LabelHandle, position: DVec3);
    fn remove_label(&mut self, handle: LabelHandle);
}
