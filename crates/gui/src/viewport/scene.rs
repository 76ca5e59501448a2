//! Scene adapter backed by the on-screen viewport.
//!
//! Holds the surface, the marker spheres and labels, and the camera. Picking
//! casts a ray through the camera; drawing happens in the GL callback and
//! the label overlay, which read the visuals stored here.

use std::collections::BTreeMap;

use glam::{DVec3, Vec3};

use super::camera::ArcBallCamera;
use super::picking::{ray_sphere, Ray};
use crate::bounds::SceneBounds;
use crate::error::{AnnotationError, Result};
use crate::scene::{Color, LabelHandle, LabelVisual, MarkerHandle, Pick, SceneAdapter, SphereVisual};
use crate::surface::Surface;

/// Fraction of the surface diagonal a label anchor may sit behind the
/// surface and still count as visible
const OCCLUSION_SLACK: f32 = 1e-3;

pub struct ViewportScene {
    pub surface: Surface,
    pub camera: ArcBallCamera,
    /// Screen rectangle of the viewport, updated every frame
    pub rect: egui::Rect,
    spheres: BTreeMap<MarkerHandle, SphereVisual>,
    labels: BTreeMap<LabelHandle, LabelVisual>,
    next_handle: u64,
    max_markers: usize,
    /// Set by `render`, cleared once the panel has asked egui for a frame
    redraw_requested: bool,
}

impl ViewportScene {
    pub fn new(surface: Surface, max_markers: usize) -> Self {
        let camera = ArcBallCamera::framing(&surface.bounds);
        Self {
            surface,
            camera,
            rect: egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1.0, 1.0)),
            spheres: BTreeMap::new(),
            labels: BTreeMap::new(),
            next_handle: 0,
            max_markers,
            redraw_requested: false,
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera = ArcBallCamera::framing(&self.surface.bounds);
    }

    pub fn spheres(&self) -> impl Iterator<Item = &SphereVisual> {
        self.spheres.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelVisual> {
        self.labels.values()
    }

    /// True when no part of the surface lies between the camera and `point`
    pub fn is_visible(&self, point: DVec3) -> bool {
        let eye = self.camera.eye_position();
        let to_point = point.as_vec3() - eye;
        let distance = to_point.length();
        if distance <= f32::EPSILON {
            return true;
        }
        let ray = Ray {
            origin: eye,
            direction: to_point / distance,
        };
        let slack = self.surface.bounds.diagonal() as f32 * OCCLUSION_SLACK;
        match self.surface.intersect(&ray) {
            Some((t, _)) => t >= distance - slack,
            None => true,
        }
    }

    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn cast(&self, screen_x: f32, screen_y: f32, ignored: Option<MarkerHandle>) -> Option<Pick> {
        if !self.rect.is_positive() {
            return None;
        }
        let ray = self.camera.screen_ray(egui::pos2(screen_x, screen_y), self.rect);

        let surface_hit = self.surface.intersect(&ray);
        let marker_hit = self.nearest_sphere(&ray, ignored);

        match (surface_hit, marker_hit) {
            (Some((ts, _)), Some((tm, handle))) if tm <= ts => Some(Pick {
                position: ray.at(tm).as_dvec3(),
                hit: Some(handle),
            }),
            (Some((_, position)), _) => Some(Pick { position, hit: None }),
            (None, Some((tm, handle))) => Some(Pick {
                position: ray.at(tm).as_dvec3(),
                hit: Some(handle),
            }),
            (None, None) => None,
        }
    }

    fn nearest_sphere(&self, ray: &Ray, ignored: Option<MarkerHandle>) -> Option<(f32, MarkerHandle)> {
        self.spheres
            .iter()
            .filter(|(handle, _)| Some(**handle) != ignored)
            .filter_map(|(handle, s)| {
                ray_sphere(ray, s.center.as_vec3(), s.radius as f32).map(|t| (t, *handle))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    fn allocate(&mut self, live: usize, what: &str) -> Result<u64> {
        if live >= self.max_markers {
            return Err(AnnotationError::OutOfGraphicsResources(format!(
                "{what} budget of {} exhausted",
                self.max_markers
            )));
        }
        self.next_handle += 1;
        Ok(self.next_handle)
    }
}

impl SceneAdapter for ViewportScene {
    fn pick(&mut self, screen_x: f32, screen_y: f32) -> Option<Pick> {
        self.cast(screen_x, screen_y, None)
    }

    fn pick_ignoring(&mut self, screen_x: f32, screen_y: f32, ignored: MarkerHandle) -> Option<Pick> {
        self.cast(screen_x, screen_y, Some(ignored))
    }

    fn render(&mut self) {
        self.redraw_requested = true;
    }

    fn scene_bounds(&self) -> Option<SceneBounds> {
        Some(self.surface.bounds)
    }

    fn add_sphere(&mut self, center: DVec3, radius: f64, color: Color) -> Result<MarkerHandle> {
        let handle = MarkerHandle(self.allocate(self.spheres.len(), "marker")?);
        self.spheres.insert(handle, SphereVisual { center, radius, color });
        Ok(handle)
    }

    fn set_sphere_radius(&mut self, handle: MarkerHandle, radius: f64) {
        if let Some(s) = self.spheres.get_mut(&handle) {
            s.radius = radius;
        }
    }

    fn set_sphere_color(&mut self, handle: MarkerHandle, color: Color) {
        if let Some(s) = self.spheres.get_mut(&handle) {
            s.color = color;
        }
    }

    fn set_sphere_center(&mut self, handle: MarkerHandle, center: DVec3) {
        if let Some(s) = self.spheres.get_mut(&handle) {
            s.center = center;
        }
    }

    fn remove_sphere(&mut self, handle: MarkerHandle) {
        self.spheres.remove(&handle);
    }

    fn add_label(&mut self, text: &str, position: DVec3, color: Color) -> Result<LabelHandle> {
        let handle = LabelHandle(self.allocate(self.labels.len(), "label")?);
        self.labels.insert(
            handle,
            LabelVisual {
                text: text.to_string(),
                position,
                color,
            },
        );
        Ok(handle)
    }

    fn set_label_position(&mut self, handle: LabelHandle, position: DVec3) {
        if let Some(l) = self.labels.get_mut(&handle) {
            l.position = position;
        }
    }

    fn remove_label(&mut self, handle: LabelHandle) {
        self.labels.remove(&handle);
    }
}

/// Sphere instance as uploaded to the renderer: centre, radius, color
pub fn sphere_instances(scene: &ViewportScene) -> Vec<(Vec3, f32, Color)> {
    scene
        .spheres()
        .map(|s| (s.center.as_vec3(), s.radius as f32, s.color))
        .collect()
}
