//! Headless scene and test harness for driving an annotation session
//! without a window.
//!
//! The headless scene has no camera: the world point under the cursor is
//! set directly with [`HeadlessScene::aim`]. A pick hits a marker when the
//! aimed point coincides with that marker's centre.

use std::collections::BTreeMap;
use std::path::Path;

use glam::DVec3;
use shared::Annotation;

use crate::bounds::SceneBounds;
use crate::controller::{CameraInteraction, InputEvent, InteractionController};
use crate::error::{AnnotationError, Result};
use crate::scene::{Color, LabelHandle, LabelVisual, MarkerHandle, Pick, SceneAdapter, SphereVisual};
use crate::state::session::InteractionMode;
use crate::state::settings::AppSettings;

/// Distance within which an aimed point counts as a hit on a marker centre
const HIT_TOLERANCE: f64 = 1e-9;

/// In-memory scene adapter
#[derive(Debug, Default)]
pub struct HeadlessScene {
    bounds: Option<SceneBounds>,
    cursor: Option<DVec3>,
    spheres: BTreeMap<MarkerHandle, SphereVisual>,
    labels: BTreeMap<LabelHandle, LabelVisual>,
    next_handle: u64,
    /// Maximum live primitives (spheres and labels together)
    capacity: Option<usize>,
    render_count: u64,
}

impl HeadlessScene {
    pub fn new(bounds: Option<SceneBounds>) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Limit live primitives to simulate exhausted graphics resources
    pub fn with_capacity(mut self, primitives: usize) -> Self {
        self.capacity = Some(primitives);
        self
    }

    /// Put the cursor over `position`
    pub fn aim(&mut self, position: DVec3) {
        self.cursor = Some(position);
    }

    /// Put the cursor over empty background
    pub fn aim_at_nothing(&mut self) {
        self.cursor = None;
    }

    pub fn sphere(&self, handle: MarkerHandle) -> Option<&SphereVisual> {
        self.spheres.get(&handle)
    }

    pub fn label(&self, handle: LabelHandle) -> Option<&LabelVisual> {
        self.labels.get(&handle)
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    fn allocate(&mut self) -> Result<u64> {
        if let Some(capacity) = self.capacity {
            if self.spheres.len() + self.labels.len() >= capacity {
                return Err(AnnotationError::OutOfGraphicsResources(format!(
                    "headless scene full ({capacity} primitives)"
                )));
            }
        }
        self.next_handle += 1;
        Ok(self.next_handle)
    }

    fn pick_with(&self, ignored: Option<MarkerHandle>) -> Option<Pick> {
        let position = self.cursor?;
        let hit = self
            .spheres
            .iter()
            .filter(|(handle, _)| Some(**handle) != ignored)
            .find(|(_, s)| s.center.distance(position) <= HIT_TOLERANCE)
            .map(|(handle, _)| *handle);
        Some(Pick { position, hit })
    }
}

impl SceneAdapter for HeadlessScene {
    fn pick(&mut self, _screen_x: f32, _screen_y: f32) -> Option<Pick> {
        self.pick_with(None)
    }

    fn pick_ignoring(&mut self, _screen_x: f32, _screen_y: f32, ignored: MarkerHandle) -> Option<Pick> {
        self.pick_with(Some(ignored))
    }

    fn render(&mut self) {
        self.render_count += 1;
    }

    fn scene_bounds(&self) -> Option<SceneBounds> {
        self.bounds
    }

    fn add_sphere(&mut self, center: DVec3, radius: f64, color: Color) -> Result<MarkerHandle> {
        let handle = MarkerHandle(self.allocate()?);
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
        let handle = LabelHandle(self.allocate()?);
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

/// Camera strategy that remembers every event handed to it
#[derive(Debug, Default)]
pub struct RecordingCamera {
    pub events: Vec<InputEvent>,
}

impl<S: ?Sized> CameraInteraction<S> for RecordingCamera {
    fn on_event(&mut self, _scene: &mut S, event: &InputEvent) {
        self.events.push(event.clone());
    }
}

/// Headless test harness: a scene plus a controller driving it
pub struct TestHarness {
    pub scene: HeadlessScene,
    pub controller: InteractionController<RecordingCamera>,
}

impl TestHarness {
    /// Start a session over `bounds` with default settings
    pub fn new(bounds: Option<SceneBounds>) -> Self {
        Self::with_settings(bounds, &AppSettings::default())
    }

    pub fn with_settings(bounds: Option<SceneBounds>, settings: &AppSettings) -> Self {
        Self::with_scene(HeadlessScene::new(bounds), settings)
    }

    pub fn with_scene(scene: HeadlessScene, settings: &AppSettings) -> Self {
        let mut controller = InteractionController::new(settings, RecordingCamera::default());
        controller.begin_session(&scene);
        Self { scene, controller }
    }

    /// Start a session over the box (xmin, xmax, ymin, ymax, zmin, zmax)
    pub fn with_extents(extents: [f64; 6]) -> Self {
        Self::new(Some(SceneBounds::from_extents(extents)))
    }

    /// Feed one raw event
    pub fn send(&mut self, event: InputEvent) -> Result<()> {
        self.controller.handle_event(&mut self.scene, &event)
    }

    // ── Pointer verbs ─────────────────────────────────────────

    /// Primary button down with the cursor over `at`
    pub fn click(&mut self, at: [f64; 3]) -> Result<()> {
        self.scene.aim(DVec3::from_array(at));
        self.send(InputEvent::PrimaryDown { x: 0.0, y: 0.0 })
    }

    /// Primary button down over empty background
    pub fn click_background(&mut self) -> Result<()> {
        self.scene.aim_at_nothing();
        self.send(InputEvent::PrimaryDown { x: 0.0, y: 0.0 })
    }

    /// Secondary button down with the cursor over `at`
    pub fn right_click(&mut self, at: [f64; 3]) -> Result<()> {
        self.scene.aim(DVec3::from_array(at));
        self.send(InputEvent::SecondaryDown { x: 0.0, y: 0.0 })
    }

    /// Pointer move with the cursor over `at`
    pub fn drag_to(&mut self, at: [f64; 3]) -> Result<()> {
        self.scene.aim(DVec3::from_array(at));
        self.send(InputEvent::PointerMove { x: 0.0, y: 0.0 })
    }

    /// Primary button up
    pub fn release(&mut self) -> Result<()> {
        self.send(InputEvent::PrimaryUp { x: 0.0, y: 0.0 })
    }

    /// Key press by symbolic name
    pub fn press(&mut self, key: &str) -> Result<()> {
        self.send(InputEvent::KeyDown {
            key: key.to_string(),
        })
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn annotations(&self) -> Vec<Annotation> {
        self.controller.annotations()
    }

    pub fn annotation_count(&self) -> usize {
        self.controller.store().len()
    }

    pub fn marker_count(&self) -> usize {
        self.scene.sphere_count()
    }

    pub fn label_count(&self) -> usize {
        self.scene.label_count()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.controller.selected_index()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.mode() == InteractionMode::Dragging
    }

    pub fn radius(&self) -> f64 {
        self.controller.current_radius()
    }

    /// Sphere of the annotation at `index`
    pub fn sphere_at(&self, index: usize) -> Option<&SphereVisual> {
        let point = self.controller.store().get(index)?;
        self.scene.sphere(point.marker.sphere)
    }

    /// Label of the annotation at `index`
    pub fn label_at(&self, index: usize) -> Option<&LabelVisual> {
        let point = self.controller.store().get(index)?;
        self.scene.label(point.marker.label)
    }

    /// Events the controller handed on to the camera
    pub fn forwarded_events(&self) -> &[InputEvent] {
        &self.controller.camera().events
    }

    /// Export the annotation list as JSON
    pub fn export_json(&self) -> Result<String> {
        self.controller.store().to_json()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.controller.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube10() -> TestHarness {
        TestHarness::with_extents([0.0, 10.0, 0.0, 10.0, 0.0, 10.0])
    }

    #[test]
    fn test_new_harness_empty() {
        let h = cube10();
        assert_eq!(h.annotation_count(), 0);
        assert_eq!(h.marker_count(), 0);
        assert_eq!(h.radius(), 2.0);
    }

    #[test]
    fn test_pick_hits_marker_centre_only() {
        let mut scene = HeadlessScene::new(None);
        let handle = scene.add_sphere(DVec3::splat(1.0), 2.0, [0.0; 3]).unwrap();
        scene.aim(DVec3::splat(1.0));
        assert_eq!(scene.pick(0.0, 0.0).unwrap().hit, Some(handle));
        scene.aim(DVec3::splat(1.5));
        assert_eq!(scene.pick(0.0, 0.0).unwrap().hit, None);
        scene.aim_at_nothing();
        assert!(scene.pick(0.0, 0.0).is_none());
    }

    #[test]
    fn test_pick_ignoring() {
        let mut scene = HeadlessScene::new(None);
        let handle = scene.add_sphere(DVec3::ZERO, 2.0, [0.0; 3]).unwrap();
        scene.aim(DVec3::ZERO);
        assert_eq!(scene.pick_ignoring(0.0, 0.0, handle).unwrap().hit, None);
    }

    #[test]
    fn test_capacity() {
        let mut scene = HeadlessScene::new(None).with_capacity(1);
        assert!(scene.add_sphere(DVec3::ZERO, 1.0, [0.0; 3]).is_ok());
        assert!(matches!(
            scene.add_label("1", DVec3::ZERO, [1.0; 3]),
            Err(AnnotationError::OutOfGraphicsResources(_))
        ));
    }

    #[test]
    fn test_click_and_inspect() {
        let mut h = cube10();
        h.click([5.0, 5.0, 5.0]).unwrap();
        assert_eq!(h.annotation_count(), 1);
        assert_eq!(h.sphere_at(0).unwrap().center, DVec3::splat(5.0));
        assert_eq!(h.label_at(0).unwrap().text, "1");
    }

    #[test]
    fn test_background_click_goes_to_camera() {
        let mut h = cube10();
        h.click_background().unwrap();
        assert_eq!(h.annotation_count(), 0);
        assert_eq!(h.forwarded_events().len(), 1);
    }
}
