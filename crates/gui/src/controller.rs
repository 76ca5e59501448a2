//! Interaction controller: turns pointer and key input into annotation edits.
//!
//! Events are handled one at a time and every handler runs to completion,
//! including its redraw request, before the next event is accepted. After
//! its own handling the controller hands the event on to a camera strategy
//! (rotate, pan, zoom) unless the event was consumed by annotation work.

use std::path::Path;

use glam::DVec3;
use shared::Annotation;

use crate::bounds::{within, SceneBounds};
use crate::error::{AnnotationError, Result};
use crate::marker::{Marker, MarkerFactory};
use crate::scene::{MarkerHandle, SceneAdapter};
use crate::state::annotations::{AnnotatedPoint, AnnotationStore};
use crate::state::session::{InteractionMode, InteractionState};
use crate::state::settings::{AppSettings, KeyAction, KeyBindings, MarkerSettings};

/// Raw input, in screen coordinates of the scene's viewport
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PrimaryDown { x: f32, y: f32 },
    PrimaryUp { x: f32, y: f32 },
    SecondaryDown { x: f32, y: f32 },
    SecondaryUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    Scroll { delta: f32 },
    /// Symbolic key name, e.g. "Up", "Delete"
    KeyDown { key: String },
}

/// Default camera behavior the controller delegates to
pub trait CameraInteraction<S: ?Sized> {
    fn on_event(&mut self, _scene: &mut S, _event: &InputEvent) {}
}

/// Camera strategy that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

impl<S: ?Sized> CameraInteraction<S> for NoCamera {}

pub struct InteractionController<C> {
    state: InteractionState,
    store: AnnotationStore,
    factory: MarkerFactory,
    markers: MarkerSettings,
    keys: KeyBindings,
    camera: C,
}

impl<C> InteractionController<C> {
    pub fn new(settings: &AppSettings, camera: C) -> Self {
        let mut markers = settings.markers.clone();
        markers.sanitize();
        Self {
            state: InteractionState::new(markers.default_radius),
            store: AnnotationStore::new(settings.annotations.renumber_on_move),
            factory: MarkerFactory::new(&markers),
            markers,
            keys: settings.keys.clone(),
            camera,
        }
    }

    /// Read the scene bounds. Returns false if bounds were already set
    /// or the scene has none, in which case nothing can be annotated.
    pub fn begin_session<S: SceneAdapter + ?Sized>(&mut self, scene: &S) -> bool {
        let Some(bounds) = scene.scene_bounds() else {
            tracing::warn!("Scene reports no bounds; annotation disabled");
            return false;
        };
        if !self.state.set_bounds(bounds) {
            tracing::warn!("Session bounds already set; ignoring {:?}", bounds.extents());
            return false;
        }
        tracing::info!("Annotation session started, bounds {:?}", bounds.extents());
        true
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn mode(&self) -> InteractionMode {
        self.state.mode()
    }

    pub fn bounds(&self) -> Option<&SceneBounds> {
        self.state.bounds()
    }

    pub fn current_radius(&self) -> f64 {
        self.state.current_radius
    }

    /// Current index of the selected annotation
    pub fn selected_index(&self) -> Option<usize> {
        self.state
            .selected
            .and_then(|handle| self.store.index_of_marker(handle))
    }

    pub fn selected_point(&self) -> Option<&AnnotatedPoint> {
        self.selected_index().and_then(|i| self.store.get(i))
    }

    /// Annotations in list order
    pub fn annotations(&self) -> Vec<Annotation> {
        self.store.serialize()
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Write the annotation file
    pub fn save(&self, path: &Path) -> Result<()> {
        self.store.save(path)
    }

    /// Handle one input event. Errors are fatal to the session.
    pub fn handle_event<S>(&mut self, scene: &mut S, event: &InputEvent) -> Result<()>
    where
        S: SceneAdapter + ?Sized,
        C: CameraInteraction<S>,
    {
        let forward = match event {
            InputEvent::PrimaryDown { x, y } => self.on_primary_down(scene, *x, *y)?,
            InputEvent::PrimaryUp { .. } => {
                self.state.dragging = false;
                true
            }
            InputEvent::SecondaryDown { x, y } => self.on_secondary_down(scene, *x, *y)?,
            InputEvent::PointerMove { x, y } => self.on_pointer_move(scene, *x, *y)?,
            InputEvent::KeyDown { key } => {
                self.on_key_down(scene, key)?;
                true
            }
            InputEvent::SecondaryUp { .. } | InputEvent::Scroll { .. } => true,
        };

        if forward {
            self.camera.on_event(scene, event);
        }
        Ok(())
    }

    // The handlers below return whether the event continues to the camera.

    fn on_primary_down<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, x: f32, y: f32) -> Result<bool> {
        let Some(pick) = scene.pick(x, y) else {
            return Ok(true);
        };
        if !within(pick.position, self.state.bounds()) {
            return Ok(false);
        }

        if let Some(handle) = pick.hit.filter(|h| self.store.index_of_marker(*h).is_some()) {
            self.select(scene, handle)?;
            scene.render();
            return Ok(false);
        }

        self.create_annotation(scene, pick.position)?;
        Ok(true)
    }

    fn on_secondary_down<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, x: f32, y: f32) -> Result<bool> {
        let Some(pick) = scene.pick(x, y) else {
            return Ok(true);
        };
        if !within(pick.position, self.state.bounds()) {
            return Ok(false);
        }

        if let Some(index) = pick.hit.and_then(|h| self.store.index_of_marker(h)) {
            self.delete_at(scene, index)?;
            scene.render();
        }
        Ok(true)
    }

    fn on_pointer_move<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, x: f32, y: f32) -> Result<bool> {
        if self.state.mode() != InteractionMode::Dragging {
            return Ok(true);
        }
        let (Some(handle), Some(index)) = (self.state.selected, self.selected_index()) else {
            self.state.clear_selection();
            return Ok(true);
        };

        let Some(pick) = scene.pick_ignoring(x, y, handle) else {
            return Ok(false);
        };
        if !within(pick.position, self.state.bounds()) {
            return Ok(false);
        }

        let marker = self.marker_at(index)?;
        self.factory.set_position(scene, &marker, pick.position);
        self.store.update_at(index, pick.position)?;
        scene.render();
        Ok(false)
    }

    fn on_key_down<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, key: &str) -> Result<()> {
        match self.keys.action_for(key) {
            Some(KeyAction::IncreaseRadius) => {
                self.state.current_radius += self.markers.radius_step;
                tracing::debug!("Marker radius {}", self.state.current_radius);
            }
            Some(KeyAction::DecreaseRadius) => {
                self.state.current_radius =
                    (self.state.current_radius - self.markers.radius_step).max(self.markers.min_radius);
                tracing::debug!("Marker radius {}", self.state.current_radius);
            }
            Some(KeyAction::DeleteSelected) => {
                if let Some(index) = self.selected_index() {
                    self.delete_at(scene, index)?;
                    self.state.clear_selection();
                    scene.render();
                }
            }
            None => {}
        }

        self.apply_radius(scene);
        scene.render();
        Ok(())
    }

    fn create_annotation<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, position: DVec3) -> Result<()> {
        let marker = self.factory.create(
            scene,
            self.store.next_id(),
            position,
            self.state.current_radius,
            self.factory.default_color(),
        )?;
        let id = self.store.append(position, marker);
        tracing::info!(
            "Clicked position: ({:.3}, {:.3}, {:.3}) -> annotation {id}",
            position.x,
            position.y,
            position.z
        );
        scene.render();
        Ok(())
    }

    fn select<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, handle: MarkerHandle) -> Result<()> {
        if let Some(previous) = self.selected_index() {
            let marker = self.marker_at(previous)?;
            self.factory.restore(scene, &marker);
        }
        self.state.selected = Some(handle);
        self.state.dragging = true;
        if let Some(index) = self.selected_index() {
            let marker = self.marker_at(index)?;
            self.factory.highlight(scene, &marker);
            tracing::debug!("Selected annotation at index {index}");
        }
        Ok(())
    }

    fn delete_at<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, index: usize) -> Result<()> {
        let removed = self.store.remove_at(index)?;
        self.factory.destroy(scene, &removed.marker);
        if self.state.is_selected(removed.marker.sphere) {
            self.state.clear_selection();
        }
        tracing::debug!("Deleted annotation {} (index {index})", removed.annotation.id);
        Ok(())
    }

    /// Re-apply the current radius to every marker; the selected one is enlarged
    fn apply_radius<S: SceneAdapter + ?Sized>(&self, scene: &mut S) {
        let radius = self.state.current_radius;
        for point in self.store.iter() {
            let r = if self.state.is_selected(point.marker.sphere) {
                radius * self.markers.selected_scale
            } else {
                radius
            };
            self.factory.set_radius(scene, &point.marker, r);
        }
    }

    fn marker_at(&self, index: usize) -> Result<Marker> {
        self.store
            .get(index)
            .map(|p| p.marker)
            .ok_or(AnnotationError::IndexOutOfRange {
                index,
                len: self.store.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::HeadlessScene;

    fn setup() -> (InteractionController<NoCamera>, HeadlessScene) {
        let scene = HeadlessScene::new(Some(SceneBounds::from_extents([
            0.0, 10.0, 0.0, 10.0, 0.0, 10.0,
        ])));
        let mut c = InteractionController::new(&AppSettings::default(), NoCamera);
        assert!(c.begin_session(&scene));
        (c, scene)
    }

    fn press(c: &mut InteractionController<NoCamera>, scene: &mut HeadlessScene, at: [f64; 3]) {
        scene.aim(DVec3::from_array(at));
        c.handle_event(scene, &InputEvent::PrimaryDown { x: 0.0, y: 0.0 }).unwrap();
    }

    fn key(c: &mut InteractionController<NoCamera>, scene: &mut HeadlessScene, name: &str) {
        c.handle_event(scene, &InputEvent::KeyDown { key: name.to_string() }).unwrap();
    }

    #[test]
    fn test_no_bounds_no_annotations() {
        let mut scene = HeadlessScene::new(None);
        let mut c = InteractionController::new(&AppSettings::default(), NoCamera);
        assert!(!c.begin_session(&scene));
        press(&mut c, &mut scene, [0.0, 0.0, 0.0]);
        assert!(c.store().is_empty());
    }

    #[test]
    fn test_begin_session_only_once() {
        let (mut c, _) = setup();
        let other = HeadlessScene::new(Some(SceneBounds::from_extents([0.0, 1.0, 0.0, 1.0, 0.0, 1.0])));
        assert!(!c.begin_session(&other));
        assert_eq!(c.bounds().unwrap().max, DVec3::splat(10.0));
    }

    #[test]
    fn test_click_empty_creates() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        assert_eq!(c.annotations(), vec![Annotation::new(1, [5.0, 5.0, 5.0])]);
        assert_eq!(scene.sphere_count(), 1);
        assert_eq!(scene.label_count(), 1);
        assert_eq!(c.mode(), InteractionMode::Idle);
        assert!(scene.render_count() > 0);
    }

    #[test]
    fn test_click_marker_selects_and_drags() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        assert_eq!(c.store().len(), 1);
        assert_eq!(c.selected_index(), Some(0));
        assert_eq!(c.mode(), InteractionMode::Dragging);
        let marker = c.store().get(0).unwrap().marker;
        assert_eq!(scene.sphere(marker.sphere).unwrap().color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reselect_restores_previous_color() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [1.0, 1.0, 1.0]);
        press(&mut c, &mut scene, [2.0, 2.0, 2.0]);
        press(&mut c, &mut scene, [1.0, 1.0, 1.0]);
        c.handle_event(&mut scene, &InputEvent::PrimaryUp { x: 0.0, y: 0.0 }).unwrap();
        press(&mut c, &mut scene, [2.0, 2.0, 2.0]);
        let first = c.store().get(0).unwrap().marker;
        let second = c.store().get(1).unwrap().marker;
        assert_eq!(scene.sphere(first.sphere).unwrap().color, [0.0, 0.0, 0.0]);
        assert_eq!(scene.sphere(second.sphere).unwrap().color, [1.0, 0.0, 0.0]);
        assert_eq!(c.selected_index(), Some(1));
    }

    #[test]
    fn test_primary_up_keeps_selection() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        c.handle_event(&mut scene, &InputEvent::PrimaryUp { x: 0.0, y: 0.0 }).unwrap();
        assert_eq!(c.mode(), InteractionMode::Idle);
        assert_eq!(c.selected_index(), Some(0));
    }

    #[test]
    fn test_move_without_drag_does_nothing() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        scene.aim(DVec3::new(6.0, 6.0, 6.0));
        c.handle_event(&mut scene, &InputEvent::PointerMove { x: 0.0, y: 0.0 }).unwrap();
        assert_eq!(c.annotations()[0].position(), [5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_drag_out_of_bounds_ignored() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        scene.aim(DVec3::new(50.0, 5.0, 5.0));
        c.handle_event(&mut scene, &InputEvent::PointerMove { x: 0.0, y: 0.0 }).unwrap();
        assert_eq!(c.annotations()[0].position(), [5.0, 5.0, 5.0]);
        assert_eq!(c.mode(), InteractionMode::Dragging);
    }

    #[test]
    fn test_right_click_deletes_selected_clears_selection() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        scene.aim(DVec3::splat(5.0));
        c.handle_event(&mut scene, &InputEvent::SecondaryDown { x: 0.0, y: 0.0 }).unwrap();
        assert!(c.store().is_empty());
        assert!(c.state().selected.is_none());
        assert_eq!(c.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_right_click_on_surface_is_noop() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        scene.aim(DVec3::splat(3.0));
        c.handle_event(&mut scene, &InputEvent::SecondaryDown { x: 0.0, y: 0.0 }).unwrap();
        assert_eq!(c.store().len(), 1);
    }

    #[test]
    fn test_radius_keys() {
        let (mut c, mut scene) = setup();
        key(&mut c, &mut scene, "Up");
        assert_eq!(c.current_radius(), 3.0);
        key(&mut c, &mut scene, "Down");
        key(&mut c, &mut scene, "Down");
        assert_eq!(c.current_radius(), 1.0);
        key(&mut c, &mut scene, "Down");
        assert_eq!(c.current_radius(), 1.0);
    }

    #[test]
    fn test_any_key_resizes_markers() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [1.0, 1.0, 1.0]);
        press(&mut c, &mut scene, [2.0, 2.0, 2.0]);
        press(&mut c, &mut scene, [2.0, 2.0, 2.0]);
        key(&mut c, &mut scene, "Up");
        let first = c.store().get(0).unwrap().marker;
        let second = c.store().get(1).unwrap().marker;
        assert_eq!(scene.sphere(first.sphere).unwrap().radius, 3.0);
        assert_eq!(scene.sphere(second.sphere).unwrap().radius, 4.5);

        key(&mut c, &mut scene, "a");
        assert_eq!(scene.sphere(first.sphere).unwrap().radius, 3.0);
        assert_eq!(scene.sphere(second.sphere).unwrap().radius, 4.5);
    }

    #[test]
    fn test_new_marker_uses_current_radius() {
        let (mut c, mut scene) = setup();
        key(&mut c, &mut scene, "Up");
        key(&mut c, &mut scene, "Up");
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        let m = c.store().get(0).unwrap().marker;
        assert_eq!(scene.sphere(m.sphere).unwrap().radius, 4.0);
    }

    #[test]
    fn test_delete_key_without_selection() {
        let (mut c, mut scene) = setup();
        press(&mut c, &mut scene, [5.0, 5.0, 5.0]);
        key(&mut c, &mut scene, "Delete");
        assert_eq!(c.store().len(), 1);
    }

    #[test]
    fn test_exhausted_scene_is_fatal() {
        let mut scene = HeadlessScene::new(Some(SceneBounds::from_extents([
            0.0, 10.0, 0.0, 10.0, 0.0, 10.0,
        ])))
        .with_capacity(2);
        let mut c = InteractionController::new(&AppSettings::default(), NoCamera);
        c.begin_session(&scene);
        press(&mut c, &mut scene, [1.0, 1.0, 1.0]);
        scene.aim(DVec3::splat(2.0));
        let err = c
            .handle_event(&mut scene, &InputEvent::PrimaryDown { x: 0.0, y: 0.0 })
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(c.store().len(), 1);
        assert_eq!(scene.sphere_count(), 1);
        assert_eq!(scene.label_count(), 1);
    }
}
