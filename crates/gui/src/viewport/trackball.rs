//! Trackball camera behavior for events the annotation controller passes on.

use crate::controller::{CameraInteraction, InputEvent};

use super::scene::ViewportScene;

/// Degrees of rotation per pixel of pointer travel
const ROTATE_SPEED: f32 = 0.4;
/// Zoom fraction per scroll point
const ZOOM_SPEED: f32 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragKind {
    Rotate,
    Pan,
}

/// Primary drag rotates, secondary drag pans, scroll zooms, reset key re-frames
#[derive(Debug)]
pub struct TrackballStyle {
    drag: Option<DragKind>,
    last: Option<(f32, f32)>,
    reset_key: String,
}

impl TrackballStyle {
    pub fn new(reset_key: impl Into<String>) -> Self {
        Self {
            drag: None,
            last: None,
            reset_key: reset_key.into(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn start(&mut self, kind: DragKind, x: f32, y: f32) {
        self.drag = Some(kind);
        self.last = Some((x, y));
    }

    fn stop(&mut self, kind: DragKind) {
        if self.drag == Some(kind) {
            self.drag = None;
            self.last = None;
        }
    }
}

impl CameraInteraction<ViewportScene> for TrackballStyle {
    fn on_event(&mut self, scene: &mut ViewportScene, event: &InputEvent) {
        match event {
            InputEvent::PrimaryDown { x, y } => self.start(DragKind::Rotate, *x, *y),
            InputEvent::SecondaryDown { x, y } => self.start(DragKind::Pan, *x, *y),
            InputEvent::PrimaryUp { .. } => self.stop(DragKind::Rotate),
            InputEvent::SecondaryUp { .. } => self.stop(DragKind::Pan),
            InputEvent::PointerMove { x, y } => {
                let (Some(kind), Some((lx, ly))) = (self.drag, self.last) else {
                    return;
                };
                let (dx, dy) = (x - lx, y - ly);
                self.last = Some((*x, *y));
                match kind {
                    DragKind::Rotate => scene.camera.rotate(-dx * ROTATE_SPEED, dy * ROTATE_SPEED),
                    DragKind::Pan => {
                        let h = scene.rect.height().max(1.0);
                        scene.camera.pan(-dx / h, dy / h);
                    }
                }
            }
            InputEvent::Scroll { delta } => scene.camera.zoom(delta * ZOOM_SPEED),
            InputEvent::KeyDown { key } => {
                if *key == self.reset_key {
                    scene.reset_camera();
                }
            }
        }
    }
}
