//! Per-session interaction state.

use crate::bounds::SceneBounds;
use crate::scene::MarkerHandle;

/// Coarse mode of the interaction state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    /// The selected marker follows the pointer
    Dragging,
}

/// Selection, drag flag, marker radius and bounds of one session
#[derive(Debug, Clone)]
pub struct InteractionState {
    /// Selected marker, resolved to an index at the moment of use
    pub selected: Option<MarkerHandle>,
    pub dragging: bool,
    pub current_radius: f64,
    bounds: Option<SceneBounds>,
}

impl InteractionState {
    pub fn new(radius: f64) -> Self {
        Self {
            selected: None,
            dragging: false,
            current_radius: radius,
            bounds: None,
        }
    }

    pub fn bounds(&self) -> Option<&SceneBounds> {
        self.bounds.as_ref()
    }

    /// Set session bounds. Only the first call takes effect.
    pub fn set_bounds(&mut self, bounds: SceneBounds) -> bool {
        if self.bounds.is_some() {
            return false;
        }
        self.bounds = Some(bounds);
        true
    }

    pub fn mode(&self) -> InteractionMode {
        if self.dragging && self.selected.is_some() {
            InteractionMode::Dragging
        } else {
            InteractionMode::Idle
        }
    }

    pub fn is_selected(&self, handle: MarkerHandle) -> bool {
        self.selected == Some(handle)
    }

    /// Drop selection and drag
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_idle() {
        let s = InteractionState::new(2.0);
        assert_eq!(s.mode(), InteractionMode::Idle);
        assert!(s.selected.is_none());
        assert!(s.bounds().is_none());
        assert_eq!(s.current_radius, 2.0);
    }

    #[test]
    fn test_bounds_set_once() {
        let mut s = InteractionState::new(2.0);
        let a = SceneBounds::from_extents([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let b = SceneBounds::from_extents([0.0, 9.0, 0.0, 9.0, 0.0, 9.0]);
        assert!(s.set_bounds(a));
        assert!(!s.set_bounds(b));
        assert_eq!(s.bounds(), Some(&a));
    }

    #[test]
    fn test_dragging_requires_selection() {
        let mut s = InteractionState::new(2.0);
        s.dragging = true;
        assert_eq!(s.mode(), InteractionMode::Idle);
        s.selected = Some(MarkerHandle(3));
        assert_eq!(s.mode(), InteractionMode::Dragging);
        s.clear_selection();
        assert_eq!(s.mode(), InteractionMode::Idle);
        assert!(!s.dragging);
    }
}
