//! Application settings

use serde::{Deserialize, Serialize};

use crate::scene::Color;

/// Marker appearance and sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    /// Radius of newly created markers at session start
    pub default_radius: f64,
    /// Radius change per increase/decrease key press
    pub radius_step: f64,
    /// Smallest radius reachable with the decrease key
    pub min_radius: f64,
    /// Display scale of the selected marker on resize
    pub selected_scale: f64,
    pub default_color: Color,
    pub selected_color: Color,
    pub label_color: Color,
    /// Upper bound on live markers the scene will allocate
    pub max_markers: usize,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            default_radius: 2.0,
            radius_step: 1.0,
            min_radius: 1.0,
            selected_scale: 1.5,
            default_color: [0.0, 0.0, 0.0],
            selected_color: [1.0, 0.0, 0.0],
            label_color: [1.0, 1.0, 1.0],
            max_markers: 4096,
        }
    }
}

impl MarkerSettings {
    /// Replace sizes that would give a zero or negative marker radius with
    /// their defaults, and keep the starting radius reachable from the minimum.
    /// Returns true if anything was changed.
    pub fn sanitize(&mut self) -> bool {
        let defaults = Self::default();
        let mut changed = false;
        for (name, value, fallback) in [
            ("default_radius", &mut self.default_radius, defaults.default_radius),
            ("radius_step", &mut self.radius_step, defaults.radius_step),
            ("min_radius", &mut self.min_radius, defaults.min_radius),
            ("selected_scale", &mut self.selected_scale, defaults.selected_scale),
        ] {
            if !(value.is_finite() && *value > 0.0) {
                tracing::warn!("Invalid marker {name} {value}; using {fallback}");
                *value = fallback;
                changed = true;
            }
        }
        if self.default_radius < self.min_radius {
            tracing::warn!(
                "Marker default_radius {} below min_radius {}; raising it",
                self.default_radius,
                self.min_radius
            );
            self.default_radius = self.min_radius;
            changed = true;
        }
        changed
    }
}

/// Symbolic key names bound to annotation actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub increase_radius: String,
    pub decrease_radius: String,
    pub delete_selected: String,
    pub reset_camera: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            increase_radius: "Up".to_string(),
            decrease_radius: "Down".to_string(),
            delete_selected: "Delete".to_string(),
            reset_camera: "R".to_string(),
        }
    }
}

/// Action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    IncreaseRadius,
    DecreaseRadius,
    DeleteSelected,
}

impl KeyBindings {
    /// Resolve a key name to an annotation action
    pub fn action_for(&self, key: &str) -> Option<KeyAction> {
        if key == self.increase_radius {
            Some(KeyAction::IncreaseRadius)
        } else if key == self.decrease_radius {
            Some(KeyAction::DecreaseRadius)
        } else if key == self.delete_selected {
            Some(KeyAction::DeleteSelected)
        } else {
            None
        }
    }
}

/// Annotation bookkeeping options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    /// Rewrite a moved annotation's id to its list position + 1
    pub renumber_on_move: bool,
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: Color,
    /// Surface color RGB
    pub surface_color: Color,
    /// Label text size in points
    pub label_font_size: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [0.1, 0.2, 0.3],
            surface_color: [0.89, 0.85, 0.79],
            label_font_size: 14.0,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    /// Show the annotation list panel
    pub show_annotation_list: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            show_annotation_list: true,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub markers: MarkerSettings,
    #[serde(default)]
    pub keys: KeyBindings,
    #[serde(default)]
    pub annotations: AnnotationSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

impl AppSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("org", "landmark", "landmark")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str::<Self>(&json) {
                    Ok(mut settings) => {
                        settings.markers.sanitize();
                        return settings;
                    }
                    Err(e) => tracing::warn!("Ignoring unreadable settings {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                if std::fs::create_dir_all(parent).is_err() {
                    return;
                }
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to save settings: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = AppSettings::default();
        assert_eq!(s.markers.default_radius, 2.0);
        assert_eq!(s.markers.min_radius, 1.0);
        assert_eq!(s.markers.selected_scale, 1.5);
        assert_eq!(s.markers.selected_color, [1.0, 0.0, 0.0]);
        assert!(!s.annotations.renumber_on_move);
    }

    #[test]
    fn test_key_actions() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action_for("Up"), Some(KeyAction::IncreaseRadius));
        assert_eq!(keys.action_for("Down"), Some(KeyAction::DecreaseRadius));
        assert_eq!(keys.action_for("Delete"), Some(KeyAction::DeleteSelected));
        assert_eq!(keys.action_for("x"), None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"markers": {"default_radius": 3.5}}"#;
        let s: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.markers.default_radius, 3.5);
        assert_eq!(s.markers.radius_step, 1.0);
        assert_eq!(s.keys, KeyBindings::default());
    }

    #[test]
    fn test_defaults_are_already_sane() {
        let mut m = MarkerSettings::default();
        assert!(!m.sanitize());
        assert_eq!(m, MarkerSettings::default());
    }

    #[test]
    fn test_sanitize_non_positive_sizes() {
        let json = r#"{"markers": {"default_radius": -3.0, "radius_step": 0.0, "min_radius": 0.0, "selected_scale": -1.0}}"#;
        let mut s: AppSettings = serde_json::from_str(json).unwrap();
        assert!(s.markers.sanitize());
        assert_eq!(s.markers.default_radius, 2.0);
        assert_eq!(s.markers.radius_step, 1.0);
        assert_eq!(s.markers.min_radius, 1.0);
        assert_eq!(s.markers.selected_scale, 1.5);
    }

    #[test]
    fn test_sanitize_raises_default_to_min() {
        let mut m = MarkerSettings {
            default_radius: 2.0,
            min_radius: 5.0,
            ..Default::default()
        };
        assert!(m.sanitize());
        assert_eq!(m.default_radius, 5.0);
        assert_eq!(m.min_radius, 5.0);
    }

    #[test]
    fn test_round_trip() {
        let mut s = AppSettings::default();
        s.annotations.renumber_on_move = true;
        s.viewport.label_font_size = 18.0;
        let json = serde_json::to_string_pretty(&s).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
