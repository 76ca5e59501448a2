pub mod annotations;
pub mod session;
pub mod settings;

use std::path::PathBuf;

pub use annotations::{AnnotatedPoint, AnnotationStore};
pub use session::{InteractionMode, InteractionState};
pub use settings::{AppSettings, KeyAction, KeyBindings, MarkerSettings};

/// Default annotation file, written to the working directory
pub const DEFAULT_OUTPUT: &str = "annotations.json";

/// Application state outside the annotation session itself
pub struct AppState {
    pub settings: AppSettings,
    /// Where annotations are written on save and on exit
    pub output_path: PathBuf,
    /// Show settings window
    pub show_settings_window: bool,
    /// Outcome of the last save, shown in the status bar
    pub last_save: Option<Result<PathBuf, String>>,
}

impl AppState {
    pub fn new(settings: AppSettings, output_path: Option<PathBuf>) -> Self {
        Self {
            settings,
            output_path: output_path.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            show_settings_window: false,
            last_save: None,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::load(), None)
    }
}
