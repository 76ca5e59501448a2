mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::controller`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use landmark_gui_lib::bounds;
pub use landmark_gui_lib::controller;
pub use landmark_gui_lib::error;
pub use landmark_gui_lib::scene;
pub use landmark_gui_lib::state;
pub use landmark_gui_lib::surface;

use std::path::PathBuf;

use app::AnnotatorApp;
use state::{AppSettings, AppState};
use surface::Surface;

/// Command-line options
#[derive(Debug, Default)]
struct CliArgs {
    surface: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "landmark=info,landmark_gui_lib=info".into()),
        )
        .init();

    let args = parse_args(std::env::args().skip(1));
    let settings = AppSettings::load();
    let surface = load_surface(args.surface.as_deref(), settings.viewport.surface_color);
    let state = AppState::new(settings, args.output);
    tracing::info!("Annotations will be written to {}", state.output_path.display());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Landmark: surface point annotation")
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "landmark",
        native_options,
        Box::new(move |cc| Ok(Box::new(AnnotatorApp::new(cc, state, surface)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> CliArgs {
    let mut out = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--surface" => out.surface = args.next().map(PathBuf::from),
            "--output" => out.output = args.next().map(PathBuf::from),
            other => tracing::warn!("Ignoring unknown argument {other}"),
        }
    }
    out
}

/// Surface from `path`, or the demonstration surface when none is given
/// or the file cannot be used
fn load_surface(path: Option<&std::path::Path>, color: [f32; 3]) -> Surface {
    let Some(path) = path else {
        tracing::info!("No --surface given; showing demonstration surface");
        return Surface::demo(color);
    };
    match Surface::load(path, color) {
        Ok(surface) => surface,
        Err(e) => {
            tracing::error!("Failed to load surface from {}: {e}", path.display());
            Surface::demo(color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> CliArgs {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args_empty() {
        let a = args(&[]);
        assert!(a.surface.is_none());
        assert!(a.output.is_none());
    }

    #[test]
    fn test_parse_args_both() {
        let a = args(&["--surface", "skull.json", "--output", "out/points.json"]);
        assert_eq!(a.surface, Some(PathBuf::from("skull.json")));
        assert_eq!(a.output, Some(PathBuf::from("out/points.json")));
    }

    #[test]
    fn test_parse_args_missing_value() {
        let a = args(&["--output"]);
        assert!(a.output.is_none());
    }
}
