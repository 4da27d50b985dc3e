mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state` etc. resolve to the lib
// crate types everywhere in the binary.
pub use stl_viewer_lib::state;

use app::ViewerApp;
use stl_viewer_lib::ingest::FileSelection;
use stl_viewer_lib::state::ViewerSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stl_viewer=info".into()),
        )
        .init();

    // Pipelines run here; the UI thread only polls for results
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .thread_name("stl-pipeline")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return;
        }
    };
    let handle = runtime.handle().clone();

    let settings = ViewerSettings::load();
    let initial_file = parse_file_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("STL Viewer")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0])
            .with_drag_and_drop(true),
        multisampling: if settings.viewport.antialiasing { 4 } else { 0 },
        depth_buffer: 24,
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "stl-viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, handle, settings, initial_file)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }

    drop(runtime);
}

/// Parse `--file <path>`
fn parse_file_arg() -> Option<FileSelection> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--file" && i + 1 < args.len() {
            let path = &args[i + 1];
            match FileSelection::from_path(path) {
                Ok(selection) => return Some(selection),
                Err(e) => tracing::error!("Cannot open {path}: {e}"),
            }
            break;
        }
        i += 1;
    }
    None
}
