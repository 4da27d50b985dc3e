pub mod settings;
pub mod viewer_state;

use shared::SelectionError;
use tokio::runtime::Handle;

pub use settings::{DimensionSettings, Language, LoadingSettings, SizeLimitPolicy, Units, ViewerSettings};
pub use viewer_state::{ReadyModel, ViewerState, ViewerStateMachine};

use crate::ingest::FileSelection;
use crate::viewer::Viewer;

/// Panel visibility flags
pub struct PanelVisibility {
    pub file_panel: bool,
    pub dimensions: bool,
    pub controls_hint: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            file_panel: true,
            dimensions: true,
            controls_hint: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    pub viewer: Viewer,
    pub settings: ViewerSettings,
    pub panels: PanelVisibility,
    /// Show settings window
    pub show_settings_window: bool,
    /// Last rejected selection, shown until the next successful one
    pub rejection: Option<SelectionError>,
}

impl AppState {
    pub fn new(runtime: Handle, settings: ViewerSettings) -> Self {
        Self {
            viewer: Viewer::new(runtime, settings.loading.clone()),
            settings,
            panels: PanelVisibility::default(),
            show_settings_window: false,
            rejection: None,
        }
    }

    /// Route a selection through screening and start loading it
    pub fn open(&mut self, selection: FileSelection) {
        match self.viewer.select_file(selection) {
            Ok(_) => self.rejection = None,
            Err(e) => self.rejection = Some(e),
        }
    }

    pub fn clear(&mut self) {
        self.rejection = None;
        self.viewer.clear();
    }

    /// Persist settings and push the loading policy to the viewer
    pub fn apply_settings(&mut self) {
        self.viewer.set_loading_settings(self.settings.loading.clone());
        self.settings.save();
    }
}
