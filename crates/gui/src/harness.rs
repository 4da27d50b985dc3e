//! Headless test harness driving the full asynchronous load pipeline.

use std::path::Path;

use shared::{DimensionReadout, Dimensions, ErrorKind, FileRef, Mesh, SelectionError, StateTag};

use crate::ingest::{ByteSource, FileSelection};
use crate::lifecycle::LifecycleStats;
use crate::state::settings::LoadingSettings;
use crate::state::viewer_state::ViewerState;
use crate::viewer::Viewer;

/// Headless harness: a viewer plus the runtime its pipelines run on
pub struct TestHarness {
    viewer: Viewer,
    runtime: tokio::runtime::Runtime,
}

impl TestHarness {
    /// Create a harness with default loading settings.
    pub fn new() -> std::io::Result<Self> {
        Self::with_loading(LoadingSettings::default())
    }

    pub fn with_loading(loading: LoadingSettings) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let viewer = Viewer::new(runtime.handle().clone(), loading);
        Ok(Self { viewer, runtime })
    }

    // ── Driving ───────────────────────────────────────────────

    /// Select an in-memory file
    pub fn select_bytes(&mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Result<FileRef, SelectionError> {
        let bytes: Vec<u8> = bytes.into();
        self.viewer.select_file(FileSelection::from_bytes(name, bytes))
    }

    /// Select a file on disk.
    ///
    /// A path that cannot be stat'ed is still selected, so the failure
    /// surfaces through the pipeline as `Unreadable`.
    pub fn select_path(&mut self, path: &Path) -> Result<FileRef, SelectionError> {
        let selection = FileSelection::from_path(path).unwrap_or_else(|_| FileSelection {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: 0,
            source: ByteSource::Path(path.to_path_buf()),
        });
        self.viewer.select_file(selection)
    }

    /// Block until the active load resolves
    pub fn settle(&mut self) -> StateTag {
        let viewer = &mut self.viewer;
        self.runtime.block_on(viewer.settle());
        viewer.tag()
    }

    /// Select, then settle
    pub fn load_bytes(&mut self, name: &str, bytes: impl Into<Vec<u8>>) -> StateTag {
        match self.select_bytes(name, bytes) {
            Ok(_) => self.settle(),
            Err(_) => self.state_tag(),
        }
    }

    pub fn clear(&mut self) -> bool {
        self.viewer.clear()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn state(&self) -> &ViewerState {
        self.viewer.state()
    }

    pub fn state_tag(&self) -> StateTag {
        self.viewer.tag()
    }

    pub fn active_file(&self) -> Option<&FileRef> {
        self.viewer.state().file()
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.viewer.state().dimensions()
    }

    /// Dimension readout at two decimals
    pub fn readout(&self) -> Option<DimensionReadout> {
        self.dimensions().map(|d| d.formatted(2))
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.viewer.state().mesh()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.viewer.state().error_kind()
    }

    pub fn lifecycle(&self) -> LifecycleStats {
        self.viewer.lifecycle_stats()
    }
}
