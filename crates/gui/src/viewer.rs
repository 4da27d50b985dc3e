//! Asynchronous viewer driver.
//!
//! `Viewer` owns the state machine and runs one pipeline task per selection
//! on a tokio runtime. Completions come back over an mpsc channel tagged
//! with their `FileRef`; the interaction thread applies them with [`Viewer::poll`]
//! (once per frame) or waits for them with [`Viewer::settle`].

use std::sync::Arc;

use shared::{FileRef, PipelineError, ReadError, SelectionError, StateTag};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ingest::FileSelection;
use crate::lifecycle::LifecycleStats;
use crate::pipeline::{self, LoadedModel};
use crate::state::settings::{LoadingSettings, SizeLimitPolicy};
use crate::state::viewer_state::{ViewerState, ViewerStateMachine};

/// Called from the worker after a completion is queued (e.g. to request a repaint)
pub type CompletionNotifier = Arc<dyn Fn() + Send + Sync>;

/// A finished pipeline run, tagged with the selection it belongs to
#[derive(Debug)]
pub struct PipelineOutcome {
    pub file: FileRef,
    pub result: Result<LoadedModel, PipelineError>,
}

/// Delivers exactly one outcome per task.
///
/// A task that ends without sending (it panicked or was aborted) reports
/// `ReadError::Aborted` from `Drop`, so `settle` never waits on a dead task.
/// Outcomes of aborted tasks are stale by then and get discarded.
struct OutcomeSender {
    tx: mpsc::UnboundedSender<PipelineOutcome>,
    file: Option<FileRef>,
    notifier: Option<CompletionNotifier>,
}

impl OutcomeSender {
    fn new(
        tx: mpsc::UnboundedSender<PipelineOutcome>,
        file: FileRef,
        notifier: Option<CompletionNotifier>,
    ) -> Self {
        Self {
            tx,
            file: Some(file),
            notifier,
        }
    }

    fn send(mut self, result: Result<LoadedModel, PipelineError>) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: Result<LoadedModel, PipelineError>) {
        let Some(file) = self.file.take() else {
            return;
        };
        // Send fails only when the viewer is gone
        if self.tx.send(PipelineOutcome { file, result }).is_ok() {
            if let Some(notify) = &self.notifier {
                notify();
            }
        }
    }
}

impl Drop for OutcomeSender {
    fn drop(&mut self) {
        if self.file.is_some() {
            self.deliver(Err(ReadError::Aborted.into()));
        }
    }
}

pub struct Viewer {
    machine: ViewerStateMachine,
    runtime: Handle,
    tx: mpsc::UnboundedSender<PipelineOutcome>,
    rx: mpsc::UnboundedReceiver<PipelineOutcome>,
    in_flight: Option<JoinHandle<()>>,
    loading: LoadingSettings,
    notifier: Option<CompletionNotifier>,
}

impl Viewer {
    pub fn new(runtime: Handle, loading: LoadingSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            machine: ViewerStateMachine::new(),
            runtime,
            tx,
            rx,
            in_flight: None,
            loading,
            notifier: None,
        }
    }

    pub fn set_notifier(&mut self, notifier: CompletionNotifier) {
        self.notifier = Some(notifier);
    }

    /// Takes effect from the next selection
    pub fn set_loading_settings(&mut self, loading: LoadingSettings) {
        self.loading = loading;
    }

    pub fn loading_settings(&self) -> &LoadingSettings {
        &self.loading
    }

    pub fn state(&self) -> &ViewerState {
        self.machine.state()
    }

    pub fn tag(&self) -> StateTag {
        self.machine.state().tag()
    }

    pub fn lifecycle_stats(&self) -> LifecycleStats {
        self.machine.lifecycle().stats()
    }

    /// Check a selection against the loading policy without starting it.
    pub fn screen(&self, selection: &FileSelection) -> Result<(), SelectionError> {
        if self.loading.require_stl_extension && !selection.has_stl_extension() {
            return Err(SelectionError::NotStl {
                name: selection.name.clone(),
            });
        }

        if let Some(limit) = self.loading.size_limit_bytes {
            if selection.size > limit {
                match self.loading.size_limit_policy {
                    SizeLimitPolicy::Reject => {
                        return Err(SelectionError::TooLarge {
                            name: selection.name.clone(),
                            size: selection.size,
                            limit,
                        })
                    }
                    SizeLimitPolicy::Warn => tracing::warn!(
                        "{} is {}, above the {} limit",
                        selection.name,
                        shared::format_size_mb(selection.size),
                        shared::format_size_mb(limit)
                    ),
                }
            }
        }
        Ok(())
    }

    /// Start loading a selection, superseding whatever came before.
    ///
    /// Rejected selections leave the state untouched.
    pub fn select_file(&mut self, selection: FileSelection) -> Result<FileRef, SelectionError> {
        if let Err(e) = self.screen(&selection) {
            tracing::warn!("Selection rejected: {}", e);
            return Err(e);
        }

        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let file = self.machine.begin(selection.name.clone(), selection.size);
        tracing::info!("Loading {} ({}, #{})", file.name(), file.size_label(), file.seq());

        let outcome = OutcomeSender::new(self.tx.clone(), file.clone(), self.notifier.clone());
        let options = self.loading.analysis_options();
        self.in_flight = Some(self.runtime.spawn(async move {
            let result = pipeline::run(selection, options).await;
            outcome.send(result);
        }));

        Ok(file)
    }

    /// Drop the current model (or pending load) and return to idle.
    pub fn clear(&mut self) -> bool {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        let changed = self.machine.clear();
        if changed {
            tracing::info!("Viewer cleared");
        }
        changed
    }

    /// Apply every queued completion. Returns how many changed the state.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until the active load (if any) has resolved.
    pub async fn settle(&mut self) {
        self.poll();
        while self.machine.state().is_loading() {
            match self.rx.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
    }

    fn apply(&mut self, outcome: PipelineOutcome) -> bool {
        let PipelineOutcome { file, result } = outcome;
        if let Err(e) = &result {
            if self.machine.is_active(&file) {
                tracing::error!("Failed to load {}: {}", file.name(), e);
            }
        }

        let applied = self.machine.complete(&file, result);
        if applied {
            if let Some(model) = self.machine.state().model() {
                tracing::info!(
                    "Loaded {} ({} triangles, {}, {})",
                    file.name(),
                    model.mesh().map_or(0, |m| m.triangle_count()),
                    model.format,
                    model.dimensions
                );
            }
        }
        applied
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorKind;

    #[tokio::test]
    async fn test_panicking_task_reports_aborted() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let file = FileRef::new(1, "boom.stl", 0);
        let outcome = OutcomeSender::new(tx, file.clone(), None);

        let task = tokio::spawn(async move {
            let _outcome = outcome;
            panic!("pipeline blew up");
        });
        assert!(task.await.unwrap_err().is_panic());

        let received = rx.recv().await.unwrap();
        assert_eq!(received.file, file);
        assert_eq!(received.result.unwrap_err().kind(), ErrorKind::Aborted);
    }

    #[tokio::test]
    async fn test_sent_outcome_is_not_repeated() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = OutcomeSender::new(tx, FileRef::new(2, "a.stl", 0), None);
        outcome.send(Err(ReadError::Unreadable("gone".to_string()).into()));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.result.unwrap_err().kind(), ErrorKind::Unreadable);
        // Sender dropped with the outcome, so the channel is now closed
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dead_task_does_not_hang_settle() {
        let mut viewer = Viewer::new(Handle::current(), LoadingSettings::default());
        let file = viewer.machine.begin("stuck.stl", 0);
        let outcome = OutcomeSender::new(viewer.tx.clone(), file, None);
        viewer.in_flight = Some(tokio::spawn(async move {
            let _outcome = outcome;
            panic!("pipeline blew up");
        }));

        viewer.settle().await;
        assert_eq!(viewer.tag(), StateTag::Failed);
        assert_eq!(viewer.state().error_kind(), Some(ErrorKind::Aborted));
    }
}
