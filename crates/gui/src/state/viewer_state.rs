//! The viewer's state machine.
//!
//! Every selection mints a [`FileRef`] with a fresh sequence id. A pipeline
//! completion is applied only while the machine is `Loading` that same
//! `FileRef`; anything else is stale and dropped without mutation.

use shared::{BoundingBox, Dimensions, ErrorKind, Failure, FileRef, Mesh, PipelineError, StateTag, StlFormat};

use crate::lifecycle::{MeshLifecycle, MeshResource};
use crate::pipeline::LoadedModel;

/// The published model of a `Ready` state
#[derive(Debug)]
pub struct ReadyModel {
    pub resource: MeshResource,
    pub bounds: BoundingBox,
    pub dimensions: Dimensions,
    pub format: StlFormat,
}

impl ReadyModel {
    pub fn mesh(&self) -> Option<&Mesh> {
        self.resource.mesh()
    }
}

#[derive(Debug, Default)]
pub enum ViewerState {
    #[default]
    Idle,
    Loading {
        file: FileRef,
    },
    Ready {
        file: FileRef,
        model: ReadyModel,
    },
    Failed {
        file: FileRef,
        failure: Failure,
    },
}

impl ViewerState {
    pub fn tag(&self) -> StateTag {
        match self {
            ViewerState::Idle => StateTag::Idle,
            ViewerState::Loading { .. } => StateTag::Loading,
            ViewerState::Ready { .. } => StateTag::Ready,
            ViewerState::Failed { .. } => StateTag::Failed,
        }
    }

    /// File the state refers to (none when idle)
    pub fn file(&self) -> Option<&FileRef> {
        match self {
            ViewerState::Idle => None,
            ViewerState::Loading { file }
            | ViewerState::Ready { file, .. }
            | ViewerState::Failed { file, .. } => Some(file),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewerState::Loading { .. })
    }

    pub fn model(&self) -> Option<&ReadyModel> {
        match self {
            ViewerState::Ready { model, .. } => Some(model),
            _ => None,
        }
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.model().and_then(ReadyModel::mesh)
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.model().map(|m| m.dimensions)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ViewerState::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.failure().map(|f| f.kind)
    }
}

/// Owns the current [`ViewerState`] and the mesh lifecycle behind it
#[derive(Debug, Default)]
pub struct ViewerStateMachine {
    state: ViewerState,
    last_seq: u64,
    lifecycle: MeshLifecycle,
}

impl ViewerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn lifecycle(&self) -> &MeshLifecycle {
        &self.lifecycle
    }

    /// The `FileRef` whose completion would currently be accepted
    pub fn active_file(&self) -> Option<&FileRef> {
        match &self.state {
            ViewerState::Loading { file } => Some(file),
            _ => None,
        }
    }

    pub fn is_active(&self, file: &FileRef) -> bool {
        self.active_file().is_some_and(|active| active.is_same_episode(file))
    }

    /// Start a new selection episode, superseding any previous one.
    pub fn begin(&mut self, name: impl Into<String>, size: u64) -> FileRef {
        self.last_seq += 1;
        let file = FileRef::new(self.last_seq, name, size);
        self.transition(ViewerState::Loading { file: file.clone() });
        file
    }

    /// Apply a pipeline result. Returns false (and changes nothing) when
    /// `file` is no longer the active selection.
    pub fn complete(&mut self, file: &FileRef, result: Result<LoadedModel, PipelineError>) -> bool {
        if !self.is_active(file) {
            tracing::debug!("Discarding stale result for {} (#{})", file.name(), file.seq());
            return false;
        }

        let next = match result {
            Ok(LoadedModel { model, format }) => {
                // Fully built before publication; the swap happens in `transition`
                let resource = self.lifecycle.acquire(file, model.mesh);
                ViewerState::Ready {
                    file: file.clone(),
                    model: ReadyModel {
                        resource,
                        bounds: model.bounds,
                        dimensions: model.dimensions,
                        format,
                    },
                }
            }
            Err(err) => ViewerState::Failed {
                file: file.clone(),
                failure: err.to_failure(),
            },
        };
        self.transition(next);
        true
    }

    /// Return to `Idle`. No-op (returns false) when already idle.
    pub fn clear(&mut self) -> bool {
        if matches!(self.state, ViewerState::Idle) {
            return false;
        }
        self.transition(ViewerState::Idle);
        true
    }

    fn transition(&mut self, next: ViewerState) {
        let previous = std::mem::replace(&mut self.state, next);
        if let ViewerState::Ready { mut model, .. } = previous {
            model.resource.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{analyze, AnalysisOptions};
    use shared::{ParseError, RawMesh, Triangle};

    fn loaded() -> LoadedModel {
        let raw = RawMesh::new(vec![Triangle::from_vertices(
            [0.0; 3],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        )]);
        LoadedModel {
            model: analyze(raw, &AnalysisOptions::default()).unwrap(),
            format: StlFormat::Binary,
        }
    }

    #[test]
    fn test_completion_for_active_file_publishes() {
        let mut machine = ViewerStateMachine::new();
        let file = machine.begin("a.stl", 134);
        assert_eq!(machine.state().tag(), StateTag::Loading);

        assert!(machine.complete(&file, Ok(loaded())));
        assert_eq!(machine.state().tag(), StateTag::Ready);
        assert_eq!(machine.state().file(), Some(&file));
        assert_eq!(machine.lifecycle().stats().live(), 1);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut machine = ViewerStateMachine::new();
        let a = machine.begin("a.stl", 0);
        let b = machine.begin("b.stl", 0);

        assert!(!machine.complete(&a, Ok(loaded())));
        assert_eq!(machine.state().tag(), StateTag::Loading);
        assert_eq!(machine.lifecycle().stats().acquired, 0);

        assert!(machine.complete(&b, Err(ParseError::EmptyMesh.into())));
        assert_eq!(machine.state().error_kind(), Some(ErrorKind::EmptyMesh));
        assert_eq!(machine.state().file(), Some(&b));
    }

    #[test]
    fn test_second_completion_for_same_file_is_ignored() {
        let mut machine = ViewerStateMachine::new();
        let a = machine.begin("a.stl", 0);
        assert!(machine.complete(&a, Ok(loaded())));
        assert!(!machine.complete(&a, Err(ParseError::UnsupportedFormat.into())));
        assert_eq!(machine.state().tag(), StateTag::Ready);
    }

    #[test]
    fn test_leaving_ready_releases_mesh() {
        let mut machine = ViewerStateMachine::new();
        let a = machine.begin("a.stl", 0);
        machine.complete(&a, Ok(loaded()));

        let b = machine.begin("b.stl", 0);
        assert_eq!(machine.lifecycle().stats().live(), 0);
        machine.complete(&b, Ok(loaded()));
        assert_eq!(machine.lifecycle().stats().live(), 1);

        assert!(machine.clear());
        assert_eq!(machine.lifecycle().stats().acquired, 2);
        assert_eq!(machine.lifecycle().stats().released, 2);
    }

    #[test]
    fn test_clear_while_loading_revokes_file() {
        let mut machine = ViewerStateMachine::new();
        let a = machine.begin("a.stl", 0);
        assert!(machine.clear());
        assert!(!machine.complete(&a, Ok(loaded())));
        assert_eq!(machine.state().tag(), StateTag::Idle);
    }

    #[test]
    fn test_clear_on_idle_is_noop() {
        let mut machine = ViewerStateMachine::new();
        assert!(!machine.clear());
        assert!(!machine.clear());
        assert_eq!(machine.state().tag(), StateTag::Idle);
    }
}
