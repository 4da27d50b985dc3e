//! Integration tests for the viewer: selection supersession, completion
//! ordering, rejection policy, and mesh lifecycle accounting.

use std::io::Write;

use shared::{ErrorKind, PipelineError, SelectionError, StateTag};
use stl_viewer_lib::fixtures;
use stl_viewer_lib::geometry::AnalysisOptions;
use stl_viewer_lib::ingest::FileSelection;
use stl_viewer_lib::pipeline::{self, LoadedModel};
use stl_viewer_lib::state::{LoadingSettings, SizeLimitPolicy, ViewerStateMachine};
use stl_viewer_lib::viewer::Viewer;
use tokio::runtime::Handle;

fn box_bytes(size: f32) -> Vec<u8> {
    fixtures::binary_stl(&fixtures::box_triangles([0.0; 3], [size, size, size]))
}

fn decoded(size: f32) -> Result<LoadedModel, PipelineError> {
    pipeline::decode(&box_bytes(size), &AnalysisOptions::default())
}

fn viewer() -> Viewer {
    Viewer::new(Handle::current(), LoadingSettings::default())
}

// ── Completion ordering ─────────────────────────────────────────

#[test]
fn test_latest_selection_wins_in_either_completion_order() {
    for b_first in [false, true] {
        let mut machine = ViewerStateMachine::new();
        let a = machine.begin("a.stl", 0);
        let b = machine.begin("b.stl", 0);

        if b_first {
            assert!(machine.complete(&b, decoded(2.0)));
            assert!(!machine.complete(&a, decoded(1.0)));
        } else {
            assert!(!machine.complete(&a, decoded(1.0)));
            assert!(machine.complete(&b, decoded(2.0)));
        }

        let state = machine.state();
        assert_eq!(state.tag(), StateTag::Ready);
        assert_eq!(state.file().map(|f| f.name()), Some("b.stl"));
        assert_eq!(state.dimensions().map(|d| d.width), Some(2.0));
        assert_eq!(machine.lifecycle().stats().acquired, 1);
    }
}

#[test]
fn test_stale_failure_does_not_replace_ready() {
    let mut machine = ViewerStateMachine::new();
    let a = machine.begin("a.stl", 0);
    let b = machine.begin("b.stl", 0);
    assert!(machine.complete(&b, decoded(1.0)));

    let late = pipeline::decode(b"garbage", &AnalysisOptions::default());
    assert!(!machine.complete(&a, late));
    assert_eq!(machine.state().tag(), StateTag::Ready);
}

#[test]
fn test_dropping_machine_releases_live_mesh() {
    let mut machine = ViewerStateMachine::new();
    let lifecycle = machine.lifecycle().clone();
    for size in [1.0, 2.0, 3.0] {
        let file = machine.begin("m.stl", 0);
        assert!(machine.complete(&file, decoded(size)));
        assert_eq!(lifecycle.stats().live(), 1);
    }
    drop(machine);

    let stats = lifecycle.stats();
    assert_eq!(stats.acquired, 3);
    assert_eq!(stats.released, 3);
}

// ── Asynchronous driver ─────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_settle_publishes_only_the_latest_selection() {
    let mut viewer = viewer();
    viewer
        .select_file(FileSelection::from_bytes("a.stl", box_bytes(1.0)))
        .unwrap();
    let b = viewer
        .select_file(FileSelection::from_bytes("b.stl", box_bytes(2.0)))
        .unwrap();

    viewer.settle().await;
    assert_eq!(viewer.tag(), StateTag::Ready);
    assert_eq!(viewer.state().file(), Some(&b));
    assert!(viewer.lifecycle_stats().live() <= 1);

    // Anything still in the channel belongs to `a` and must be discarded
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(viewer.poll(), 0);
    assert_eq!(viewer.state().file(), Some(&b));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failure_is_attributed_to_latest_selection() {
    let mut viewer = viewer();
    viewer
        .select_file(FileSelection::from_bytes("good.stl", box_bytes(1.0)))
        .unwrap();
    let bad = viewer
        .select_file(FileSelection::from_bytes("bad.stl", fixtures::binary_stl(&[])))
        .unwrap();

    viewer.settle().await;
    assert_eq!(viewer.tag(), StateTag::Failed);
    assert_eq!(viewer.state().file(), Some(&bad));
    assert_eq!(viewer.state().error_kind(), Some(ErrorKind::EmptyMesh));
    assert_eq!(viewer.lifecycle_stats().acquired, 0);
}

#[tokio::test]
async fn test_clear_is_idempotent_and_releases() {
    let mut viewer = viewer();
    viewer
        .select_file(FileSelection::from_bytes("box.stl", box_bytes(1.0)))
        .unwrap();
    viewer.settle().await;
    assert_eq!(viewer.tag(), StateTag::Ready);

    assert!(viewer.clear());
    assert_eq!(viewer.tag(), StateTag::Idle);
    assert!(!viewer.clear());
    assert_eq!(viewer.tag(), StateTag::Idle);

    let stats = viewer.lifecycle_stats();
    assert_eq!(stats.acquired, 1);
    assert_eq!(stats.released, 1);
}

#[tokio::test]
async fn test_clear_while_loading_discards_result() {
    let mut viewer = viewer();
    viewer
        .select_file(FileSelection::from_bytes("box.stl", box_bytes(1.0)))
        .unwrap();
    assert!(viewer.clear());

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    viewer.poll();
    assert_eq!(viewer.tag(), StateTag::Idle);
    assert_eq!(viewer.lifecycle_stats().acquired, 0);
}

#[tokio::test]
async fn test_reloading_keeps_one_live_mesh() {
    let mut viewer = viewer();
    for size in [1.0, 2.0, 3.0, 4.0] {
        viewer
            .select_file(FileSelection::from_bytes("box.stl", box_bytes(size)))
            .unwrap();
        viewer.settle().await;
        assert_eq!(viewer.lifecycle_stats().live(), 1);
    }
    let stats = viewer.lifecycle_stats();
    assert_eq!(stats.acquired, 4);
    assert_eq!(stats.released, 3);
}

// ── Selection policy ────────────────────────────────────────────

#[tokio::test]
async fn test_non_stl_name_is_rejected_without_state_change() {
    let mut viewer = viewer();
    viewer
        .select_file(FileSelection::from_bytes("box.stl", box_bytes(1.0)))
        .unwrap();
    viewer.settle().await;
    let before = viewer.state().file().cloned();

    let err = viewer
        .select_file(FileSelection::from_bytes("notes.txt", b"hello".to_vec()))
        .unwrap_err();
    assert_eq!(
        err,
        SelectionError::NotStl {
            name: "notes.txt".to_string()
        }
    );
    assert_eq!(viewer.tag(), StateTag::Ready);
    assert_eq!(viewer.state().file().cloned(), before);
}

#[tokio::test]
async fn test_extension_check_can_be_disabled() {
    let loading = LoadingSettings {
        require_stl_extension: false,
        ..LoadingSettings::default()
    };
    let mut viewer = Viewer::new(Handle::current(), loading);
    viewer
        .select_file(FileSelection::from_bytes("part.bin", box_bytes(1.0)))
        .unwrap();
    viewer.settle().await;
    assert_eq!(viewer.tag(), StateTag::Ready);
}

#[tokio::test]
async fn test_oversized_selection_rejected_under_reject_policy() {
    let bytes = box_bytes(1.0);
    let loading = LoadingSettings {
        size_limit_bytes: Some(100),
        size_limit_policy: SizeLimitPolicy::Reject,
        ..LoadingSettings::default()
    };
    let mut viewer = Viewer::new(Handle::current(), loading);

    let err = viewer
        .select_file(FileSelection::from_bytes("big.stl", bytes.clone()))
        .unwrap_err();
    assert_eq!(
        err,
        SelectionError::TooLarge {
            name: "big.stl".to_string(),
            size: bytes.len() as u64,
            limit: 100
        }
    );
    assert_eq!(viewer.tag(), StateTag::Idle);
}

#[tokio::test]
async fn test_oversized_selection_loads_under_warn_policy() {
    let loading = LoadingSettings {
        size_limit_bytes: Some(100),
        size_limit_policy: SizeLimitPolicy::Warn,
        ..LoadingSettings::default()
    };
    let mut viewer = Viewer::new(Handle::current(), loading);
    viewer
        .select_file(FileSelection::from_bytes("big.stl", box_bytes(1.0)))
        .unwrap();
    viewer.settle().await;
    assert_eq!(viewer.tag(), StateTag::Ready);
}

// ── Files on disk ───────────────────────────────────────────────

#[tokio::test]
async fn test_loads_ascii_file_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".stl").tempfile().unwrap();
    let text = fixtures::ascii_stl("cube", &fixtures::box_triangles([0.0; 3], [3.0, 2.0, 1.0]));
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();

    let mut viewer = viewer();
    let selection = FileSelection::from_path(file.path()).unwrap();
    assert_eq!(selection.size, text.len() as u64);
    viewer.select_file(selection).unwrap();
    viewer.settle().await;

    assert_eq!(viewer.tag(), StateTag::Ready);
    let model = viewer.state().model().unwrap();
    assert_eq!(model.format, shared::StlFormat::Ascii);
    assert_eq!(model.dimensions.formatted(2).width, "3.00");
}

#[tokio::test]
async fn test_missing_file_fails_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.stl");
    let selection = FileSelection {
        name: "gone.stl".to_string(),
        size: 0,
        source: stl_viewer_lib::ingest::ByteSource::Path(path),
    };

    let mut viewer = viewer();
    viewer.select_file(selection).unwrap();
    viewer.settle().await;
    assert_eq!(viewer.tag(), StateTag::Failed);
    assert_eq!(viewer.state().error_kind(), Some(ErrorKind::Unreadable));
    assert!(viewer.state().failure().and_then(|f| f.detail.clone()).is_some());
}

#[tokio::test]
async fn test_notifier_fires_on_completion() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let calls = Arc::new(AtomicUsize::new(0));
    let mut viewer = viewer();
    let counter = calls.clone();
    viewer.set_notifier(Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    viewer
        .select_file(FileSelection::from_bytes("box.stl", box_bytes(1.0)))
        .unwrap();
    viewer.settle().await;

    // The worker notifies right after queueing, so allow it to catch up
    for _ in 0..100 {
        if calls.load(Ordering::SeqCst) > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
