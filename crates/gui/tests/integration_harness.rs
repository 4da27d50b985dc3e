//! Integration tests for TestHarness.
//!
//! Drives the full asynchronous pipeline headlessly: select, settle, inspect.

use shared::{ErrorKind, StateTag};
use stl_viewer_lib::fixtures;
use stl_viewer_lib::harness::TestHarness;
use stl_viewer_lib::state::{LoadingSettings, SizeLimitPolicy};
use stl_viewer_lib::validation::MeshValidator;

#[test]
fn test_harness_load_box() {
    let mut h = TestHarness::new().unwrap();
    let bytes = fixtures::binary_stl(&fixtures::box_triangles([0.0; 3], [10.123, 5.0, 2.5]));
    assert_eq!(h.load_bytes("box.stl", bytes), StateTag::Ready);

    let readout = h.readout().unwrap();
    assert_eq!(
        (readout.width.as_str(), readout.height.as_str(), readout.depth.as_str()),
        ("10.12", "5.00", "2.50")
    );

    let mesh = h.mesh().unwrap();
    let v = MeshValidator::new(mesh);
    let bounds = h.state().model().unwrap().bounds;
    let errors = v.validate_all(&bounds);
    assert!(errors.is_empty(), "Validation errors: {:?}", errors);
    assert_eq!(v.triangle_count(), 12);
}

#[test]
fn test_harness_failure_kinds() {
    let mut h = TestHarness::new().unwrap();
    let cube = fixtures::box_triangles([0.0; 3], [1.0; 3]);

    assert_eq!(h.load_bytes("empty.stl", fixtures::binary_stl(&[])), StateTag::Failed);
    assert_eq!(h.error_kind(), Some(ErrorKind::EmptyMesh));

    let short = fixtures::binary_stl_with_count(&cube[..3], 5);
    assert_eq!(h.load_bytes("short.stl", short), StateTag::Failed);
    assert_eq!(h.error_kind(), Some(ErrorKind::TruncatedBinary));

    let broken = "solid x\n facet normal 0 0 1\n  outer loop\n   vertex 0 0\n";
    assert_eq!(h.load_bytes("broken.stl", broken), StateTag::Failed);
    assert_eq!(h.error_kind(), Some(ErrorKind::MalformedAscii));

    assert_eq!(h.load_bytes("noise.stl", vec![7u8; 16]), StateTag::Failed);
    assert_eq!(h.error_kind(), Some(ErrorKind::UnsupportedFormat));

    // A failure never held a mesh
    assert_eq!(h.lifecycle().acquired, 0);
    assert!(h.mesh().is_none());
}

#[test]
fn test_harness_recovers_from_failure() {
    let mut h = TestHarness::new().unwrap();
    assert_eq!(h.load_bytes("bad.stl", b"solid".to_vec()), StateTag::Failed);

    let cube = fixtures::box_triangles([0.0; 3], [1.0; 3]);
    assert_eq!(h.load_bytes("good.stl", fixtures::binary_stl(&cube)), StateTag::Ready);
    assert_eq!(h.active_file().map(|f| f.name()), Some("good.stl"));
    assert!(h.error_kind().is_none());
}

#[test]
fn test_harness_clear_cycle() {
    let mut h = TestHarness::new().unwrap();
    assert!(!h.clear()); // nothing to clear

    let cube = fixtures::binary_stl(&fixtures::box_triangles([0.0; 3], [1.0; 3]));
    assert_eq!(h.load_bytes("a.stl", cube.clone()), StateTag::Ready);
    assert_eq!(h.load_bytes("b.stl", cube), StateTag::Ready);
    assert_eq!(h.lifecycle().live(), 1);

    assert!(h.clear());
    assert_eq!(h.state_tag(), StateTag::Idle);
    assert!(h.active_file().is_none());
    assert!(h.dimensions().is_none());

    let stats = h.lifecycle();
    assert_eq!(stats.acquired, 2);
    assert_eq!(stats.released, 2);
}

#[test]
fn test_harness_superseded_selection() {
    let mut h = TestHarness::new().unwrap();
    let small = fixtures::binary_stl(&fixtures::box_triangles([0.0; 3], [1.0; 3]));
    let large = fixtures::binary_stl(&fixtures::box_triangles([0.0; 3], [8.0; 3]));

    let first = h.select_bytes("first.stl", small).unwrap();
    let second = h.select_bytes("second.stl", large).unwrap();
    assert!(second.seq() > first.seq());
    assert_eq!(h.state_tag(), StateTag::Loading);

    assert_eq!(h.settle(), StateTag::Ready);
    assert_eq!(h.active_file(), Some(&second));
    assert_eq!(h.readout().unwrap().width, "8.00");
}

#[test]
fn test_harness_rejection_keeps_state() {
    let loading = LoadingSettings {
        size_limit_bytes: Some(200),
        size_limit_policy: SizeLimitPolicy::Reject,
        ..LoadingSettings::default()
    };
    let mut h = TestHarness::with_loading(loading).unwrap();

    let one = fixtures::binary_stl(&[fixtures::unit_triangle()]);
    assert_eq!(h.load_bytes("one.stl", one), StateTag::Ready);

    let cube = fixtures::binary_stl(&fixtures::box_triangles([0.0; 3], [1.0; 3]));
    assert!(h.select_bytes("cube.stl", cube).is_err());
    assert!(h.select_bytes("readme.md", b"# notes".to_vec()).is_err());
    assert_eq!(h.state_tag(), StateTag::Ready);
    assert_eq!(h.active_file().map(|f| f.name()), Some("one.stl"));
}

#[test]
fn test_harness_select_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = TestHarness::new().unwrap();
    h.select_path(&dir.path().join("missing.stl")).unwrap();
    assert_eq!(h.settle(), StateTag::Failed);
    assert_eq!(h.error_kind(), Some(ErrorKind::Unreadable));
}
