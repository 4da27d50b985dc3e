//! Integration tests for geometric analysis: bounds, dimensions and
//! shading normals over decoded meshes.

use approx::assert_relative_eq;
use proptest::prelude::*;
use shared::{RawMesh, Triangle};
use stl_viewer_lib::fixtures;
use stl_viewer_lib::geometry::{self, AnalysisOptions, NormalMode};
use stl_viewer_lib::pipeline;
use stl_viewer_lib::validation::MeshValidator;

fn arb_triangle() -> impl Strategy<Value = Triangle> {
    prop::array::uniform3(prop::array::uniform3(-500.0f32..500.0))
        .prop_map(|[a, b, c]| Triangle::from_vertices(a, b, c))
}

proptest! {
    #[test]
    fn test_bounds_contain_every_vertex(tris in prop::collection::vec(arb_triangle(), 1..48)) {
        let raw = RawMesh::new(tris);
        let bounds = geometry::compute_bounding_box(&raw).unwrap();
        for p in raw.positions() {
            prop_assert!(bounds.contains(p));
        }
        for i in 0..3 {
            prop_assert!(bounds.min[i] <= bounds.max[i]);
        }
    }

    #[test]
    fn test_normals_are_unit_and_finite(
        tris in prop::collection::vec(arb_triangle(), 1..48),
        flat in any::<bool>(),
    ) {
        let options = AnalysisOptions {
            normal_mode: if flat { NormalMode::Flat } else { NormalMode::Smooth },
            build_index: true,
        };
        let model = geometry::analyze(RawMesh::new(tris), &options).unwrap();
        let validator = MeshValidator::new(&model.mesh);
        prop_assert!(validator.normals_match_vertices());
        prop_assert!(!validator.has_nan_normals());
        prop_assert!(validator.are_normals_normalized(1e-4));
        prop_assert!(validator.are_indices_in_range());
    }
}

#[test]
fn test_box_dimensions_and_readout() {
    let tris = fixtures::box_triangles([0.0, 0.0, 0.0], [10.123, 5.0, 2.5]);
    let model = geometry::analyze(RawMesh::new(tris), &AnalysisOptions::default()).unwrap();

    assert_relative_eq!(model.dimensions.width, 10.123, epsilon = 1e-5);
    assert_relative_eq!(model.dimensions.height, 5.0);
    assert_relative_eq!(model.dimensions.depth, 2.5);

    let readout = model.dimensions.formatted(2);
    assert_eq!(readout.width, "10.12");
    assert_eq!(readout.height, "5.00");
    assert_eq!(readout.depth, "2.50");
}

#[test]
fn test_dimensions_use_extents_not_origin() {
    let tris = fixtures::box_triangles([-3.0, 7.0, -1.0], [1.0, 9.5, 4.0]);
    let model = geometry::analyze(RawMesh::new(tris), &AnalysisOptions::default()).unwrap();
    assert_relative_eq!(model.dimensions.width, 4.0);
    assert_relative_eq!(model.dimensions.height, 2.5);
    assert_relative_eq!(model.dimensions.depth, 5.0);
    assert_eq!(model.bounds.center(), [-1.0, 8.25, 1.5]);
}

#[test]
fn test_degenerate_triangle_keeps_normals_valid() {
    let tris = fixtures::box_with_degenerate([0.0; 3], [2.0, 2.0, 2.0]);
    for mode in [NormalMode::Smooth, NormalMode::Flat] {
        let options = AnalysisOptions {
            normal_mode: mode,
            build_index: true,
        };
        let model = geometry::analyze(RawMesh::new(tris.clone()), &options).unwrap();
        let validator = MeshValidator::new(&model.mesh);
        assert!(
            validator.validate_all(&model.bounds).is_empty(),
            "{mode:?}: {:?}",
            validator.validate_all(&model.bounds)
        );
        assert_eq!(validator.triangle_count(), 13);
    }
}

#[test]
fn test_closed_box_welds_to_eight_corners() {
    let tris = fixtures::box_triangles([0.0; 3], [1.0; 3]);
    let model = geometry::analyze(RawMesh::new(tris), &AnalysisOptions::default()).unwrap();
    let indexed = model.mesh.indexed.as_ref().unwrap();
    assert_eq!(indexed.positions.len(), 8);
    assert_eq!(indexed.indices.len(), 36);

    // Smooth corner normals point away from the centre along the diagonal
    for (p, n) in indexed.positions.iter().zip(&indexed.normals) {
        for i in 0..3 {
            let outward = if p[i] > 0.5 { 1.0 } else { -1.0 };
            assert!(n[i] * outward > 0.0);
        }
    }
}

#[test]
fn test_build_index_off_leaves_flat_buffer() {
    let options = AnalysisOptions {
        normal_mode: NormalMode::Smooth,
        build_index: false,
    };
    let model = geometry::analyze(
        RawMesh::new(fixtures::box_triangles([0.0; 3], [1.0; 3])),
        &options,
    )
    .unwrap();
    assert!(model.mesh.indexed.is_none());
    assert_eq!(model.mesh.normals.len(), 36);
}

#[test]
fn test_decode_runs_parse_and_analysis() {
    let bytes = fixtures::binary_stl(&fixtures::box_triangles([0.0; 3], [4.0, 2.0, 1.0]));
    let loaded = pipeline::decode(&bytes, &AnalysisOptions::default()).unwrap();
    assert_eq!(loaded.format, shared::StlFormat::Binary);
    assert_eq!(loaded.model.mesh.triangle_count(), 12);
    assert_eq!(loaded.model.dimensions.formatted(1).width, "4.0");
}
