// Library crate: exposes the load pipeline and viewer state for integration tests.
// GUI-specific modules (app, ui, viewport rendering) remain in the binary crate.

pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod ingest;
pub mod lifecycle;
pub mod pipeline;
pub mod state;
pub mod stl;
pub mod validation;
pub mod viewer;

/// CPU-side render data shared with the GL renderer.
/// The full viewport (camera, renderer, GL) stays in the binary crate.
pub mod viewport {
    pub mod mesh;
}
