//! Ownership of the published mesh resource.
//!
//! A [`MeshResource`] is acquired when a mesh is published and released
//! exactly once: explicitly via [`MeshResource::release`], or on drop.
//! Release is idempotent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use shared::{FileRef, Mesh};

#[derive(Debug, Default)]
struct Counters {
    acquired: AtomicU64,
    released: AtomicU64,
}

/// Acquisition/release counts for one viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifecycleStats {
    pub acquired: u64,
    pub released: u64,
}

impl LifecycleStats {
    /// Resources acquired and not yet released
    pub fn live(&self) -> u64 {
        self.acquired.saturating_sub(self.released)
    }
}

/// Factory and ledger for mesh resources
#[derive(Debug, Clone, Default)]
pub struct MeshLifecycle {
    counters: Arc<Counters>,
}

impl MeshLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a fully built mesh
    pub fn acquire(&self, file: &FileRef, mesh: Mesh) -> MeshResource {
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            "Acquired mesh #{} ({} triangles)",
            file.seq(),
            mesh.triangle_count()
        );
        MeshResource {
            id: file.seq(),
            mesh: Some(mesh),
            counters: self.counters.clone(),
        }
    }

    pub fn stats(&self) -> LifecycleStats {
        LifecycleStats {
            acquired: self.counters.acquired.load(Ordering::SeqCst),
            released: self.counters.released.load(Ordering::SeqCst),
        }
    }
}

/// The single live mesh of a viewer
pub struct MeshResource {
    id: u64,
    mesh: Option<Mesh>,
    counters: Arc<Counters>,
}

impl MeshResource {
    /// Sequence id of the selection this mesh came from
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The mesh, or `None` once released
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.mesh.is_none()
    }

    /// Free the mesh buffers. No-op if already released.
    pub fn release(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            let triangles = mesh.triangle_count();
            drop(mesh);
            self.counters.released.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("Released mesh #{} ({} triangles)", self.id, triangles);
        }
    }
}

impl Drop for MeshResource {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for MeshResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshResource")
            .field("id", &self.id)
            .field("triangles", &self.mesh.as_ref().map(Mesh::triangle_count))
            .finish()
    }
}
