//! The ingest → parse → analyze pipeline for one selection.

use shared::{PipelineError, ReadError, StlFormat};

use crate::geometry::{self, AnalysisOptions, AnalyzedModel};
use crate::ingest::{self, FileSelection};
use crate::stl;

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub model: AnalyzedModel,
    pub format: StlFormat,
}

/// Run the full pipeline.
///
/// Bytes are read asynchronously; decoding and analysis run on the blocking
/// pool. A panicked or cancelled decode surfaces as `ReadError::Aborted`.
pub async fn run(
    selection: FileSelection,
    options: AnalysisOptions,
) -> Result<LoadedModel, PipelineError> {
    let bytes = ingest::ingest(&selection).await?;
    tokio::task::spawn_blocking(move || decode(&bytes, &options))
        .await
        .map_err(|_| PipelineError::from(ReadError::Aborted))?
}

/// Parse and analyze bytes synchronously.
pub fn decode(bytes: &[u8], options: &AnalysisOptions) -> Result<LoadedModel, PipelineError> {
    let parsed = stl::parse(bytes)?;
    let model = geometry::analyze(parsed.mesh, options)?;
    Ok(LoadedModel {
        model,
        format: parsed.format,
    })
}
