// Inspect interactor - Orchestrates media file inspection use case

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::*;
use crate::domain::rules::InputRules;
use crate::ports::*;
use crate::probe::render_stream_table;

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl InspectInteractor {
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Stream table for one file, or the raw probe document as pretty JSON
    pub async fn inspect_file(&self, path: &Path, json: bool) -> Result<String, DomainError> {
        let path = InputRules::validate_video_file(path)?;
        let probe = self.probe_port.probe(&path).await?;
        debug!("INSPECT: {} streams in {}", probe.streams.len(), path.display());

        if json {
            serde_json::to_string_pretty(&probe.raw)
                .map_err(|e| DomainError::ProbeFail(format!("JSON serialization failed: {}", e)))
        } else {
            Ok(render_stream_table(&probe))
        }
    }
}
