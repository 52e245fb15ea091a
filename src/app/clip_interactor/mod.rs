// Clip interactor - Cuts a time range out of each input without re-encoding

use std::path::PathBuf;

use tracing::{error, info};

use crate::app::BatchOutcome;
use crate::domain::errors::*;
use crate::domain::rules::{ClipRules, InputRules};
use crate::engine::{JobContext, VideoJob};
use crate::output::{self, OutputWriter};

/// Clip use case request
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub files: Vec<PathBuf>,
    pub start: String,
    pub duration: String,
    pub out_dir: Option<PathBuf>,
    pub overwrite: bool,
}

/// Interactor for the clip use case
pub struct ClipInteractor {
    ctx: JobContext,
}

impl ClipInteractor {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    /// Clip every file in turn. Malformed times or inputs abort before any
    /// file is touched; a failure on one file does not stop the others.
    pub async fn execute(&self, request: ClipRequest) -> Result<BatchOutcome, DomainError> {
        let (start, duration) = ClipRules::parse_range(&request.start, &request.duration)?;
        let files = InputRules::validate_all(&request.files)?;
        let writer = OutputWriter::new(request.out_dir.clone(), request.overwrite);
        let mut outcome = BatchOutcome::default();

        for file in files {
            info!("CLIP: {} from {} for {}", file.display(), start, duration);
            let result = async {
                let mut job = VideoJob::new(self.ctx.clone(), &file)?;
                job.clip(start, duration).await?;
                job.finish(&writer)
            }
            .await;

            match result {
                Ok(Some(path)) => {
                    output::success(&path.display().to_string());
                    outcome.written.push(path);
                }
                Ok(None) => {}
                Err(e) => {
                    error!("CLIP: {} failed: {}", file.display(), e);
                    output::error(&format!("{}: {}", file.display(), e));
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }
}
