// Clean interactor - Runs the stream-selection pipeline over each input

use std::path::PathBuf;

use tracing::{error, info};

use crate::app::BatchOutcome;
use crate::domain::errors::*;
use crate::domain::model::SelectionConfig;
use crate::domain::rules::InputRules;
use crate::engine::{JobContext, VideoJob};
use crate::output::{self, OutputWriter};

/// Clean use case request
#[derive(Debug, Clone)]
pub struct CleanRequest {
    pub files: Vec<PathBuf>,
    pub config: SelectionConfig,
    pub out_dir: Option<PathBuf>,
    pub overwrite: bool,
}

/// Interactor for the clean use case
pub struct CleanInteractor {
    ctx: JobContext,
}

impl CleanInteractor {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    /// Clean every file in turn, one encoder pass at a time. Bad inputs
    /// abort before any encoding; per-file failures are reported and
    /// counted.
    pub async fn execute(&self, request: CleanRequest) -> Result<BatchOutcome, DomainError> {
        let files = InputRules::validate_all(&request.files)?;
        let writer = OutputWriter::new(request.out_dir.clone(), request.overwrite);
        let mut outcome = BatchOutcome::default();

        for file in files {
            info!("CLEAN: {}", file.display());
            let result = async {
                let mut job = VideoJob::new(self.ctx.clone(), &file)?;
                job.clean(&request.config).await?;
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
                    error!("CLEAN: {} failed: {}", file.display(), e);
                    output::error(&format!("{}: {}", file.display(), e));
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }
}
