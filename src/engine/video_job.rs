//! Per-video encode orchestration
//!
//! A [`VideoJob`] owns the temp chain and the memoized original language
//! for one input. Every stage probes the current chain head, computes its
//! arguments, skips itself when there is nothing to change and otherwise
//! runs one encoder pass into the next temp file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::{ClockTime, ProbeResult, SelectionConfig, TargetCodec};
use crate::engine::bitrate::BitrateTargets;
use crate::engine::stages::{self, StagePlan};
use crate::engine::temp_chain::TempChain;
use crate::language::{LanguageResolver, OriginalLanguage};
use crate::output::{self, OutputWriter};
use crate::ports::{EncodePort, EncodeRequest, ProbePort};
use crate::streams::ReorderPlan;

/// Collaborators shared by every job in one run
#[derive(Clone)]
pub struct JobContext {
    pub probe: Arc<dyn ProbePort>,
    pub encoder: Arc<dyn EncodePort>,
    pub resolver: Arc<LanguageResolver>,
    /// Parent directory for each job's scratch directory
    pub scratch_root: PathBuf,
    /// Print encoder commands instead of running them
    pub dry_run: bool,
}

pub struct VideoJob {
    ctx: JobContext,
    chain: TempChain,
    language: OriginalLanguage,
}

impl VideoJob {
    pub fn new(ctx: JobContext, input: &Path) -> Result<Self, DomainError> {
        let chain = TempChain::new(input, &ctx.scratch_root)?;
        Ok(Self {
            ctx,
            chain,
            language: OriginalLanguage::new(),
        })
    }

    pub fn input(&self) -> &Path {
        self.chain.original()
    }

    /// Current chain head
    pub fn head(&self) -> &Path {
        self.chain.head()
    }

    async fn probe_head(&self) -> Result<ProbeResult, DomainError> {
        self.ctx.probe.probe(self.chain.head()).await
    }

    /// Run one encoder pass over the chain head. In dry-run mode the command
    /// is printed and the head stays where it was.
    async fn run_pass(
        &mut self,
        plan: StagePlan,
        duration_seconds: Option<f64>,
    ) -> Result<PathBuf, DomainError> {
        let request = EncodeRequest {
            input: self.chain.head().to_path_buf(),
            output: self.chain.next_path(plan.step, plan.suffix)?,
            args: plan.args,
            title: plan.title,
            duration_seconds,
        };

        if self.ctx.dry_run {
            output::dry_run(&self.ctx.encoder.render_command(&request));
            return Ok(self.chain.head().to_path_buf());
        }

        self.ctx.encoder.encode(&request).await?;
        info!("✔ {}", request.title);
        self.chain.append(request.output.clone());
        Ok(request.output)
    }

    /// Put streams in video, audio, subtitle order. Fails the whole video
    /// when there is no playable video or no audio.
    pub async fn reorder(&mut self) -> Result<PathBuf, DomainError> {
        let probe = self.probe_head().await?;
        let plan = ReorderPlan::from_probe(&probe)?;

        if plan.is_identity() {
            info!("REORDER: Streams already in order");
            return Ok(self.chain.head().to_path_buf());
        }

        let stage = StagePlan {
            step: "reorder",
            title: "Reorder streams".to_string(),
            args: plan.args(),
            suffix: None,
        };
        self.run_pass(stage, probe.effective_duration()).await
    }

    /// Keep and drop streams according to `config`
    pub async fn process_streams(&mut self, config: &SelectionConfig) -> Result<PathBuf, DomainError> {
        let probe = self.probe_head().await?;

        let original = if config.needs_original_language() {
            self.language
                .get(&self.ctx.resolver, self.chain.original())
                .await
                .cloned()
        } else {
            None
        };
        debug!("PROCESS: original language {:?}", original.as_ref().map(|l| l.as_str()));

        let stage = stages::process_plan(&probe, config, original.as_ref());
        self.run_pass(stage, probe.effective_duration()).await
    }

    pub async fn scale_1080p(&mut self, force: bool) -> Result<PathBuf, DomainError> {
        let probe = self.probe_head().await?;

        if !stages::needs_scaling(&probe, force)? {
            info!("1080P: Video is already 1080p or smaller");
            return Ok(self.chain.head().to_path_buf());
        }

        self.run_pass(stages::scale_1080p_plan(), probe.effective_duration())
            .await
    }

    pub async fn convert(&mut self, target: TargetCodec, force: bool) -> Result<PathBuf, DomainError> {
        let probe = self.probe_head().await?;

        if !stages::needs_conversion(&probe, target, force)? {
            info!("CONVERT: Video already in {:?}", target);
            return Ok(self.chain.head().to_path_buf());
        }

        let duration = probe.effective_duration();
        let stage = match target {
            TargetCodec::H265 => {
                let size = match probe.size_bytes {
                    Some(size) => size,
                    None => std::fs::metadata(self.chain.head())?.len(),
                };
                let targets = BitrateTargets::compute(size, duration)?;
                debug!("CONVERT: {:?}", targets);
                stages::h265_plan(&targets)
            }
            TargetCodec::Vp9 => stages::vp9_plan(),
        };
        self.run_pass(stage, duration).await
    }

    pub async fn clip(&mut self, start: ClockTime, duration: ClockTime) -> Result<PathBuf, DomainError> {
        let stage = stages::clip_plan(start, duration);
        self.run_pass(stage, Some(duration.as_seconds() as f64)).await
    }

    /// The full clean pipeline in its fixed stage order
    pub async fn clean(&mut self, config: &SelectionConfig) -> Result<PathBuf, DomainError> {
        self.reorder().await?;
        self.process_streams(config).await?;
        if config.scale_to_1080p {
            self.scale_1080p(config.force).await?;
        }
        if let Some(target) = config.target_codec {
            self.convert(target, config.force).await?;
        }
        Ok(self.chain.head().to_path_buf())
    }

    /// Copy the head to its destination and release the temp chain.
    /// Returns `None` in dry-run mode, where nothing is written.
    pub fn finish(mut self, writer: &OutputWriter) -> Result<Option<PathBuf>, DomainError> {
        let result = if self.ctx.dry_run {
            Ok(None)
        } else {
            writer
                .write_output(self.chain.original(), self.chain.head())
                .map(Some)
        };
        self.chain.cleanup();
        result
    }
}
