//! Command implementations

use std::future::Future;

use anyhow::{bail, Result};
use tracing::{error, info, warn};

use crate::adapters::toml_config::Settings;
use crate::app::{AppContainer, BatchOutcome, CleanRequest, ClipRequest};
use crate::cli::args::{CacheArgs, CleanArgs, ClipArgs, InspectArgs};
use crate::cli::{Cli, Commands};
use crate::config_initialization::selection_config;
use crate::output;

/// Run the parsed command against the resolved settings
///
/// SIGINT or SIGTERM abandons the command. Dropping the running job removes
/// its scratch directory and kills the encoder child.
pub async fn execute(cli: Cli, settings: &Settings) -> Result<()> {
    let container = AppContainer::from_settings(settings, cli.dry_run)?;

    let command = cli.command;
    let work = async move {
        match command {
            Commands::Inspect(args) => inspect(&container, args).await,
            Commands::Clip(args) => clip(&container, args).await,
            Commands::Clean(args) => clean(&container, settings, args).await,
            Commands::Cache(args) => cache(&container, args),
        }
    };
    run_until_interrupted(work, shutdown_signal()).await
}

/// Drive `work` to completion unless `interrupt` resolves first
pub async fn run_until_interrupted<W, S>(work: W, interrupt: S) -> Result<()>
where
    W: Future<Output = Result<()>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        result = work => result,
        _ = interrupt => {
            warn!("Interrupted, abandoning remaining work");
            bail!("Interrupted")
        }
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Execute the inspect command
pub async fn inspect(container: &AppContainer, args: InspectArgs) -> Result<()> {
    let interactor = container.inspect_interactor();
    let mut failed = 0;

    for file in &args.files {
        match interactor.inspect_file(file, args.json).await {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                error!("INSPECT: {} failed: {}", file.display(), e);
                output::error(&format!("{}: {}", file.display(), e));
                failed += 1;
            }
        }
    }

    check_outcome(&BatchOutcome {
        written: Vec::new(),
        failed,
    })
}

/// Execute the clip command
pub async fn clip(container: &AppContainer, args: ClipArgs) -> Result<()> {
    info!("Starting clip operation");
    let request = ClipRequest {
        files: args.files,
        start: args.start,
        duration: args.duration,
        out_dir: args.out,
        overwrite: args.overwrite,
    };

    let outcome = container.clip_interactor().execute(request).await?;
    check_outcome(&outcome)
}

/// Execute the clean command
pub async fn clean(container: &AppContainer, settings: &Settings, args: CleanArgs) -> Result<()> {
    info!("Starting clean operation");
    // Flag conflicts are rejected before any file is probed
    let config = selection_config(settings, &args)?;
    let request = CleanRequest {
        files: args.files,
        config,
        out_dir: args.out,
        overwrite: args.overwrite,
    };

    let outcome = container.clean_interactor().execute(request).await?;
    check_outcome(&outcome)
}

/// Execute the cache command
pub fn cache(container: &AppContainer, args: CacheArgs) -> Result<()> {
    let interactor = container.cache_interactor();

    if args.clear {
        let removed = interactor.clear()?;
        output::success(&format!(
            "Cleared {} entries from {}",
            removed,
            interactor.cache_dir().display()
        ));
        return Ok(());
    }

    let entries = interactor.list()?;
    println!("{}", interactor.cache_dir().display());
    if entries.is_empty() {
        println!("(empty)");
    }
    for entry in &entries {
        println!("{}", entry.display_line());
    }
    Ok(())
}

fn check_outcome(outcome: &BatchOutcome) -> Result<()> {
    if !outcome.is_success() {
        bail!(
            "{} file{} failed",
            outcome.failed,
            if outcome.failed == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
