//! Runs one bibwarden command against the working copy.
//!
//! Usage:
//!
//! ```text
//! bibwarden [--workdir DIR] [--config FILE] intake <DOI>...
//! bibwarden transitions
//! bibwarden check-references
//! bibwarden pending [handle <IDENT>]
//! ```
//!
//! Exit status is 0 on success, 65 when the registry had no data for any
//! requested identifier, and 1 for every other failure.

use bibwarden::{
    bibliography::domain::{BibliographyError, Doi},
    config::{CONFIG_FILE, ConfigError, CuratorConfig},
    curator::{CheckOutcome, Curator, CuratorError, Production, RunOutcome, WiringError},
    discovery::domain::PendingEntry,
    review::{adapters::TokioSleeper, services::RateLimitGate},
    telemetry,
};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "bibwarden", version, about = "Reviewed bibliography pipeline")]
struct Cli {
    /// Working copy root.
    #[arg(long, env = "BIBWARDEN_WORKDIR", default_value = ".")]
    workdir: Utf8PathBuf,

    /// Configuration file, relative to the working copy.
    #[arg(long, env = "BIBWARDEN_CONFIG", default_value = CONFIG_FILE)]
    config: Utf8PathBuf,

    /// Log filter, overriding `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,

    /// Issue tracker token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Take identifiers in for review.
    Intake {
        /// Identifiers to admit.
        #[arg(required = true)]
        dois: Vec<String>,
    },
    /// Apply maintainer decisions.
    Transitions,
    /// Crawl references of accepted publications.
    CheckReferences,
    /// List or handle ledger entries.
    Pending {
        #[command(subcommand)]
        action: Option<PendingAction>,
    },
}

#[derive(Debug, Subcommand)]
enum PendingAction {
    /// Mark entries matching an identifier or origin key as handled.
    Handle {
        /// Identifier or origin key.
        selector: String,
    },
}

impl Command {
    const fn needs_tracker(&self) -> bool {
        !matches!(self, Self::Pending { action: None })
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Wiring(#[from] WiringError),
    #[error(transparent)]
    Curator(#[from] CuratorError),
    #[error("invalid identifier: {0}")]
    Identifier(#[from] BibliographyError),
    #[error("GITHUB_TOKEN is required for this command")]
    MissingToken,
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl CliError {
    const fn outcome(&self) -> RunOutcome {
        match self {
            Self::Curator(err) => err.classify(),
            _ => RunOutcome::Failure,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init(cli.log_level.as_deref());
    let outcome = match run(cli) {
        Ok(()) => RunOutcome::Success,
        Err(err) => {
            error!(error = %err, "run failed");
            err.outcome()
        }
    };
    outcome.into()
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(execute(cli))
}

async fn execute(cli: Cli) -> Result<(), CliError> {
    let config = CuratorConfig::load(&cli.workdir, &cli.config)?;
    let token = match cli.token {
        Some(token) => token,
        None if cli.command.needs_tracker() => return Err(CliError::MissingToken),
        None => String::new(),
    };
    let (adapters, settings) = Production::build(&config, &cli.workdir, &token)?;
    let gate = RateLimitGate::new(
        Arc::new(DefaultClock),
        Arc::new(TokioSleeper),
        config.rate_limit.policy(),
    );
    let curator = Curator::new(adapters, settings, gate);

    match cli.command {
        Command::Intake { dois } => {
            let identifiers = dois
                .iter()
                .map(String::as_str)
                .map(Doi::parse)
                .collect::<Result<Vec<_>, _>>()?;
            let report = curator.intake(&identifiers).await?;
            info!(
                admitted = report.admitted.len(),
                already_known = report.already_known.len(),
                not_found = report.not_found.len(),
                "intake complete"
            );
        }
        Command::Transitions => {
            let decisions = curator.apply_transitions().await?;
            info!(decisions = decisions.len(), "transitions complete");
        }
        Command::CheckReferences => {
            let checks = curator.check_references().await?;
            let failed = checks
                .iter()
                .filter(|check| matches!(check.outcome, CheckOutcome::Failed { .. }))
                .count();
            info!(checked = checks.len(), failed, "reference check complete");
        }
        Command::Pending { action: None } => {
            write_entries(&curator.pending().await?)?;
        }
        Command::Pending {
            action: Some(PendingAction::Handle { selector }),
        } => {
            let moved = curator.handle_pending(&selector).await?;
            write_entries(&moved)?;
        }
    }
    Ok(())
}

fn write_entries(entries: &[PendingEntry]) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for entry in entries {
        let subject = entry
            .identifier
            .as_ref()
            .map_or_else(|| entry.reference.to_string(), ToString::to_string);
        writeln!(out, "{}\t{}\t{subject}", entry.origin, entry.kind.as_str())?;
    }
    Ok(())
}
