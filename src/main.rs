//! nftsync - nftables ruleset reconciliation
//!
//! Reads a ruleset snapshot plus declared hooks or chains and prints the
//! `nft` commands needed to reconcile them. Commands go to stdout, logs and
//! errors to stderr.
//!
//! # Usage
//!
//! ```bash
//! nft -j list ruleset > state.json
//!
//! # Add missing hook jump rules
//! nftsync ensure-hooks -s state.json -H hooks.json
//!
//! # Remove chains and every rule jumping to them
//! nftsync remove-chains -s state.json -c chains.json
//!
//! # Remove chains listed in chains.json but not in old.json
//! nftsync remove-stale-chains -s state.json -c chains.json -o old.json
//!
//! # Emit an nftables JSON batch instead of text
//! nftsync remove-chains -s state.json -c chains.json --format json | nft -j -f -
//! ```

use clap::Parser;
use nftsync::audit::{AuditEvent, AuditLog};
use nftsync::config::{self, AppConfig, LogLevel, OutputFormat};
use nftsync::{Invocation, Plan, Verb};
use shadow_rs::shadow;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

shadow!(build);

#[derive(Parser)]
#[command(name = "nftsync")]
#[command(version, long_version = build::CLAP_LONG_VERSION)]
#[command(about = "Compute nft commands that reconcile a ruleset snapshot", long_about = None)]
struct Cli {
    /// Reconciliation to run
    verb: Verb,

    /// Ruleset snapshot (`nft -j list ruleset` output)
    #[arg(short, long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Hooks file for ensure-hooks
    #[arg(short = 'H', long, value_name = "FILE")]
    hooks: Option<PathBuf>,

    /// Chains file for remove-chains and remove-stale-chains
    #[arg(short, long, value_name = "FILE")]
    chains: Option<PathBuf>,

    /// Chains to keep for remove-stale-chains
    #[arg(short, long = "old-chains", value_name = "FILE")]
    old_chains: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn invocation(&self) -> Invocation {
        Invocation {
            verb: self.verb,
            state: self.state.clone(),
            hooks: self.hooks.clone(),
            chains: self.chains.clone(),
            old_chains: self.old_chains.clone(),
        }
    }
}

fn init_logging(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level.as_tracing())
        .with_target(false)
        .init();
}

fn render(plan: &Plan, format: OutputFormat) -> nftsync::Result<String> {
    match format {
        OutputFormat::Text => Ok(plan.to_nft_text()),
        OutputFormat::Json => {
            let mut out = serde_json::to_string(&plan.to_nftables_json())?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Loads inputs, plans, and renders. Nothing is written on failure.
fn run(cli: &Cli, format: OutputFormat) -> nftsync::Result<(String, AuditEvent)> {
    let (snapshot, operation) = cli.invocation().load()?;
    let plan = operation.plan(&snapshot.state);
    let output = render(&plan, format)?;
    let event = AuditEvent::success(cli.verb.to_string(), plan.len(), snapshot.checksum());
    Ok((output, event))
}

fn record(config: &AppConfig, event: &AuditEvent) {
    if !config.audit_log {
        return;
    }
    match AuditLog::new() {
        Ok(log) => {
            if let Err(e) = log.log(event) {
                warn!("Failed to write audit log {}: {e}", log.path().display());
            }
        }
        Err(e) => warn!("Audit log unavailable: {e}"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_problem) = match config::config_path() {
        Some(path) => config::load_config_from(&path),
        None => (AppConfig::default(), None),
    };

    init_logging(config.log_level.raised(cli.verbose));
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let format = cli.format.unwrap_or(config.output_format);
    info!("Running {} (output: {format})", cli.verb);

    match run(&cli, format) {
        Ok((output, event)) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
                eprintln!("Error: failed to write commands: {e}");
                return ExitCode::FAILURE;
            }
            record(&config, &event);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            record(&config, &AuditEvent::failure(cli.verb.to_string(), e.to_string()));
            if e.is_usage() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
