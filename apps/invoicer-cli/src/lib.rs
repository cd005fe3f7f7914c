//! # Invoicer CLI Library
//!
//! Argument parsing, startup and dispatch for the `invoicer` binary.
//!
//! ## Module Organization
//! ```text
//! invoicer_cli/
//! ├── lib.rs          ◄─── You are here (clap definitions & run)
//! ├── config.rs       ◄─── invoicer.toml + environment overrides
//! ├── state.rs        ◄─── AppContext (stores, calculator, renderer, keys)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── profile.rs  ◄─── profiles list/show/update/set-logo
//! │   ├── invoice.rs  ◄─── next-number, generate
//! │   ├── history.rs  ◄─── history list/delete
//! │   └── license.rs  ◄─── license activate/status
//! └── error.rs        ◄─── AppError returned by every command
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use invoicer_core::AccountType;

use commands::invoice::GenerateArgs;
use commands::profile::{SetLogoArgs, UpdateProfileArgs};
use config::AppConfig;
use error::{AppError, AppResult};
use state::AppContext;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "invoicer", version, about = "Multi-profile invoice generator")]
pub struct Cli {
    /// Config file (default: platform config dir/invoicer.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overriding config and environment
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Business profiles
    #[command(subcommand)]
    Profiles(ProfilesCommand),

    /// Preview the next invoice number (does not reserve it)
    NextNumber { profile: String },

    /// Render an invoice, save it to history and advance the counter
    Generate(GenerateArgs),

    /// Saved invoices
    #[command(subcommand)]
    History(HistoryCommand),

    /// License activation
    #[command(subcommand)]
    License(LicenseCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List all profiles
    List,
    /// Show one profile
    Show { profile: String },
    /// Edit profile details
    Update {
        profile: String,
        #[command(flatten)]
        fields: UpdateProfileArgs,
    },
    /// Set or clear the profile logo
    SetLogo(SetLogoArgs),
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List saved invoices, most recent first
    List {
        profile: String,
        /// Match invoice id or client name
        #[arg(long)]
        search: Option<String>,
    },
    /// Delete a saved invoice
    Delete {
        profile: String,
        invoice_id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// Activate a license key
    Activate {
        key: String,
        /// demo, subscription or permanent
        #[arg(long)]
        account_type: AccountType,
    },
    /// Show the current license
    Status,
}

// =============================================================================
// Entry Point
// =============================================================================

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Parse arguments (clap)                                              │
/// │  2. Initialize logging: stderr, RUST_LOG or "info,invoicer=debug"       │
/// │  3. Load config: defaults → invoicer.toml → INVOICER_* env → --data-dir │
/// │  4. Build AppContext (creates the data directory)                       │
/// │  5. Dispatch the command, print its report on stdout                    │
/// │  6. On error: "[CODE] message" on stderr, exit code per ErrorCode       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.code.exit_code() as u8)
        }
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so stdout only
/// carries command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages from every crate
/// - `RUST_LOG=invoicer_store=trace` - Trace one crate only
/// - Default: INFO, DEBUG for the invoicer crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,invoicer=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> AppResult<()> {
    // An explicit --config must load; the default location may fall back.
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(Some(path.clone()))?,
        None => AppConfig::load_or_default(None),
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.storage.data_dir = Some(dir);
    }
    let ctx = AppContext::from_config(&config)?;
    info!(data_dir = %ctx.store().data_dir().display(), "Invoicer ready");

    let json = cli.json;
    match cli.command {
        Command::Profiles(cmd) => match cmd {
            ProfilesCommand::List => emit(&commands::profile::list_profiles(&ctx), json),
            ProfilesCommand::Show { profile } => {
                emit(&commands::profile::show_profile(&ctx, &profile)?, json)
            }
            ProfilesCommand::Update { profile, fields } => {
                emit(&commands::profile::update_profile(&ctx, &profile, fields)?, json)
            }
            ProfilesCommand::SetLogo(args) => emit(&commands::profile::set_logo(&ctx, args)?, json),
        },
        Command::NextNumber { profile } => {
            emit(&commands::invoice::next_number(&ctx, &profile)?, json)
        }
        Command::Generate(args) => emit(&commands::invoice::generate(&ctx, args)?, json),
        Command::History(cmd) => match cmd {
            HistoryCommand::List { profile, search } => emit(
                &commands::history::list_history(&ctx, &profile, search.as_deref())?,
                json,
            ),
            HistoryCommand::Delete {
                profile,
                invoice_id,
                yes,
            } => emit(
                &commands::history::delete_history(&ctx, &profile, &invoice_id, yes)?,
                json,
            ),
        },
        Command::License(cmd) => match cmd {
            LicenseCommand::Activate { key, account_type } => emit(
                &commands::license::activate(&ctx, &key, account_type, Utc::now())?,
                json,
            ),
            LicenseCommand::Status => emit(&commands::license::status(&ctx, Utc::now()), json),
        },
    }
}

/// Prints a report as text or JSON.
fn emit<T: Serialize + Display>(report: &T, json: bool) -> AppResult<()> {
    if json {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| AppError::new(error::ErrorCode::RenderError, e.to_string()))?;
        println!("{}", text);
    } else {
        let text = report.to_string();
        println!("{}", text.trim_end());
    }
    debug!("Command complete");
    Ok(())
}
