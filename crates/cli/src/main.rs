//! Food waste portal CLI.
//!
//! # Usage
//!
//! ```bash
//! # Show what the NGO portal would display for the saved session
//! fw-cli status --portal ngo
//!
//! # Log in as the administrator and save the session
//! fw-cli admin-login --email admin@foodwaste.com --password admin123
//!
//! # List pending restaurant applications
//! fw-cli requests --kind restaurant
//!
//! # Clear the saved session
//! fw-cli logout
//!
//! # Walk an NGO from registration to approval with in-memory stores
//! fw-cli demo
//! ```
//!
//! The session slot lives in `FOODWASTE_DATA_DIR`. The account directory is
//! in memory, so applicant accounts do not survive between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foodwaste_core::{RequestKind, Role};
use foodwaste_portal::services::{SessionStore, TracingNotifier};
use foodwaste_portal::store::{FileKeyValueStore, MemoryAccountStore};
use foodwaste_portal::{AppState, LogFormat, PortalConfig, PortalError};

mod commands;

#[derive(Parser)]
#[command(name = "fw-cli")]
#[command(author, version, about = "Food waste portal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the portal state for the saved session
    Status {
        /// Portal to inspect (`ngo`, `restaurant`, `admin`)
        #[arg(short, long)]
        portal: Role,
    },
    /// Clear the saved session
    Logout,
    /// Log in with the administrator credentials
    AdminLogin {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,
    },
    /// List pending applications
    Requests {
        /// Queue to list (`ngo`, `restaurant`)
        #[arg(short, long)]
        kind: RequestKind,
    },
    /// Run the NGO registration-to-approval walkthrough in memory
    Demo,
}

fn main() {
    let config = match PortalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "foodwaste_portal=info,fw_cli=info".into());

    let is_json = format == LogFormat::Json;
    // Reports go to stdout, logs to stderr
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn run(cli: Cli, config: PortalConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Status { portal } => {
            let (state, session) = open(config)?;
            commands::session::status(&state, &session, portal, &mut out)?;
        }
        Commands::Logout => {
            let (_, mut session) = open(config)?;
            commands::session::logout(&mut session, &mut out)?;
        }
        Commands::AdminLogin { email, password } => {
            let (state, mut session) = open(config)?;
            commands::session::admin_login(&state, &mut session, &email, password, &mut out)?;
        }
        Commands::Requests { kind } => {
            let (state, _) = open(config)?;
            commands::requests::list(&state, kind, &mut out)?;
        }
        Commands::Demo => commands::demo::run(&mut out)?,
    }

    out.flush()?;
    Ok(())
}

/// Build the app state and open the session saved in the data directory.
fn open(config: PortalConfig) -> Result<(AppState, SessionStore), PortalError> {
    let slot = Arc::new(FileKeyValueStore::new(config.data_dir.clone()));
    let state = AppState::new(
        config,
        Arc::new(MemoryAccountStore::new()),
        Arc::new(TracingNotifier),
    )?;
    let session = state.open_session(slot);
    Ok((state, session))
}
