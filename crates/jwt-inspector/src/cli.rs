//! Command-line interface and process wiring
//!
//! Every setting can come from the environment (`JWKS_URI`, `ADDR`) or from
//! the equivalent flag; flags win.

use std::io::IsTerminal;

use clap::Parser;
use tracing::{Level, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::config::{ADDR_ENV, DEFAULT_ADDR, InspectorConfig, JWKS_URI_ENV};
use crate::error::{InspectorError, InspectorResult};
use crate::server;

/// jwt-inspector - verify a bearer JWT against a JWKS and echo its claims
#[derive(Parser, Debug)]
#[command(
    name = "jwt-inspector",
    version,
    about = "Verify bearer JWTs against a JWKS and echo their claims as JSON",
    long_about = "Fetches a JSON Web Key Set once at startup, then answers every HTTP request\n\
                  with the claims of its `Authorization: Bearer` token, or a JSON error."
)]
pub struct Cli {
    /// JWKS endpoint fetched once at startup
    #[arg(long, env = JWKS_URI_ENV, value_name = "URI")]
    pub jwks_uri: Option<String>,

    /// Listen address; an empty host (`:8000`) listens on all interfaces
    #[arg(long, env = ADDR_ENV, value_name = "ADDR", default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Enable verbose logging (-v, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Run the service
    ///
    /// Only returns if startup fails or the listener stops.
    ///
    /// # Errors
    ///
    /// Returns `InspectorError` for invalid configuration, JWKS load
    /// failures and listener failures.
    pub async fn execute(self) -> InspectorResult<()> {
        self.init_tracing();

        let config = self.config()?;
        server::run(config).await
    }

    /// Resolve the parsed arguments into a configuration
    ///
    /// # Errors
    ///
    /// See [`InspectorConfig::new`].
    pub fn config(&self) -> InspectorResult<InspectorConfig> {
        InspectorConfig::new(self.jwks_uri.as_deref(), Some(self.addr.as_str()))
    }

    /// Log level selected by `-v` / `-q`
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::INFO,
                1 => Level::DEBUG,
                _ => Level::TRACE,
            }
        }
    }

    /// Initialize tracing subscriber; `RUST_LOG` overrides the flags
    fn init_tracing(&self) {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.log_level()).into())
            .from_env_lossy();

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .init();
    }
}

/// Log a fatal error and return the process exit code
#[must_use]
pub fn report_fatal(error: &InspectorError) -> i32 {
    error!("{error}");
    if error.is_listener_error() {
        error!("shutting down jwt-inspector");
    }
    1
}
