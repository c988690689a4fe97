//! jwt-inspector entry point

#![warn(clippy::all)]

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = jwt_inspector::cli::Cli::parse();

    // `execute` only comes back when the service cannot keep running
    let exit_code = match cli.execute().await {
        Ok(()) => {
            tracing::error!("shutting down jwt-inspector");
            1
        }
        Err(e) => jwt_inspector::cli::report_fatal(&e),
    };

    std::process::exit(exit_code);
}
