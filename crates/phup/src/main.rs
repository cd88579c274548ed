mod cli;
mod commands;
mod error;
mod logging;
mod progress;

use std::process::ExitCode;

use clap::Parser;

use phup_apt::{AptManager, HostTools};
use phup_backend::SequencingPolicy;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init(cli.debug);

    let missing = HostTools::detect().missing();
    if !missing.is_empty() {
        log::warn!("host tools not found on PATH: {}", missing.join(", "));
        eprintln!(
            "warning: not found on PATH: {}; operations relying on them will fail",
            missing.join(", ")
        );
    }

    let policy = if cli.abort_on_error {
        SequencingPolicy::AbortOnError
    } else {
        SequencingPolicy::ContinueOnError
    };
    let manager = AptManager::new().with_policy(policy);

    match commands::run(&manager, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
