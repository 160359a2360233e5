pub mod analysis;
pub mod cli;
pub mod coaching;
pub mod config;
pub mod error;
pub mod format;
pub mod garmin;
pub mod logging;
pub mod models;
pub mod patterns;
pub mod report;

#[cfg(test)]
mod test_utils;

use std::process::ExitCode;

use clap::Parser;

pub fn run() -> ExitCode {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  logging::init_logging();

  let cli = cli::Cli::parse();

  let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
    Ok(runtime) => runtime,
    Err(e) => {
      eprintln!("Failed to start async runtime: {}", e);
      return ExitCode::FAILURE;
    }
  };

  let today = chrono::Local::now().date_naive();
  match runtime.block_on(cli::execute(cli, today)) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::debug!(error = ?e, "Command failed");
      eprintln!("{}", e);
      ExitCode::FAILURE
    }
  }
}
