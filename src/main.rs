// Entrypoint for the `coldshard` binary.
// - Keeps `main` small: parse arguments, build the client and store, and
//   hand the command to `commands::execute`.
// - A cancelled server prompt is the only handled outcome that ends the
//   process with a non-zero status.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use coldshard_cli::cli::Cli;
use coldshard_cli::commands::{self, Status};
use coldshard_cli::ui::{self, TerminalChooser};
use coldshard_cli::{CredentialStore, PanelClient};

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout only carries command output.
    let filter = EnvFilter::try_from_env("COLDSHARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();

    let store = CredentialStore::new(&settings.credential_path);
    if let Err(e) = store.bootstrap() {
        warn!(error = %e, "could not create credential file");
    }
    let client = PanelClient::new(&settings).context("Failed to build HTTP client")?;

    let mut stdout = io::stdout().lock();
    let status = commands::execute(&mut stdout, &client, &store, &mut TerminalChooser, &cli.command)
        .context("Failed to write command output")?;

    if status == Status::Cancelled {
        eprintln!("{}", ui::failure("Cancelled."));
    }
    Ok(ExitCode::from(status.exit_code()))
}
