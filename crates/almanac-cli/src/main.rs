//! `almanac` binary.
//!
//! Reads `almanac.toml` (or the path given with `--config`) plus `ALMANAC_*`
//! environment variables, opens the SQLite store, and runs one job.
//!
//! ```text
//! almanac fetch twitter      # mirror new tweets
//! almanac process twitter    # promote mirrored tweets into events
//! almanac run                # fetch + process every configured source
//! almanac serve              # JSON read API
//! ```

use std::path::PathBuf;

use almanac_cli::{Settings, jobs};
use almanac_core::EventKind;
use clap::{Parser, Subcommand};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Almanac personal timeline")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "almanac.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Mirror new and changed items from one source.
  Fetch { kind: EventKind },
  /// Promote one source's mirrored items into events.
  Process { kind: EventKind },
  /// Fetch then process; every configured source when none are named.
  Run { kinds: Vec<EventKind> },
  /// Serve the read API.
  Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;
  let store = jobs::open_store(&settings).await?;

  match cli.command {
    Command::Fetch { kind } => {
      let report = jobs::fetch(&settings, &store, kind).await?;
      info!(%kind, ?report, "done");
    }
    Command::Process { kind } => {
      let report = jobs::process(&settings, &store, kind).await?;
      info!(%kind, ?report, "done");
    }
    Command::Run { kinds } => {
      let kinds = if kinds.is_empty() {
        settings.configured_kinds()?
      } else {
        kinds
      };
      let failed = jobs::run(&settings, &store, &kinds).await;
      if !failed.is_empty() {
        anyhow::bail!("{} of {} sources failed: {failed:?}", failed.len(), kinds.len());
      }
    }
    Command::Serve => jobs::serve(&settings, store).await?,
  }

  Ok(())
}
