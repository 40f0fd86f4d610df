//! `stockroom` entry point.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use stockroom_core::SessionId;
use stockroom_console::{TerminalSurface, ViewBinder, app};
use stockroom_infra::{InventoryStore, StorageBackend, StorageConfig};
use stockroom_observability::LogFormat;

#[derive(Parser)]
#[command(author, version, about = "Manage inventory records from the terminal", long_about = None)]
struct Cli {
    /// Storage backend: memory, file or sqlite [env: STOCKROOM_STORAGE]
    #[arg(long, value_name = "BACKEND")]
    storage: Option<StorageBackend>,

    /// Directory holding persisted data [env: STOCKROOM_DATA_DIR]
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log format: json or pretty [env: STOCKROOM_LOG_FORMAT]
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    stockroom_observability::init(cli.log_format.unwrap_or_else(LogFormat::from_env));

    let mut config = StorageConfig::from_env();
    if let Some(backend) = cli.storage {
        config.backend = backend;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let session = SessionId::new();
    let span = tracing::info_span!("session", %session);
    let _entered = span.enter();

    let kv = config.open_store()?;
    let store = InventoryStore::load(kv).context("failed to load inventory")?;
    tracing::info!(items = store.len(), backend = %config.backend, "inventory ready");

    let surface = TerminalSurface::new(io::stdin().lock(), io::stdout());
    let mut binder = ViewBinder::new(store, surface);
    binder.surface_mut().write_line("Type `help` for a list of commands.")?;

    app::run(&mut binder).context("terminal session failed")?;
    Ok(())
}
