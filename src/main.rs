use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use podium::app::App;
use podium::branding::AssetStore;
use podium::config::{self, Config};
use podium::logging::{self, LogBuffer, LogRetention};
use podium::surface::client;

#[tokio::main]
async fn main() -> Result<()> {
    // The control process re-invokes this binary inside the spawned
    // terminal window; that invocation runs the display client instead.
    let mut args = std::env::args().skip(1);
    if let Some(flag) = args.next() {
        if flag == "--display-client" {
            let Some(socket) = args.next() else {
                bail!("--display-client requires a socket path");
            };
            return run_display_client(Path::new(&socket));
        }
        bail!("unknown argument: {flag}");
    }

    // Ensure config directory exists (creates logs, assets and run dirs too)
    config::ensure_directories()?;

    // Create log buffer for real-time log viewing
    let log_buffer = Arc::new(LogBuffer::new(10_000));

    // Initialize file logging BEFORE any tracing calls
    let (log_file_info, _guard) =
        logging::init_file_logging(config::logs_dir(), Arc::clone(&log_buffer))?;

    let config = Config::load()?;

    // Write the defaults on first run so there is a file to edit
    if !config::config_file_path().exists() {
        if let Err(e) = config.save() {
            tracing::warn!("Could not write default config: {}", e);
        }
    }

    // Logs from earlier runs expire after the configured window
    let retention = LogRetention::from_config(&config).with_current_log(&log_file_info);
    match retention.sweep(&config::logs_dir()) {
        Ok(count) if count > 0 => tracing::info!("Removed {} expired log files", count),
        Ok(_) => {}
        Err(e) => tracing::warn!("Log sweep failed: {}", e),
    }

    // Timer state does not survive restarts, so staged logos and display
    // sockets from earlier runs are orphans.
    match AssetStore::new().sweep() {
        Ok(count) if count > 0 => tracing::info!("Removed {} orphaned branding assets", count),
        Ok(_) => {}
        Err(e) => tracing::warn!("Branding asset sweep failed: {}", e),
    }
    match config::sweep_run_dir() {
        Ok(count) if count > 0 => tracing::info!("Removed {} stale display sockets", count),
        Ok(_) => {}
        Err(e) => tracing::warn!("Run dir sweep failed: {}", e),
    }

    tracing::info!("Logging to: {}", log_file_info.path.display());

    // Run the application
    let mut app = App::new(config, log_buffer, log_file_info)?;
    app.run().await
}

fn run_display_client(socket: &Path) -> Result<()> {
    // Normally the control process has already created these; this covers
    // a client launched by hand for debugging.
    config::ensure_directories()?;

    let log_buffer = Arc::new(LogBuffer::new(1_000));
    let (_log_file_info, _guard) =
        logging::init_file_logging(config::logs_dir(), Arc::clone(&log_buffer))?;

    client::run(socket)
}
