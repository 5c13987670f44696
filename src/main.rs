// Poker coach terminal client entry point.
//
// Startup sequence:
// 1. Load config (copying defaults on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Build the HTTP backend client
// 4. Create mpsc channels
// 5. Spawn the session task (reconciles with the backend on start)
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::path::Path;
use std::sync::Arc;

use poker_coach::backend::{Backend, HttpBackend};
use poker_coach::config::{self, LoggingConfig};
use poker_coach::session::{self, Session};
use poker_coach::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config. Errors go to stderr; the TUI is not up yet.
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    info!("Poker coach starting up");
    info!(
        "Config loaded: backend={}, poll every {}ms",
        config.backend.base_url, config.polling.interval_ms
    );

    // 3. Backend client
    let backend: Arc<dyn Backend> = Arc::new(
        HttpBackend::from_config(&config.backend).context("failed to build HTTP client")?,
    );

    // 4. Channels
    let (net_tx, net_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. Session task
    let session = Session::new(backend, config.polling.clone(), net_tx);
    let session_handle = tokio::spawn(async move {
        if let Err(e) = session::run(cmd_rx, net_rx, ui_tx, session).await {
            error!("Session loop error: {}", e);
        }
    });

    // 6. TUI. Blocks until the user presses Ctrl+C.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for the session task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = session_handle.await;
    })
    .await;

    info!("Poker coach shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(Path::new(&logging.dir));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("poker-coach.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
