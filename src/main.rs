use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod router;
mod services;
mod session;
mod utils;

use api::{AdminApi, HttpTransport};
use commands::Console;
use config::Config;
use session::{FileSessionStore, MemorySessionStore, SessionStore};
use utils::SessionCipher;

fn open_session_store(config: &Config) -> Result<Arc<dyn SessionStore>, String> {
    match &config.session_file {
        Some(file) => {
            let cipher = SessionCipher::from_hex(&file.key_hex).map_err(|e| e.to_string())?;
            let store = FileSessionStore::open(&file.path, cipher).map_err(|e| e.to_string())?;
            info!("Session file: {}", store.path().display());
            Ok(Arc::new(store))
        }
        None => {
            info!("No TROVE_SESSION_FILE set, session lasts until exit");
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout carries the rendered views
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trove_admin=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📊 Starting Trove admin console v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!("API base URL: {}", config.api_base_url);

    let store = match open_session_store(&config) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open session store: {}", e);
            return;
        }
    };

    let transport = match HttpTransport::new(&config.api_base_url, config.http_timeout) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };

    let mut console = Console::new(AdminApi::new(transport, store));
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut output = console.start().await;
    loop {
        let screen = format!("{}\n{}", output, console.prompt());
        if let Err(e) = stdout.write_all(screen.as_bytes()).await {
            error!("Failed to write to stdout: {}", e);
            break;
        }
        if let Err(e) = stdout.flush().await {
            warn!("Failed to flush stdout: {}", e);
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let reply = console.handle_line(&line).await;
        if reply.quit {
            let _ = stdout.write_all(format!("{}\n", reply.output).as_bytes()).await;
            break;
        }
        output = reply.output;
    }

    info!("Console closed");
}
