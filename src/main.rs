use std::sync::Arc;
use tracing::info;

use linguisita::auth::LocalIdentity;
use linguisita::bus::EventBus;
use linguisita::interface::http::HttpInterface;
use linguisita::store::{MemoryStore, MessageStore, SqliteStore};
use linguisita::translate::{DictionaryTranslator, RemoteTranslator, Translator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        // It's not fatal if .env doesn't exist, but good to know
        info!("No .env file found or failed to load: {}", e);
    }

    // Initialize logging with default filter if RUST_LOG is not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Linguisita chat service starting...");

    let bus = Arc::new(EventBus::new());

    // Message store: durable SQLite when LINGUISITA_DB points somewhere,
    // in-memory otherwise (history then lives only as long as the process).
    let store: Arc<dyn MessageStore> = match std::env::var("LINGUISITA_DB") {
        Ok(path) => {
            info!("Initializing SQLite store at {}", path);
            Arc::new(SqliteStore::new(&path).await?)
        }
        Err(_) => {
            info!("LINGUISITA_DB not set, keeping messages in memory");
            Arc::new(MemoryStore::new())
        }
    };

    // Translation provider: a real HTTP backend when configured, the
    // built-in demo dictionary otherwise.
    let translator: Arc<dyn Translator> = if std::env::var("TRANSLATE_API_URL").is_ok() {
        let remote = RemoteTranslator::from_env()?;
        info!("Using remote translation provider");
        Arc::new(remote)
    } else {
        info!("No TRANSLATE_API_URL found, using the built-in dictionary");
        Arc::new(DictionaryTranslator::new())
    };

    let identity = Arc::new(LocalIdentity::new());

    let interface = HttpInterface::new(identity, store, translator, bus);
    let app = interface.router();

    let port: u16 = std::env::var("LINGUISITA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    info!("Starting HTTP interface on port {}", port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        res = axum::serve(listener, app) => {
            if let Err(e) = res {
                info!("Server stopped with error: {}", e);
            }
        }
    }

    Ok(())
}
