//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Initializes the database
//! - Starts the HTTP server with graceful shutdown support

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shortlink::config::Config;
use shortlink::database::{init_db, AppState};
use shortlink::route::create_app;

/// Application entry point
///
/// # Environment Variables
///
/// - `PORT` - Server port number (default: 8080)
/// - `DATABASE_URL` - Path to database file (default: "data.db")
/// - `CODE_MAX_ATTEMPTS` - Retry bound for generated codes (default: 10)
/// - `RUST_LOG` - Tracing filter (default: "shortlink=debug,tower_http=debug")
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    let config = Config::from_env();

    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(Config::default().log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let db = init_db(&config.database_path).map_err(|err| {
        tracing::error!("Failed to initialize database {}: {}", config.database_path, err);
        err
    })?;

    let addr = format!("0.0.0.0:{}", config.port);
    let database_path = config.database_path.clone();

    let state = AppState::new(db, config);
    let app = create_app(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&addr).await?;

    info!("Server running at http://{}", addr);
    info!("Using database: {}", database_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves when SIGINT (Ctrl+C) or, on Unix, SIGTERM is received.
///
/// In-flight requests are allowed to finish and the database handle is
/// dropped cleanly once the server future returns.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server");
}
