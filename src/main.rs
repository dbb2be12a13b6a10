//! Los Libros Highlights Server
//!
//! Serves highlight injection for chapter HTML over HTTP.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use los_libros_highlights::config::Config;
use los_libros_highlights::routes;
use los_libros_highlights::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "los_libros_highlights=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Los Libros Highlights v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Style classes: {}, duplicate repair run: {}",
        config.injector.style_classes.len(),
        config.injector.repair.min_duplicate_run
    );

    let host: IpAddr = config.server.host.parse().unwrap_or_else(|e| {
        tracing::warn!("Invalid SERVER_HOST {}: {}, binding all interfaces", config.server.host, e);
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    });
    let addr = SocketAddr::new(host, config.server.port);

    let state = AppState::new(config);
    let app = routes::app(state.clone());

    tracing::info!("Los Libros Highlights listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Wait for Ctrl+C or SIGTERM, then report what the server did
async fn shutdown_signal(state: AppState) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!("Ctrl+C handler failed: {}", e);
            }
            "Ctrl+C"
        }
        _ = terminate => "SIGTERM",
    };

    tracing::info!(
        passes_served = state.passes_served(),
        "Received {}, draining connections",
        signal
    );
}
