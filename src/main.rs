use admin_dashboard::memory::MemoryBackend;
use admin_dashboard::{AppState, router, storage};
use std::{env, net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let seed_path = storage::resolve_seed_path();
    let mut seed = storage::load_seed(&seed_path).await;
    storage::apply_admin_override(&mut seed);
    if seed.users.is_empty() {
        warn!("no accounts configured; provide a seed file or set ADMIN_EMAIL and ADMIN_PASSWORD");
    }

    let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::from_seed(seed));
    let state = AppState::new(backend);
    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown handler: {err}");
    }
}
