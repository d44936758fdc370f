use anyhow::Context;
use sakila_web::{AppConfig, AppState, create_router, logging};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load()?;
    logging::init(&cfg.log);

    let pool = sakila::create_pool(&cfg.database.url, cfg.database.pool_max_size)
        .context("failed to configure connection pool")?;
    let state = AppState::new(pool.clone()).context("failed to load templates")?;

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    tracing::info!(
        addr = %cfg.server.bind_addr,
        pool_max_size = cfg.database.pool_max_size,
        "listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close();
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
