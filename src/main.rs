use std::net::SocketAddr;
use std::path::PathBuf;

use tower_http::trace::TraceLayer;

use review_roster::{api, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging; the fmt subscriber also collects `log` records from
    // the library.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "review_roster=info,tower_http=info".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "review-roster.db".into());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;

    // Init database (creates the file and applies migrations)
    let pool = db::initialize(&PathBuf::from(&db_path)).await?;
    log::info!("Database ready at {}", db_path);

    let app = api::router(pool).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    log::info!("Shutdown signal received, draining connections");
}
