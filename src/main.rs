use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;

use joycycles_tracker::{
    clock::SystemClock,
    config::Config,
    logging,
    routes::{self, AppState},
    store::PgStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let state = AppState::new(Arc::new(PgStore::new(pool)), Arc::new(SystemClock));
    let app = routes::router(state);

    tracing::info!("🧠 Server running at {}", config.bind_addr);

    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
