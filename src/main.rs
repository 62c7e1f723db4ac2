use log::{error, info, warn};
use std::sync::Arc;
use vcl_pickem::config::Config;
use vcl_pickem::handlers::{self, AppState};
use vcl_pickem::schedule::ScheduleCache;
use vcl_pickem::{db, tasks};

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let store = db::connect(config.database_url.as_deref()).await?;
    let schedule = Arc::new(ScheduleCache::new(config.schedule.clone(), config.cache_ttl)?);

    // --- Start Background Task for Refreshing the Schedule ---
    match config.refresh_interval {
        Some(every) => {
            let schedule = Arc::clone(&schedule);
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                tasks::schedule_refresher::refresh_schedule_task(schedule, store, every).await;
            });
        }
        None => warn!("Schedule refresher disabled; games load on demand only"),
    }

    let app = handlers::router(AppState::new(store, schedule));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
