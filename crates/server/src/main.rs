mod api;
mod router;
mod schedules;
mod state;

use std::sync::Arc;

use tracing::info;

use byob_schedule::{MemoryStore, ScheduleManager};

async fn serve(config: &byob_core::Config) -> anyhow::Result<()> {
    let manager = ScheduleManager::new(MemoryStore::new(), config.schedule.reschedule_policy);
    info!(
        "Schedule manager ready (reschedule policy: {:?})",
        config.schedule.reschedule_policy
    );

    let app = router::build_router(Arc::new(state::AppState { manager }));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    byob_core::config::load_dotenv();
    let config = byob_core::Config::from_env();
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("serve") | None => serve(&config).await?,
        _ => {
            println!("byob-server v0.1.0");
            println!("Usage: byob-server [command]");
            println!("  serve    Start HTTP server (default)");
        }
    }

    Ok(())
}
