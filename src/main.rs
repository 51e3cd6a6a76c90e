//! Colecta API server
//!
//! Main application entry point

use anyhow::Context;
use tracing::{info, warn};

use Colecta::{
    app::AppState,
    config::Settings,
    database::{create_pool, run_migrations},
    server,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate().context("invalid configuration")?;

    // Initialize logging; the guard flushes file output on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", Colecta::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&settings.database)
        .await
        .context("failed to connect to the database")?;
    run_migrations(&pool).await?;

    // Initialize services
    let state = AppState::new(settings, pool)?;
    state.services.upload_service.prepare().await?;

    match state.services.auth_service.bootstrap_admin().await? {
        Some(user) => info!(username = %user.username, "Bootstrap administrator ready"),
        None => {
            if state.db.users.count().await? == 0 {
                warn!("No users exist and no bootstrap credentials are configured");
            }
        }
    }

    if !state.services.redis_service.is_enabled() {
        info!("Redis disabled, permission lookups go to the database");
    }

    server::serve(state).await?;

    info!("Colecta has been shut down.");
    Ok(())
}
