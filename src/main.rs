use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patient_service::api::{app, AppState};
use patient_service::config::Config;
use patient_service::db;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patient_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(dialect = %config.dialect, "Starting patient service on {}", config.server_addr());

    let pool = db::connect(&config.database_url, config.dialect).await?;
    db::run_migrations(&pool, config.dialect).await?;

    let state = AppState::new(pool, &config);
    let app = app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server_addr()).await?;
    tracing::info!("Listening on {}", config.server_addr());
    if config.graphql_playground {
        tracing::info!("GraphiQL available at http://{}/graphql", config.server_addr());
    }

    axum::serve(listener, app).await?;

    Ok(())
}
