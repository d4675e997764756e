use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hotel_concierge::adapters::http::{app_router, ChatAppState};
use hotel_concierge::adapters::sqlite::{self, SqliteConversationRepository, SqliteUserRepository};
use hotel_concierge::adapters::{HttpRoomService, OpenAIConfig, OpenAIProvider};
use hotel_concierge::application::{ChatModels, SendChatMessageHandler};
use hotel_concierge::config::AppConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;
    tracing::info!(environment = ?config.server.environment, "Loaded configuration");

    let pool = sqlite::connect(&config.database).await?;
    if config.database.run_migrations {
        tracing::info!("Running database migrations...");
        sqlite::run_migrations(&pool).await?;
    }

    let api_key = config.ai.openai_api_key.clone().unwrap_or_default();
    let ai_provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(&config.ai.planning_model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?;
    let rooms = HttpRoomService::new(&config.booking.base_url)?;

    let handler = SendChatMessageHandler::new(
        Arc::new(ai_provider),
        Arc::new(SqliteUserRepository::new(pool.clone())),
        Arc::new(SqliteConversationRepository::new(pool.clone())),
        Arc::new(rooms),
        ChatModels::new(&config.ai.planning_model, &config.ai.synthesis_model),
    );
    let app = app_router(ChatAppState::new(Arc::new(handler)), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
