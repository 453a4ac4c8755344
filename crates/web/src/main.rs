use anyhow::Context;
use storage::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;

use config::Config;
use features::{lap_times, leaderboard, review, riders, rounds, sessions, submissions};
use middleware::auth::{ApiKeys, SessionSettings};

#[derive(OpenApi)]
#[openapi(
    paths(
        riders::handlers::register_rider,
        riders::handlers::get_rider,
        sessions::handlers::login,
        sessions::handlers::logout,
        sessions::handlers::profile,
        rounds::handlers::list_rounds,
        rounds::handlers::get_round,
        rounds::handlers::create_round,
        rounds::handlers::update_round,
        rounds::handlers::delete_round,
        submissions::handlers::create_submission,
        leaderboard::handlers::get_leaderboard,
        leaderboard::handlers::export_leaderboard_csv,
        review::handlers::list_review_queue,
        review::handlers::approve_submission,
        review::handlers::reject_submission,
        lap_times::handlers::normalize_lap_time,
    ),
    components(
        schemas(
            storage::dto::rider::RegisterRiderRequest,
            storage::dto::rider::LoginRequest,
            storage::dto::rider::RiderResponse,
            storage::dto::rider::RiderSummary,
            storage::dto::rider::SessionResponse,
            storage::dto::rider::ProfileResponse,
            storage::dto::round::RoundStatus,
            storage::dto::round::CreateRoundRequest,
            storage::dto::round::UpdateRoundRequest,
            storage::dto::round::RoundResponse,
            storage::dto::submission::SubmissionStatus,
            storage::dto::submission::CreateSubmissionRequest,
            storage::dto::submission::ReviewSubmissionRequest,
            storage::dto::submission::SubmissionResponse,
            storage::dto::submission::RiderSubmissionEntry,
            storage::dto::submission::ReviewQueueEntry,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::LeaderboardResponse,
            storage::dto::leaderboard::LapTimePreviewResponse,
            storage::dto::common::PaginationMeta,
        )
    ),
    tags(
        (name = "riders", description = "Rider registration and public profiles"),
        (name = "sessions", description = "Email login and the logged-in rider"),
        (name = "rounds", description = "Time-trial rounds"),
        (name = "submissions", description = "Lap time submissions"),
        (name = "leaderboard", description = "Round leaderboards"),
        (name = "review", description = "Admin review of submissions"),
        (name = "lap-times", description = "Lap time normalization"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting gymkhana time-trial API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.count() == 0 {
        tracing::warn!("No API_KEYS configured, admin endpoints will reject every request");
    }
    let settings = SessionSettings {
        ttl: config.session_ttl,
    };

    let app = routes::api_router(db, api_keys, settings)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_endpoints() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/rounds/{slug}/leaderboard"));
        assert!(paths.contains_key("/api/rounds/{slug}/submissions"));
        assert!(paths.contains_key("/api/admin/submissions/{submission_id}/approve"));
        assert!(paths.contains_key("/api/lap-times/normalize"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_key"));
        assert!(components.security_schemes.contains_key("session_token"));
    }
}
