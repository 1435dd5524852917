use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::rounds::handlers::create_round,
        features::rounds::handlers::list_rounds,
        features::rounds::handlers::get_round,
        features::results::handlers::record_result,
        features::results::handlers::list_results,
        features::advancement::handlers::complete_round,
        features::advancement::handlers::preview_advancement,
        features::advancement::handlers::get_advancement_summary,
        features::advancement::handlers::list_advancing_students,
        features::advancement::handlers::get_finals_bracket,
    ),
    components(
        schemas(
            storage::dto::round::CreateRoundRequest,
            storage::dto::round::RoundResponse,
            storage::dto::result::RecordResultRequest,
            storage::dto::result::RoundResultResponse,
            storage::dto::advancement::AdvancementType,
            storage::dto::advancement::AdvancementStatus,
            storage::dto::advancement::MedalistNames,
            storage::dto::advancement::FinalsQualifier,
            storage::dto::report::ReportRow,
            storage::dto::report::AdvancementReport,
            storage::dto::report::AdvancementStats,
            storage::dto::report::RoundCompletionResponse,
            storage::dto::report::AdvancementPreviewResponse,
            storage::dto::report::FinalsBracketResponse,
            storage::dto::report::AdvancementSummary,
            storage::dto::report::SummaryEntry,
        )
    ),
    tags(
        (name = "rounds", description = "Round configuration endpoints"),
        (name = "results", description = "Result recording endpoints"),
        (name = "advancement", description = "Round completion and advancement endpoints"),
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
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
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

    tracing::info!("Starting CubeTrack API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    // Log only the host part of the URL so credentials stay out of the logs.
    let db_host = config.database_url.rsplit('@').next().unwrap_or("unknown");
    tracing::info!("Connecting to database at: {}", db_host);
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Applying database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations complete");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let round_routes = Router::new()
        .merge(features::rounds::routes::routes(api_keys.clone()))
        .merge(features::results::routes::routes(api_keys.clone()))
        .merge(features::advancement::routes::routes(api_keys));

    let app = Router::new()
        .nest("/api/rounds", round_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(db);

    let bind_address = config.bind_address();
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
