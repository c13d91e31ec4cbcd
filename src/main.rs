// Allow dead code and unused imports for work-in-progress features
#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitroster::github::{ContributorSource, GithubClient};
use gitroster::{AppState, Config};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "gitroster"
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitroster=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    info!("Starting GitRoster server on {}:{}", config.host, config.port);

    // Build the upstream source if a credential is configured; without one
    // the fetching endpoints answer with a configuration error
    let source: Option<Arc<dyn ContributorSource>> = match &config.github_token {
        Some(token) => {
            let client = GithubClient::new(
                &config.github_api_base,
                token,
                Duration::from_secs(config.request_timeout_secs),
            )
            .expect("Failed to build upstream client");
            info!("Upstream client initialized for {}", config.github_api_base);
            Some(Arc::new(client))
        }
        None => {
            warn!("GITHUB_TOKEN not set. Contributor endpoints will be unavailable.");
            None
        }
    };

    let app_state = web::Data::new(AppState {
        config: config.clone(),
        source,
    });

    let server_addr = format!("{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .route("/health", web::get().to(health_check))
            .configure(gitroster::handlers::configure_contributor_routes)
            .configure(gitroster::handlers::configure_repository_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
