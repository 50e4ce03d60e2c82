//! # MushRoomService Site Server
//!
//! The Actix-web HTTP server behind the site: recipe catalog, moderation
//! queue and blog listing.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use handlers::Routes;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    tracing::info!(
        "Starting MushRoomService site server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(config.database.as_ref(), Arc::new(config.admin.clone())).await;
    let routes = build_routes(&config)?;

    #[cfg(feature = "auth")]
    let token_service = {
        let service: Arc<dyn myco_core::ports::TokenService> =
            Arc::new(myco_infra::JwtTokenService::new(config.jwt.clone()));
        web::Data::new(service)
    };

    HttpServer::new(move || {
        let app = App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()));

        #[cfg(feature = "auth")]
        let app = app.app_data(token_service.clone());

        let routes = routes.clone();
        app.configure(move |cfg| routes.configure(cfg))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(feature = "rate-limit")]
fn build_routes(config: &AppConfig) -> std::io::Result<Routes> {
    let limiter = myco_infra::InMemoryRateLimiter::new(config.rate_limit.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    tracing::info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Submission rate limit configured"
    );
    Ok(Routes::new(Arc::new(limiter)))
}

#[cfg(not(feature = "rate-limit"))]
fn build_routes(_config: &AppConfig) -> std::io::Result<Routes> {
    Ok(Routes::new())
}
