//! HTTP handlers and route configuration.

mod blog;
mod health;
mod moderation;
mod recipes;

#[cfg(test)]
mod tests;

use actix_web::web;

#[cfg(feature = "rate-limit")]
use std::sync::Arc;

#[cfg(feature = "rate-limit")]
use crate::middleware::rate_limit::RateLimitMiddleware;
#[cfg(feature = "rate-limit")]
use myco_core::ports::RateLimiter;

/// Route table plus whatever the routes need wired in.
#[derive(Clone)]
pub struct Routes {
    #[cfg(feature = "rate-limit")]
    submission_limiter: Arc<dyn RateLimiter>,
}

impl Routes {
    #[cfg(feature = "rate-limit")]
    pub fn new(submission_limiter: Arc<dyn RateLimiter>) -> Self {
        Self { submission_limiter }
    }

    #[cfg(not(feature = "rate-limit"))]
    pub fn new() -> Self {
        Self {}
    }

    /// Configure all application routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let recipes = web::resource("/recipes")
            .route(web::get().to(recipes::list_recipes))
            .route(web::post().to(recipes::submit_recipe));

        #[cfg(feature = "rate-limit")]
        let recipes = recipes.wrap(RateLimitMiddleware::new(self.submission_limiter.clone()));

        cfg.service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(recipes)
                .route("/recipes/{id}", web::get().to(recipes::get_recipe))
                .service(
                    web::scope("/blog")
                        .route("/posts", web::get().to(blog::list_posts))
                        .route("/feed", web::get().to(blog::feed)),
                )
                // Admin routes
                .service(
                    web::scope("/admin/recipes")
                        .route("/pending", web::get().to(moderation::pending_recipes))
                        .route(
                            "/{id}/moderation",
                            web::post().to(moderation::moderate_recipe),
                        )
                        .route("/{id}", web::delete().to(moderation::delete_recipe)),
                ),
        );
    }
}
