//! Blog listing handlers.

use actix_web::{HttpResponse, web};

use myco_shared::ApiResponse;
use myco_shared::dto::BlogListResponse;

use crate::middleware::error::AppResult;
use crate::middleware::viewer::CurrentViewer;
use crate::state::AppState;

/// GET /api/blog/posts - 502 with a readable message when the store fails.
pub async fn list_posts(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> AppResult<HttpResponse> {
    let posts = state.blog.fetch(viewer.is_admin).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(BlogListResponse { posts })))
}

/// GET /api/blog/feed - the page state for this viewing context, always 200.
///
/// A refresh overtaken by a newer one reports the current state (possibly
/// `loading`) instead of its own, now stale, result.
pub async fn feed(state: web::Data<AppState>, CurrentViewer(viewer): CurrentViewer) -> HttpResponse {
    let feed = state.feed(viewer.is_admin);
    if !feed.refresh(&state.blog, viewer.is_admin).await {
        tracing::debug!(is_admin = viewer.is_admin, "Blog feed refresh superseded");
    }

    HttpResponse::Ok().json(feed.state())
}
