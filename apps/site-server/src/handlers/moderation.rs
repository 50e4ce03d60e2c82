//! Admin moderation handlers.

use actix_web::{HttpResponse, web};

use myco_core::catalog::ModerationOutcome;
use myco_core::domain::{ModerationAction, Viewer};
use myco_shared::ApiResponse;
use myco_shared::dto::{ModerationRequest, ModerationResponse, PendingRecipesResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::viewer::AdminViewer;
use crate::observability::RequestId;
use crate::state::AppState;

/// GET /api/admin/recipes/pending
pub async fn pending_recipes(
    state: web::Data<AppState>,
    _admin: AdminViewer,
) -> AppResult<HttpResponse> {
    let catalog = state.catalog.read().await;
    let recipes = catalog.pending().into_iter().cloned().collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PendingRecipesResponse { recipes })))
}

/// POST /api/admin/recipes/{id}/moderation
pub async fn moderate_recipe(
    state: web::Data<AppState>,
    AdminViewer(viewer): AdminViewer,
    request_id: RequestId,
    path: web::Path<String>,
    body: web::Json<ModerationRequest>,
) -> AppResult<HttpResponse> {
    apply(&state, &viewer, &request_id, path.into_inner(), body.action).await
}

/// DELETE /api/admin/recipes/{id}
pub async fn delete_recipe(
    state: web::Data<AppState>,
    AdminViewer(viewer): AdminViewer,
    request_id: RequestId,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    apply(&state, &viewer, &request_id, path.into_inner(), ModerationAction::Delete).await
}

async fn apply(
    state: &AppState,
    viewer: &Viewer,
    request_id: &RequestId,
    id: String,
    action: ModerationAction,
) -> AppResult<HttpResponse> {
    let outcome = state.catalog.write().await.moderate(viewer, &id, action)?;

    let response = match outcome {
        ModerationOutcome::Updated(recipe) => ModerationResponse {
            id,
            action,
            removed: false,
            recipe: Some(recipe),
        },
        ModerationOutcome::Removed(_) => ModerationResponse {
            id,
            action,
            removed: true,
            recipe: None,
        },
        ModerationOutcome::NoMatch => {
            return Err(AppError::NotFound(format!("Recipe with id {} not found", id)));
        }
    };

    tracing::info!(request_id = %request_id.as_str(), recipe_id = %response.id, ?action, "Moderation applied");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}
