//! Public recipe catalog handlers.

use actix_web::{HttpResponse, web};

use myco_core::catalog::RecipeQuery;
use myco_core::domain::{CategoryFilter, RecipeFormData};
use myco_shared::ApiResponse;
use myco_shared::dto::{RecipeListParams, RecipeListResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::viewer::CurrentViewer;
use crate::observability::RequestId;
use crate::state::AppState;

/// GET /api/recipes?search=&category=
pub async fn list_recipes(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    params: web::Query<RecipeListParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let category: CategoryFilter = params
        .category
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(|e: myco_core::domain::UnknownCategory| AppError::BadRequest(e.to_string()))?;
    let query = RecipeQuery::new(params.search.unwrap_or_default(), category);

    let catalog = state.catalog.read().await;
    let response = RecipeListResponse {
        recipes: catalog
            .filter(&query, viewer.is_admin)
            .into_iter()
            .cloned()
            .collect(),
        counts: catalog.category_counts(&query.search, viewer.is_admin),
        pending_count: viewer.is_admin.then(|| catalog.pending().len()),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let catalog = state.catalog.read().await;
    let recipe = catalog.get_visible(&id, viewer.is_admin)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(recipe)))
}

/// POST /api/recipes
pub async fn submit_recipe(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<RecipeFormData>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner();
    if form.title.trim().is_empty() {
        return Err(AppError::BadRequest("Recipe title is required".to_string()));
    }

    let recipe = state.catalog.write().await.submit(form).clone();
    tracing::info!(
        request_id = %request_id.as_str(),
        recipe_id = %recipe.id,
        category = %recipe.category,
        "New recipe awaiting moderation"
    );

    Ok(HttpResponse::Created().json(ApiResponse::ok(recipe)))
}
