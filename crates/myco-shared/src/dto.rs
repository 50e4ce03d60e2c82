//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

use myco_core::catalog::CategoryCount;
use myco_core::domain::{BlogPost, ModerationAction, Recipe};

/// Query string for the recipe catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Catalog page: visible recipes plus the sidebar counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
    pub counts: Vec<CategoryCount>,
    /// Size of the moderation queue; admins only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_count: Option<usize>,
}

/// Request to moderate one recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub action: ModerationAction,
}

/// Result of a moderation action. `recipe` is absent once deleted.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationResponse {
    pub id: String,
    pub action: ModerationAction,
    pub removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingRecipesResponse {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogListResponse {
    pub posts: Vec<BlogPost>,
}
