//! Recipe catalog - visibility filtering, submission, and moderation.
//!
//! The collection lives in process memory only. Status transitions:
//!
//! ```text
//! pending --approve--> approved
//! pending --reject---> rejected
//! any     --delete---> (removed)
//! ```
//!
//! Re-applying approve or reject re-asserts the state. Nothing moves a
//! recipe back to pending.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    CategoryFilter, ModerationAction, Recipe, RecipeFormData, RecipeStatus, Viewer,
    default_recipes,
};
use crate::error::DomainError;

/// Search term plus category selection.
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl RecipeQuery {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }
}

/// Number of visible, search-matching recipes for one category choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: &'static str,
    pub count: usize,
}

/// What a moderation call did.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationOutcome {
    Updated(Recipe),
    Removed(Recipe),
    /// No recipe with that id; nothing changed.
    NoMatch,
}

/// Hands out wall-clock based ids that never repeat within a catalog.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn next(&mut self, now: DateTime<Utc>) -> String {
        let candidate = now.timestamp_millis();
        self.last = candidate.max(self.last + 1);
        self.last.to_string()
    }
}

/// In-memory recipe collection in insertion order.
#[derive(Debug, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    ids: IdGenerator,
}

impl RecipeCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            ids: IdGenerator::default(),
        }
    }

    /// Catalog seeded with the approved starter recipes.
    pub fn with_defaults() -> Self {
        Self::new(default_recipes())
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Recipes matching search and category that this viewer may see.
    pub fn filter(&self, query: &RecipeQuery, is_admin: bool) -> Vec<&Recipe> {
        self.searchable(&query.search, is_admin)
            .filter(|r| query.category.matches(r.category))
            .collect()
    }

    /// Per-category counts. They honour search and visibility but ignore the
    /// selected category, so every sidebar entry shows its own total.
    pub fn category_counts(&self, search: &str, is_admin: bool) -> Vec<CategoryCount> {
        let visible: Vec<&Recipe> = self.searchable(search, is_admin).collect();

        CategoryFilter::choices()
            .map(|choice| CategoryCount {
                category: choice.as_str(),
                count: visible.iter().filter(|r| choice.matches(r.category)).count(),
            })
            .collect()
    }

    /// The moderation queue.
    pub fn pending(&self) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.status == RecipeStatus::Pending)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Single recipe, hidden from non-admins until approved.
    pub fn get_visible(&self, id: &str, is_admin: bool) -> Result<&Recipe, DomainError> {
        self.get(id)
            .filter(|r| r.is_visible_to(is_admin))
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Recipe",
                id: id.to_string(),
            })
    }

    /// Append a user submission as a pending, custom recipe.
    pub fn submit(&mut self, form: RecipeFormData) -> &Recipe {
        self.submit_at(form, Utc::now())
    }

    pub fn submit_at(&mut self, form: RecipeFormData, now: DateTime<Utc>) -> &Recipe {
        let id = self.ids.next(now);
        tracing::debug!(recipe_id = %id, category = %form.category, "Recipe submitted for review");
        self.recipes.push(Recipe::from_submission(id, form, now));
        &self.recipes[self.recipes.len() - 1]
    }

    /// Apply an admin action to the recipe with `id`.
    ///
    /// Non-admin viewers are refused before anything is touched.
    pub fn moderate(
        &mut self,
        viewer: &Viewer,
        id: &str,
        action: ModerationAction,
    ) -> Result<ModerationOutcome, DomainError> {
        if !viewer.is_admin {
            tracing::warn!(recipe_id = %id, ?action, "Moderation refused for non-admin viewer");
            return Err(DomainError::Unauthorized);
        }

        let Some(index) = self.recipes.iter().position(|r| r.id == id) else {
            return Ok(ModerationOutcome::NoMatch);
        };

        let outcome = match action.target_status() {
            Some(status) => {
                let recipe = &mut self.recipes[index];
                recipe.status = status;
                ModerationOutcome::Updated(recipe.clone())
            }
            None => ModerationOutcome::Removed(self.recipes.remove(index)),
        };

        tracing::info!(recipe_id = %id, ?action, "Recipe moderated");
        Ok(outcome)
    }

    fn searchable<'a, 's>(
        &'a self,
        search: &'s str,
        is_admin: bool,
    ) -> impl Iterator<Item = &'a Recipe> {
        self.recipes
            .iter()
            .filter(move |r| r.matches_search(search) && r.is_visible_to(is_admin))
    }
}
