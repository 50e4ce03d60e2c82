use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recipe category - the fixed set shown in the catalog sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipeCategory {
    Agar,
    LiquidCulture,
    Substrate,
    Other,
}

impl RecipeCategory {
    pub const ALL: [RecipeCategory; 4] = [
        RecipeCategory::Agar,
        RecipeCategory::LiquidCulture,
        RecipeCategory::Substrate,
        RecipeCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::Agar => "agar",
            RecipeCategory::LiquidCulture => "liquid-culture",
            RecipeCategory::Substrate => "substrate",
            RecipeCategory::Other => "other",
        }
    }
}

impl fmt::Display for RecipeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selection in the catalog: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(RecipeCategory),
}

impl CategoryFilter {
    /// `All` first, then every category in display order.
    pub fn choices() -> impl Iterator<Item = CategoryFilter> {
        std::iter::once(CategoryFilter::All).chain(RecipeCategory::ALL.map(CategoryFilter::Only))
    }

    pub fn matches(&self, category: RecipeCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown recipe category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(CategoryFilter::All),
            other => RecipeCategory::ALL
                .into_iter()
                .find(|c| c.as_str() == other)
                .map(CategoryFilter::Only)
                .ok_or_else(|| UnknownCategory(other.to_string())),
        }
    }
}

/// Moderation status - controls visibility to non-admin viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeStatus {
    Pending,
    Approved,
    Rejected,
}

/// Admin action on a single recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
    Delete,
}

impl ModerationAction {
    /// Status the recipe ends up in, or `None` when the action removes it.
    pub fn target_status(&self) -> Option<RecipeStatus> {
        match self {
            ModerationAction::Approve => Some(RecipeStatus::Approved),
            ModerationAction::Reject => Some(RecipeStatus::Rejected),
            ModerationAction::Delete => None,
        }
    }
}

/// Recipe entity - a cultivation recipe in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: RecipeCategory,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub status: RecipeStatus,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Build a user submission. Submissions always start out pending.
    pub fn from_submission(id: String, form: RecipeFormData, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: form.title,
            description: form.description,
            category: form.category,
            ingredients: form.ingredients,
            instructions: form.instructions,
            notes: form.notes,
            author: form.author,
            status: RecipeStatus::Pending,
            is_custom: true,
            created_at,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == RecipeStatus::Approved
    }

    pub fn is_visible_to(&self, is_admin: bool) -> bool {
        self.is_approved() || is_admin
    }

    /// Case-insensitive substring match against the title.
    pub fn matches_search(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Submission payload - everything but the server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeFormData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: RecipeCategory,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}
