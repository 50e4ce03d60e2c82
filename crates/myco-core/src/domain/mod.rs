//! Domain entities - the core business objects.

mod blog_post;
mod defaults;
mod recipe;
mod viewer;

pub use blog_post::BlogPost;
pub use defaults::default_recipes;
pub use recipe::{
    CategoryFilter, ModerationAction, Recipe, RecipeCategory, RecipeFormData, RecipeStatus,
    UnknownCategory,
};
pub use viewer::Viewer;
