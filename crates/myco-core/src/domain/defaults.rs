//! Starter recipes the catalog ships with.

use chrono::{DateTime, TimeZone, Utc};

use super::recipe::{Recipe, RecipeCategory, RecipeStatus};

fn seeded(
    id: &str,
    title: &str,
    description: &str,
    category: RecipeCategory,
    ingredients: &[&str],
    instructions: &[&str],
    created_at: DateTime<Utc>,
) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: instructions.iter().map(|s| s.to_string()).collect(),
        notes: None,
        author: Some("MushRoomService".to_string()),
        status: RecipeStatus::Approved,
        is_custom: false,
        created_at,
    }
}

/// Approved, non-custom recipes visible to everyone.
pub fn default_recipes() -> Vec<Recipe> {
    let created_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    vec![
        seeded(
            "1",
            "Malt Extract Agar (MEA)",
            "A reliable general-purpose agar for isolating and cleaning up cultures.",
            RecipeCategory::Agar,
            &[
                "20 g light malt extract",
                "20 g agar agar powder",
                "1 L distilled water",
            ],
            &[
                "Dissolve the malt extract and agar in the water.",
                "Pressure cook at 15 PSI for 30 minutes.",
                "Pour plates in front of a flow hood once cooled to about 50 C.",
            ],
            created_at,
        ),
        seeded(
            "2",
            "Potato Dextrose Agar (PDA)",
            "Classic nutrient agar that most gourmet species colonize quickly.",
            RecipeCategory::Agar,
            &[
                "200 g potatoes",
                "20 g dextrose",
                "20 g agar agar powder",
                "1 L water",
            ],
            &[
                "Boil the diced potatoes for 30 minutes and keep the broth.",
                "Top the broth up to 1 L and stir in dextrose and agar.",
                "Sterilize at 15 PSI for 30 minutes and pour.",
            ],
            created_at,
        ),
        seeded(
            "3",
            "Honey Liquid Culture",
            "Simple clear liquid culture for expanding mycelium before spawning.",
            RecipeCategory::LiquidCulture,
            &["16 g light honey", "1 L water"],
            &[
                "Mix the honey into the water until fully dissolved.",
                "Fill jars with self-healing injection ports two thirds full.",
                "Pressure cook at 15 PSI for 20 minutes.",
            ],
            created_at,
        ),
        seeded(
            "4",
            "Master's Mix",
            "Fast, high-yield substrate for oyster and lion's mane blocks.",
            RecipeCategory::Substrate,
            &[
                "50% hardwood fuel pellets",
                "50% soybean hulls",
                "Water to field capacity",
            ],
            &[
                "Hydrate the pellets and hulls together.",
                "Bag and sterilize at 15 PSI for 2.5 hours.",
                "Inoculate with 10% grain spawn once cool.",
            ],
            created_at,
        ),
        seeded(
            "5",
            "Coco Coir and Vermiculite",
            "Bulk substrate for monotubs that needs only pasteurization.",
            RecipeCategory::Substrate,
            &[
                "650 g brick of coco coir",
                "2 quarts vermiculite",
                "4.5 quarts boiling water",
            ],
            &[
                "Break up the coir in a bucket and add vermiculite.",
                "Pour boiling water over it, cover, and let it cool overnight.",
                "Mix with colonized grain spawn at a 1:2 ratio.",
            ],
            created_at,
        ),
    ]
}
