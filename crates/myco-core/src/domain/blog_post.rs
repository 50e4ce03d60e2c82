use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// BlogPost entity - a post as handed to viewers, timestamps already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub is_published: bool,
    /// ISO-8601, UTC, millisecond precision.
    pub created_at: String,
    pub updated_at: String,
    pub published_at: Option<String>,
    /// Title, content, author and anything else stored on the document.
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl BlogPost {
    pub fn title(&self) -> Option<&str> {
        self.content.get("title").and_then(Value::as_str)
    }
}
