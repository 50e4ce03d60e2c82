//! Blog post entity for SeaORM.

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::entity::prelude::*;

use myco_core::ports::{FieldValue, StoredDocument};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author: Option<String>,
    pub tags: Option<Json>,
    pub is_published: bool,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub published_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn timestamp(value: Option<DateTimeWithTimeZone>) -> FieldValue {
    value
        .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc)))
        .unwrap_or(FieldValue::Null)
}

fn json_field(value: Json) -> FieldValue {
    match value {
        Json::Null => FieldValue::Null,
        Json::Bool(b) => FieldValue::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Double(n.as_f64().unwrap_or_default()),
        },
        Json::String(s) => FieldValue::String(s),
        Json::Array(items) => FieldValue::Array(items.into_iter().map(json_field).collect()),
        Json::Object(fields) => FieldValue::Map(
            fields
                .into_iter()
                .map(|(k, v)| (k, json_field(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

/// Rows come back as documents so the listing treats every store alike.
impl From<Model> for StoredDocument {
    fn from(model: Model) -> Self {
        StoredDocument::new(model.id)
            .with_field("title", model.title)
            .with_field("excerpt", model.excerpt)
            .with_field("content", model.content)
            .with_field("author", model.author)
            .with_field("tags", model.tags.map(json_field).unwrap_or(FieldValue::Null))
            .with_field("is_published", model.is_published)
            .with_field("created_at", timestamp(model.created_at))
            .with_field("updated_at", timestamp(model.updated_at))
            .with_field("published_at", timestamp(model.published_at))
    }
}
