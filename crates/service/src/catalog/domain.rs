use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl From<models::service_category::Model> for CategoryView {
    fn from(c: models::service_category::Model) -> Self {
        Self { id: c.id, name: c.name, slug: c.slug, description: c.description }
    }
}

/// Public service representation. `updated_at` is only present on the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: Uuid,
    pub category_name: String,
    pub description: String,
    pub short_description: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub price: Option<Decimal>,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A stored service joined with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_slug: String,
    pub description: String,
    pub short_description: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub price: Option<Decimal>,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRecord {
    pub fn from_models(s: models::service::Model, category: &models::service_category::Model) -> Self {
        let features = models::service::features_of(&s);
        Self {
            id: s.id,
            title: s.title,
            slug: s.slug,
            category_id: s.category_id,
            category_name: category.name.clone(),
            category_slug: category.slug.clone(),
            description: s.description,
            short_description: s.short_description,
            image: s.image,
            is_featured: s.is_featured,
            price: s.price,
            features,
            created_at: s.created_at.with_timezone(&Utc),
            updated_at: s.updated_at.with_timezone(&Utc),
        }
    }

    pub fn summary(&self) -> ServiceView {
        ServiceView {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            category: self.category_id,
            category_name: self.category_name.clone(),
            description: self.description.clone(),
            short_description: self.short_description.clone(),
            image: self.image.clone(),
            is_featured: self.is_featured,
            price: self.price,
            features: self.features.clone(),
            created_at: self.created_at,
            updated_at: None,
        }
    }

    pub fn detail(&self) -> ServiceView {
        ServiceView { updated_at: Some(self.updated_at), ..self.summary() }
    }
}

/// Admin input for a category; the slug is derived from the name when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Admin input for a service; the slug is derived from the title when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub category_id: Uuid,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// One page of the full service listing.
#[derive(Debug, Clone, Serialize)]
pub struct ServicePage {
    pub count: u64,
    pub page: u32,
    pub per_page: u32,
    pub results: Vec<ServiceView>,
}
