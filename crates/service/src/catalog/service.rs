use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use models::service::ServiceFields;
use models::service_category::CategoryFields;
use models::slug::{is_valid_slug, slugify};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{CategoryInput, CategoryView, ServiceInput, ServicePage, ServiceRecord, ServiceView};
use super::repository::CatalogRepository;
use crate::cache::{keys, CacheStore};
use crate::errors::{FieldErrors, ServiceError};
use crate::pagination::Pagination;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

const INVALID_SLUG: &str =
    "Enter a valid \u{201c}slug\u{201d} consisting of letters, numbers, underscores or hyphens.";

/// Cache-first reads over the catalog plus the administrative write path.
/// Every successful write deletes the cache keys it could have made stale.
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self { repo, cache, ttl: DEFAULT_CACHE_TTL }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Serve `key` from the cache, or load, store and return it.
    async fn cached<T, F, Fut>(&self, key: &str, load: F) -> Result<T, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        if let Some(hit) = self.cache.get(key).await {
            match serde_json::from_value(hit) {
                Ok(v) => {
                    debug!(key = %key, "cache hit");
                    return Ok(v);
                }
                Err(e) => warn!(key = %key, error = %e, "discarding unreadable cache entry"),
            }
        }
        debug!(key = %key, "cache miss");
        let fresh = load().await?;
        let value = serde_json::to_value(&fresh).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.cache.set(key, value, self.ttl).await;
        Ok(fresh)
    }

    async fn invalidate<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            debug!(key = %key.as_ref(), "cache invalidate");
            self.cache.delete(key.as_ref()).await;
        }
    }

    /// Keys a stored service shows up under.
    fn service_keys(rec: &ServiceRecord) -> [String; 3] {
        [
            keys::service(&rec.slug),
            keys::FEATURED_SERVICES.to_string(),
            keys::category_services(&rec.category_slug),
        ]
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryView>, ServiceError> {
        self.cached(keys::SERVICE_CATEGORIES, || self.repo.list_categories()).await
    }

    pub async fn get_category(&self, slug: &str) -> Result<CategoryView, ServiceError> {
        self.list_categories()
            .await?
            .into_iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| ServiceError::not_found("category"))
    }

    pub async fn get_service(&self, slug: &str) -> Result<ServiceView, ServiceError> {
        self.cached(&keys::service(slug), || async {
            let rec = self.repo.find_service_by_slug(slug).await?.ok_or_else(|| ServiceError::not_found("service"))?;
            Ok(rec.detail())
        })
        .await
    }

    pub async fn list_featured(&self) -> Result<Vec<ServiceView>, ServiceError> {
        self.cached(keys::FEATURED_SERVICES, || async {
            Ok(self.repo.list_featured().await?.iter().map(ServiceRecord::summary).collect())
        })
        .await
    }

    pub async fn list_by_category(&self, category_slug: &str) -> Result<Vec<ServiceView>, ServiceError> {
        self.cached(&keys::category_services(category_slug), || async {
            Ok(self.repo.list_by_category_slug(category_slug).await?.iter().map(ServiceRecord::summary).collect())
        })
        .await
    }

    /// Full listing, uncached.
    pub async fn list_services(&self, pagination: Pagination) -> Result<ServicePage, ServiceError> {
        let window = pagination.window();
        let (items, count) = self.repo.list_page(window.index, window.size).await?;
        Ok(ServicePage {
            count,
            page: window.number(),
            per_page: window.size as u32,
            results: items.iter().map(ServiceRecord::summary).collect(),
        })
    }

    /// Create (`id == None`) or update a category.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn save_category(&self, id: Option<Uuid>, input: CategoryInput) -> Result<CategoryView, ServiceError> {
        let fields = category_fields(input)?;
        let (saved, affected) = match id {
            None => (self.repo.create_category(fields).await?, Vec::new()),
            Some(id) => {
                let before = self.repo.get_category(id).await?.ok_or_else(|| ServiceError::not_found("category"))?;
                // services embed the category name and are listed under its slug
                let members = self.repo.list_by_category_id(id).await?;
                let saved = self.repo.update_category(id, fields).await?.ok_or_else(|| ServiceError::not_found("category"))?;
                let mut affected = vec![keys::category_services(&before.slug), keys::category_services(&saved.slug)];
                if !members.is_empty() {
                    affected.push(keys::FEATURED_SERVICES.to_string());
                    affected.extend(members.iter().map(|s| keys::service(&s.slug)));
                }
                (saved, affected)
            }
        };
        self.invalidate([keys::SERVICE_CATEGORIES]).await;
        self.invalidate(affected).await;
        info!(category_id = %saved.id, slug = %saved.slug, "category_saved");
        Ok(saved)
    }

    /// Delete a category and, with it, its services.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ServiceError> {
        let category = self.repo.get_category(id).await?.ok_or_else(|| ServiceError::not_found("category"))?;
        let members = self.repo.list_by_category_id(id).await?;
        if !self.repo.delete_category(id).await? {
            return Err(ServiceError::not_found("category"));
        }
        self.invalidate([
            keys::SERVICE_CATEGORIES.to_string(),
            keys::FEATURED_SERVICES.to_string(),
            keys::category_services(&category.slug),
        ])
        .await;
        self.invalidate(members.iter().map(|s| keys::service(&s.slug)).collect::<Vec<String>>()).await;
        info!(category_id = %id, removed_services = members.len(), "category_deleted");
        Ok(())
    }

    /// Create (`id == None`) or update a service.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn save_service(&self, id: Option<Uuid>, input: ServiceInput) -> Result<ServiceView, ServiceError> {
        let previous = match id {
            Some(id) => Some(self.repo.get_service(id).await?.ok_or_else(|| ServiceError::not_found("service"))?),
            None => None,
        };
        if self.repo.get_category(input.category_id).await?.is_none() {
            return Err(ServiceError::field(
                "category",
                format!("Invalid pk \"{}\" - object does not exist.", input.category_id),
            ));
        }
        let fields = service_fields(input)?;
        let saved = match id {
            None => self.repo.create_service(fields).await?,
            Some(id) => self.repo.update_service(id, fields).await?.ok_or_else(|| ServiceError::not_found("service"))?,
        };

        self.invalidate(Self::service_keys(&saved)).await;
        if let Some(prev) = previous.filter(|p| p.slug != saved.slug || p.category_slug != saved.category_slug) {
            self.invalidate(Self::service_keys(&prev)).await;
        }
        info!(service_id = %saved.id, slug = %saved.slug, "service_saved");
        Ok(saved.detail())
    }

    #[instrument(skip(self))]
    pub async fn delete_service(&self, id: Uuid) -> Result<(), ServiceError> {
        let rec = self.repo.get_service(id).await?.ok_or_else(|| ServiceError::not_found("service"))?;
        if !self.repo.delete_service(id).await? {
            return Err(ServiceError::not_found("service"));
        }
        self.invalidate(Self::service_keys(&rec)).await;
        info!(service_id = %id, slug = %rec.slug, "service_deleted");
        Ok(())
    }
}

fn resolve_slug(explicit: Option<String>, source: &str) -> String {
    match explicit.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(slug) => slug,
        None => slugify(source),
    }
}

fn category_fields(input: CategoryInput) -> Result<CategoryFields, FieldErrors> {
    let mut errs = FieldErrors::new();
    let name = input.name.trim().to_string();
    if name.is_empty() {
        errs.add("name", "This field may not be blank.");
    } else if name.chars().count() > 100 {
        errs.add("name", "Ensure this field has no more than 100 characters.");
    }
    let slug = resolve_slug(input.slug, &name);
    if !name.is_empty() && !is_valid_slug(&slug) {
        errs.add("slug", INVALID_SLUG);
    }
    errs.into_result()?;
    Ok(CategoryFields { name, slug, description: input.description })
}

fn service_fields(input: ServiceInput) -> Result<ServiceFields, FieldErrors> {
    let mut errs = FieldErrors::new();
    let title = input.title.trim().to_string();
    if title.is_empty() {
        errs.add("title", "This field may not be blank.");
    } else if title.chars().count() > 200 {
        errs.add("title", "Ensure this field has no more than 200 characters.");
    }
    let slug = resolve_slug(input.slug, &title);
    if !title.is_empty() && !is_valid_slug(&slug) {
        errs.add("slug", INVALID_SLUG);
    }
    if input.description.trim().is_empty() {
        errs.add("description", "This field may not be blank.");
    }
    let short = input.short_description.chars().count();
    if short == 0 {
        errs.add("short_description", "This field may not be blank.");
    } else if short > 255 {
        errs.add("short_description", "Ensure this field has no more than 255 characters.");
    }
    if input.image.as_deref().is_some_and(|i| i.chars().count() > 255) {
        errs.add("image", "Ensure this field has no more than 255 characters.");
    }
    if input.features.iter().any(|f| f.chars().count() > 200) {
        errs.add("features", "Ensure each feature has no more than 200 characters.");
    }
    if let Some(price) = input.price {
        if price.is_sign_negative() {
            errs.add("price", "Ensure this value is greater than or equal to 0.");
        } else if price.scale() > 2 {
            errs.add("price", "Ensure that there are no more than 2 decimal places.");
        } else if price >= Decimal::new(100_000_000, 0) {
            errs.add("price", "Ensure that there are no more than 10 digits in total.");
        }
    }
    errs.into_result()?;
    Ok(ServiceFields {
        title,
        slug,
        category_id: input.category_id,
        description: input.description,
        short_description: input.short_description,
        image: input.image.filter(|s| !s.trim().is_empty()),
        is_featured: input.is_featured,
        price: input.price,
        features: input.features,
    })
}
