use async_trait::async_trait;
use models::service::ServiceFields;
use models::service_category::CategoryFields;
use uuid::Uuid;

use super::domain::{CategoryView, ServiceRecord};
use crate::errors::ServiceError;

/// Persistence for categories and services. Lists come back in display order:
/// categories by name, services featured-first then by title.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryView>, ServiceError>;
    async fn get_category(&self, id: Uuid) -> Result<Option<CategoryView>, ServiceError>;
    async fn create_category(&self, fields: CategoryFields) -> Result<CategoryView, ServiceError>;
    async fn update_category(&self, id: Uuid, fields: CategoryFields) -> Result<Option<CategoryView>, ServiceError>;
    /// Services in the category are removed with it.
    async fn delete_category(&self, id: Uuid) -> Result<bool, ServiceError>;

    async fn find_service_by_slug(&self, slug: &str) -> Result<Option<ServiceRecord>, ServiceError>;
    async fn get_service(&self, id: Uuid) -> Result<Option<ServiceRecord>, ServiceError>;
    async fn list_featured(&self) -> Result<Vec<ServiceRecord>, ServiceError>;
    /// Unknown category slugs yield an empty list.
    async fn list_by_category_slug(&self, category_slug: &str) -> Result<Vec<ServiceRecord>, ServiceError>;
    async fn list_by_category_id(&self, category_id: Uuid) -> Result<Vec<ServiceRecord>, ServiceError>;
    /// `page` is 0-based; also returns the total count.
    async fn list_page(&self, page: u64, per_page: u64) -> Result<(Vec<ServiceRecord>, u64), ServiceError>;
    async fn create_service(&self, fields: ServiceFields) -> Result<ServiceRecord, ServiceError>;
    async fn update_service(&self, id: Uuid, fields: ServiceFields) -> Result<Option<ServiceRecord>, ServiceError>;
    async fn delete_service(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct State {
        categories: HashMap<Uuid, CategoryView>,
        services: HashMap<Uuid, ServiceRecord>,
    }

    impl State {
        fn with_category(&self, mut rec: ServiceRecord) -> ServiceRecord {
            if let Some(c) = self.categories.get(&rec.category_id) {
                rec.category_name = c.name.clone();
                rec.category_slug = c.slug.clone();
            }
            rec
        }

        fn sorted(&self, filter: impl Fn(&ServiceRecord) -> bool) -> Vec<ServiceRecord> {
            let mut out: Vec<ServiceRecord> =
                self.services.values().filter(|s| filter(s)).map(|s| self.with_category(s.clone())).collect();
            out.sort_by(|a, b| b.is_featured.cmp(&a.is_featured).then_with(|| a.title.cmp(&b.title)));
            out
        }

        fn slug_taken_by_category(&self, slug: &str, except: Option<Uuid>) -> bool {
            self.categories.values().any(|c| c.slug == slug && Some(c.id) != except)
        }

        fn slug_taken_by_service(&self, slug: &str, except: Option<Uuid>) -> bool {
            self.services.values().any(|s| s.slug == slug && Some(s.id) != except)
        }

        fn record(&self, id: Uuid, fields: ServiceFields, created_at: chrono::DateTime<Utc>) -> ServiceRecord {
            self.with_category(ServiceRecord {
                id,
                title: fields.title,
                slug: fields.slug,
                category_id: fields.category_id,
                category_name: String::new(),
                category_slug: String::new(),
                description: fields.description,
                short_description: fields.short_description,
                image: fields.image,
                is_featured: fields.is_featured,
                price: fields.price,
                features: fields.features,
                created_at,
                updated_at: Utc::now(),
            })
        }
    }

    /// Counts store reads so tests can tell cache hits from misses.
    #[derive(Default)]
    pub struct MockCatalogRepository {
        state: Mutex<State>,
        reads: AtomicUsize,
    }

    impl MockCatalogRepository {
        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        fn read(&self) {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn slug_conflict() -> ServiceError {
        ServiceError::field("slug", "This slug is already in use.")
    }

    #[async_trait]
    impl CatalogRepository for MockCatalogRepository {
        async fn list_categories(&self) -> Result<Vec<CategoryView>, ServiceError> {
            self.read();
            let mut out: Vec<CategoryView> = self.state.lock().await.categories.values().cloned().collect();
            out.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(out)
        }

        async fn get_category(&self, id: Uuid) -> Result<Option<CategoryView>, ServiceError> {
            self.read();
            Ok(self.state.lock().await.categories.get(&id).cloned())
        }

        async fn create_category(&self, fields: CategoryFields) -> Result<CategoryView, ServiceError> {
            let mut state = self.state.lock().await;
            if state.slug_taken_by_category(&fields.slug, None) {
                return Err(slug_conflict());
            }
            let view = CategoryView { id: Uuid::new_v4(), name: fields.name, slug: fields.slug, description: fields.description };
            state.categories.insert(view.id, view.clone());
            Ok(view)
        }

        async fn update_category(&self, id: Uuid, fields: CategoryFields) -> Result<Option<CategoryView>, ServiceError> {
            let mut state = self.state.lock().await;
            if !state.categories.contains_key(&id) {
                return Ok(None);
            }
            if state.slug_taken_by_category(&fields.slug, Some(id)) {
                return Err(slug_conflict());
            }
            let view = CategoryView { id, name: fields.name, slug: fields.slug, description: fields.description };
            state.categories.insert(id, view.clone());
            Ok(Some(view))
        }

        async fn delete_category(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut state = self.state.lock().await;
            let existed = state.categories.remove(&id).is_some();
            state.services.retain(|_, s| s.category_id != id);
            Ok(existed)
        }

        async fn find_service_by_slug(&self, slug: &str) -> Result<Option<ServiceRecord>, ServiceError> {
            self.read();
            let state = self.state.lock().await;
            Ok(state.services.values().find(|s| s.slug == slug).map(|s| state.with_category(s.clone())))
        }

        async fn get_service(&self, id: Uuid) -> Result<Option<ServiceRecord>, ServiceError> {
            self.read();
            let state = self.state.lock().await;
            Ok(state.services.get(&id).map(|s| state.with_category(s.clone())))
        }

        async fn list_featured(&self) -> Result<Vec<ServiceRecord>, ServiceError> {
            self.read();
            Ok(self.state.lock().await.sorted(|s| s.is_featured))
        }

        async fn list_by_category_slug(&self, category_slug: &str) -> Result<Vec<ServiceRecord>, ServiceError> {
            self.read();
            let state = self.state.lock().await;
            let Some(cat) = state.categories.values().find(|c| c.slug == category_slug) else {
                return Ok(Vec::new());
            };
            let id = cat.id;
            Ok(state.sorted(|s| s.category_id == id))
        }

        async fn list_by_category_id(&self, category_id: Uuid) -> Result<Vec<ServiceRecord>, ServiceError> {
            self.read();
            Ok(self.state.lock().await.sorted(|s| s.category_id == category_id))
        }

        async fn list_page(&self, page: u64, per_page: u64) -> Result<(Vec<ServiceRecord>, u64), ServiceError> {
            self.read();
            let all = self.state.lock().await.sorted(|_| true);
            let total = all.len() as u64;
            let items = all.into_iter().skip((page * per_page) as usize).take(per_page as usize).collect();
            Ok((items, total))
        }

        async fn create_service(&self, fields: ServiceFields) -> Result<ServiceRecord, ServiceError> {
            let mut state = self.state.lock().await;
            if state.slug_taken_by_service(&fields.slug, None) {
                return Err(slug_conflict());
            }
            let rec = state.record(Uuid::new_v4(), fields, Utc::now());
            state.services.insert(rec.id, rec.clone());
            Ok(rec)
        }

        async fn update_service(&self, id: Uuid, fields: ServiceFields) -> Result<Option<ServiceRecord>, ServiceError> {
            let mut state = self.state.lock().await;
            let Some(created_at) = state.services.get(&id).map(|s| s.created_at) else {
                return Ok(None);
            };
            if state.slug_taken_by_service(&fields.slug, Some(id)) {
                return Err(slug_conflict());
            }
            let rec = state.record(id, fields, created_at);
            state.services.insert(id, rec.clone());
            Ok(Some(rec))
        }

        async fn delete_service(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.state.lock().await.services.remove(&id).is_some())
        }
    }
}
