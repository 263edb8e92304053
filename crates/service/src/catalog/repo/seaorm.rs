use std::collections::HashMap;

use models::errors::ModelError;
use models::service::ServiceFields;
use models::service_category::CategoryFields;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::catalog::domain::{CategoryView, ServiceRecord};
use crate::catalog::repository::CatalogRepository;
use crate::errors::ServiceError;

pub struct SeaOrmCatalogRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn category_model(&self, id: Uuid) -> Result<Option<models::service_category::Model>, ServiceError> {
        models::service_category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::from(ModelError::from(e)))
    }

    async fn join_one(&self, s: models::service::Model) -> Result<ServiceRecord, ServiceError> {
        let category = self
            .category_model(s.category_id)
            .await?
            .ok_or_else(|| ServiceError::Db(format!("service {} references missing category", s.id)))?;
        Ok(ServiceRecord::from_models(s, &category))
    }

    /// Categories are few; join in memory.
    async fn join_all(&self, services: Vec<models::service::Model>) -> Result<Vec<ServiceRecord>, ServiceError> {
        let categories: HashMap<Uuid, models::service_category::Model> = models::service_category::list_ordered(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        services
            .into_iter()
            .map(|s| {
                let category = categories
                    .get(&s.category_id)
                    .ok_or_else(|| ServiceError::Db(format!("service {} references missing category", s.id)))?;
                Ok(ServiceRecord::from_models(s, category))
            })
            .collect()
    }
}

/// Unique-slug violations come back as field errors, everything else as-is.
fn slug_err(e: ModelError) -> ServiceError {
    match e {
        ModelError::Conflict(_) => ServiceError::field("slug", "This slug is already in use."),
        other => other.into(),
    }
}

#[async_trait::async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn list_categories(&self) -> Result<Vec<CategoryView>, ServiceError> {
        let rows = models::service_category::list_ordered(&self.db).await?;
        Ok(rows.into_iter().map(CategoryView::from).collect())
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<CategoryView>, ServiceError> {
        Ok(self.category_model(id).await?.map(CategoryView::from))
    }

    async fn create_category(&self, fields: CategoryFields) -> Result<CategoryView, ServiceError> {
        let created = models::service_category::create(&self.db, fields).await.map_err(slug_err)?;
        Ok(CategoryView::from(created))
    }

    async fn update_category(&self, id: Uuid, fields: CategoryFields) -> Result<Option<CategoryView>, ServiceError> {
        let updated = models::service_category::update(&self.db, id, fields).await.map_err(slug_err)?;
        Ok(updated.map(CategoryView::from))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(models::service_category::hard_delete(&self.db, id).await?)
    }

    async fn find_service_by_slug(&self, slug: &str) -> Result<Option<ServiceRecord>, ServiceError> {
        match models::service::find_by_slug(&self.db, slug).await? {
            Some(s) => Ok(Some(self.join_one(s).await?)),
            None => Ok(None),
        }
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<ServiceRecord>, ServiceError> {
        let found = models::service::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::from(ModelError::from(e)))?;
        match found {
            Some(s) => Ok(Some(self.join_one(s).await?)),
            None => Ok(None),
        }
    }

    async fn list_featured(&self) -> Result<Vec<ServiceRecord>, ServiceError> {
        let rows = models::service::list_featured(&self.db).await?;
        self.join_all(rows).await
    }

    async fn list_by_category_slug(&self, category_slug: &str) -> Result<Vec<ServiceRecord>, ServiceError> {
        let Some(category) = models::service_category::find_by_slug(&self.db, category_slug).await? else {
            return Ok(Vec::new());
        };
        let rows = models::service::list_by_category(&self.db, category.id).await?;
        Ok(rows.into_iter().map(|s| ServiceRecord::from_models(s, &category)).collect())
    }

    async fn list_by_category_id(&self, category_id: Uuid) -> Result<Vec<ServiceRecord>, ServiceError> {
        let Some(category) = self.category_model(category_id).await? else {
            return Ok(Vec::new());
        };
        let rows = models::service::list_by_category(&self.db, category.id).await?;
        Ok(rows.into_iter().map(|s| ServiceRecord::from_models(s, &category)).collect())
    }

    async fn list_page(&self, page: u64, per_page: u64) -> Result<(Vec<ServiceRecord>, u64), ServiceError> {
        let (rows, total) = models::service::list_page(&self.db, page, per_page).await?;
        Ok((self.join_all(rows).await?, total))
    }

    async fn create_service(&self, fields: ServiceFields) -> Result<ServiceRecord, ServiceError> {
        let created = models::service::create(&self.db, fields).await.map_err(slug_err)?;
        self.join_one(created).await
    }

    async fn update_service(&self, id: Uuid, fields: ServiceFields) -> Result<Option<ServiceRecord>, ServiceError> {
        match models::service::update(&self.db, id, fields).await.map_err(slug_err)? {
            Some(s) => Ok(Some(self.join_one(s).await?)),
            None => Ok(None),
        }
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(models::service::hard_delete(&self.db, id).await?)
    }
}
