use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryOrder};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::slug;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service::Entity")]
    Service,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default)]
pub struct CategoryFields {
    pub name: String,
    pub slug: String,
    pub description: String,
}

fn validate(fields: &CategoryFields) -> Result<(), ModelError> {
    if fields.name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if fields.name.chars().count() > 100 {
        return Err(ModelError::Validation("name longer than 100 characters".into()));
    }
    if !slug::is_valid_slug(&fields.slug) {
        return Err(ModelError::Validation(format!("invalid slug: {:?}", fields.slug)));
    }
    Ok(())
}

pub async fn list_ordered(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Name).all(db).await?)
}

pub async fn find_by_slug(db: &DatabaseConnection, slug: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Slug.eq(slug)).one(db).await?)
}

pub async fn create(db: &DatabaseConnection, fields: CategoryFields) -> Result<Model, ModelError> {
    validate(&fields)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(fields.name),
        slug: Set(fields.slug),
        description: Set(fields.description),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, fields: CategoryFields) -> Result<Option<Model>, ModelError> {
    validate(&fields)?;
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.name = Set(fields.name);
    am.slug = Set(fields.slug);
    am.description = Set(fields.description);
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}

/// Deletes the category; its services go with it through the FK cascade.
pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
