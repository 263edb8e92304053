use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryOrder, PaginatorTrait, Select};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::slug;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub category_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub short_description: String,
    pub image: Option<String>,
    pub is_featured: bool,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub price: Option<Decimal>,
    /// JSON array of feature strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub features: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_category::Entity",
        from = "Column::CategoryId",
        to = "super::service_category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::service_category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default)]
pub struct ServiceFields {
    pub title: String,
    pub slug: String,
    pub category_id: Uuid,
    pub description: String,
    pub short_description: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub price: Option<Decimal>,
    pub features: Vec<String>,
}

fn validate(fields: &ServiceFields) -> Result<(), ModelError> {
    if fields.title.trim().is_empty() {
        return Err(ModelError::Validation("title required".into()));
    }
    if fields.title.chars().count() > 200 {
        return Err(ModelError::Validation("title longer than 200 characters".into()));
    }
    if !slug::is_valid_slug(&fields.slug) {
        return Err(ModelError::Validation(format!("invalid slug: {:?}", fields.slug)));
    }
    if fields.short_description.chars().count() > 255 {
        return Err(ModelError::Validation("short_description longer than 255 characters".into()));
    }
    if fields.features.iter().any(|f| f.chars().count() > 200) {
        return Err(ModelError::Validation("feature longer than 200 characters".into()));
    }
    if let Some(price) = fields.price {
        if price.is_sign_negative() || price.scale() > 2 {
            return Err(ModelError::Validation("price must be positive with at most 2 decimal places".into()));
        }
    }
    Ok(())
}

/// Decode the stored feature list; anything but an array of strings reads as empty.
pub fn features_of(model: &Model) -> Vec<String> {
    serde_json::from_value(model.features.clone()).unwrap_or_default()
}

/// Featured first, then alphabetical by title.
fn ordered() -> Select<Entity> {
    Entity::find()
        .order_by_desc(Column::IsFeatured)
        .order_by_asc(Column::Title)
}

pub async fn find_by_slug(db: &DatabaseConnection, slug: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Slug.eq(slug)).one(db).await?)
}

pub async fn list_featured(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(ordered().filter(Column::IsFeatured.eq(true)).all(db).await?)
}

pub async fn list_by_category(db: &DatabaseConnection, category_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Ok(ordered().filter(Column::CategoryId.eq(category_id)).all(db).await?)
}

/// One page of the full listing plus the total row count. `page` is 0-based.
pub async fn list_page(db: &DatabaseConnection, page: u64, per_page: u64) -> Result<(Vec<Model>, u64), ModelError> {
    let paginator = ordered().paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page).await?;
    Ok((items, total))
}

pub async fn create(db: &DatabaseConnection, fields: ServiceFields) -> Result<Model, ModelError> {
    validate(&fields)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(fields.title),
        slug: Set(fields.slug),
        category_id: Set(fields.category_id),
        description: Set(fields.description),
        short_description: Set(fields.short_description),
        image: Set(fields.image),
        is_featured: Set(fields.is_featured),
        price: Set(fields.price),
        features: Set(serde_json::json!(fields.features)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, fields: ServiceFields) -> Result<Option<Model>, ModelError> {
    validate(&fields)?;
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.title = Set(fields.title);
    am.slug = Set(fields.slug);
    am.category_id = Set(fields.category_id);
    am.description = Set(fields.description);
    am.short_description = Set(fields.short_description);
    am.image = Set(fields.image);
    am.is_featured = Set(fields.is_featured);
    am.price = Set(fields.price);
    am.features = Set(serde_json::json!(fields.features));
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
