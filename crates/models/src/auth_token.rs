use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Opaque bearer token; at most one per user (`user_id` is unique).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_key(db: &DatabaseConnection, key: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(key.to_string()).one(db).await?)
}

pub async fn find_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

/// Insert a token row; runs inside the caller's transaction when given one.
pub async fn create<C: ConnectionTrait>(db: &C, user_id: Uuid, key: String) -> Result<Model, ModelError> {
    let am = ActiveModel {
        key: Set(key),
        user_id: Set(user_id),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

/// Return the user's token, inserting `fresh_key` only when none exists.
///
/// A concurrent insert for the same user loses on the unique `user_id`
/// constraint; the winner's row is returned instead.
pub async fn get_or_create(db: &DatabaseConnection, user_id: Uuid, fresh_key: String) -> Result<(Model, bool), ModelError> {
    if let Some(existing) = find_by_user(db, user_id).await? {
        return Ok((existing, false));
    }
    match create(db, user_id, fresh_key).await {
        Ok(created) => Ok((created, true)),
        Err(ModelError::Conflict(_)) => find_by_user(db, user_id)
            .await?
            .map(|m| (m, false))
            .ok_or_else(|| ModelError::Db("token vanished after conflicting insert".into())),
        Err(e) => Err(e),
    }
}

pub async fn delete_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_many().filter(Column::UserId.eq(user_id)).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn delete_created_before(db: &DatabaseConnection, cutoff: DateTime<Utc>) -> Result<u64, ModelError> {
    let cutoff: DateTimeWithTimeZone = cutoff.into();
    let res = Entity::delete_many().filter(Column::CreatedAt.lt(cutoff)).exec(db).await?;
    Ok(res.rows_affected)
}
