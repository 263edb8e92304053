use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryOrder};
use sea_orm::sea_query::{Expr, Func};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_credentials::Entity")]
    Credentials,
    #[sea_orm(has_one = "super::auth_token::Entity")]
    AuthToken,
}

impl Related<super::auth_token::Entity> for Entity {
    fn to() -> RelationDef { Relation::AuthToken.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when creating a user row.
#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const NAME_MAX_LEN: usize = 150;

/// Letters, digits and `@ . + - _`, at most 150 characters.
pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::Validation("This field may not be blank.".into()));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(ModelError::Validation("Ensure this field has no more than 150 characters.".into()));
    }
    if !username.chars().all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')) {
        return Err(ModelError::Validation(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.".into(),
        ));
    }
    Ok(())
}

/// First/last name: optional, at most 150 characters.
pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ModelError::Validation("Ensure this field has no more than 150 characters.".into()));
    }
    Ok(())
}

/// Syntactic check only: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::Validation("Enter a valid email address.".into());
    if email.trim().is_empty() {
        return Err(ModelError::Validation("This field may not be blank.".into()));
    }
    if email.len() > EMAIL_MAX_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewUser) -> Result<Model, errors::ModelError> {
    validate_username(&new.username)?;
    validate_email(&new.email)?;
    validate_name(&new.first_name)?;
    validate_name(&new.last_name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(new.username),
        email: Set(new.email),
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        is_staff: Set(new.is_staff),
        is_active: Set(true),
        date_joined: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username)).one(db).await?)
}

/// Case-insensitive lookup, matching how duplicate emails are detected.
pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    let lowered = email.to_lowercase();
    Ok(Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Email))).eq(lowered))
        .one(db)
        .await?)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Username).all(db).await?)
}

/// Hard delete; credentials and token rows cascade at the database level.
pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Partial profile change; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: UserChanges) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    if let Some(username) = changes.username {
        validate_username(&username)?;
        am.username = Set(username);
    }
    if let Some(email) = changes.email {
        validate_email(&email)?;
        am.email = Set(email);
    }
    if let Some(first_name) = changes.first_name {
        validate_name(&first_name)?;
        am.first_name = Set(first_name);
    }
    if let Some(last_name) = changes.last_name {
        validate_name(&last_name)?;
        am.last_name = Set(last_name);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}
