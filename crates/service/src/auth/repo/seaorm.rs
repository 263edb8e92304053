use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials, IssuedToken, NewAccount, ProfileUpdate};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn repo_err(e: sea_orm::DbErr) -> AuthError {
    AuthError::Repository(e.to_string())
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(models::user::find_by_username(&self.db, username).await?.map(AuthUser::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(models::user::find_by_email(&self.db, email).await?.map(AuthUser::from))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        use sea_orm::EntityTrait;
        let found = models::user::Entity::find_by_id(id).one(&self.db).await.map_err(repo_err)?;
        Ok(found.map(AuthUser::from))
    }

    async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError> {
        Ok(models::user::list(&self.db).await?.into_iter().map(AuthUser::from).collect())
    }

    async fn create_user(
        &self,
        account: &NewAccount,
        password_hash: String,
        password_algorithm: String,
        token_key: String,
    ) -> Result<(AuthUser, IssuedToken), AuthError> {
        // user, credentials and first token commit together or not at all
        let txn = self.db.begin().await.map_err(repo_err)?;
        let created = models::user::create(
            &txn,
            models::user::NewUser {
                username: account.username.clone(),
                email: account.email.clone(),
                first_name: account.first_name.clone(),
                last_name: account.last_name.clone(),
                is_staff: account.is_staff,
            },
        )
        .await?;
        models::user_credentials::upsert_password(&txn, created.id, password_hash, &password_algorithm).await?;
        let token = models::auth_token::create(&txn, created.id, token_key).await?;
        txn.commit().await.map_err(repo_err)?;
        Ok((AuthUser::from(created), IssuedToken::from(token)))
    }

    async fn update_user(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<AuthUser>, AuthError> {
        let changes = models::user::UserChanges {
            username: update.username.clone(),
            email: update.email.clone(),
            first_name: update.first_name.clone(),
            last_name: update.last_name.clone(),
        };
        Ok(models::user::update(&self.db, id, changes).await?.map(AuthUser::from))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AuthError> {
        Ok(models::user::hard_delete(&self.db, id).await?)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn get_or_create_token(&self, user_id: Uuid, fresh_key: String) -> Result<IssuedToken, AuthError> {
        let (token, _created) = models::auth_token::get_or_create(&self.db, user_id, fresh_key).await?;
        Ok(IssuedToken::from(token))
    }

    async fn find_token(&self, key: &str) -> Result<Option<IssuedToken>, AuthError> {
        Ok(models::auth_token::find_by_key(&self.db, key).await?.map(IssuedToken::from))
    }

    async fn delete_token_for_user(&self, user_id: Uuid) -> Result<bool, AuthError> {
        Ok(models::auth_token::delete_for_user(&self.db, user_id).await?)
    }

    async fn delete_tokens_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError> {
        Ok(models::auth_token::delete_created_before(&self.db, cutoff).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::generate_key;
    use crate::test_support::{get_db, unique};

    fn account(name: &str) -> NewAccount {
        NewAccount {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
        }
    }

    #[tokio::test]
    async fn create_user_stores_credentials_and_single_token() {
        let Some(db) = get_db().await else { return };
        let repo = SeaOrmAuthRepository::new(db);
        let name = unique("u");
        let (user, first) = repo
            .create_user(&account(&name), "$argon2id$fake".into(), "argon2".into(), generate_key())
            .await
            .unwrap();
        assert!(repo.get_credentials(user.id).await.unwrap().is_some());
        assert_eq!(repo.find_token(&first.key).await.unwrap().map(|t| t.user_id), Some(user.id));

        let again = repo.get_or_create_token(user.id, generate_key()).await.unwrap();
        assert_eq!(first.key, again.key);

        let upper = format!("{}@EXAMPLE.com", name.to_uppercase());
        assert_eq!(repo.find_user_by_email(&upper).await.unwrap().map(|u| u.id), Some(user.id));

        assert!(repo.delete_user(user.id).await.unwrap());
        assert!(repo.find_token(&first.key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let Some(db) = get_db().await else { return };
        let repo = SeaOrmAuthRepository::new(db);
        let name = unique("dup");
        repo.create_user(&account(&name), "$argon2id$fake".into(), "argon2".into(), generate_key()).await.unwrap();
        let mut again = account(&name);
        again.email = format!("{}@example.org", unique("other"));
        let key = generate_key();
        let err = repo.create_user(&again, "$argon2id$fake".into(), "argon2".into(), key.clone()).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
        // the rolled-back transaction leaves no token behind
        assert!(repo.find_token(&key).await.unwrap().is_none());
    }
}
