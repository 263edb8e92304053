use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{AuthUser, Credentials, IssuedToken, NewAccount, ProfileUpdate};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    /// Case-insensitive.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError>;
    /// Insert the user, its password hash and its first token together.
    async fn create_user(
        &self,
        account: &NewAccount,
        password_hash: String,
        password_algorithm: String,
        token_key: String,
    ) -> Result<(AuthUser, IssuedToken), AuthError>;
    async fn update_user(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<AuthUser>, AuthError>;
    /// Hard delete; the user's credentials and token go with it.
    async fn delete_user(&self, id: Uuid) -> Result<bool, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;

    /// Existing token for the user, or a new one keyed by `fresh_key`.
    async fn get_or_create_token(&self, user_id: Uuid, fresh_key: String) -> Result<IssuedToken, AuthError>;
    async fn find_token(&self, key: &str) -> Result<Option<IssuedToken>, AuthError>;
    async fn delete_token_for_user(&self, user_id: Uuid) -> Result<bool, AuthError>;
    async fn delete_tokens_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    use crate::errors::FieldErrors;

    #[derive(Default)]
    struct State {
        users: HashMap<Uuid, AuthUser>,
        creds: HashMap<Uuid, Credentials>,    // key: user_id
        tokens: HashMap<String, IssuedToken>, // key: token key
        fail_token_writes: bool,
    }

    #[derive(Default)]
    pub struct MockAuthRepository {
        state: Mutex<State>,
    }

    impl MockAuthRepository {
        /// Flip the administrator flag; stands in for out-of-band provisioning.
        pub async fn set_staff(&self, user_id: Uuid, is_staff: bool) {
            if let Some(u) = self.state.lock().await.users.get_mut(&user_id) {
                u.is_staff = is_staff;
            }
        }

        pub async fn set_active(&self, user_id: Uuid, is_active: bool) {
            if let Some(u) = self.state.lock().await.users.get_mut(&user_id) {
                u.is_active = is_active;
            }
        }

        pub async fn token_count(&self) -> usize {
            self.state.lock().await.tokens.len()
        }

        pub async fn tokens_for(&self, user_id: Uuid) -> Vec<IssuedToken> {
            self.state.lock().await.tokens.values().filter(|t| t.user_id == user_id).cloned().collect()
        }

        /// Make `get_or_create_token` fail as a broken store would.
        pub async fn fail_token_writes(&self, fail: bool) {
            self.state.lock().await.fail_token_writes = fail;
        }

        /// Backdate a token, e.g. to exercise expiry.
        pub async fn set_token_created_at(&self, key: &str, created_at: DateTime<Utc>) {
            if let Some(t) = self.state.lock().await.tokens.get_mut(key) {
                t.created_at = created_at;
            }
        }
    }

    fn taken(state: &State, username: &str, email: &str, except: Option<Uuid>) -> FieldErrors {
        let mut errs = FieldErrors::new();
        let others = || state.users.values().filter(|u| Some(u.id) != except);
        if others().any(|u| u.username == username) {
            errs.add("username", "A user with that username already exists.");
        }
        if others().any(|u| u.email.eq_ignore_ascii_case(email)) {
            errs.add("email", "A user with that email already exists.");
        }
        errs
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let state = self.state.lock().await;
            Ok(state.users.values().find(|u| u.username == username).cloned())
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let state = self.state.lock().await;
            Ok(state.users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
        }

        async fn get_user(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            Ok(self.state.lock().await.users.get(&id).cloned())
        }

        async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError> {
            let mut users: Vec<AuthUser> = self.state.lock().await.users.values().cloned().collect();
            users.sort_by(|a, b| a.username.cmp(&b.username));
            Ok(users)
        }

        async fn create_user(
            &self,
            account: &NewAccount,
            password_hash: String,
            password_algorithm: String,
            token_key: String,
        ) -> Result<(AuthUser, IssuedToken), AuthError> {
            let mut state = self.state.lock().await;
            let errs = taken(&state, &account.username, &account.email, None);
            if !errs.is_empty() {
                return Err(AuthError::Conflict(errs));
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                username: account.username.clone(),
                email: account.email.clone(),
                first_name: account.first_name.clone(),
                last_name: account.last_name.clone(),
                is_staff: account.is_staff,
                is_active: true,
                date_joined: Utc::now(),
            };
            state.users.insert(user.id, user.clone());
            state.creds.insert(user.id, Credentials { user_id: user.id, password_hash, password_algorithm });
            let token = IssuedToken { key: token_key, user_id: user.id, created_at: Utc::now() };
            state.tokens.insert(token.key.clone(), token.clone());
            Ok((user, token))
        }

        async fn update_user(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<AuthUser>, AuthError> {
            let mut state = self.state.lock().await;
            let Some(current) = state.users.get(&id).cloned() else { return Ok(None) };
            let username = update.username.clone().unwrap_or(current.username.clone());
            let email = update.email.clone().unwrap_or(current.email.clone());
            let errs = taken(&state, &username, &email, Some(id));
            if !errs.is_empty() {
                return Err(AuthError::Conflict(errs));
            }
            let updated = AuthUser {
                username,
                email,
                first_name: update.first_name.clone().unwrap_or(current.first_name.clone()),
                last_name: update.last_name.clone().unwrap_or(current.last_name.clone()),
                ..current
            };
            state.users.insert(id, updated.clone());
            Ok(Some(updated))
        }

        async fn delete_user(&self, id: Uuid) -> Result<bool, AuthError> {
            let mut state = self.state.lock().await;
            let existed = state.users.remove(&id).is_some();
            state.creds.remove(&id);
            state.tokens.retain(|_, t| t.user_id != id);
            Ok(existed)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            Ok(self.state.lock().await.creds.get(&user_id).cloned())
        }

        async fn get_or_create_token(&self, user_id: Uuid, fresh_key: String) -> Result<IssuedToken, AuthError> {
            let mut state = self.state.lock().await;
            if state.fail_token_writes {
                return Err(AuthError::Repository("token store unavailable".into()));
            }
            if let Some(existing) = state.tokens.values().find(|t| t.user_id == user_id) {
                return Ok(existing.clone());
            }
            let token = IssuedToken { key: fresh_key, user_id, created_at: Utc::now() };
            state.tokens.insert(token.key.clone(), token.clone());
            Ok(token)
        }

        async fn find_token(&self, key: &str) -> Result<Option<IssuedToken>, AuthError> {
            Ok(self.state.lock().await.tokens.get(key).cloned())
        }

        async fn delete_token_for_user(&self, user_id: Uuid) -> Result<bool, AuthError> {
            let mut state = self.state.lock().await;
            let before = state.tokens.len();
            state.tokens.retain(|_, t| t.user_id != user_id);
            Ok(state.tokens.len() < before)
        }

        async fn delete_tokens_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError> {
            let mut state = self.state.lock().await;
            let before = state.tokens.len();
            state.tokens.retain(|_, t| t.created_at >= cutoff);
            Ok((before - state.tokens.len()) as u64)
        }
    }
}
