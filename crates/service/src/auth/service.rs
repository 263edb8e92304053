use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{
    AccessLevel, AuthContext, AuthUser, IssuedToken, LoginInput, LoginSession, NewAccount, ProfileUpdate, Registration,
    RegisterInput,
};
use super::errors::AuthError;
use super::password::{self, DefaultPasswordPolicy, PasswordValidator, PASSWORD_ALGORITHM};
use super::repository::AuthRepository;
use super::token;
use crate::errors::FieldErrors;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub password_algorithm: String,
    pub min_password_length: usize,
    /// `None` keeps tokens valid until logout.
    pub token_max_age: Option<Duration>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { password_algorithm: PASSWORD_ALGORITHM.into(), min_password_length: 6, token_max_age: None }
    }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self {
        Self {
            password_algorithm: PASSWORD_ALGORITHM.into(),
            min_password_length: c.min_password_length,
            token_max_age: c.token_max_age_secs.and_then(token_max_age),
        }
    }
}

/// Unvalidated configs are clamped to the largest accepted age rather than wrapping.
fn token_max_age(secs: u64) -> Option<Duration> {
    let secs = i64::try_from(secs.min(configs::MAX_TOKEN_AGE_SECS)).ok()?;
    Duration::try_seconds(secs)
}

/// Auth business service independent of web framework
pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    passwords: Arc<dyn PasswordValidator>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, cfg: AuthConfig) -> Self {
        let passwords = Arc::new(DefaultPasswordPolicy { min_length: cfg.min_password_length });
        Self { repo, passwords, cfg }
    }

    /// Replace the default password policy.
    pub fn with_password_validator(mut self, validator: Arc<dyn PasswordValidator>) -> Self {
        self.passwords = validator;
        self
    }

    fn is_expired(&self, token: &IssuedToken) -> bool {
        match self.cfg.token_max_age {
            Some(max_age) => token
                .created_at
                .checked_add_signed(max_age)
                .is_some_and(|expires_at| expires_at <= Utc::now()),
            None => false,
        }
    }

    /// The user's token, creating one if absent (or replacing an expired one).
    async fn issue_token(&self, user_id: Uuid) -> Result<IssuedToken, AuthError> {
        let issued = self.repo.get_or_create_token(user_id, token::generate_key()).await?;
        if !self.is_expired(&issued) {
            return Ok(issued);
        }
        debug!(user_id = %user_id, "replacing expired token");
        self.repo.delete_token_for_user(user_id).await?;
        self.repo.get_or_create_token(user_id, token::generate_key()).await
    }

    async fn check_taken(&self, username: Option<&str>, email: Option<&str>, except: Option<Uuid>) -> Result<(), AuthError> {
        let mut errs = FieldErrors::new();
        if let Some(username) = username {
            if let Some(u) = self.repo.find_user_by_username(username).await? {
                if Some(u.id) != except {
                    errs.add("username", "A user with that username already exists.");
                }
            }
        }
        if let Some(email) = email {
            if let Some(u) = self.repo.find_user_by_email(email).await? {
                if Some(u.id) != except {
                    errs.add("email", "A user with that email already exists.");
                }
            }
        }
        errs.into_result().map_err(AuthError::Conflict)
    }

    /// Register a new user and issue its token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
    /// let input = RegisterInput {
    ///     username: "alice".into(),
    ///     email: "alice@x.com".into(),
    ///     password: "pw12345".into(),
    ///     first_name: String::new(),
    ///     last_name: String::new(),
    /// };
    /// let reg = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(reg.user.username, "alice");
    /// assert_eq!(reg.token.len(), 40);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<Registration, AuthError> {
        let mut errs = FieldErrors::new();
        if let Err(e) = models::user::validate_username(&input.username) {
            errs.add("username", e.detail());
        }
        if let Err(e) = models::user::validate_email(&input.email) {
            errs.add("email", e.detail());
        }
        check_names(&mut errs, Some(&input.first_name), Some(&input.last_name));
        if input.password.is_empty() {
            errs.add("password", "This field may not be blank.");
        } else {
            for reason in self.passwords.validate(&input.password, &input.username, &input.email) {
                errs.add("password", reason);
            }
        }
        errs.into_result().map_err(AuthError::Validation)?;

        self.check_taken(Some(&input.username), Some(&input.email), None).await?;

        let hash = password::hash_password(&input.password)?;
        let account = NewAccount {
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            is_staff: false,
        };
        let (user, issued) = self.repo
            .create_user(&account, hash, self.cfg.password_algorithm.clone(), token::generate_key())
            .await?;
        info!(user_id = %user.id, username = %user.username, "user_registered");
        Ok(Registration { token: issued.key, user })
    }

    /// Verify credentials and hand out the user's single token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
    /// let reg = tokio_test::block_on(svc.register(RegisterInput {
    ///     username: "bob".into(), email: "bob@x.com".into(), password: "Passw0rd".into(),
    ///     first_name: String::new(), last_name: String::new(),
    /// })).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "bob".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.token, reg.token);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginSession, AuthError> {
        let user = self.repo
            .find_user_by_username(&input.username)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !password::verify_password(&input.password, &cred.password_hash)? {
            warn!(user_id = %user.id, "login_rejected");
            return Err(AuthError::Unauthorized);
        }

        let issued = self.issue_token(user.id).await?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(LoginSession { token: issued.key, user_id: user.id, username: user.username, email: user.email })
    }

    /// Resolve a presented token key to its user.
    pub async fn authenticate(&self, key: &str) -> Result<AuthContext, AuthError> {
        if !token::looks_like_key(key) {
            return Err(AuthError::Unauthorized);
        }
        let issued = self.repo.find_token(key).await?.ok_or(AuthError::Unauthorized)?;
        if self.is_expired(&issued) {
            debug!(user_id = %issued.user_id, "expired token presented");
            return Err(AuthError::Unauthorized);
        }
        let user = self.repo
            .get_user(issued.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::Unauthorized)?;
        Ok(AuthContext { user, token: issued.key })
    }

    pub fn authorize(&self, ctx: &AuthContext, level: AccessLevel) -> Result<(), AuthError> {
        if level.permits(&ctx.user) { Ok(()) } else { Err(AuthError::Forbidden) }
    }

    pub async fn profile(&self, ctx: &AuthContext) -> Result<AuthUser, AuthError> {
        self.repo.get_user(ctx.user.id).await?.ok_or(AuthError::NotFound)
    }

    #[instrument(skip(self, ctx, update), fields(user_id = %ctx.user.id))]
    pub async fn update_profile(&self, ctx: &AuthContext, update: ProfileUpdate) -> Result<AuthUser, AuthError> {
        let mut errs = FieldErrors::new();
        if let Some(username) = &update.username {
            if let Err(e) = models::user::validate_username(username) {
                errs.add("username", e.detail());
            }
        }
        if let Some(email) = &update.email {
            if let Err(e) = models::user::validate_email(email) {
                errs.add("email", e.detail());
            }
        }
        check_names(&mut errs, update.first_name.as_deref(), update.last_name.as_deref());
        errs.into_result().map_err(AuthError::Validation)?;

        self.check_taken(update.username.as_deref(), update.email.as_deref(), Some(ctx.user.id)).await?;

        let updated = self.repo.update_user(ctx.user.id, &update).await?.ok_or(AuthError::NotFound)?;
        info!(user_id = %updated.id, "profile_updated");
        Ok(updated)
    }

    pub async fn list_users(&self, ctx: &AuthContext) -> Result<Vec<AuthUser>, AuthError> {
        self.authorize(ctx, AccessLevel::Administrator)?;
        self.repo.list_users().await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.user.id))]
    pub async fn delete_user(&self, ctx: &AuthContext, target: Uuid) -> Result<(), AuthError> {
        self.authorize(ctx, AccessLevel::Administrator)?;
        if !self.repo.delete_user(target).await? {
            return Err(AuthError::NotFound);
        }
        info!(user_id = %target, "user_deleted");
        Ok(())
    }

    /// Delete the caller's token. Reaching this without one is a fault.
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user.id))]
    pub async fn logout(&self, ctx: &AuthContext) -> Result<(), AuthError> {
        if !self.repo.delete_token_for_user(ctx.user.id).await? {
            return Err(AuthError::TokenMissing);
        }
        info!("user_logged_out");
        Ok(())
    }

    /// Remove tokens older than the configured max age; no-op without one.
    pub async fn sweep_expired_tokens(&self) -> Result<u64, AuthError> {
        let Some(max_age) = self.cfg.token_max_age else {
            debug!("token max age unset; nothing to sweep");
            return Ok(0);
        };
        let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
            return Ok(0);
        };
        let removed = self.repo.delete_tokens_created_before(cutoff).await?;
        info!(removed, "expired_tokens_swept");
        Ok(removed)
    }
}

fn check_names(errs: &mut FieldErrors, first_name: Option<&str>, last_name: Option<&str>) {
    for (field, value) in [("first_name", first_name), ("last_name", last_name)] {
        if let Some(Err(e)) = value.map(models::user::validate_name) {
            errs.add(field, e.detail());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc_with(cfg: AuthConfig) -> (AuthService, Arc<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        (AuthService::new(repo.clone(), cfg), repo)
    }

    fn alice() -> RegisterInput {
        RegisterInput {
            username: "alice".into(),
            email: "alice@x.com".into(),
            password: "pw12345".into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    fn login(username: &str, password: &str) -> LoginInput {
        LoginInput { username: username.into(), password: password.into() }
    }

    #[tokio::test]
    async fn register_then_login_returns_same_token() {
        let (svc, repo) = svc_with(AuthConfig::default());
        let reg = svc.register(alice()).await.unwrap();
        assert_eq!(repo.tokens_for(reg.user.id).await.len(), 1);

        let session = svc.login(login("alice", "pw12345")).await.unwrap();
        assert_eq!(session.token, reg.token);
        assert_eq!(session.user_id, reg.user.id);
        assert_eq!(repo.token_count().await, 1);
    }

    #[tokio::test]
    async fn wrong_password_never_creates_token() {
        let (svc, repo) = svc_with(AuthConfig::default());
        let reg = svc.register(alice()).await.unwrap();
        svc.logout(&svc.authenticate(&reg.token).await.unwrap()).await.unwrap();

        let err = svc.login(login("alice", "nope-nope")).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        assert_eq!(repo.token_count().await, 0);

        let err = svc.login(login("nobody", "pw12345")).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn logout_revokes_token() {
        let (svc, _) = svc_with(AuthConfig::default());
        let reg = svc.register(alice()).await.unwrap();
        let ctx = svc.authenticate(&reg.token).await.unwrap();
        svc.logout(&ctx).await.unwrap();
        assert!(matches!(svc.authenticate(&reg.token).await, Err(AuthError::Unauthorized)));
        assert!(matches!(svc.logout(&ctx).await, Err(AuthError::TokenMissing)));

        // a fresh login issues a new key
        let session = svc.login(login("alice", "pw12345")).await.unwrap();
        assert_ne!(session.token, reg.token);
    }

    #[tokio::test]
    async fn register_reports_field_errors() {
        let (svc, _) = svc_with(AuthConfig::default());
        let input = RegisterInput { username: "bad name!".into(), email: "nope".into(), password: "123".into(), ..alice() };
        match svc.register(input).await {
            Err(AuthError::Validation(errs)) => {
                assert!(errs.contains("username"));
                assert!(errs.contains("email"));
                assert_eq!(errs.get("password").map(|m| m.len()), Some(2));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_issues_token_with_the_account() {
        let (svc, repo) = svc_with(AuthConfig::default());
        // a separate token write would fail here; registration must not depend on it
        repo.fail_token_writes(true).await;
        let reg = svc.register(alice()).await.unwrap();
        assert_eq!(repo.tokens_for(reg.user.id).await.len(), 1);
        assert_eq!(svc.authenticate(&reg.token).await.unwrap().user.id, reg.user.id);
    }

    #[tokio::test]
    async fn overlong_names_are_field_errors() {
        let (svc, repo) = svc_with(AuthConfig::default());
        let long = "x".repeat(151);
        let input = RegisterInput { first_name: long.clone(), last_name: long.clone(), ..alice() };
        match svc.register(input).await {
            Err(AuthError::Validation(errs)) => {
                assert!(errs.contains("first_name"));
                assert!(errs.contains("last_name"));
                assert!(!errs.contains("username"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(repo.token_count().await, 0);

        let reg = svc.register(RegisterInput { first_name: "x".repeat(150), ..alice() }).await.unwrap();
        let ctx = svc.authenticate(&reg.token).await.unwrap();
        let update = ProfileUpdate { last_name: Some(long), ..Default::default() };
        match svc.update_profile(&ctx, update).await {
            Err(AuthError::Validation(errs)) => assert!(errs.contains("last_name")),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(svc.profile(&ctx).await.unwrap().last_name, "");
    }

    #[tokio::test]
    async fn duplicate_username_and_email_conflict() {
        let (svc, _) = svc_with(AuthConfig::default());
        svc.register(alice()).await.unwrap();
        let dup = RegisterInput { email: "ALICE@x.com".into(), ..alice() };
        match svc.register(dup).await {
            Err(AuthError::Conflict(errs)) => {
                assert!(errs.contains("username"));
                assert!(errs.contains("email"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn inactive_user_cannot_login_or_authenticate() {
        let (svc, repo) = svc_with(AuthConfig::default());
        let reg = svc.register(alice()).await.unwrap();
        repo.set_active(reg.user.id, false).await;
        assert!(matches!(svc.login(login("alice", "pw12345")).await, Err(AuthError::Unauthorized)));
        assert!(matches!(svc.authenticate(&reg.token).await, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn admin_operations_require_staff() {
        let (svc, repo) = svc_with(AuthConfig::default());
        let admin = svc.register(alice()).await.unwrap();
        let bob = svc
            .register(RegisterInput { username: "bob".into(), email: "bob@x.com".into(), ..alice() })
            .await
            .unwrap();

        let bob_ctx = svc.authenticate(&bob.token).await.unwrap();
        assert!(matches!(svc.list_users(&bob_ctx).await, Err(AuthError::Forbidden)));

        repo.set_staff(admin.user.id, true).await;
        let admin_ctx = svc.authenticate(&admin.token).await.unwrap();
        assert_eq!(svc.list_users(&admin_ctx).await.unwrap().len(), 2);

        svc.delete_user(&admin_ctx, bob.user.id).await.unwrap();
        assert!(matches!(svc.authenticate(&bob.token).await, Err(AuthError::Unauthorized)));
        assert!(matches!(svc.delete_user(&admin_ctx, bob.user.id).await, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn update_profile_is_partial_and_checks_uniqueness() {
        let (svc, _) = svc_with(AuthConfig::default());
        let a = svc.register(alice()).await.unwrap();
        svc.register(RegisterInput { username: "bob".into(), email: "bob@x.com".into(), ..alice() })
            .await
            .unwrap();
        let ctx = svc.authenticate(&a.token).await.unwrap();

        let updated = svc
            .update_profile(&ctx, ProfileUpdate { first_name: Some("Alice".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Alice");
        assert_eq!(updated.email, "alice@x.com");

        // keeping one's own email is fine
        svc.update_profile(&ctx, ProfileUpdate { email: Some("alice@x.com".into()), ..Default::default() })
            .await
            .unwrap();

        let err = svc
            .update_profile(&ctx, ProfileUpdate { username: Some("bob".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected_swept_and_reissued() {
        let cfg = AuthConfig { token_max_age: Some(Duration::hours(1)), ..AuthConfig::default() };
        let (svc, repo) = svc_with(cfg);
        let reg = svc.register(alice()).await.unwrap();
        repo.set_token_created_at(&reg.token, Utc::now() - Duration::hours(2)).await;

        assert!(matches!(svc.authenticate(&reg.token).await, Err(AuthError::Unauthorized)));

        let session = svc.login(login("alice", "pw12345")).await.unwrap();
        assert_ne!(session.token, reg.token);
        assert_eq!(repo.token_count().await, 1);

        repo.set_token_created_at(&session.token, Utc::now() - Duration::hours(3)).await;
        assert_eq!(svc.sweep_expired_tokens().await.unwrap(), 1);
        assert_eq!(repo.token_count().await, 0);
    }

    #[tokio::test]
    async fn oversized_max_age_never_expires_fresh_tokens() {
        let from_config = AuthConfig::from(&configs::AuthConfig { token_max_age_secs: Some(u64::MAX), ..Default::default() });
        assert_eq!(from_config.token_max_age, token_max_age(configs::MAX_TOKEN_AGE_SECS));

        // past the representable date range: neither the gate nor the sweep may panic
        let far = AuthConfig { token_max_age: Some(Duration::days(365 * 1_000_000)), ..AuthConfig::default() };
        for cfg in [from_config, far] {
            let (svc, repo) = svc_with(cfg);
            let reg = svc.register(alice()).await.unwrap();
            assert!(svc.authenticate(&reg.token).await.is_ok());
            assert_eq!(svc.sweep_expired_tokens().await.unwrap(), 0);
            assert_eq!(repo.token_count().await, 1);
        }
    }

    #[tokio::test]
    async fn sweep_without_max_age_is_noop() {
        let (svc, repo) = svc_with(AuthConfig::default());
        svc.register(alice()).await.unwrap();
        assert_eq!(svc.sweep_expired_tokens().await.unwrap(), 0);
        assert_eq!(repo.token_count().await, 1);
    }

    #[tokio::test]
    async fn malformed_key_is_unauthorized() {
        let (svc, _) = svc_with(AuthConfig::default());
        assert!(matches!(svc.authenticate("not-a-token").await, Err(AuthError::Unauthorized)));
    }
}
