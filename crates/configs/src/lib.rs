use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub backup: BackupConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Catalog cache policy. Every cached entity shares the same TTL.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_cache_ttl() -> u64 { 3600 }
fn default_cache_capacity() -> u64 { 10_000 }
fn default_true() -> bool { true }

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: default_cache_ttl(), max_capacity: default_cache_capacity(), enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Unset means tokens never expire.
    #[serde(default)]
    pub token_max_age_secs: Option<u64>,
}

fn default_min_password_length() -> usize { 6 }

/// Upper bound for `auth.token_max_age_secs` (100 years).
pub const MAX_TOKEN_AGE_SECS: u64 = 100 * 365 * 24 * 60 * 60;

impl Default for AuthConfig {
    fn default() -> Self {
        Self { min_password_length: default_min_password_length(), token_max_age_secs: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_from_email")]
    pub from_email: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

fn default_admin_email() -> String { "admin@example.com".into() }
fn default_from_email() -> String { "noreply@example.com".into() }

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { admin_email: default_admin_email(), from_email: default_from_email(), webhook_url: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_backup_dir")]
    pub dir: String,
    #[serde(default = "default_pg_dump")]
    pub pg_dump: String,
}

fn default_backup_dir() -> String { "backups".into() }
fn default_pg_dump() -> String { "pg_dump".into() }

impl Default for BackupConfig {
    fn default() -> Self {
        Self { dir: default_backup_dir(), pg_dump: default_pg_dump() }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file if present, otherwise defaults; environment fallbacks are
    /// applied either way before validation.
    pub fn load_or_default() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // DATABASE_URL fills in a missing database.url
        self.database.normalize_from_env();
        self.database.validate()?;
        self.cache.validate()?;
        self.auth.validate()?;
        self.notification.normalize_from_env();
        self.notification.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ttl_secs == 0 {
            return Err(anyhow!("cache.ttl_secs must be >= 1"));
        }
        if self.max_capacity == 0 {
            return Err(anyhow!("cache.max_capacity must be >= 1"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_password_length == 0 {
            return Err(anyhow!("auth.min_password_length must be >= 1"));
        }
        match self.token_max_age_secs {
            Some(0) => return Err(anyhow!("auth.token_max_age_secs must be >= 1 when set")),
            Some(s) if s > MAX_TOKEN_AGE_SECS => {
                return Err(anyhow!("auth.token_max_age_secs must be <= {MAX_TOKEN_AGE_SECS}"))
            }
            _ => {}
        }
        Ok(())
    }
}

impl NotificationConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(v) = std::env::var("ADMIN_EMAIL") {
            if !v.trim().is_empty() { self.admin_email = v; }
        }
        if let Ok(v) = std::env::var("DEFAULT_FROM_EMAIL") {
            if !v.trim().is_empty() { self.from_email = v; }
        }
        if self.webhook_url.as_deref().map(str::trim).unwrap_or("").is_empty() {
            self.webhook_url = std::env::var("NOTIFY_WEBHOOK_URL").ok().filter(|v| !v.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, addr) in [("admin_email", &self.admin_email), ("from_email", &self.from_email)] {
            let ok = addr
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !ok {
                return Err(anyhow!("notification.{name} is not a valid address: {addr}"));
            }
        }
        if let Some(url) = &self.webhook_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("notification.webhook_url must be an http(s) URL"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> AppConfig {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn sections_default_when_missing() {
        let cfg = parse("[database]\nurl = \"postgres://u:p@localhost/db\"\n");
        assert_eq!(cfg.cache.ttl_secs, 3600);
        assert_eq!(cfg.auth.min_password_length, 6);
        assert!(cfg.auth.token_max_age_secs.is_none());
        assert_eq!(cfg.backup.dir, "backups");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn rejects_non_postgres_url() {
        let mut cfg = parse("[database]\nurl = \"mysql://localhost/db\"\n");
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_zero_ttl() {
        let mut cfg = parse("[database]\nurl = \"postgres://localhost/db\"\n[cache]\nttl_secs = 0\n");
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn token_max_age_is_bounded() {
        let ok = AuthConfig { token_max_age_secs: Some(MAX_TOKEN_AGE_SECS), ..Default::default() };
        assert!(ok.validate().is_ok());
        for bad in [0, MAX_TOKEN_AGE_SECS + 1, u64::MAX] {
            let cfg = AuthConfig { token_max_age_secs: Some(bad), ..Default::default() };
            assert!(cfg.validate().is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn rejects_bad_admin_address() {
        let cfg = NotificationConfig { admin_email: "nobody".into(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_non_http_webhook() {
        let cfg = NotificationConfig { webhook_url: Some("ftp://x".into()), ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}
