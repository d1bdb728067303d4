use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// "compact" or "json"; also settable via `LOG_FORMAT`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            worker_threads: Some(4),
            log_format: default_log_format(),
        }
    }
}

fn default_log_format() -> String { "compact".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_contacts_file")]
    pub contacts_file: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_avatars_dir")]
    pub avatars_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            contacts_file: default_contacts_file(),
            users_file: default_users_file(),
            avatars_dir: default_avatars_dir(),
        }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_contacts_file() -> String { "data/contacts.json".into() }
fn default_users_file() -> String { "data/users.json".into() }
fn default_avatars_dir() -> String { "public/avatars".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

fn default_token_ttl() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_mail_from")]
    pub from: String,
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from: default_mail_from(),
            public_url: default_public_url(),
        }
    }
}

fn default_smtp_port() -> u16 { 587 }
fn default_mail_from() -> String { "noreply@localhost".into() }
fn default_public_url() -> String { "http://localhost:3000".into() }

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
    /// Load config.toml if present, fall back to pure defaults otherwise,
    /// then fill env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.auth.normalize_from_env();
        self.mail.normalize_from_env();
        self.auth.validate()?;
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
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            _ => {}
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.log_format = format;
        }
        self.log_format = self.log_format.trim().to_ascii_lowercase();
        match self.log_format.as_str() {
            "compact" | "json" => {}
            "" => self.log_format = default_log_format(),
            other => return Err(anyhow!("server.log_format must be \"compact\" or \"json\", got {other:?}")),
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!(
                "auth.jwt_secret is empty; provide it in config.toml or the JWT_SECRET env var"
            ));
        }
        if self.token_ttl_secs == 0 {
            return Err(anyhow!("auth.token_ttl_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl MailConfig {
    pub fn normalize_from_env(&mut self) {
        if self.smtp_host.trim().is_empty() {
            if let Ok(host) = std::env::var("SMTP_HOST") {
                self.smtp_host = host;
                self.enabled = true;
            }
        }
        if let Ok(port) = std::env::var("SMTP_PORT") {
            if let Ok(port) = port.parse() {
                self.smtp_port = port;
            }
        }
        if self.smtp_username.is_empty() {
            if let Ok(user) = std::env::var("SMTP_USERNAME") {
                self.smtp_username = user;
            }
        }
        if self.smtp_password.is_empty() {
            if let Ok(pass) = std::env::var("SMTP_PASSWORD") {
                self.smtp_password = pass;
            }
        }
        if let Ok(from) = std::env::var("MAIL_FROM") {
            self.from = from;
        }
        if let Ok(url) = std::env::var("PUBLIC_URL") {
            self.public_url = url;
        }
    }
}
