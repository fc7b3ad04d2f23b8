use domain::models::Role;
use serde::Deserialize;
use std::net::SocketAddr;

/// Process configuration, loaded once in `main` and shared behind an `Arc`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound for request bodies; base64 images make this larger than usual.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Prefix of the URLs handed out for uploaded files.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// HMAC secret for session tokens.
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_session_expiry_hours")]
    pub session_expiry_hours: i64,

    /// Clock skew tolerated when checking token expiry.
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,

    /// Tier given to newly registered accounts.
    #[serde(default = "default_registration_role")]
    pub registration_role: String,
}

impl SecurityConfig {
    pub fn registration_role(&self) -> Result<Role, String> {
        let role: Role = self.registration_role.parse()?;
        if role == Role::None {
            return Err("registration_role must be a named tier".to_string());
        }
        Ok(role)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,

    #[serde(default = "default_cookie_path")]
    pub path: String,

    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub secure: bool,

    /// `strict`, `lax` or `none`.
    #[serde(default = "default_same_site")]
    pub same_site: String,

    #[serde(default = "default_cookie_max_age_hours")]
    pub max_age_hours: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            path: default_cookie_path(),
            domain: None,
            secure: false,
            same_site: default_same_site(),
            max_age_hours: default_cookie_max_age_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded images are written under.
    #[serde(default = "default_storage_root")]
    pub root_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_recording_root")]
    pub output_root: String,

    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_root: default_recording_root(),
            ffmpeg_path: default_ffmpeg_path(),
            retention_days: default_retention_days(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    10 * 1_048_576
}
fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_session_expiry_hours() -> i64 {
    shared::jwt::DEFAULT_SESSION_EXPIRY_HOURS
}
fn default_jwt_leeway() -> u64 {
    shared::jwt::DEFAULT_LEEWAY_SECS
}
fn default_registration_role() -> String {
    "master".to_string()
}
fn default_cookie_name() -> String {
    "auth_token".to_string()
}
fn default_cookie_path() -> String {
    "/".to_string()
}
fn default_same_site() -> String {
    "lax".to_string()
}
fn default_cookie_max_age_hours() -> i64 {
    360
}
fn default_storage_root() -> String {
    "./data".to_string()
}
fn default_recording_root() -> String {
    "./recordings".to_string()
}
fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}
fn default_retention_days() -> u32 {
    30
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CM__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("CM")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Builds a configuration from embedded defaults plus overrides, without
    /// touching the filesystem or the environment.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            public_base_url = "http://localhost:8080"

            [database]
            url = ""
            max_connections = 4
            min_connections = 0
            connect_timeout_secs = 1
            idle_timeout_secs = 60

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            jwt_secret = "test-secret-for-sessions"
            session_expiry_hours = 720
            leeway_secs = 30
            registration_role = "master"

            [cookie]
            name = "auth_token"

            [storage]
            root_path = "./data"

            [recording]
            enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "CM__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.security.jwt_secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "CM__SECURITY__JWT_SECRET environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.storage.root_path.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "storage.root_path".to_string(),
            ));
        }

        if self.security.session_expiry_hours <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "session_expiry_hours must be positive".to_string(),
            ));
        }

        self.security
            .registration_role()
            .map_err(ConfigValidationError::InvalidValue)?;

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
