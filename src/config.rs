use chrono_tz::Tz;
use rocket::figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/api/v1";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub api: ApiConfig,
    pub cors: CorsConfig,
    pub attendance: AttendanceConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_path: String,
    pub enable_swagger: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Attendance-specific knobs: how QR codes are drawn, how many notifications the feed
/// carries, and which timezone defines "today" for dates and schedules.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AttendanceConfig {
    pub timezone: String,
    pub feed_limit: i64,
    pub class_duration_minutes: i64,
    pub qr: QrConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QrConfig {
    pub size: u32,
    pub dark_color: String,
    pub light_color: String,
    pub quiet_zone: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/cadence".to_string(),
            max_connections: 16,
            min_connections: 2,
            acquire_timeout: 5,
            run_migrations: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_API_BASE_PATH.to_string(),
            enable_swagger: true,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
            allow_credentials: true,
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            feed_limit: 10,
            class_duration_minutes: 60,
            qr: QrConfig::default(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            size: 400,
            dark_color: "#6366F1".to_string(),
            light_color: "#FFFFFF".to_string(),
            quiet_zone: true,
        }
    }
}

impl AttendanceConfig {
    /// Resolve the configured IANA timezone, falling back to UTC for unknown names.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(timezone = %self.timezone, "unknown timezone, falling back to UTC");
                Tz::UTC
            }
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Built-in defaults
    /// 2. Cadence.toml (if present)
    /// 3. Environment variables prefixed with CADENCE_ (nested keys split on `__`,
    ///    e.g. CADENCE_DATABASE__URL)
    /// 4. DATABASE_URL
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("Cadence.toml").nested())
            .merge(Env::prefixed("CADENCE_").split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()))
            .extract()
    }
}
