//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Hosted backend configuration.
    pub backend: BackendConfig,
    /// Dashboard configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Hosted table API configuration.
///
/// Both `url` and `access_key` are mandatory; the process refuses to start
/// without them.
#[derive(Clone, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Access key sent as `apikey` and bearer token.
    pub access_key: String,
    /// Optional schema profile (defaults to the backend's exposed schema).
    #[serde(default)]
    pub schema: Option<String>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("access_key", &"<redacted>")
            .field("schema", &self.schema)
            .finish()
    }
}

impl BackendConfig {
    /// Checks that the URL and access key are usable.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first missing or malformed setting.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err("backend.url is not set".to_string());
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("backend.url must be an http(s) URL, got '{url}'"));
        }
        if self.access_key.trim().is_empty() {
            return Err("backend.access_key is not set".to_string());
        }
        Ok(())
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// IANA time zone used to find "today" and the start of the week.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the backend
    /// settings are missing.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("WAREHOUSE").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.backend.validate().map_err(config::ConfigError::Message)?;

        Ok(app)
    }
}
