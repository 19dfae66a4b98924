use crate::core::cities::DEFAULT_CITY_TTL;
use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "eatyfy.toml";
pub const DEFAULT_API_BASE_URL: &str = "https://eatyfy-backend-production.up.railway.app/api";
pub const DEFAULT_CITIES_ENDPOINT: &str = "http://localhost:8084/api/cities/list";
pub const DEFAULT_SESSION_DIR: &str = ".eatyfy";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cities: CitiesConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitiesConfig {
    #[serde(default = "default_cities_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_dir")]
    pub directory: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_cities_endpoint() -> String {
    DEFAULT_CITIES_ENDPOINT.to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_CITY_TTL.as_secs()
}

fn default_session_dir() -> String {
    DEFAULT_SESSION_DIR.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for CitiesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_cities_endpoint(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            directory: default_session_dir(),
        }
    }
}

impl TomlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// An explicit path must exist. Without one, `eatyfy.toml` in the working
    /// directory is used when present, otherwise built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("api.base_url", &self.api.base_url)?;
        crate::utils::validation::validate_url("cities.endpoint", &self.cities.endpoint)?;
        crate::utils::validation::validate_path("session.directory", &self.session.directory)?;

        if let Some(timeout) = self.api.timeout_seconds {
            crate::utils::validation::validate_positive_number(
                "api.timeout_seconds",
                timeout,
                1,
            )?;
        }
        crate::utils::validation::validate_positive_number(
            "cities.cache_ttl_seconds",
            self.cities.cache_ttl_seconds,
            1,
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.api.timeout_seconds.map(Duration::from_secs)
    }

    fn cities_endpoint(&self) -> &str {
        &self.cities.endpoint
    }

    fn city_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cities.cache_ttl_seconds)
    }

    fn session_dir(&self) -> &str {
        &self.session.directory
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
