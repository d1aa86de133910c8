use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const OPENWEATHER_API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const PORT_VAR: &str = "PORT";

pub const DEFAULT_PORT: u16 = 3000;

/// Language-model endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

/// Weather provider endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    #[serde(default = "default_openweather_base_url")]
    pub base_url: String,
    /// Unit system sent as `units`, e.g. "metric".
    #[serde(default = "default_units")]
    pub units: String,
    /// Display language sent as `lang`, e.g. "pt_br".
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_openweather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_language() -> String {
    "pt_br".to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_openweather_base_url(),
            units: default_units(),
            language: default_language(),
        }
    }
}

/// Top-level configuration.
///
/// Example TOML:
/// ```toml
/// gemini_api_key = "..."
/// openweather_api_key = "..."
/// port = 3000
///
/// [gemini]
/// model = "gemini-2.5-flash"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub openweather_api_key: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub openweather: OpenWeatherConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            openweather_api_key: None,
            port: DEFAULT_PORT,
            gemini: GeminiConfig::default(),
            openweather: OpenWeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_or_default(&path)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load config from a path the user named. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherchat", "weatherchat")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Override settings from any variable lookup. Blank values are ignored,
    /// an unparseable port is logged and ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(GEMINI_API_KEY_VAR) {
            self.gemini_api_key = Some(key);
        }
        if let Some(key) = non_blank(OPENWEATHER_API_KEY_VAR) {
            self.openweather_api_key = Some(key);
        }
        if let Some(port) = non_blank(PORT_VAR) {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid {PORT_VAR}"),
            }
        }
    }

    /// Names of the secrets that are still unset.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_unset(&self.gemini_api_key) {
            missing.push(GEMINI_API_KEY_VAR);
        }
        if is_unset(&self.openweather_api_key) {
            missing.push(OPENWEATHER_API_KEY_VAR);
        }
        missing
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
