use crate::core::assignment::{AssignmentStrategy, DEFAULT_MAX_ATTEMPTS};
use crate::core::notifier::{MessageTemplate, DEFAULT_DELAY, DEFAULT_TEMPLATE};
use crate::utils::env::substitute_env_vars;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{
    validate_contains, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "santa.toml";

/// TextMagic REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://rest.textmagic.com";

/// Optional run settings from `santa.toml`. Every section has defaults, so a
/// missing file behaves like an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SantaConfig {
    pub assignment: AssignmentConfig,
    pub notify: NotifyConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    pub strategy: AssignmentStrategy,
    pub max_attempts: usize,
    pub seed: Option<u64>,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            strategy: AssignmentStrategy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub delay_ms: u64,
    pub template: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl SantaConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 預設的 santa.toml 不存在時使用預設值；明確指定的檔案必須存在
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path == Path::new(DEFAULT_CONFIG_FILE) && !path.exists() {
            tracing::debug!("No run config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn template(&self) -> MessageTemplate {
        MessageTemplate::new(self.notify.template.clone())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.notify.delay_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.provider.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for SantaConfig {
    fn validate(&self) -> Result<()> {
        validate_range(
            "assignment.max_attempts",
            self.assignment.max_attempts,
            1,
            100_000,
        )?;
        validate_non_empty_string("notify.template", &self.notify.template)?;
        validate_contains("notify.template", &self.notify.template, "{recipient}")?;
        validate_url("provider.base_url", &self.provider.base_url)?;

        if let Some(timeout) = self.provider.timeout_seconds {
            validate_range("provider.timeout_seconds", timeout, 1, 600)?;
        }

        Ok(())
    }
}
