use crate::utils::env::{is_unresolved_placeholder, substitute_env_vars};
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const DEFAULT_CREDENTIALS_FILE: &str = "settings.yaml";

/// Messaging provider login, read from `settings.yaml`:
///
/// ```yaml
/// username: santa
/// token: ${TEXTMAGIC_TOKEN}
/// ```
#[derive(Clone, Deserialize)]
pub struct Credentials {
    username: String,
    token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;
        Ok(serde_yaml::from_str(&processed)?)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// token 不可出現在 log
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"***")
            .finish()
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("username", &self.username)?;
        validate_non_empty_string("token", &self.token)?;

        for (field, value) in [("username", &self.username), ("token", &self.token)] {
            if is_unresolved_placeholder(value) {
                return Err(SantaError::MissingConfigError {
                    field: format!("{} (environment variable {} is not set)", field, value),
                });
            }
        }
        Ok(())
    }
}
