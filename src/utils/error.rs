use thiserror::Error;

/// 抽籤階段的錯誤，任何一個都會終止整個流程
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("population too small: {size} people, at least 3 are required")]
    PopulationTooSmall { size: usize },

    #[error("malformed family #{index}: {members:?} (a family needs exactly two distinct names)")]
    MalformedFamily { index: usize, members: Vec<String> },

    #[error("duplicate membership: '{person}' belongs to more than one family")]
    DuplicateMembership { person: String },

    #[error("no valid assignment found after {attempts} attempts")]
    RetriesExhausted { attempts: usize },

    #[error("assignment violates constraints: {giver} -> {recipient:?} ({reason})")]
    ConstraintViolated {
        giver: String,
        recipient: Option<String>,
        reason: String,
    },
}

/// 通訊錄查找失敗，只影響單一送禮者
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("missing contact for '{giver}'")]
    MissingContact { giver: String },
}

/// 簡訊服務商回傳的錯誤，只影響單一送禮者
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider rejected message (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Assignment failed: {0}")]
    Assignment(#[from] AssignmentError),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Assignment,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::Assignment(_) => ErrorCategory::Assignment,
            SantaError::HttpClientError(_) => ErrorCategory::Network,
            _ => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SantaError::Assignment(AssignmentError::RetriesExhausted { .. }) => {
                ErrorSeverity::Medium
            }
            SantaError::Assignment(AssignmentError::ConstraintViolated { .. }) => {
                ErrorSeverity::Critical
            }
            SantaError::HttpClientError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 程序結束碼：設定錯誤為 1，抽籤錯誤為 2
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Assignment => 2,
            ErrorCategory::Configuration | ErrorCategory::Network => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SantaError::IoError(e) => format!("Could not read an input file: {}", e),
            SantaError::SerializationError(e) => format!("Family data is not valid JSON: {}", e),
            SantaError::YamlError(e) => format!("Credentials file is not valid YAML: {}", e),
            SantaError::Assignment(e) => format!("Could not draw secret santas: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SantaError::IoError(_) => {
                "Check that family_data.json and settings.yaml exist in the working directory"
            }
            SantaError::SerializationError(_) => {
                "family_data.json needs a 'families' list of name pairs and a 'phonenumbers' map"
            }
            SantaError::YamlError(_) | SantaError::MissingConfigError { .. } => {
                "settings.yaml needs non-empty 'username' and 'token' fields"
            }
            SantaError::ConfigError { .. } | SantaError::InvalidConfigValueError { .. } => {
                "Fix the reported value in santa.toml or on the command line"
            }
            SantaError::Assignment(AssignmentError::RetriesExhausted { .. }) => {
                "Run again, raise assignment.max_attempts, or use the independent strategy"
            }
            SantaError::Assignment(_) => {
                "Every family needs exactly two distinct people and at least two families are needed"
            }
            SantaError::HttpClientError(_) => "Check the TLS setup and provider.base_url",
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
