use crate::config::credentials::DEFAULT_CREDENTIALS_FILE;
use crate::config::family_data::DEFAULT_FAMILY_FILE;
use crate::config::santa_config::{SantaConfig, DEFAULT_CONFIG_FILE};
use crate::core::assignment::AssignmentStrategy;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw secret santas within families and text everyone their recipient")]
pub struct CliConfig {
    /// Family and phone number data (JSON)
    #[arg(long, default_value = DEFAULT_FAMILY_FILE)]
    pub families: String,

    /// Messaging provider credentials (YAML)
    #[arg(long, default_value = DEFAULT_CREDENTIALS_FILE)]
    pub credentials: String,

    /// Optional run settings (TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Draw and print the result without sending any messages
    #[arg(long)]
    pub dry_run: bool,

    /// Only print givers of these recipients in a dry run
    #[arg(long, value_delimiter = ',')]
    pub reveal: Vec<String>,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum)]
    pub strategy: Option<AssignmentStrategy>,

    /// Pause between messages in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Exit non-zero when any message could not be delivered
    #[arg(long)]
    pub strict_delivery: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// 命令列參數優先於 santa.toml
    pub fn apply_overrides(&self, config: &mut SantaConfig) {
        if let Some(seed) = self.seed {
            config.assignment.seed = Some(seed);
            tracing::info!("🔧 Seed overridden to: {}", seed);
        }
        if let Some(strategy) = self.strategy {
            config.assignment.strategy = strategy;
            tracing::info!("🔧 Strategy overridden to: {:?}", strategy);
        }
        if let Some(delay_ms) = self.delay_ms {
            config.notify.delay_ms = delay_ms;
        }
    }
}
