#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod family_data;
pub mod santa_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat};
pub use credentials::Credentials;
pub use family_data::FamilyData;
pub use santa_config::SantaConfig;
