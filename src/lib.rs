pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsoleSender, TextMagicClient};
pub use config::{Credentials, FamilyData, SantaConfig};
pub use crate::core::{
    assignment::{AssignmentEngine, AssignmentStrategy},
    notifier::{MessageTemplate, Notifier},
    santa::SantaEngine,
};
pub use domain::model::{
    Assignment, ContactDirectory, Family, NotificationResult, NotificationStatus, Person,
    RunSummary,
};
pub use domain::ports::MessageSender;
pub use utils::error::{AssignmentError, Result, SantaError};
