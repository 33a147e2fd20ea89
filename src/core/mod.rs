pub mod assignment;
pub mod notifier;
pub mod santa;

pub use crate::domain::model::{
    Assignment, ContactDirectory, Family, NotificationResult, NotificationStatus, Person,
    RunSummary,
};
pub use crate::domain::ports::MessageSender;
pub use crate::utils::error::Result;
