use crate::domain::model::{ContactDirectory, Family, Person};
use crate::utils::error::{Result, SantaError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_FAMILY_FILE: &str = "family_data.json";

/// Contents of `family_data.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyData {
    pub families: Vec<Family>,
    pub phonenumbers: ContactDirectory,
}

impl FamilyData {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// People listed in a family but absent from `phonenumbers`.
    pub fn missing_contacts(&self) -> Vec<&Person> {
        self.families
            .iter()
            .flat_map(|family| family.members())
            .filter(|person| self.phonenumbers.contact_for(person).is_err())
            .collect()
    }
}
