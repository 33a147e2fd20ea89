use crate::utils::error::{DirectoryError, ProviderError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A participant, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Person(String);

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Person {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// An exclusion pair as read from input. Well-formedness (exactly two
/// distinct members) is checked when a `Population` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Family {
    members: Vec<Person>,
}

impl Family {
    pub fn new(members: Vec<Person>) -> Self {
        Self { members }
    }

    pub fn pair(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(vec![Person::new(a), Person::new(b)])
    }

    pub fn members(&self) -> &[Person] {
        &self.members
    }
}

/// Giver name -> phone number. Numbers are opaque and only checked by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactDirectory {
    entries: HashMap<Person, String>,
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, person: impl Into<String>, address: impl Into<String>) {
        self.entries.insert(Person::new(person), address.into());
    }

    pub fn contact_for(&self, giver: &Person) -> Result<&str, DirectoryError> {
        self.entries
            .get(giver)
            .map(String::as_str)
            .ok_or_else(|| DirectoryError::MissingContact {
                giver: giver.name().to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContactDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut directory = Self::new();
        for (person, address) in iter {
            directory.insert(person, address);
        }
        directory
    }
}

/// Giver -> recipient pairs, kept in population order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pairs: Vec<(Person, Person)>,
}

impl Assignment {
    pub fn from_pairs(pairs: Vec<(Person, Person)>) -> Self {
        Self { pairs }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Person, &Person)> {
        self.pairs.iter().map(|(giver, recipient)| (giver, recipient))
    }

    pub fn recipient_of(&self, giver: &Person) -> Option<&Person> {
        self.pairs
            .iter()
            .find(|(g, _)| g == giver)
            .map(|(_, recipient)| recipient)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationFailure {
    Directory(DirectoryError),
    Provider(ProviderError),
}

impl fmt::Display for NotificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationFailure::Directory(e) => write!(f, "{}", e),
            NotificationFailure::Provider(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent { message_id: Option<String> },
    Failed(NotificationFailure),
}

#[derive(Debug, Clone)]
pub struct NotificationResult {
    pub giver: Person,
    pub recipient: Person,
    pub status: NotificationStatus,
    pub attempted_at: DateTime<Utc>,
}

impl NotificationResult {
    pub fn is_sent(&self) -> bool {
        matches!(self.status, NotificationStatus::Sent { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<NotificationResult>,
}

impl RunSummary {
    pub fn new(results: Vec<NotificationResult>) -> Self {
        Self { results }
    }

    pub fn sent(&self) -> usize {
        self.results.iter().filter(|r| r.is_sent()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.sent()
    }

    pub fn failures(&self) -> impl Iterator<Item = &NotificationResult> {
        self.results.iter().filter(|r| !r.is_sent())
    }

    pub fn all_sent(&self) -> bool {
        self.failed() == 0
    }

    /// Delivery failures only fail the process when `strict` is set.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && !self.all_sent() {
            EXIT_DELIVERY_FAILED
        } else {
            0
        }
    }

    /// One-line outcome for the end of a run. A dry run never claims delivery.
    pub fn headline(&self, dry_run: bool) -> String {
        if dry_run {
            format!(
                "🔍 Dry run: {} of {} messages prepared, none sent",
                self.sent(),
                self.results.len()
            )
        } else {
            format!(
                "✅ {} of {} notifications succeeded",
                self.sent(),
                self.results.len()
            )
        }
    }

    /// Results whose recipient is in `reveal`, or all of them when `reveal` is empty.
    pub fn revealed<'a>(
        &'a self,
        reveal: &'a [String],
    ) -> impl Iterator<Item = &'a NotificationResult> + 'a {
        self.results.iter().filter(move |r| {
            reveal.is_empty() || reveal.iter().any(|name| name == r.recipient.name())
        })
    }
}

/// Exit code when strict delivery is requested and a message was not delivered.
pub const EXIT_DELIVERY_FAILED: i32 = 3;
