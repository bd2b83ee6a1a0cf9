//! Book instance (physical copy) model.
//!
//! Instances surface on the book detail page and in the home-page counts;
//! the catalog workflows do not edit them directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Loan status of a physical copy. Stored as its string code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "Available",
            InstanceStatus::Maintenance => "Maintenance",
            InstanceStatus::Loaned => "Loaned",
            InstanceStatus::Reserved => "Reserved",
        }
    }
}

impl From<&str> for InstanceStatus {
    fn from(s: &str) -> Self {
        match s {
            "Available" => InstanceStatus::Available,
            "Loaned" => InstanceStatus::Loaned,
            "Reserved" => InstanceStatus::Reserved,
            _ => InstanceStatus::Maintenance,
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full book instance model from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn status(&self) -> InstanceStatus {
        InstanceStatus::from(self.status.as_str())
    }

    pub fn due_back_formatted(&self) -> Option<String> {
        self.due_back.map(|d| d.format("%b %-d, %Y").to_string())
    }
}

/// Instance as exposed to the book detail context.
#[derive(Serialize)]
pub struct BookInstanceView<'a> {
    #[serde(flatten)]
    instance: &'a BookInstance,
    pub due_back_formatted: Option<String>,
}

impl<'a> From<&'a BookInstance> for BookInstanceView<'a> {
    fn from(instance: &'a BookInstance) -> Self {
        Self {
            due_back_formatted: instance.due_back_formatted(),
            instance,
        }
    }
}
