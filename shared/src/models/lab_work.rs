//! Lab work model

use super::equipment::Equipment;
use serde::{Deserialize, Serialize};

/// Publication status of a lab work template.
///
/// Only PUBLISHED works are offered as reservation templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabWorkStatus {
    Draft,
    Published,
    Archived,
}

impl LabWorkStatus {
    pub const ALL: [LabWorkStatus; 3] = [
        LabWorkStatus::Draft,
        LabWorkStatus::Published,
        LabWorkStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LabWorkStatus::Draft => "DRAFT",
            LabWorkStatus::Published => "PUBLISHED",
            LabWorkStatus::Archived => "ARCHIVED",
        }
    }
}

/// Reusable lab exercise template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabWork {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author_username: String,
    #[serde(default)]
    pub required_equipment: Vec<Equipment>,
    pub status: LabWorkStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Create lab work payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabWorkCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub equipment_ids: Vec<i64>,
}

/// Update lab work payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabWorkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LabWorkStatus>,
}
