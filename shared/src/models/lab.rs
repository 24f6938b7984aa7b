//! Lab model

use serde::{Deserialize, Serialize};

/// Laboratory entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lab {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Positive by backend invariant; forms validate before submitting.
    pub capacity: i32,
    pub description: Option<String>,
}

/// Create lab payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabCreate {
    pub name: String,
    pub location: String,
    pub capacity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Update lab payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabUpdate {
    pub name: String,
    pub location: String,
    pub capacity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
