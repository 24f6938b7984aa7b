//! Equipment model

use serde::{Deserialize, Serialize};

/// Operational status of a piece of equipment.
///
/// Transitions are server-owned; the client only displays and selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Available,
    InUse,
    Maintenance,
    Broken,
}

impl EquipmentStatus {
    pub const ALL: [EquipmentStatus; 4] = [
        EquipmentStatus::Available,
        EquipmentStatus::InUse,
        EquipmentStatus::Maintenance,
        EquipmentStatus::Broken,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "AVAILABLE",
            EquipmentStatus::InUse => "IN_USE",
            EquipmentStatus::Maintenance => "MAINTENANCE",
            EquipmentStatus::Broken => "BROKEN",
        }
    }
}

/// Equipment entity, owned by exactly one lab
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    /// Unique per lab
    pub inventory_number: String,
    pub status: EquipmentStatus,
    pub documentation_link: Option<String>,
    pub description: Option<String>,
    pub lab_id: i64,
    #[serde(default)]
    pub lab_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Create equipment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentCreate {
    pub name: String,
    pub inventory_number: String,
    pub status: EquipmentStatus,
    pub lab_id: i64,
}

/// Update equipment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentUpdate {
    pub name: String,
    pub inventory_number: String,
    pub status: EquipmentStatus,
    pub lab_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_fields_are_camel_case() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Oscilloscope",
            "inventoryNumber": "INV-001",
            "status": "IN_USE",
            "documentationLink": null,
            "description": null,
            "labId": 3
        });
        let eq: Equipment = serde_json::from_value(json).unwrap();
        assert_eq!(eq.inventory_number, "INV-001");
        assert_eq!(eq.status, EquipmentStatus::InUse);
        assert_eq!(eq.lab_id, 3);
    }
}
