//! Reservation model

use super::equipment::Equipment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval status of a reservation. Server-authoritative; the client
/// never sets it directly except through the status endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ReservationStatus {
    /// Only PENDING reservations are actionable by owner or approver.
    pub fn is_pending(&self) -> bool {
        matches!(self, ReservationStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Approved => "APPROVED",
            ReservationStatus::Rejected => "REJECTED",
            ReservationStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Time-boxed claim on a lab and optionally a subset of its equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    pub lab_id: i64,
    #[serde(default)]
    pub lab_name: Option<String>,
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub lab_work_id: Option<i64>,
    #[serde(default)]
    pub lab_work_title: Option<String>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    pub lab_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_work_id: Option<i64>,
    pub equipment_ids: Vec<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// Status patch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationStatusUpdate {
    pub status: ReservationStatus,
}
