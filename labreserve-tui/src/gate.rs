//! Role-based visibility rules
//!
//! Controls without permission are hidden, never disabled. These
//! helpers are the single place the screens consult.

use shared::models::{LabWork, Reservation, Role};

/// Per-row reservation actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Approve,
    Reject,
    /// Owner's cancel; maps to the delete endpoint
    Cancel,
    Delete,
}

/// Actions the current user may take on one reservation row.
pub fn reservation_actions(
    role: Option<Role>,
    username: Option<&str>,
    reservation: &Reservation,
) -> Vec<RowAction> {
    let mut actions = Vec::new();
    match role {
        Some(role) if role.is_privileged() => {
            if reservation.status.is_pending() {
                actions.push(RowAction::Approve);
                actions.push(RowAction::Reject);
            }
            actions.push(RowAction::Delete);
        }
        Some(_) => {
            let owns = username.is_some() && username == reservation.username.as_deref();
            if owns && reservation.status.is_pending() {
                actions.push(RowAction::Cancel);
            }
        }
        None => {}
    }
    actions
}

/// Lab and equipment management requires a privileged role.
pub fn can_manage_resources(role: Option<Role>) -> bool {
    role.is_some_and(|r| r.is_privileged())
}

/// Lab works can be edited/deleted by their author or a privileged role.
pub fn can_edit_lab_work(role: Option<Role>, username: Option<&str>, work: &LabWork) -> bool {
    if can_manage_resources(role) {
        return true;
    }
    role.is_some() && username == Some(work.author_username.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use shared::models::ReservationStatus;

    fn reservation(owner: &str, status: ReservationStatus) -> Reservation {
        let start = Utc::now() + Duration::hours(2);
        Reservation {
            id: 1,
            lab_id: 1,
            lab_name: None,
            user_id: 10,
            username: Some(owner.to_string()),
            lab_work_id: None,
            lab_work_title: None,
            equipment: vec![],
            start_time: start,
            end_time: start + Duration::hours(1),
            status,
            purpose: None,
            approved_by: None,
            approved_at: None,
        }
    }

    #[test]
    fn privileged_sees_approve_reject_on_pending_only() {
        let pending = reservation("alice", ReservationStatus::Pending);
        let actions = reservation_actions(Some(Role::LabManager), Some("manager"), &pending);
        assert_eq!(
            actions,
            vec![RowAction::Approve, RowAction::Reject, RowAction::Delete]
        );

        let approved = reservation("alice", ReservationStatus::Approved);
        let actions = reservation_actions(Some(Role::Admin), Some("boss"), &approved);
        assert_eq!(actions, vec![RowAction::Delete]);
    }

    #[test]
    fn student_cancels_only_own_pending() {
        let own = reservation("alice", ReservationStatus::Pending);
        assert_eq!(
            reservation_actions(Some(Role::Student), Some("alice"), &own),
            vec![RowAction::Cancel]
        );

        // Someone else's reservation offers nothing.
        assert!(reservation_actions(Some(Role::Student), Some("bob"), &own).is_empty());

        // Own but already advanced past PENDING offers nothing.
        let cancelled = reservation("alice", ReservationStatus::Cancelled);
        assert!(reservation_actions(Some(Role::Student), Some("alice"), &cancelled).is_empty());
    }

    #[test]
    fn no_session_means_no_actions() {
        let pending = reservation("alice", ReservationStatus::Pending);
        assert!(reservation_actions(None, None, &pending).is_empty());
    }

    #[test]
    fn lab_work_editable_by_author_or_privileged() {
        let start = Utc::now();
        let work = LabWork {
            id: 1,
            title: "Optics".to_string(),
            description: None,
            author_username: "alice".to_string(),
            required_equipment: vec![],
            status: shared::models::LabWorkStatus::Draft,
            created_at: start,
            updated_at: start,
        };
        assert!(can_edit_lab_work(Some(Role::Student), Some("alice"), &work));
        assert!(!can_edit_lab_work(Some(Role::Student), Some("bob"), &work));
        assert!(can_edit_lab_work(Some(Role::LabManager), Some("bob"), &work));
        assert!(!can_edit_lab_work(None, None, &work));
    }
}
