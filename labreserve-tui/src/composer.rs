//! Reservation composer: the draft form and its client-side invariants
//!
//! The form walks Idle -> Editing -> Submitting and back; `None` in the
//! reservations screen is Idle, a constructed `ReservationForm` is
//! Editing, and `submitting` marks the in-flight state. Validation runs
//! entirely locally; a form that fails it never reaches the network.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use shared::models::{Equipment, Lab, LabWork, ReservationCreate};
use tui_input::Input;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerField {
    #[default]
    Lab,
    Template,
    Equipment,
    Start,
    End,
    Purpose,
}

impl ComposerField {
    pub fn next(self) -> Self {
        match self {
            ComposerField::Lab => ComposerField::Template,
            ComposerField::Template => ComposerField::Equipment,
            ComposerField::Equipment => ComposerField::Start,
            ComposerField::Start => ComposerField::End,
            ComposerField::End => ComposerField::Purpose,
            ComposerField::Purpose => ComposerField::Lab,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ComposerField::Lab => ComposerField::Purpose,
            ComposerField::Template => ComposerField::Lab,
            ComposerField::Equipment => ComposerField::Template,
            ComposerField::Start => ComposerField::Equipment,
            ComposerField::End => ComposerField::Start,
            ComposerField::Purpose => ComposerField::End,
        }
    }
}

/// Draft reservation being edited
#[derive(Debug, Default)]
pub struct ReservationForm {
    /// Mandatory lab selection
    pub lab_id: Option<i64>,
    /// Optional published lab-work template. Display only: selecting one
    /// never mutates the equipment selection.
    pub template_id: Option<i64>,
    /// Inventory of the selected lab; equipment choices are always
    /// limited to this list.
    pub inventory: Vec<Equipment>,
    pub inventory_loading: bool,
    pub selected_equipment: BTreeSet<i64>,
    pub equipment_cursor: usize,
    /// Published works offered as templates
    pub published: Vec<LabWork>,
    pub start: Input,
    pub end: Input,
    pub purpose: Input,
    pub focus: ComposerField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl ReservationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a lab. Changing the lab resets the equipment selection:
    /// an item not belonging to the selected lab must never stay
    /// selectable.
    pub fn select_lab(&mut self, lab_id: i64) {
        if self.lab_id == Some(lab_id) {
            return;
        }
        self.lab_id = Some(lab_id);
        self.selected_equipment.clear();
        self.inventory.clear();
        self.equipment_cursor = 0;
        self.inventory_loading = true;
    }

    /// Cycle the lab selection through the catalog. Returns the new lab
    /// id when the selection actually changed, so the caller can fetch
    /// its inventory.
    pub fn cycle_lab(&mut self, labs: &[Lab], forward: bool) -> Option<i64> {
        if labs.is_empty() {
            return None;
        }
        let pos = self
            .lab_id
            .and_then(|id| labs.iter().position(|l| l.id == id));
        let next = match (pos, forward) {
            (None, _) => 0,
            (Some(p), true) => (p + 1) % labs.len(),
            (Some(p), false) => (p + labs.len() - 1) % labs.len(),
        };
        let id = labs[next].id;
        if self.lab_id == Some(id) {
            return None;
        }
        self.select_lab(id);
        Some(id)
    }

    /// Apply a loaded inventory. Responses for a lab that is no longer
    /// the selected one are discarded.
    pub fn set_inventory(&mut self, lab_id: i64, items: Vec<Equipment>) {
        if self.lab_id != Some(lab_id) {
            return;
        }
        self.selected_equipment
            .retain(|id| items.iter().any(|e| e.id == *id));
        self.inventory = items;
        self.inventory_loading = false;
        if self.equipment_cursor >= self.inventory.len() {
            self.equipment_cursor = self.inventory.len().saturating_sub(1);
        }
    }

    /// Cycle through "no template" plus the published works.
    pub fn cycle_template(&mut self, forward: bool) {
        if self.published.is_empty() {
            self.template_id = None;
            return;
        }
        let last = self.published.len() - 1;
        let pos = self
            .template_id
            .and_then(|id| self.published.iter().position(|w| w.id == id));
        self.template_id = match (pos, forward) {
            (None, true) => Some(self.published[0].id),
            (None, false) => Some(self.published[last].id),
            (Some(p), true) if p == last => None,
            (Some(p), true) => Some(self.published[p + 1].id),
            (Some(0), false) => None,
            (Some(p), false) => Some(self.published[p - 1].id),
        };
    }

    pub fn move_equipment_cursor(&mut self, forward: bool) {
        if self.inventory.is_empty() {
            return;
        }
        if forward {
            self.equipment_cursor = (self.equipment_cursor + 1) % self.inventory.len();
        } else {
            self.equipment_cursor =
                (self.equipment_cursor + self.inventory.len() - 1) % self.inventory.len();
        }
    }

    pub fn toggle_equipment_at_cursor(&mut self) {
        if let Some(item) = self.inventory.get(self.equipment_cursor) {
            if !self.selected_equipment.remove(&item.id) {
                self.selected_equipment.insert(item.id);
            }
        }
    }

    /// Validate the draft and assemble the create payload.
    ///
    /// `now_local` is the caller's wall-clock time; start must be no
    /// earlier than one hour from it, and end must be after start. A
    /// missing lab fails fast here, before any network call.
    pub fn validate(&self, now_local: NaiveDateTime) -> Result<ReservationCreate, String> {
        let lab_id = self.lab_id.ok_or_else(|| "Select a lab first".to_string())?;

        let start = parse_time(self.start.value())
            .ok_or_else(|| "Start time must look like 2025-06-01 10:00".to_string())?;
        let floor = now_local + Duration::hours(1);
        if start < floor {
            return Err("Start time must be at least one hour from now".to_string());
        }

        let end = parse_time(self.end.value())
            .ok_or_else(|| "End time must look like 2025-06-01 12:00".to_string())?;
        if end <= start {
            return Err("End time must be after the start time".to_string());
        }

        // The selection is pruned on lab change already; filtering again
        // keeps the invariant even if an inventory response raced us.
        let equipment_ids: Vec<i64> = self
            .selected_equipment
            .iter()
            .copied()
            .filter(|id| self.inventory.iter().any(|e| e.id == *id))
            .collect();

        let purpose = Some(self.purpose.value().trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(ReservationCreate {
            lab_id,
            lab_work_id: self.template_id,
            equipment_ids,
            start_time: to_utc(start)?,
            end_time: to_utc(end)?,
            purpose,
        })
    }
}

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

fn to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>, String> {
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| "Invalid local time".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::EquipmentStatus;

    fn equipment(id: i64, lab_id: i64) -> Equipment {
        Equipment {
            id,
            name: format!("item-{}", id),
            inventory_number: format!("INV-{}", id),
            status: EquipmentStatus::Available,
            documentation_link: None,
            description: None,
            lab_id,
            lab_name: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn valid_form() -> ReservationForm {
        let mut form = ReservationForm::new();
        form.select_lab(1);
        form.set_inventory(1, vec![equipment(5, 1), equipment(6, 1)]);
        form.start = Input::new("2025-01-01 10:00".to_string());
        form.end = Input::new("2025-01-01 12:00".to_string());
        form
    }

    #[test]
    fn missing_lab_fails_fast() {
        let mut form = valid_form();
        form.lab_id = None;
        assert_eq!(form.validate(now()).unwrap_err(), "Select a lab first");
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut form = valid_form();
        form.start = Input::new("2025-01-01 10:00".to_string());
        form.end = Input::new("2025-01-01 09:00".to_string());
        assert_eq!(
            form.validate(now()).unwrap_err(),
            "End time must be after the start time"
        );

        // Equal endpoints are just as invalid.
        form.end = Input::new("2025-01-01 10:00".to_string());
        assert!(form.validate(now()).is_err());
    }

    #[test]
    fn start_respects_the_one_hour_floor() {
        let mut form = valid_form();
        form.start = Input::new("2025-01-01 08:30".to_string());
        assert_eq!(
            form.validate(now()).unwrap_err(),
            "Start time must be at least one hour from now"
        );

        // Exactly one hour out is allowed.
        form.start = Input::new("2025-01-01 09:00".to_string());
        form.end = Input::new("2025-01-01 11:00".to_string());
        assert!(form.validate(now()).is_ok());
    }

    #[test]
    fn unparseable_times_are_reported() {
        let mut form = valid_form();
        form.start = Input::new("tomorrow".to_string());
        assert!(form.validate(now()).unwrap_err().starts_with("Start time"));
    }

    #[test]
    fn switching_lab_resets_equipment_selection() {
        let mut form = valid_form();
        form.toggle_equipment_at_cursor();
        assert!(!form.selected_equipment.is_empty());

        form.select_lab(2);
        assert!(form.selected_equipment.is_empty());
        assert!(form.inventory.is_empty());

        // Selecting the same lab again is a no-op.
        form.set_inventory(2, vec![equipment(9, 2)]);
        form.toggle_equipment_at_cursor();
        form.select_lab(2);
        assert_eq!(form.selected_equipment.len(), 1);
    }

    #[test]
    fn stale_inventory_response_is_discarded() {
        let mut form = ReservationForm::new();
        form.select_lab(2);
        form.set_inventory(1, vec![equipment(5, 1)]);
        assert!(form.inventory.is_empty());
        assert!(form.inventory_loading);

        form.set_inventory(2, vec![equipment(9, 2)]);
        assert_eq!(form.inventory.len(), 1);
        assert!(!form.inventory_loading);
    }

    #[test]
    fn template_selection_leaves_equipment_untouched() {
        let mut form = valid_form();
        form.toggle_equipment_at_cursor();
        let before = form.selected_equipment.clone();

        let stamp = Utc::now();
        form.published = vec![LabWork {
            id: 3,
            title: "Optics".to_string(),
            description: None,
            author_username: "alice".to_string(),
            required_equipment: vec![equipment(6, 1)],
            status: shared::models::LabWorkStatus::Published,
            created_at: stamp,
            updated_at: stamp,
        }];
        form.cycle_template(true);
        assert_eq!(form.template_id, Some(3));
        assert_eq!(form.selected_equipment, before);

        // Cycling past the end returns to "no template".
        form.cycle_template(true);
        assert_eq!(form.template_id, None);
    }

    #[test]
    fn foreign_equipment_never_reaches_the_payload() {
        let mut form = valid_form();
        // Simulate a selection that survived from a stale inventory.
        form.selected_equipment.insert(99);
        form.toggle_equipment_at_cursor();

        let payload = form.validate(now()).unwrap();
        assert_eq!(payload.equipment_ids, vec![5]);
        assert_eq!(payload.lab_id, 1);
    }

    #[test]
    fn purpose_is_trimmed_and_optional() {
        let mut form = valid_form();
        form.purpose = Input::new("   ".to_string());
        assert_eq!(form.validate(now()).unwrap().purpose, None);

        form.purpose = Input::new("  thermal tests ".to_string());
        assert_eq!(
            form.validate(now()).unwrap().purpose,
            Some("thermal tests".to_string())
        );
    }
}
