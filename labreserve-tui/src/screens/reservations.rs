//! Reservations screen: lifecycle list plus the draft composer

use crossterm::event::{Event, KeyCode, KeyEvent};
use shared::models::{Lab, Reservation, Role};
use tui_input::backend::crossterm::EventHandler;

use crate::app::{Ctx, Route, ScreenOutcome};
use crate::composer::{ComposerField, ReservationForm};
use crate::gate::{self, RowAction};
use crate::msg::{ApiMsg, Msg};

#[derive(Debug, Default)]
pub struct ReservationsScreen {
    pub items: Vec<Reservation>,
    pub cursor: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    pub form: Option<ReservationForm>,
}

impl ReservationsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn capturing(&self) -> bool {
        self.form.is_some()
    }

    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    pub fn apply_loaded(&mut self, generation: u64, result: Result<Vec<Reservation>, String>) {
        if generation != self.generation {
            return;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                if self.cursor >= self.items.len() {
                    self.cursor = self.items.len().saturating_sub(1);
                }
            }
            Err(message) => self.error = Some(message),
        }
    }

    pub fn on_key(
        &mut self,
        key: KeyEvent,
        ctx: &Ctx,
        labs: &[Lab],
        role: Option<Role>,
        username: Option<&str>,
    ) -> ScreenOutcome {
        if self.form.is_some() {
            return self.on_form_key(key, ctx, labs);
        }
        match key.code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down if self.cursor + 1 < self.items.len() => self.cursor += 1,
            KeyCode::Char('r') => return ScreenOutcome::Refresh,
            KeyCode::Char('n') => self.open_composer(ctx),
            KeyCode::Char('a') => {
                self.row_action(ctx, role, username, RowAction::Approve);
            }
            KeyCode::Char('x') => {
                self.row_action(ctx, role, username, RowAction::Reject);
            }
            KeyCode::Char('d') => {
                // Delete and the owner's cancel share the endpoint.
                if !self.row_action(ctx, role, username, RowAction::Delete) {
                    self.row_action(ctx, role, username, RowAction::Cancel);
                }
            }
            _ => {}
        }
        ScreenOutcome::None
    }

    fn open_composer(&mut self, ctx: &Ctx) {
        self.form = Some(ReservationForm::new());
        let api = ctx.api.clone();
        let tx = ctx.tx.clone();
        tokio::spawn(async move {
            let result = api.published_lab_works().await.map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::PublishedLoaded(result)));
        });
    }

    /// Dispatch a lifecycle action on the row under the cursor, if the
    /// current user is allowed it. Returns whether anything was spawned.
    fn row_action(
        &mut self,
        ctx: &Ctx,
        role: Option<Role>,
        username: Option<&str>,
        action: RowAction,
    ) -> bool {
        let Some(reservation) = self.items.get(self.cursor) else {
            return false;
        };
        if !gate::reservation_actions(role, username, reservation).contains(&action) {
            return false;
        }
        let id = reservation.id;
        let api = ctx.api.clone();
        let tx = ctx.tx.clone();
        tokio::spawn(async move {
            let result = match action {
                RowAction::Approve => api.approve_reservation(id).await.map(|_| ()),
                RowAction::Reject => api.reject_reservation(id).await.map(|_| ()),
                RowAction::Cancel | RowAction::Delete => api.delete_reservation(id).await,
            }
            .map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::MutationDone {
                route: Route::Reservations,
                result,
            }));
        });
        true
    }

    fn on_form_key(&mut self, key: KeyEvent, ctx: &Ctx, labs: &[Lab]) -> ScreenOutcome {
        let Some(form) = self.form.as_mut() else {
            return ScreenOutcome::None;
        };
        if form.submitting {
            return ScreenOutcome::None;
        }
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match form.focus {
                    ComposerField::Lab => {
                        if let Some(lab_id) = form.cycle_lab(labs, forward) {
                            let api = ctx.api.clone();
                            let tx = ctx.tx.clone();
                            tokio::spawn(async move {
                                let result = api
                                    .equipment_by_lab(lab_id)
                                    .await
                                    .map_err(|e| e.message());
                                let _ = tx.send(Msg::Api(ApiMsg::LabInventoryLoaded {
                                    lab_id,
                                    result,
                                }));
                            });
                        }
                    }
                    ComposerField::Template => form.cycle_template(forward),
                    ComposerField::Equipment => form.move_equipment_cursor(forward),
                    _ => {}
                }
            }
            KeyCode::Char(' ') if form.focus == ComposerField::Equipment => {
                form.toggle_equipment_at_cursor();
            }
            KeyCode::Enter => {
                match form.validate(chrono::Local::now().naive_local()) {
                    Err(message) => form.error = Some(message),
                    Ok(payload) => {
                        form.error = None;
                        form.submitting = true;
                        let api = ctx.api.clone();
                        let tx = ctx.tx.clone();
                        tokio::spawn(async move {
                            let result =
                                api.create_reservation(&payload).await.map_err(|e| e.message());
                            let _ = tx.send(Msg::Api(ApiMsg::ReservationSubmitted(result)));
                        });
                    }
                }
            }
            _ => {
                let input = match form.focus {
                    ComposerField::Start => &mut form.start,
                    ComposerField::End => &mut form.end,
                    ComposerField::Purpose => &mut form.purpose,
                    _ => return ScreenOutcome::None,
                };
                input.handle_event(&Event::Key(key));
            }
        }
        ScreenOutcome::None
    }

    pub fn apply_published(&mut self, result: Result<Vec<shared::models::LabWork>, String>) {
        if let Some(form) = self.form.as_mut() {
            match result {
                Ok(published) => form.published = published,
                Err(message) => form.error = Some(message),
            }
        }
    }

    pub fn apply_inventory(
        &mut self,
        lab_id: i64,
        result: Result<Vec<shared::models::Equipment>, String>,
    ) {
        if let Some(form) = self.form.as_mut() {
            match result {
                Ok(items) => form.set_inventory(lab_id, items),
                Err(message) => {
                    if form.lab_id == Some(lab_id) {
                        form.inventory_loading = false;
                        form.error = Some(message);
                    }
                }
            }
        }
    }

    /// The submitted draft came back. Success closes the composer and
    /// the caller refreshes the list; failure keeps the draft so the
    /// user can correct it.
    pub fn apply_submitted(&mut self, result: &Result<Reservation, String>) -> bool {
        match result {
            Ok(_) => {
                self.form = None;
                true
            }
            Err(message) => {
                if let Some(form) = self.form.as_mut() {
                    form.submitting = false;
                    form.error = Some(message.clone());
                }
                false
            }
        }
    }

    pub fn apply_mutation(&mut self, result: &Result<(), String>) -> bool {
        match result {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(message) => {
                self.error = Some(message.clone());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use shared::models::ReservationStatus;

    fn reservation(id: i64, status: ReservationStatus) -> Reservation {
        let start = Utc::now() + Duration::hours(2);
        Reservation {
            id,
            lab_id: 1,
            lab_name: Some("Physics".to_string()),
            user_id: 10,
            username: Some("alice".to_string()),
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
    fn failed_submit_keeps_the_draft_open() {
        let mut screen = ReservationsScreen::new();
        screen.form = Some(ReservationForm::new());
        screen.form.as_mut().unwrap().submitting = true;

        let refreshed = screen.apply_submitted(&Err("Time slot conflict".to_string()));
        assert!(!refreshed);
        let form = screen.form.as_ref().unwrap();
        assert!(!form.submitting);
        assert_eq!(form.error.as_deref(), Some("Time slot conflict"));

        assert!(screen.apply_submitted(&Ok(reservation(1, ReservationStatus::Pending))));
        assert!(screen.form.is_none());
    }

    #[test]
    fn stale_list_response_is_discarded() {
        let mut screen = ReservationsScreen::new();
        let first = screen.begin_load();
        let second = screen.begin_load();

        screen.apply_loaded(first, Ok(vec![reservation(1, ReservationStatus::Pending)]));
        assert!(screen.items.is_empty());
        assert!(screen.loading);

        screen.apply_loaded(second, Ok(vec![reservation(2, ReservationStatus::Approved)]));
        assert_eq!(screen.items.len(), 1);
        assert_eq!(screen.items[0].id, 2);
    }

    #[test]
    fn inventory_error_for_the_current_lab_is_shown() {
        let mut screen = ReservationsScreen::new();
        let mut form = ReservationForm::new();
        form.select_lab(3);
        screen.form = Some(form);

        // An error for a lab we already moved away from is ignored.
        screen.apply_inventory(1, Err("boom".to_string()));
        let form = screen.form.as_ref().unwrap();
        assert!(form.error.is_none());
        assert!(form.inventory_loading);

        screen.apply_inventory(3, Err("boom".to_string()));
        let form = screen.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("boom"));
        assert!(!form.inventory_loading);
    }
}
