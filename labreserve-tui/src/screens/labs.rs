//! Labs screen: catalog list plus privileged CRUD forms

use crossterm::event::{Event, KeyCode, KeyEvent};
use shared::models::{Lab, LabCreate, LabUpdate};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::app::{Ctx, Route, ScreenOutcome};
use crate::msg::{ApiMsg, Msg};

#[derive(Debug, Default)]
pub struct LabForm {
    /// `Some(id)` when editing an existing lab
    pub editing: Option<i64>,
    pub name: Input,
    pub location: Input,
    pub capacity: Input,
    pub description: Input,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

const FORM_FIELDS: usize = 4;

impl LabForm {
    fn for_lab(lab: &Lab) -> Self {
        Self {
            editing: Some(lab.id),
            name: Input::new(lab.name.clone()),
            location: Input::new(lab.location.clone()),
            capacity: Input::new(lab.capacity.to_string()),
            description: Input::new(lab.description.clone().unwrap_or_default()),
            ..Self::default()
        }
    }

    fn focused_input(&mut self) -> &mut Input {
        match self.focus {
            0 => &mut self.name,
            1 => &mut self.location,
            2 => &mut self.capacity,
            _ => &mut self.description,
        }
    }

    /// Local field validation; failures never reach the network.
    fn validate(&self) -> Result<(String, String, i32, Option<String>), String> {
        let name = self.name.value().trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let location = self.location.value().trim().to_string();
        if location.is_empty() {
            return Err("Location is required".to_string());
        }
        let capacity: i32 = self
            .capacity
            .value()
            .trim()
            .parse()
            .map_err(|_| "Capacity must be a number".to_string())?;
        if capacity <= 0 {
            return Err("Capacity must be positive".to_string());
        }
        let description = Some(self.description.value().trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok((name, location, capacity, description))
    }
}

#[derive(Debug, Default)]
pub struct LabsScreen {
    pub cursor: usize,
    pub error: Option<String>,
    pub form: Option<LabForm>,
}

impl LabsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn capturing(&self) -> bool {
        self.form.is_some()
    }

    pub fn on_key(
        &mut self,
        key: KeyEvent,
        ctx: &Ctx,
        labs: &[Lab],
        can_manage: bool,
    ) -> ScreenOutcome {
        if self.form.is_some() {
            return self.on_form_key(key, ctx);
        }
        match key.code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down if self.cursor + 1 < labs.len() => self.cursor += 1,
            KeyCode::Char('r') => return ScreenOutcome::Refresh,
            KeyCode::Char('n') if can_manage => self.form = Some(LabForm::default()),
            KeyCode::Char('e') if can_manage => {
                if let Some(lab) = labs.get(self.cursor) {
                    self.form = Some(LabForm::for_lab(lab));
                }
            }
            KeyCode::Char('d') if can_manage => {
                if let Some(lab) = labs.get(self.cursor) {
                    let id = lab.id;
                    let api = ctx.api.clone();
                    let tx = ctx.tx.clone();
                    tokio::spawn(async move {
                        let result = api.delete_lab(id).await.map_err(|e| e.message());
                        let _ = tx.send(Msg::Api(ApiMsg::MutationDone {
                            route: Route::Labs,
                            result,
                        }));
                    });
                }
            }
            _ => {}
        }
        ScreenOutcome::None
    }

    fn on_form_key(&mut self, key: KeyEvent, ctx: &Ctx) -> ScreenOutcome {
        let Some(form) = self.form.as_mut() else {
            return ScreenOutcome::None;
        };
        if form.submitting {
            return ScreenOutcome::None;
        }
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % FORM_FIELDS,
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = (form.focus + FORM_FIELDS - 1) % FORM_FIELDS
            }
            KeyCode::Enter => match form.validate() {
                Err(message) => form.error = Some(message),
                Ok((name, location, capacity, description)) => {
                    form.error = None;
                    form.submitting = true;
                    let editing = form.editing;
                    let api = ctx.api.clone();
                    let tx = ctx.tx.clone();
                    tokio::spawn(async move {
                        let result = match editing {
                            Some(id) => {
                                let payload = LabUpdate {
                                    name,
                                    location,
                                    capacity,
                                    description,
                                };
                                api.update_lab(id, &payload).await.map(|_| ())
                            }
                            None => {
                                let payload = LabCreate {
                                    name,
                                    location,
                                    capacity,
                                    description,
                                };
                                api.create_lab(&payload).await.map(|_| ())
                            }
                        }
                        .map_err(|e| e.message());
                        let _ = tx.send(Msg::Api(ApiMsg::MutationDone {
                            route: Route::Labs,
                            result,
                        }));
                    });
                }
            },
            _ => {
                form.focused_input().handle_event(&Event::Key(key));
            }
        }
        ScreenOutcome::None
    }

    /// A finished create/update/delete. Success closes the form and the
    /// caller refreshes the catalog; failure keeps the form contents for
    /// correction.
    pub fn apply_mutation(&mut self, result: &Result<(), String>) -> bool {
        match result {
            Ok(()) => {
                self.form = None;
                self.error = None;
                true
            }
            Err(message) => {
                match self.form.as_mut() {
                    Some(form) => {
                        form.submitting = false;
                        form.error = Some(message.clone());
                    }
                    None => self.error = Some(message.clone()),
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_must_be_a_positive_number() {
        let mut form = LabForm::default();
        form.name = Input::new("Physics Lab".to_string());
        form.location = Input::new("B-101".to_string());

        form.capacity = Input::new("twelve".to_string());
        assert_eq!(form.validate().unwrap_err(), "Capacity must be a number");

        form.capacity = Input::new("0".to_string());
        assert_eq!(form.validate().unwrap_err(), "Capacity must be positive");

        form.capacity = Input::new("12".to_string());
        let (name, location, capacity, description) = form.validate().unwrap();
        assert_eq!((name.as_str(), location.as_str()), ("Physics Lab", "B-101"));
        assert_eq!(capacity, 12);
        assert_eq!(description, None);
    }

    #[test]
    fn failed_mutation_keeps_the_form() {
        let mut screen = LabsScreen::new();
        screen.form = Some(LabForm::default());
        screen.form.as_mut().unwrap().submitting = true;

        let refreshed = screen.apply_mutation(&Err("Access denied".to_string()));
        assert!(!refreshed);
        let form = screen.form.as_ref().unwrap();
        assert!(!form.submitting);
        assert_eq!(form.error.as_deref(), Some("Access denied"));

        assert!(screen.apply_mutation(&Ok(())));
        assert!(screen.form.is_none());
    }
}
