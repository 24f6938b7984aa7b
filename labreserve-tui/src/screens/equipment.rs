//! Equipment screen: inventory list with lab filter and privileged CRUD

use crossterm::event::{Event, KeyCode, KeyEvent};
use shared::models::{Equipment, EquipmentCreate, EquipmentStatus, EquipmentUpdate, Lab};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::app::{Ctx, Route, ScreenOutcome};
use crate::msg::{ApiMsg, Msg};

#[derive(Debug)]
pub struct EquipmentForm {
    pub editing: Option<i64>,
    pub name: Input,
    pub inventory_number: Input,
    pub status: EquipmentStatus,
    /// Index into the lab catalog
    pub lab_index: usize,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

const FORM_FIELDS: usize = 4;

impl Default for EquipmentForm {
    fn default() -> Self {
        Self {
            editing: None,
            name: Input::default(),
            inventory_number: Input::default(),
            status: EquipmentStatus::Available,
            lab_index: 0,
            focus: 0,
            error: None,
            submitting: false,
        }
    }
}

impl EquipmentForm {
    fn for_item(item: &Equipment, labs: &[Lab]) -> Self {
        Self {
            editing: Some(item.id),
            name: Input::new(item.name.clone()),
            inventory_number: Input::new(item.inventory_number.clone()),
            status: item.status,
            lab_index: labs
                .iter()
                .position(|l| l.id == item.lab_id)
                .unwrap_or(0),
            ..Self::default()
        }
    }

    fn validate(&self, labs: &[Lab]) -> Result<(String, String, i64), String> {
        let name = self.name.value().trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let inventory_number = self.inventory_number.value().trim().to_string();
        if inventory_number.is_empty() {
            return Err("Inventory number is required".to_string());
        }
        let lab_id = labs
            .get(self.lab_index)
            .map(|l| l.id)
            .ok_or_else(|| "Select a lab".to_string())?;
        Ok((name, inventory_number, lab_id))
    }
}

#[derive(Debug, Default)]
pub struct EquipmentScreen {
    pub items: Vec<Equipment>,
    pub cursor: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    /// When set, only this lab's inventory is listed
    pub filter_lab: Option<i64>,
    pub form: Option<EquipmentForm>,
}

impl EquipmentScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn capturing(&self) -> bool {
        self.form.is_some()
    }

    /// Stamp the next load; the returned generation travels with the
    /// request and only a matching response is applied.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    pub fn apply_loaded(&mut self, generation: u64, result: Result<Vec<Equipment>, String>) {
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

    /// Cycle the lab filter through "all labs" plus each lab.
    fn cycle_filter(&mut self, labs: &[Lab]) {
        self.filter_lab = match self.filter_lab {
            None => labs.first().map(|l| l.id),
            Some(current) => {
                let pos = labs.iter().position(|l| l.id == current);
                match pos {
                    Some(p) if p + 1 < labs.len() => Some(labs[p + 1].id),
                    _ => None,
                }
            }
        };
    }

    pub fn on_key(
        &mut self,
        key: KeyEvent,
        ctx: &Ctx,
        labs: &[Lab],
        can_manage: bool,
    ) -> ScreenOutcome {
        if self.form.is_some() {
            return self.on_form_key(key, ctx, labs);
        }
        match key.code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down if self.cursor + 1 < self.items.len() => self.cursor += 1,
            KeyCode::Char('r') => return ScreenOutcome::Refresh,
            KeyCode::Char('f') => {
                self.cycle_filter(labs);
                return ScreenOutcome::Refresh;
            }
            KeyCode::Char('n') if can_manage => self.form = Some(EquipmentForm::default()),
            KeyCode::Char('e') if can_manage => {
                if let Some(item) = self.items.get(self.cursor) {
                    self.form = Some(EquipmentForm::for_item(item, labs));
                }
            }
            KeyCode::Char('d') if can_manage => {
                if let Some(item) = self.items.get(self.cursor) {
                    let id = item.id;
                    let api = ctx.api.clone();
                    let tx = ctx.tx.clone();
                    tokio::spawn(async move {
                        let result = api.delete_equipment(id).await.map_err(|e| e.message());
                        let _ = tx.send(Msg::Api(ApiMsg::MutationDone {
                            route: Route::Equipment,
                            result,
                        }));
                    });
                }
            }
            _ => {}
        }
        ScreenOutcome::None
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
            KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % FORM_FIELDS,
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = (form.focus + FORM_FIELDS - 1) % FORM_FIELDS
            }
            KeyCode::Left | KeyCode::Right if form.focus == 2 => {
                let all = EquipmentStatus::ALL;
                let pos = all.iter().position(|s| *s == form.status).unwrap_or(0);
                let next = if key.code == KeyCode::Right {
                    (pos + 1) % all.len()
                } else {
                    (pos + all.len() - 1) % all.len()
                };
                form.status = all[next];
            }
            KeyCode::Left | KeyCode::Right if form.focus == 3 => {
                if !labs.is_empty() {
                    form.lab_index = if key.code == KeyCode::Right {
                        (form.lab_index + 1) % labs.len()
                    } else {
                        (form.lab_index + labs.len() - 1) % labs.len()
                    };
                }
            }
            KeyCode::Enter => match form.validate(labs) {
                Err(message) => form.error = Some(message),
                Ok((name, inventory_number, lab_id)) => {
                    form.error = None;
                    form.submitting = true;
                    let status = form.status;
                    let editing = form.editing;
                    let api = ctx.api.clone();
                    let tx = ctx.tx.clone();
                    tokio::spawn(async move {
                        let result = match editing {
                            Some(id) => {
                                let payload = EquipmentUpdate {
                                    name,
                                    inventory_number,
                                    status,
                                    lab_id,
                                };
                                api.update_equipment(id, &payload).await.map(|_| ())
                            }
                            None => {
                                let payload = EquipmentCreate {
                                    name,
                                    inventory_number,
                                    status,
                                    lab_id,
                                };
                                api.create_equipment(&payload).await.map(|_| ())
                            }
                        }
                        .map_err(|e| e.message());
                        let _ = tx.send(Msg::Api(ApiMsg::MutationDone {
                            route: Route::Equipment,
                            result,
                        }));
                    });
                }
            },
            _ => {
                let input = match form.focus {
                    0 => &mut form.name,
                    1 => &mut form.inventory_number,
                    _ => return ScreenOutcome::None,
                };
                input.handle_event(&Event::Key(key));
            }
        }
        ScreenOutcome::None
    }

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

    fn lab(id: i64) -> Lab {
        Lab {
            id,
            name: format!("lab-{}", id),
            location: "B".to_string(),
            capacity: 10,
            description: None,
        }
    }

    #[test]
    fn filter_cycles_through_all_labs_and_back() {
        let labs = vec![lab(1), lab(2)];
        let mut screen = EquipmentScreen::new();
        assert_eq!(screen.filter_lab, None);
        screen.cycle_filter(&labs);
        assert_eq!(screen.filter_lab, Some(1));
        screen.cycle_filter(&labs);
        assert_eq!(screen.filter_lab, Some(2));
        screen.cycle_filter(&labs);
        assert_eq!(screen.filter_lab, None);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut screen = EquipmentScreen::new();
        let first = screen.begin_load();
        let second = screen.begin_load();
        assert!(first < second);

        // The slow first response arrives after the second was issued.
        screen.apply_loaded(first, Ok(vec![]));
        assert!(screen.loading);

        screen.apply_loaded(second, Err("boom".to_string()));
        assert!(!screen.loading);
        assert_eq!(screen.error.as_deref(), Some("boom"));
    }
}
