//! Lab works screen: templates list with author/privileged editing

use std::collections::BTreeSet;

use crossterm::event::{Event, KeyCode, KeyEvent};
use shared::models::{Equipment, LabWork, LabWorkCreate, LabWorkStatus, LabWorkUpdate, Role};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::app::{Ctx, Route, ScreenOutcome};
use crate::gate;
use crate::msg::{ApiMsg, Msg};

/// Which slice of the lab works the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabWorkView {
    #[default]
    All,
    Mine,
    Published,
}

impl LabWorkView {
    pub fn next(self) -> Self {
        match self {
            LabWorkView::All => LabWorkView::Mine,
            LabWorkView::Mine => LabWorkView::Published,
            LabWorkView::Published => LabWorkView::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LabWorkView::All => "all",
            LabWorkView::Mine => "mine",
            LabWorkView::Published => "published",
        }
    }
}

#[derive(Debug, Default)]
pub struct LabWorkForm {
    pub editing: Option<i64>,
    pub title: Input,
    pub description: Input,
    /// Status is only editable for an existing work
    pub status: Option<LabWorkStatus>,
    /// Full equipment catalog for the multi-select
    pub options: Vec<Equipment>,
    pub options_loading: bool,
    pub selected: BTreeSet<i64>,
    pub cursor: usize,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LabWorkForm {
    fn for_work(work: &LabWork) -> Self {
        Self {
            editing: Some(work.id),
            title: Input::new(work.title.clone()),
            description: Input::new(work.description.clone().unwrap_or_default()),
            status: Some(work.status),
            selected: work.required_equipment.iter().map(|e| e.id).collect(),
            options_loading: true,
            ..Self::default()
        }
    }

    fn field_count(&self) -> usize {
        if self.editing.is_some() { 4 } else { 3 }
    }
}

#[derive(Debug, Default)]
pub struct LabWorksScreen {
    pub items: Vec<LabWork>,
    pub cursor: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    pub view: LabWorkView,
    pub form: Option<LabWorkForm>,
}

impl LabWorksScreen {
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

    pub fn apply_loaded(&mut self, generation: u64, result: Result<Vec<LabWork>, String>) {
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

    fn open_form(&mut self, form: LabWorkForm, ctx: &Ctx) {
        self.form = Some(form);
        let api = ctx.api.clone();
        let tx = ctx.tx.clone();
        tokio::spawn(async move {
            let result = api.equipment().await.map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::LabWorkOptionsLoaded(result)));
        });
    }

    pub fn apply_options(&mut self, result: Result<Vec<Equipment>, String>) {
        if let Some(form) = self.form.as_mut() {
            form.options_loading = false;
            match result {
                Ok(options) => form.options = options,
                Err(message) => form.error = Some(message),
            }
        }
    }

    pub fn on_key(
        &mut self,
        key: KeyEvent,
        ctx: &Ctx,
        role: Option<Role>,
        username: Option<&str>,
    ) -> ScreenOutcome {
        if self.form.is_some() {
            return self.on_form_key(key, ctx);
        }
        match key.code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down if self.cursor + 1 < self.items.len() => self.cursor += 1,
            KeyCode::Char('r') => return ScreenOutcome::Refresh,
            KeyCode::Char('v') => {
                self.view = self.view.next();
                return ScreenOutcome::Refresh;
            }
            KeyCode::Char('n') => {
                self.open_form(
                    LabWorkForm {
                        options_loading: true,
                        ..LabWorkForm::default()
                    },
                    ctx,
                );
            }
            KeyCode::Char('e') => {
                if let Some(work) = self.items.get(self.cursor) {
                    if gate::can_edit_lab_work(role, username, work) {
                        self.open_form(LabWorkForm::for_work(work), ctx);
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(work) = self.items.get(self.cursor) {
                    if gate::can_edit_lab_work(role, username, work) {
                        let id = work.id;
                        let api = ctx.api.clone();
                        let tx = ctx.tx.clone();
                        tokio::spawn(async move {
                            let result = api.delete_lab_work(id).await.map_err(|e| e.message());
                            let _ = tx.send(Msg::Api(ApiMsg::MutationDone {
                                route: Route::LabWorks,
                                result,
                            }));
                        });
                    }
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
        let fields = form.field_count();
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % fields,
            KeyCode::BackTab | KeyCode::Up => form.focus = (form.focus + fields - 1) % fields,
            KeyCode::Left | KeyCode::Right if form.focus == 2 => {
                if !form.options.is_empty() {
                    form.cursor = if key.code == KeyCode::Right {
                        (form.cursor + 1) % form.options.len()
                    } else {
                        (form.cursor + form.options.len() - 1) % form.options.len()
                    };
                }
            }
            KeyCode::Char(' ') if form.focus == 2 => {
                if let Some(item) = form.options.get(form.cursor) {
                    if !form.selected.remove(&item.id) {
                        form.selected.insert(item.id);
                    }
                }
            }
            KeyCode::Left | KeyCode::Right if form.focus == 3 => {
                if let Some(current) = form.status {
                    let all = LabWorkStatus::ALL;
                    let pos = all.iter().position(|s| *s == current).unwrap_or(0);
                    let next = if key.code == KeyCode::Right {
                        (pos + 1) % all.len()
                    } else {
                        (pos + all.len() - 1) % all.len()
                    };
                    form.status = Some(all[next]);
                }
            }
            KeyCode::Enter => {
                let title = form.title.value().trim().to_string();
                if title.is_empty() {
                    form.error = Some("Title is required".to_string());
                    return ScreenOutcome::None;
                }
                form.error = None;
                form.submitting = true;
                let description = Some(form.description.value().trim())
                    .filter(|d| !d.is_empty())
                    .map(str::to_string);
                let equipment_ids: Vec<i64> = form.selected.iter().copied().collect();
                let editing = form.editing;
                let status = form.status;
                let api = ctx.api.clone();
                let tx = ctx.tx.clone();
                tokio::spawn(async move {
                    let result = match editing {
                        Some(id) => {
                            let payload = LabWorkUpdate {
                                title: Some(title),
                                description,
                                equipment_ids: Some(equipment_ids),
                                status,
                            };
                            api.update_lab_work(id, &payload).await.map(|_| ())
                        }
                        None => {
                            let payload = LabWorkCreate {
                                title,
                                description,
                                equipment_ids,
                            };
                            api.create_lab_work(&payload).await.map(|_| ())
                        }
                    }
                    .map_err(|e| e.message());
                    let _ = tx.send(Msg::Api(ApiMsg::MutationDone {
                        route: Route::LabWorks,
                        result,
                    }));
                });
            }
            _ => {
                let input = match form.focus {
                    0 => &mut form.title,
                    1 => &mut form.description,
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
