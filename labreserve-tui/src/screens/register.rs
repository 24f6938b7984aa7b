//! Registration screen

use crossterm::event::{Event, KeyCode, KeyEvent};
use shared::client::RegisterRequest;
use shared::models::Role;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::app::{Ctx, Route, ScreenOutcome};
use crate::msg::{ApiMsg, Msg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterField {
    #[default]
    Username,
    Password,
    Role,
}

#[derive(Debug)]
pub struct RegisterScreen {
    pub username: Input,
    pub password: Input,
    pub role: Role,
    pub focus: RegisterField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for RegisterScreen {
    fn default() -> Self {
        Self {
            username: Input::default(),
            password: Input::default(),
            role: Role::Student,
            focus: RegisterField::default(),
            submitting: false,
            error: None,
        }
    }
}

const ROLES: [Role; 3] = [Role::Student, Role::LabManager, Role::Admin];

impl RegisterScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn on_key(&mut self, key: KeyEvent, ctx: &Ctx) -> ScreenOutcome {
        if self.submitting {
            return ScreenOutcome::None;
        }
        match key.code {
            KeyCode::Esc => return ScreenOutcome::Navigate(Route::Login),
            KeyCode::Tab | KeyCode::Down => self.focus = self.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.prev_focus(),
            KeyCode::Enter => self.submit(ctx),
            KeyCode::Left | KeyCode::Right if self.focus == RegisterField::Role => {
                let pos = ROLES.iter().position(|r| *r == self.role).unwrap_or(0);
                let next = if key.code == KeyCode::Right {
                    (pos + 1) % ROLES.len()
                } else {
                    (pos + ROLES.len() - 1) % ROLES.len()
                };
                self.role = ROLES[next];
            }
            _ => {
                let input = match self.focus {
                    RegisterField::Username => &mut self.username,
                    RegisterField::Password => &mut self.password,
                    RegisterField::Role => return ScreenOutcome::None,
                };
                input.handle_event(&Event::Key(key));
            }
        }
        ScreenOutcome::None
    }

    fn next_focus(&self) -> RegisterField {
        match self.focus {
            RegisterField::Username => RegisterField::Password,
            RegisterField::Password => RegisterField::Role,
            RegisterField::Role => RegisterField::Username,
        }
    }

    fn prev_focus(&self) -> RegisterField {
        match self.focus {
            RegisterField::Username => RegisterField::Role,
            RegisterField::Password => RegisterField::Username,
            RegisterField::Role => RegisterField::Password,
        }
    }

    fn submit(&mut self, ctx: &Ctx) {
        let username = self.username.value().trim().to_string();
        let password = self.password.value().to_string();
        if username.is_empty() || password.is_empty() {
            self.error = Some("Enter username and password".to_string());
            return;
        }
        self.submitting = true;
        self.error = None;

        let request = RegisterRequest {
            username,
            password,
            role: Some(self.role),
        };
        let api = ctx.api.clone();
        let tx = ctx.tx.clone();
        tokio::spawn(async move {
            let result = api.register(&request).await.map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::RegisterDone(result)));
        });
    }

    pub fn apply_result(&mut self, result: &Result<(), String>) {
        self.submitting = false;
        match result {
            Ok(()) => self.reset(),
            Err(message) => self.error = Some(message.clone()),
        }
    }
}
