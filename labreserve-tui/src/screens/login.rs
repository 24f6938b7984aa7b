//! Login screen

use crossterm::event::{Event, KeyCode, KeyEvent};
use shared::client::LoginResponse;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::app::{Ctx, Route, ScreenOutcome};
use crate::msg::{ApiMsg, Msg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginScreen {
    pub username: Input,
    pub password: Input,
    pub focus: LoginField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl LoginScreen {
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
            KeyCode::Esc => return ScreenOutcome::Quit,
            KeyCode::F(2) => return ScreenOutcome::Navigate(Route::Register),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
                self.focus = match self.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            KeyCode::Enter => self.submit(ctx),
            _ => {
                let input = match self.focus {
                    LoginField::Username => &mut self.username,
                    LoginField::Password => &mut self.password,
                };
                input.handle_event(&Event::Key(key));
            }
        }
        ScreenOutcome::None
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

        let api = ctx.api.clone();
        let tx = ctx.tx.clone();
        tokio::spawn(async move {
            let result = api
                .login(&username, &password)
                .await
                .map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::LoginDone(result)));
        });
    }

    pub fn apply_result(&mut self, result: &Result<LoginResponse, String>) {
        self.submitting = false;
        match result {
            Ok(_) => self.reset(),
            Err(message) => self.error = Some(message.clone()),
        }
    }
}
