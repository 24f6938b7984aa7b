//! Application state: routing, session ownership and message dispatch

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use labreserve_client::{ApiClient, SessionEvent};
use shared::models::{Lab, Role};
use tokio::sync::mpsc::UnboundedSender;

use crate::gate;
use crate::msg::{ApiMsg, Msg};
use crate::screens::{
    EquipmentScreen, LabWorksScreen, LabsScreen, LoginScreen, RegisterScreen, ReservationsScreen,
};
use crate::screens::lab_works::LabWorkView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Labs,
    Equipment,
    LabWorks,
    Reservations,
}

impl Route {
    pub fn requires_auth(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Register => "Register",
            Route::Labs => "Labs",
            Route::Equipment => "Equipment",
            Route::LabWorks => "Lab works",
            Route::Reservations => "Reservations",
        }
    }
}

/// Handles the screens need to spawn API calls
#[derive(Debug, Clone)]
pub struct Ctx {
    pub api: Arc<ApiClient>,
    pub tx: UnboundedSender<Msg>,
}

/// What a screen wants the application to do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenOutcome {
    None,
    Quit,
    Navigate(Route),
    Refresh,
}

pub struct App {
    pub route: Route,
    pub running: bool,
    /// One-shot banner shown in the status line
    pub notice: Option<String>,
    ctx: Ctx,
    /// Lab catalog shared by several screens (labs list, equipment
    /// filter and form, composer)
    pub labs_catalog: Vec<Lab>,
    labs_generation: u64,
    pub labs_loading: bool,
    pub labs_error: Option<String>,
    pub login: LoginScreen,
    pub register: RegisterScreen,
    pub labs: LabsScreen,
    pub equipment: EquipmentScreen,
    pub lab_works: LabWorksScreen,
    pub reservations: ReservationsScreen,
}

impl App {
    pub fn new(api: Arc<ApiClient>, tx: UnboundedSender<Msg>) -> Self {
        let mut app = Self {
            route: Route::Login,
            running: true,
            notice: None,
            ctx: Ctx { api, tx },
            labs_catalog: Vec::new(),
            labs_generation: 0,
            labs_loading: false,
            labs_error: None,
            login: LoginScreen::new(),
            register: RegisterScreen::new(),
            labs: LabsScreen::new(),
            equipment: EquipmentScreen::new(),
            lab_works: LabWorksScreen::new(),
            reservations: ReservationsScreen::new(),
        };
        // A persisted session skips the login screen.
        if app.ctx.api.session().is_authenticated() {
            app.navigate(Route::Labs);
        }
        app
    }

    pub fn role(&self) -> Option<Role> {
        self.ctx.api.session().role()
    }

    pub fn username(&self) -> Option<String> {
        self.ctx.api.session().username()
    }

    /// Route change with the auth guard: protected routes without a
    /// credential collapse to the login screen. Entering a data route
    /// kicks off its loads.
    pub fn navigate(&mut self, route: Route) {
        let route = if route.requires_auth() && !self.ctx.api.session().is_authenticated() {
            Route::Login
        } else {
            route
        };
        self.route = route;
        match route {
            Route::Labs => self.refresh_labs(),
            Route::Equipment => {
                self.refresh_labs();
                self.refresh_equipment();
            }
            Route::LabWorks => self.refresh_lab_works(),
            Route::Reservations => {
                self.refresh_labs();
                self.refresh_reservations();
            }
            Route::Login | Route::Register => {}
        }
    }

    fn refresh_labs(&mut self) {
        self.labs_generation += 1;
        self.labs_loading = true;
        let generation = self.labs_generation;
        let api = self.ctx.api.clone();
        let tx = self.ctx.tx.clone();
        tokio::spawn(async move {
            let result = api.labs().await.map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::LabsLoaded { generation, result }));
        });
    }

    fn refresh_equipment(&mut self) {
        let generation = self.equipment.begin_load();
        let filter = self.equipment.filter_lab;
        let api = self.ctx.api.clone();
        let tx = self.ctx.tx.clone();
        tokio::spawn(async move {
            let result = match filter {
                Some(lab_id) => api.equipment_by_lab(lab_id).await,
                None => api.equipment().await,
            }
            .map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::EquipmentLoaded { generation, result }));
        });
    }

    fn refresh_lab_works(&mut self) {
        let generation = self.lab_works.begin_load();
        let view = self.lab_works.view;
        let api = self.ctx.api.clone();
        let tx = self.ctx.tx.clone();
        tokio::spawn(async move {
            let result = match view {
                LabWorkView::All => api.lab_works().await,
                LabWorkView::Mine => api.my_lab_works().await,
                LabWorkView::Published => api.published_lab_works().await,
            }
            .map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::LabWorksLoaded { generation, result }));
        });
    }

    fn refresh_reservations(&mut self) {
        let generation = self.reservations.begin_load();
        let privileged = self.role().is_some_and(|r| r.is_privileged());
        let api = self.ctx.api.clone();
        let tx = self.ctx.tx.clone();
        tokio::spawn(async move {
            // Privileged roles review everything; others see their own.
            let result = if privileged {
                api.reservations().await
            } else {
                api.my_reservations().await
            }
            .map_err(|e| e.message());
            let _ = tx.send(Msg::Api(ApiMsg::ReservationsLoaded { generation, result }));
        });
    }

    fn refresh_current(&mut self) {
        match self.route {
            Route::Labs => self.refresh_labs(),
            Route::Equipment => self.refresh_equipment(),
            Route::LabWorks => self.refresh_lab_works(),
            Route::Reservations => self.refresh_reservations(),
            Route::Login | Route::Register => {}
        }
    }

    fn reset_screens(&mut self) {
        self.login.reset();
        self.register.reset();
        self.labs.reset();
        self.equipment.reset();
        self.lab_works.reset();
        self.reservations.reset();
        self.labs_catalog.clear();
        self.labs_loading = false;
        self.labs_error = None;
    }

    /// Whether the focused screen consumes plain character keys.
    fn capturing(&self) -> bool {
        match self.route {
            Route::Login | Route::Register => true,
            Route::Labs => self.labs.capturing(),
            Route::Equipment => self.equipment.capturing(),
            Route::LabWorks => self.lab_works.capturing(),
            Route::Reservations => self.reservations.capturing(),
        }
    }

    pub fn update(&mut self, msg: Msg) {
        match msg {
            Msg::Key(key) => self.on_key(key),
            Msg::Session(SessionEvent::Expired) => {
                tracing::info!("session expired, returning to login");
                self.reset_screens();
                self.notice = Some("Session expired, please sign in again".to_string());
                self.route = Route::Login;
            }
            Msg::Api(api) => self.on_api(api),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }
        if !self.capturing() {
            match key.code {
                KeyCode::Char('q') => {
                    self.running = false;
                    return;
                }
                KeyCode::Char('1') => return self.navigate(Route::Labs),
                KeyCode::Char('2') => return self.navigate(Route::Equipment),
                KeyCode::Char('3') => return self.navigate(Route::LabWorks),
                KeyCode::Char('4') => return self.navigate(Route::Reservations),
                KeyCode::Char('o') => {
                    self.ctx.api.session().logout();
                    self.reset_screens();
                    self.notice = Some("Signed out".to_string());
                    self.route = Route::Login;
                    return;
                }
                _ => {}
            }
        }
        let ctx = self.ctx.clone();
        let role = self.role();
        let username = self.username();
        let outcome = match self.route {
            Route::Login => self.login.on_key(key, &ctx),
            Route::Register => self.register.on_key(key, &ctx),
            Route::Labs => {
                let can_manage = gate::can_manage_resources(role);
                self.labs.on_key(key, &ctx, &self.labs_catalog, can_manage)
            }
            Route::Equipment => {
                let can_manage = gate::can_manage_resources(role);
                self.equipment
                    .on_key(key, &ctx, &self.labs_catalog, can_manage)
            }
            Route::LabWorks => self.lab_works.on_key(key, &ctx, role, username.as_deref()),
            Route::Reservations => {
                self.reservations
                    .on_key(key, &ctx, &self.labs_catalog, role, username.as_deref())
            }
        };
        match outcome {
            ScreenOutcome::None => {}
            ScreenOutcome::Quit => self.running = false,
            ScreenOutcome::Navigate(route) => self.navigate(route),
            ScreenOutcome::Refresh => self.refresh_current(),
        }
    }

    fn on_api(&mut self, msg: ApiMsg) {
        match msg {
            ApiMsg::LoginDone(result) => {
                self.login.apply_result(&result);
                if result.is_ok() {
                    self.notice = None;
                    self.navigate(Route::Labs);
                }
            }
            ApiMsg::RegisterDone(result) => {
                self.register.apply_result(&result);
                if result.is_ok() {
                    self.notice = Some("Account created, sign in".to_string());
                    self.navigate(Route::Login);
                }
            }
            ApiMsg::LabsLoaded { generation, result } => {
                if generation != self.labs_generation {
                    return;
                }
                self.labs_loading = false;
                match result {
                    Ok(labs) => {
                        self.labs_catalog = labs;
                        self.labs_error = None;
                    }
                    Err(message) => self.labs_error = Some(message),
                }
            }
            ApiMsg::EquipmentLoaded { generation, result } => {
                self.equipment.apply_loaded(generation, result);
            }
            ApiMsg::LabWorksLoaded { generation, result } => {
                self.lab_works.apply_loaded(generation, result);
            }
            ApiMsg::ReservationsLoaded { generation, result } => {
                self.reservations.apply_loaded(generation, result);
            }
            ApiMsg::PublishedLoaded(result) => self.reservations.apply_published(result),
            ApiMsg::LabInventoryLoaded { lab_id, result } => {
                self.reservations.apply_inventory(lab_id, result);
            }
            ApiMsg::LabWorkOptionsLoaded(result) => self.lab_works.apply_options(result),
            ApiMsg::ReservationSubmitted(result) => {
                if self.reservations.apply_submitted(&result) {
                    self.refresh_reservations();
                }
            }
            ApiMsg::MutationDone { route, result } => {
                let refresh = match route {
                    Route::Labs => self.labs.apply_mutation(&result),
                    Route::Equipment => self.equipment.apply_mutation(&result),
                    Route::LabWorks => self.lab_works.apply_mutation(&result),
                    Route::Reservations => self.reservations.apply_mutation(&result),
                    Route::Login | Route::Register => false,
                };
                if refresh {
                    match route {
                        Route::Labs => self.refresh_labs(),
                        Route::Equipment => self.refresh_equipment(),
                        Route::LabWorks => self.refresh_lab_works(),
                        Route::Reservations => self.refresh_reservations(),
                        Route::Login | Route::Register => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labreserve_client::{ClientConfig, SessionHandle, SessionStore};
    use shared::client::LoginResponse;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn test_app() -> (App, TempDir, mpsc::UnboundedReceiver<Msg>) {
        let dir = TempDir::new().unwrap();
        let session = SessionHandle::new(SessionStore::new(dir.path()));
        // Nothing listens here; spawned calls fail and their messages
        // land in rx, which these tests drain or ignore.
        let config = ClientConfig::new("http://127.0.0.1:9/api");
        let api = Arc::new(ApiClient::new(&config, session).unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(api, tx);
        (app, dir, rx)
    }

    fn lab(id: i64) -> Lab {
        Lab {
            id,
            name: format!("lab-{}", id),
            location: "B".to_string(),
            capacity: 10,
            description: None,
        }
    }

    #[tokio::test]
    async fn protected_routes_collapse_to_login_without_a_session() {
        let (mut app, _dir, _rx) = test_app();
        assert_eq!(app.route, Route::Login);

        app.navigate(Route::Reservations);
        assert_eq!(app.route, Route::Login);

        // Register stays reachable.
        app.navigate(Route::Register);
        assert_eq!(app.route, Route::Register);
    }

    #[tokio::test]
    async fn login_success_lands_on_labs() {
        let (mut app, _dir, _rx) = test_app();
        // The gateway stores the credential before LoginDone arrives.
        app.ctx
            .api
            .session()
            .login("tok".to_string(), Role::Student, "alice".to_string());
        app.update(Msg::Api(ApiMsg::LoginDone(Ok(LoginResponse {
            token: "tok".to_string(),
            role: Role::Student,
            username: "alice".to_string(),
        }))));
        assert_eq!(app.route, Route::Labs);
        assert!(app.labs_loading);
    }

    #[tokio::test]
    async fn stale_labs_response_is_discarded() {
        let (mut app, _dir, _rx) = test_app();
        app.ctx
            .api
            .session()
            .login("tok".to_string(), Role::Admin, "boss".to_string());
        app.navigate(Route::Labs);
        let stale = app.labs_generation;
        app.refresh_labs();

        app.update(Msg::Api(ApiMsg::LabsLoaded {
            generation: stale,
            result: Ok(vec![lab(1)]),
        }));
        assert!(app.labs_catalog.is_empty());
        assert!(app.labs_loading);

        app.update(Msg::Api(ApiMsg::LabsLoaded {
            generation: app.labs_generation,
            result: Ok(vec![lab(2)]),
        }));
        assert_eq!(app.labs_catalog.len(), 1);
        assert!(!app.labs_loading);
    }

    #[tokio::test]
    async fn expiry_event_resets_everything_to_login() {
        let (mut app, _dir, _rx) = test_app();
        app.ctx
            .api
            .session()
            .login("tok".to_string(), Role::Student, "alice".to_string());
        app.navigate(Route::Reservations);
        assert_eq!(app.route, Route::Reservations);
        app.labs_catalog = vec![lab(1)];

        app.update(Msg::Session(SessionEvent::Expired));
        assert_eq!(app.route, Route::Login);
        assert!(app.labs_catalog.is_empty());
        assert_eq!(
            app.notice.as_deref(),
            Some("Session expired, please sign in again")
        );
    }

    #[tokio::test]
    async fn successful_mutation_triggers_a_refresh() {
        let (mut app, _dir, _rx) = test_app();
        app.ctx
            .api
            .session()
            .login("tok".to_string(), Role::Admin, "boss".to_string());
        app.navigate(Route::Labs);
        let before = app.labs_generation;

        app.update(Msg::Api(ApiMsg::MutationDone {
            route: Route::Labs,
            result: Ok(()),
        }));
        assert!(app.labs_generation > before);

        // A failed one surfaces the error instead.
        app.update(Msg::Api(ApiMsg::MutationDone {
            route: Route::Labs,
            result: Err("Access denied".to_string()),
        }));
        assert_eq!(app.labs.error.as_deref(), Some("Access denied"));
    }
}
