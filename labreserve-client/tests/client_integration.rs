// Gateway integration tests against an in-process mock backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use labreserve_client::{
    ApiClient, ClientConfig, ClientError, SessionEvent, SessionHandle, SessionStore,
};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest};
use shared::models::{Lab, Reservation, ReservationStatus, Role};
use tempfile::TempDir;

fn sample_reservation(id: i64, status: ReservationStatus) -> Reservation {
    let start = Utc::now() + Duration::hours(2);
    Reservation {
        id,
        lab_id: 1,
        lab_name: Some("Physics Lab".to_string()),
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

async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client_for(base_url: &str, dir: &TempDir) -> ApiClient {
    let session = SessionHandle::new(SessionStore::new(dir.path()));
    ApiClient::new(&ClientConfig::new(base_url), session).unwrap()
}

#[tokio::test]
async fn session_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    assert!(store.load().is_none());

    let mut data = labreserve_client::SessionData::new();
    data.set_login("tok-1".to_string(), Role::Student, "alice".to_string());
    store.save(&data).unwrap();
    assert!(store.exists());

    let loaded = store.load().unwrap();
    assert_eq!(loaded.token(), Some("tok-1"));
    assert_eq!(loaded.role, Some(Role::Student));

    store.delete().unwrap();
    assert!(!store.exists());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn session_handle_rehydrates_from_store() {
    let dir = TempDir::new().unwrap();

    let handle = SessionHandle::new(SessionStore::new(dir.path()));
    assert!(!handle.is_authenticated());
    handle.login("tok-2".to_string(), Role::Admin, "boss".to_string());

    // A fresh handle over the same directory sees the persisted session.
    let rehydrated = SessionHandle::new(SessionStore::new(dir.path()));
    assert!(rehydrated.is_authenticated());
    assert_eq!(rehydrated.token().as_deref(), Some("tok-2"));
    assert_eq!(rehydrated.role(), Some(Role::Admin));

    rehydrated.logout();
    assert!(!SessionHandle::new(SessionStore::new(dir.path())).is_authenticated());
}

#[tokio::test]
async fn login_stores_token_and_role() {
    async fn login(Json(req): Json<LoginRequest>) -> (StatusCode, Json<serde_json::Value>) {
        assert_eq!(req.username, "alice");
        assert_eq!(req.password, "secret");
        let res = LoginResponse {
            token: "jwt-abc".to_string(),
            role: Role::Student,
            username: "alice".to_string(),
        };
        (StatusCode::OK, Json(serde_json::to_value(res).unwrap()))
    }

    let base = spawn_backend(Router::new().route("/api/auth/login", post(login))).await;
    let dir = TempDir::new().unwrap();
    let api = client_for(&base, &dir);

    let res = api.login("alice", "secret").await.unwrap();
    assert_eq!(res.token, "jwt-abc");
    assert_eq!(api.session().token().as_deref(), Some("jwt-abc"));
    assert_eq!(api.session().role(), Some(Role::Student));

    // Durable storage was written.
    let rehydrated = SessionHandle::new(SessionStore::new(dir.path()));
    assert_eq!(rehydrated.token().as_deref(), Some("jwt-abc"));
}

#[tokio::test]
async fn login_rejection_is_a_form_error_not_an_expiry() {
    async fn login() -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"message": "Bad credentials"})),
        )
    }

    let base = spawn_backend(Router::new().route("/api/auth/login", post(login))).await;
    let dir = TempDir::new().unwrap();
    let api = client_for(&base, &dir);
    let mut events = api.session().subscribe();

    let err = api.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(err.message(), "Invalid username or password");
    assert!(!api.session().is_authenticated());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn register_rejection_is_a_form_error_not_an_expiry() {
    async fn register() -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    let base = spawn_backend(Router::new().route("/api/auth/register", post(register))).await;
    let dir = TempDir::new().unwrap();
    let api = client_for(&base, &dir);
    let mut events = api.session().subscribe();

    let request = RegisterRequest {
        username: "alice".to_string(),
        password: "secret".to_string(),
        role: Some(Role::Student),
    };
    let err = api.register(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(err.message(), "Registration was rejected");
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn unauthorized_clears_session_and_notifies() {
    async fn labs() -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    let base = spawn_backend(Router::new().route("/api/labs", get(labs))).await;
    let dir = TempDir::new().unwrap();
    let api = client_for(&base, &dir);

    api.session()
        .login("stale-token".to_string(), Role::Student, "alice".to_string());
    let mut events = api.session().subscribe();

    let err = api.labs().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));

    // Forced logout: memory and durable store cleared, owner notified.
    assert!(!api.session().is_authenticated());
    assert!(!SessionStore::new(dir.path()).exists());
    assert!(matches!(events.try_recv(), Ok(SessionEvent::Expired)));
}

#[tokio::test]
async fn server_message_reaches_the_caller() {
    async fn labs() -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({"error": "Managers only"})),
        )
    }

    let base = spawn_backend(Router::new().route("/api/labs", get(labs))).await;
    let dir = TempDir::new().unwrap();
    let api = client_for(&base, &dir);

    let err = api.labs().await.unwrap_err();
    assert_eq!(err.message(), "Managers only");
}

#[tokio::test]
async fn approve_then_refresh_shows_new_status() {
    type Board = Arc<Mutex<Vec<Reservation>>>;

    async fn list(State(board): State<Board>) -> Json<Vec<Reservation>> {
        Json(board.lock().unwrap().clone())
    }

    async fn approve(
        State(board): State<Board>,
        Path(id): Path<i64>,
    ) -> Result<Json<Reservation>, StatusCode> {
        let mut board = board.lock().unwrap();
        let row = board
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StatusCode::NOT_FOUND)?;
        row.status = ReservationStatus::Approved;
        row.approved_by = Some("manager".to_string());
        Ok(Json(row.clone()))
    }

    let board: Board = Arc::new(Mutex::new(vec![
        sample_reservation(42, ReservationStatus::Pending),
        sample_reservation(43, ReservationStatus::Pending),
    ]));
    let app = Router::new()
        .route("/api/reservations", get(list))
        .route("/api/reservations/{id}/approve", patch(approve))
        .with_state(board);

    let base = spawn_backend(app).await;
    let dir = TempDir::new().unwrap();
    let api = client_for(&base, &dir);

    let approved = api.approve_reservation(42).await.unwrap();
    assert_eq!(approved.status, ReservationStatus::Approved);

    let refreshed = api.reservations().await.unwrap();
    let row = refreshed.iter().find(|r| r.id == 42).unwrap();
    assert_eq!(row.status, ReservationStatus::Approved);
    let other = refreshed.iter().find(|r| r.id == 43).unwrap();
    assert_eq!(other.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn create_reservation_round_trips_payload() {
    async fn create(
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<Reservation>) {
        // The wire payload is camelCase and omits absent optionals.
        assert_eq!(body["labId"], 1);
        assert!(body.get("labWorkId").is_none());
        assert_eq!(body["equipmentIds"], serde_json::json!([5, 6]));
        assert!(body.get("startTime").is_some());
        (
            StatusCode::CREATED,
            Json(sample_reservation(77, ReservationStatus::Pending)),
        )
    }

    let base = spawn_backend(Router::new().route("/api/reservations", post(create))).await;
    let dir = TempDir::new().unwrap();
    let api = client_for(&base, &dir);

    let start = Utc::now() + Duration::hours(3);
    let payload = shared::models::ReservationCreate {
        lab_id: 1,
        lab_work_id: None,
        equipment_ids: vec![5, 6],
        start_time: start,
        end_time: start + Duration::hours(1),
        purpose: None,
    };
    let created = api.create_reservation(&payload).await.unwrap();
    assert_eq!(created.id, 77);
    assert!(created.status.is_pending());
}

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    async fn labs(headers: axum::http::HeaderMap) -> Json<Vec<Lab>> {
        assert_eq!(
            headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer tok-9")
        );
        Json(vec![Lab {
            id: 1,
            name: "Physics Lab".to_string(),
            location: "B-101".to_string(),
            capacity: 12,
            description: None,
        }])
    }

    let base = spawn_backend(Router::new().route("/api/labs", get(labs))).await;
    let dir = TempDir::new().unwrap();
    let api = client_for(&base, &dir);
    api.session()
        .login("tok-9".to_string(), Role::Admin, "boss".to_string());

    let labs = api.labs().await.unwrap();
    assert_eq!(labs.len(), 1);
}
