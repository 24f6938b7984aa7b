//! Auth endpoints

use super::ApiClient;
use crate::{ClientError, ClientResult};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest};

impl ApiClient {
    /// Login with username and password. On success the credential is
    /// stored in the session (memory and durable store).
    ///
    /// A 401 here means bad credentials, not an expired session, so the
    /// forced-logout interceptor is bypassed and the caller gets a plain
    /// validation error to display.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self
            .http
            .post("auth/login", &request)
            .await
            .map_err(|e| match e {
                ClientError::Unauthorized => {
                    ClientError::Validation("Invalid username or password".to_string())
                }
                other => other,
            })?;

        self.session().login(
            response.token.clone(),
            response.role,
            response.username.clone(),
        );
        tracing::debug!(username = %response.username, role = %response.role, "logged in");
        Ok(response)
    }

    /// Register a new account. The response body is not used.
    ///
    /// As with `login`, a 401 here rejects the submitted form rather
    /// than an existing session, so it surfaces as a validation error.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        self.http
            .post_unit("auth/register", request)
            .await
            .map_err(|e| match e {
                ClientError::Unauthorized => {
                    ClientError::Validation("Registration was rejected".to_string())
                }
                other => other,
            })
    }

    /// Logout. The backend holds no session state, so this is a purely
    /// local clear of the stored credential.
    pub fn logout(&self) {
        self.session().logout();
    }
}
