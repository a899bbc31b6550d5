//! # API Client
//!
//! Maps each remote operation to a request and classifies what comes back.
//!
//! ```text
//! authenticate    POST   /user/login              -> {token, user}
//! register        POST   /user/signup             -> {user, token?} | {message}
//! update_profile  PATCH  /user/update             -> {user}
//! list_notes      GET    /todo/get-all            -> {todos}
//! create_note     POST   /todo/create             -> ack
//! update_note     PATCH  /todo/update-todo/{id}   -> ack
//! delete_note     DELETE /todo/delete-todo/{id}   -> ack
//! ```
//!
//! Every failure is one of three [`ApiError`] kinds: no response, a
//! non-success status, or a success status with an unexpected body. Status
//! codes are not interpreted any further here.

use crate::error::ApiError;
use crate::model::{Credentials, NewAccount, Note, NoteDraft, ProfileUpdate, UserProfile};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub mod http;
#[cfg(any(test, feature = "test_utils"))]
pub mod mock;
pub mod transport;

pub use transport::{ApiRequest, ApiResponse, Method, Transport};

/// Text the signup route uses to report an existing account (sic).
const USER_EXISTS_MESSAGE: &str = "user already exsist";

/// Token and profile issued by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub token: String,
    pub user: UserProfile,
}

/// Result of a signup exchange the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created {
        user: UserProfile,
        token: Option<String>,
    },
    /// An account with this email already exists.
    Conflict,
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
    user: UserProfile,
}

#[derive(Deserialize)]
struct SignupBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct UserBody {
    user: UserProfile,
}

#[derive(Deserialize)]
struct NotesBody {
    todos: Vec<Note>,
}

pub struct ApiClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        let request = ApiRequest::new(Method::Post, "/user/login").with_body(to_body(credentials)?);
        let body: LoginBody = self.call(&request).await?;
        if body.token.trim().is_empty() {
            return Err(ApiError::MalformedResponse("empty token".to_string()));
        }
        Ok(AuthGrant {
            token: body.token,
            user: complete_profile(body.user)?,
        })
    }

    pub async fn register(&self, account: &NewAccount) -> Result<Registration, ApiError> {
        let request = ApiRequest::new(Method::Post, "/user/signup").with_body(to_body(account)?);
        let body: SignupBody = self.call(&request).await?;

        if body
            .message
            .as_deref()
            .is_some_and(is_user_exists_message)
        {
            return Ok(Registration::Conflict);
        }
        match body.user {
            Some(user) => Ok(Registration::Created {
                user: complete_profile(user)?,
                token: body.token.filter(|t| !t.trim().is_empty()),
            }),
            None => Err(ApiError::MalformedResponse(
                "signup response has no user".to_string(),
            )),
        }
    }

    pub async fn update_profile(
        &self,
        token: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::new(Method::Patch, "/user/update")
            .with_token(token)
            .with_body(to_body(update)?);
        let body: UserBody = self.call(&request).await?;
        complete_profile(body.user)
    }

    pub async fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>, ApiError> {
        let request = ApiRequest::new(Method::Get, "/todo/get-all").with_token(token);
        let body: NotesBody = self.call(&request).await?;
        Ok(body.todos)
    }

    pub async fn create_note(&self, token: Option<&str>, draft: &NoteDraft) -> Result<(), ApiError> {
        let request = ApiRequest::new(Method::Post, "/todo/create")
            .with_token(token)
            .with_body(to_body(draft)?);
        self.acknowledge(&request).await
    }

    pub async fn update_note(
        &self,
        token: Option<&str>,
        id: &str,
        draft: &NoteDraft,
    ) -> Result<(), ApiError> {
        let request = ApiRequest::new(Method::Patch, format!("/todo/update-todo/{}", id))
            .with_token(token)
            .with_body(to_body(draft)?);
        self.acknowledge(&request).await
    }

    pub async fn delete_note(&self, token: Option<&str>, id: &str) -> Result<(), ApiError> {
        let request =
            ApiRequest::new(Method::Delete, format!("/todo/delete-todo/{}", id)).with_token(token);
        self.acknowledge(&request).await
    }

    async fn call<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R, ApiError> {
        let response = self.exchange(request).await?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    /// Any success status counts; the body is not inspected.
    async fn acknowledge(&self, request: &ApiRequest) -> Result<(), ApiError> {
        self.exchange(request).await.map(|_| ())
    }

    async fn exchange(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.transport.send(request).await?;
        debug!(method = %request.method, path = %request.path, status = response.status, "api response");
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Rejected {
                status: response.status,
                message: rejection_message(&response.body),
            })
        }
    }
}

fn to_body<B: serde::Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// A profile with a blank name or email is not usable as a session user.
fn complete_profile(user: UserProfile) -> Result<UserProfile, ApiError> {
    if user.is_well_formed() {
        Ok(user)
    } else {
        Err(ApiError::MalformedResponse(
            "response has an incomplete user".to_string(),
        ))
    }
}

fn is_user_exists_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message == USER_EXISTS_MESSAGE || message.contains("already exist")
}

/// Prefers a JSON `message` field, then the raw body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;
    use serde_json::json;

    fn credentials() -> Credentials {
        Credentials {
            email: "ada@example.com".into(),
            password: "Passw0rd!".into(),
        }
    }

    fn draft() -> NoteDraft {
        NoteDraft {
            title: "Groceries".into(),
            description: "Buy milk and eggs".into(),
        }
    }

    #[tokio::test]
    async fn authenticate_sends_credentials_without_token() {
        let transport = MockTransport::new().respond(
            200,
            json!({"token": "tok", "user": {"name": "Ada", "email": "ada@example.com"}}),
        );
        let client = ApiClient::new(transport);

        let grant = client.authenticate(&credentials()).await.unwrap();
        assert_eq!(grant.token, "tok");
        assert_eq!(grant.user.name, "Ada");

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/user/login");
        assert_eq!(requests[0].token, None);
        assert_eq!(
            requests[0].body,
            Some(json!({"email": "ada@example.com", "password": "Passw0rd!"}))
        );
    }

    #[tokio::test]
    async fn authenticate_rejection_carries_status_and_message() {
        let transport = MockTransport::new().respond(401, json!({"message": "wrong password"}));
        let client = ApiClient::new(transport);

        let err = client.authenticate(&credentials()).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 401,
                message: "wrong password".into()
            }
        );
    }

    #[tokio::test]
    async fn rejection_without_json_uses_raw_body() {
        let transport = MockTransport::new().respond_raw(502, " Bad Gateway ");
        let client = ApiClient::new(transport);

        let err = client.list_notes(Some("tok")).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }

    #[tokio::test]
    async fn authenticate_empty_token_is_malformed() {
        let transport = MockTransport::new().respond(
            200,
            json!({"token": "", "user": {"name": "Ada", "email": "ada@example.com"}}),
        );
        let client = ApiClient::new(transport);

        let err = client.authenticate(&credentials()).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn blank_user_is_malformed() {
        let blank = json!({"token": "tok", "user": {"name": "", "email": ""}});
        let transport = MockTransport::new()
            .respond(200, blank.clone())
            .respond(201, blank.clone())
            .respond(200, blank);
        let client = ApiClient::new(transport);
        let account = NewAccount {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "Passw0rd!".into(),
        };
        let update = ProfileUpdate {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };

        assert!(matches!(
            client.authenticate(&credentials()).await,
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            client.register(&account).await,
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            client.update_profile(Some("tok"), &update).await,
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn success_with_wrong_shape_is_malformed() {
        let transport = MockTransport::new().respond(200, json!({"message": "success"}));
        let client = ApiClient::new(transport);

        let err = client.list_notes(Some("tok")).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn network_failure_passes_through() {
        let transport =
            MockTransport::new().fail(ApiError::NetworkFailure("connection refused".into()));
        let client = ApiClient::new(transport);

        let err = client.list_notes(None).await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkFailure(_)));
    }

    #[tokio::test]
    async fn register_detects_existing_account() {
        let transport = MockTransport::new().respond(200, json!({"message": "user already exsist"}));
        let client = ApiClient::new(transport);

        let account = NewAccount {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "Passw0rd!".into(),
        };
        assert_eq!(
            client.register(&account).await.unwrap(),
            Registration::Conflict
        );
    }

    #[tokio::test]
    async fn register_created_with_optional_token() {
        let transport = MockTransport::new()
            .respond(
                201,
                json!({"message": "success", "user": {"name": "Ada", "email": "ada@example.com"}}),
            )
            .respond(
                200,
                json!({"token": "tok", "user": {"name": "Bob", "email": "bob@example.com"}}),
            );
        let client = ApiClient::new(transport);
        let account = NewAccount {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "Passw0rd!".into(),
        };

        assert_eq!(
            client.register(&account).await.unwrap(),
            Registration::Created {
                user: UserProfile::new("Ada", "ada@example.com"),
                token: None
            }
        );
        assert_eq!(
            client.register(&account).await.unwrap(),
            Registration::Created {
                user: UserProfile::new("Bob", "bob@example.com"),
                token: Some("tok".into())
            }
        );
    }

    #[tokio::test]
    async fn list_notes_attaches_token() {
        let transport = MockTransport::new().respond(
            200,
            json!({"todos": [
                {"_id": "1", "title": "Groceries", "description": "Buy milk and eggs"},
                {"_id": "2", "title": "Chores", "description": "Laundry"}
            ]}),
        );
        let client = ApiClient::new(transport);

        let notes = client.list_notes(Some("tok")).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].id, "2");

        let requests = client.transport().requests();
        assert_eq!(requests[0].token.as_deref(), Some("tok"));
        assert_eq!(requests[0].path, "/todo/get-all");
    }

    #[tokio::test]
    async fn note_mutations_use_id_routes() {
        let transport = MockTransport::new()
            .respond(201, json!({"message": "created"}))
            .respond(200, json!({}))
            .respond_raw(204, "");
        let client = ApiClient::new(transport);

        client.create_note(Some("tok"), &draft()).await.unwrap();
        client.update_note(Some("tok"), "abc", &draft()).await.unwrap();
        client.delete_note(Some("tok"), "abc").await.unwrap();

        assert_eq!(
            client.transport().calls(),
            vec![
                "POST /todo/create",
                "PATCH /todo/update-todo/abc",
                "DELETE /todo/delete-todo/abc",
            ]
        );
        let requests = client.transport().requests();
        assert_eq!(
            requests[0].body,
            Some(json!({"title": "Groceries", "description": "Buy milk and eggs"}))
        );
        assert_eq!(requests[2].body, None);
    }

    #[tokio::test]
    async fn update_profile_returns_new_user() {
        let transport = MockTransport::new().respond(
            200,
            json!({"user": {"name": "Ada King", "email": "ada@example.com"}}),
        );
        let client = ApiClient::new(transport);
        let update = ProfileUpdate {
            name: "Ada King".into(),
            email: "ada@example.com".into(),
        };

        let user = client.update_profile(Some("tok"), &update).await.unwrap();
        assert_eq!(user.name, "Ada King");
        assert_eq!(client.transport().requests()[0].method, Method::Patch);
    }
}
