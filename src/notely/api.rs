//! # API Facade
//!
//! The API layer is a **thin facade** over the controllers. It is the single
//! entry point for one-shot clients such as the CLI: each call fills a
//! controller's form from plain arguments and submits it.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Owns** the session store, the API client and the notes list controller
//! - **Restores** the persisted session when it is built
//! - **Normalizes inputs** (list positions → note ids)
//! - **Returns structured types** (`Submission`, `&[Note]`)
//!
//! It does no validation, printing or status-code interpretation of its own;
//! that belongs to the controllers and to the UI respectively.
//!
//! ## Generic Over Storage and Transport
//!
//! - Production: `NotelyApi<FileStorage, HttpTransport>`
//! - Testing: `NotelyApi<MemoryStorage, MockTransport>`

use crate::client::{ApiClient, Transport};
use crate::controllers::login::LoginController;
use crate::controllers::notes::{ListState, NotesController};
use crate::controllers::profile::ProfileController;
use crate::controllers::register::RegisterController;
use crate::controllers::Submission;
use crate::error::{ApiError, NotelyError, Result};
use crate::model::Note;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::validation::Field;

pub struct NotelyApi<S: KeyValueStore, T: Transport> {
    session: SessionStore<S>,
    client: ApiClient<T>,
    notes: NotesController,
}

impl<S: KeyValueStore, T: Transport> NotelyApi<S, T> {
    /// Builds the facade and restores any persisted session.
    pub fn new(storage: S, transport: T) -> Result<Self> {
        let mut session = SessionStore::new(storage);
        session.restore()?;
        Ok(Self {
            session,
            client: ApiClient::new(transport),
            notes: NotesController::new(),
        })
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn notes(&self) -> &NotesController {
        &self.notes
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Submission> {
        let mut login = LoginController::new();
        login.change(Field::Email, email);
        login.change(Field::Password, password);
        login.submit(&mut self.session, &self.client).await
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Submission> {
        let mut register = RegisterController::new();
        register.change(Field::Name, name);
        register.change(Field::Email, email);
        register.change(Field::Password, password);
        register.change(Field::ConfirmPassword, confirm_password);
        register.submit(&mut self.session, &self.client).await
    }

    /// Fields left as `None` keep their current value.
    pub async fn update_profile(
        &mut self,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Submission> {
        let mut profile = ProfileController::new(&self.session);
        if let Some(name) = name {
            profile.change(Field::Name, name);
        }
        if let Some(email) = email {
            profile.change(Field::Email, email);
        }
        profile.submit(&mut self.session, &self.client).await
    }

    pub fn sign_out(&mut self) -> Result<()> {
        self.notes.dismiss();
        self.session.clear()
    }

    /// Fetches the full list from the server.
    pub async fn list_notes(&mut self) -> Result<&[Note]> {
        match self.notes.refresh(&self.session, &self.client).await {
            ListState::Populated => Ok(self.notes.notes()),
            _ => Err(NotelyError::Api(self.notes.last_error().cloned().unwrap_or_else(
                || ApiError::MalformedResponse("notes unavailable".to_string()),
            ))),
        }
    }

    pub async fn create_note(&mut self, title: &str, description: &str) -> Submission {
        let form = self.notes.create_form_mut();
        form.reset();
        form.change(Field::Title, title);
        form.change(Field::Description, description);
        self.notes.create(&self.session, &self.client).await
    }

    /// Edits a note by id. Fields left as `None` keep their current value.
    pub async fn update_note(
        &mut self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Submission> {
        self.ensure_loaded().await?;
        if !self.notes.begin_edit(id) {
            return Err(NotelyError::NotFound(id.to_string()));
        }
        if let Some(form) = self.notes.edit_form_mut() {
            if let Some(title) = title {
                form.change(Field::Title, title);
            }
            if let Some(description) = description {
                form.change(Field::Description, description);
            }
        }
        Ok(self.notes.save_edit(&self.session, &self.client).await)
    }

    pub async fn delete_note(&mut self, id: &str) -> Submission {
        self.notes.delete(id, &self.session, &self.client).await
    }

    /// Turns a 1-based list position or a note id into a note id.
    pub async fn resolve_note(&mut self, selector: &str) -> Result<String> {
        self.ensure_loaded().await?;
        let notes = self.notes.notes();

        if let Ok(position) = selector.parse::<usize>() {
            if let Some(note) = position.checked_sub(1).and_then(|i| notes.get(i)) {
                return Ok(note.id.clone());
            }
        }
        notes
            .iter()
            .find(|note| note.id == selector)
            .map(|note| note.id.clone())
            .ok_or_else(|| NotelyError::NotFound(selector.to_string()))
    }

    async fn ensure_loaded(&mut self) -> Result<()> {
        if self.notes.state() != ListState::Populated {
            self.list_notes().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::controllers::login::LOGIN_FAILURE;
    use crate::controllers::notes::{CREATE_SUCCESS, DELETE_SUCCESS};
    use crate::controllers::Notice;
    use crate::session::{TOKEN_KEY, USER_KEY};
    use crate::storage::memory::MemoryStorage;
    use serde_json::json;

    fn stored_session() -> MemoryStorage {
        MemoryStorage::with_entries(&[
            (TOKEN_KEY, "tok"),
            (USER_KEY, r#"{"name":"Ada","email":"ada@example.com"}"#),
        ])
    }

    fn two_notes() -> serde_json::Value {
        json!({"todos": [
            {"_id": "a1", "title": "Groceries", "description": "Buy milk"},
            {"_id": "b2", "title": "Chores", "description": "Laundry"}
        ]})
    }

    #[test]
    fn new_restores_session() {
        let api = NotelyApi::new(stored_session(), MockTransport::new()).unwrap();
        assert!(api.session().is_authenticated());
    }

    #[test]
    fn new_discards_broken_session() {
        let storage = MemoryStorage::with_entries(&[(TOKEN_KEY, "tok"), (USER_KEY, "oops")]);
        let api = NotelyApi::new(storage, MockTransport::new()).unwrap();
        assert!(!api.session().is_authenticated());
        assert!(api.session().storage().is_empty());
    }

    #[tokio::test]
    async fn login_dispatches_to_authenticate() {
        let transport = MockTransport::new().respond(
            200,
            json!({"token": "tok", "user": {"name": "Ada", "email": "ada@example.com"}}),
        );
        let mut api = NotelyApi::new(MemoryStorage::new(), transport).unwrap();

        let outcome = api.login("ada@example.com", "Passw0rd!").await.unwrap();

        assert!(outcome.is_completed());
        assert!(api.session().is_authenticated());
        assert_eq!(api.client().transport().calls(), vec!["POST /user/login"]);
    }

    #[tokio::test]
    async fn login_with_blank_profile_reply_is_a_notice() {
        let transport = MockTransport::new().respond(
            200,
            json!({"token": "tok", "user": {"name": "", "email": ""}}),
        );
        let mut api = NotelyApi::new(MemoryStorage::new(), transport).unwrap();

        let outcome = api.login("ada@example.com", "Passw0rd!").await.unwrap();

        assert_eq!(outcome, Submission::Failed(Notice::error(LOGIN_FAILURE)));
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn register_dispatches_to_signup() {
        let transport = MockTransport::new().respond(
            201,
            json!({"user": {"name": "Ada", "email": "ada@example.com"}}),
        );
        let mut api = NotelyApi::new(MemoryStorage::new(), transport).unwrap();

        let outcome = api
            .register("Ada", "ada@example.com", "Passw0rd!", "Passw0rd!")
            .await
            .unwrap();

        assert!(outcome.is_completed());
        assert_eq!(api.client().transport().calls(), vec!["POST /user/signup"]);
    }

    #[tokio::test]
    async fn update_profile_keeps_unset_fields() {
        let transport = MockTransport::new().respond(
            200,
            json!({"user": {"name": "Ada", "email": "ada@new.example.com"}}),
        );
        let mut api = NotelyApi::new(stored_session(), transport).unwrap();

        api.update_profile(None, Some("ada@new.example.com"))
            .await
            .unwrap();

        let request = &api.client().transport().requests()[0];
        assert_eq!(
            request.body,
            Some(json!({"name": "Ada", "email": "ada@new.example.com"}))
        );
        assert_eq!(
            api.session().user().map(|u| u.email.as_str()),
            Some("ada@new.example.com")
        );
    }

    #[tokio::test]
    async fn sign_out_clears_session() {
        let mut api = NotelyApi::new(stored_session(), MockTransport::new()).unwrap();
        api.sign_out().unwrap();
        assert!(!api.session().is_authenticated());
        assert!(api.session().storage().is_empty());
    }

    #[tokio::test]
    async fn list_notes_error_surfaces_api_error() {
        let transport = MockTransport::new().respond(401, json!({"message": "invalid token"}));
        let mut api = NotelyApi::new(stored_session(), transport).unwrap();

        let err = api.list_notes().await.unwrap_err();
        assert!(matches!(
            err,
            NotelyError::Api(ApiError::Rejected { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn create_note_refetches() {
        let transport = MockTransport::new()
            .respond(201, json!({}))
            .respond(200, two_notes());
        let mut api = NotelyApi::new(stored_session(), transport).unwrap();

        let outcome = api.create_note("Groceries", "Buy milk and eggs").await;

        assert_eq!(outcome, Submission::Completed(Notice::success(CREATE_SUCCESS)));
        assert_eq!(api.notes().notes().len(), 2);
    }

    #[tokio::test]
    async fn resolve_by_position_and_id() {
        let transport = MockTransport::new().respond(200, two_notes());
        let mut api = NotelyApi::new(stored_session(), transport).unwrap();

        assert_eq!(api.resolve_note("2").await.unwrap(), "b2");
        assert_eq!(api.resolve_note("a1").await.unwrap(), "a1");
        assert!(matches!(
            api.resolve_note("3").await,
            Err(NotelyError::NotFound(_))
        ));
        assert!(matches!(
            api.resolve_note("0").await,
            Err(NotelyError::NotFound(_))
        ));
        // one fetch serves every lookup
        assert_eq!(api.client().transport().request_count(), 1);
    }

    #[tokio::test]
    async fn update_note_merges_fields() {
        let transport = MockTransport::new()
            .respond(200, two_notes())
            .respond(200, json!({}))
            .respond(200, two_notes());
        let mut api = NotelyApi::new(stored_session(), transport).unwrap();

        let outcome = api
            .update_note("b2", None, Some("Laundry and dishes"))
            .await
            .unwrap();

        assert!(outcome.is_completed());
        let request = &api.client().transport().requests()[1];
        assert_eq!(request.path, "/todo/update-todo/b2");
        assert_eq!(
            request.body,
            Some(json!({"title": "Chores", "description": "Laundry and dishes"}))
        );
    }

    #[tokio::test]
    async fn update_unknown_note_is_not_found() {
        let transport = MockTransport::new().respond(200, two_notes());
        let mut api = NotelyApi::new(stored_session(), transport).unwrap();

        let err = api.update_note("zz", Some("Title"), None).await.unwrap_err();
        assert!(matches!(err, NotelyError::NotFound(id) if id == "zz"));
    }

    #[tokio::test]
    async fn delete_note_dispatches() {
        let transport = MockTransport::new()
            .respond(200, json!({}))
            .respond(200, json!({"todos": []}));
        let mut api = NotelyApi::new(stored_session(), transport).unwrap();

        let outcome = api.delete_note("a1").await;

        assert_eq!(outcome, Submission::Completed(Notice::success(DELETE_SUCCESS)));
        assert_eq!(
            api.client().transport().calls(),
            vec!["DELETE /todo/delete-todo/a1", "GET /todo/get-all"]
        );
    }
}
