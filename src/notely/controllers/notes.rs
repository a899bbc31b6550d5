//! Notes list screen.
//!
//! ```text
//! Idle --mount--> Loading --ok--> Populated
//!                    |
//!                    +--err--> LoadError
//! ```
//!
//! The list is a read-through cache of the server: it is only ever replaced
//! wholesale by a fetch. Create, update and delete never touch it locally;
//! once the server acknowledges one, the whole list is fetched again. A failed
//! fetch leaves the previous list in place.

use super::form::{FormFields, FormState};
use super::{Notice, Submission};
use crate::client::{ApiClient, Transport};
use crate::error::ApiError;
use crate::model::{Note, NoteDraft};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::validation::{validate_note, Field, FieldErrors};
use tracing::{debug, info, warn};

pub const CREATE_SUCCESS: &str = "Note created successfully";
pub const CREATE_FAILURE: &str = "Failed to create note";
pub const UPDATE_SUCCESS: &str = "Note updated successfully";
pub const UPDATE_FAILURE: &str = "Failed to update note";
pub const DELETE_SUCCESS: &str = "Note deleted successfully";
pub const DELETE_FAILURE: &str = "Failed to delete note";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub description: String,
}

impl NoteForm {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl From<NoteForm> for NoteDraft {
    fn from(form: NoteForm) -> Self {
        NoteDraft {
            title: form.title,
            description: form.description,
        }
    }
}

impl FormFields for NoteForm {
    const FIELDS: &'static [Field] = &[Field::Title, Field::Description];

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            _ => "",
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            _ => {}
        }
    }

    fn validate(&self) -> FieldErrors {
        validate_note(&self.title, &self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Populated,
    LoadError,
}

/// The edit dialog for one note.
#[derive(Debug, Clone)]
pub struct NoteEdit {
    pub note_id: String,
    pub form: FormState<NoteForm>,
}

#[derive(Debug)]
pub struct NotesController {
    state: ListState,
    notes: Vec<Note>,
    last_error: Option<ApiError>,
    create_form: FormState<NoteForm>,
    editing: Option<NoteEdit>,
    deleting: Option<String>,
}

impl Default for NotesController {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesController {
    pub fn new() -> Self {
        Self {
            state: ListState::Idle,
            notes: Vec::new(),
            last_error: None,
            create_form: FormState::default(),
            editing: None,
            deleting: None,
        }
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Why the most recent fetch failed; cleared by a successful one.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn create_form(&self) -> &FormState<NoteForm> {
        &self.create_form
    }

    pub fn create_form_mut(&mut self) -> &mut FormState<NoteForm> {
        &mut self.create_form
    }

    pub fn editing(&self) -> Option<&NoteEdit> {
        self.editing.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut FormState<NoteForm>> {
        self.editing.as_mut().map(|edit| &mut edit.form)
    }

    /// Id of the note whose delete request is in flight.
    pub fn deleting(&self) -> Option<&str> {
        self.deleting.as_deref()
    }

    /// First fetch when the screen opens.
    pub async fn mount<S: KeyValueStore, T: Transport>(
        &mut self,
        session: &SessionStore<S>,
        client: &ApiClient<T>,
    ) -> ListState {
        self.refresh(session, client).await
    }

    /// Fetches the full list and replaces the cached one.
    pub async fn refresh<S: KeyValueStore, T: Transport>(
        &mut self,
        session: &SessionStore<S>,
        client: &ApiClient<T>,
    ) -> ListState {
        self.state = ListState::Loading;
        match client.list_notes(session.token()).await {
            Ok(notes) => {
                debug!(count = notes.len(), "notes loaded");
                self.notes = notes;
                self.last_error = None;
                self.state = ListState::Populated;
            }
            Err(err) => {
                warn!(error = %err, "failed to load notes");
                self.last_error = Some(err);
                self.state = ListState::LoadError;
            }
        }
        self.state
    }

    pub async fn create<S: KeyValueStore, T: Transport>(
        &mut self,
        session: &SessionStore<S>,
        client: &ApiClient<T>,
    ) -> Submission {
        let values = match self.create_form.begin_submit() {
            Ok(values) => values,
            Err(rejected) => return rejected,
        };

        let outcome = client
            .create_note(session.token(), &NoteDraft::from(values))
            .await;
        self.create_form.finish_submit();

        match outcome {
            Ok(()) => {
                info!("note created");
                self.create_form.reset();
                self.refresh(session, client).await;
                Submission::Completed(Notice::success(CREATE_SUCCESS))
            }
            Err(err) => {
                warn!(error = %err, "note create failed");
                Submission::Failed(Notice::error(CREATE_FAILURE))
            }
        }
    }

    /// Opens the edit dialog for a note in the current list.
    ///
    /// Returns `false` when the note is not in the list.
    pub fn begin_edit(&mut self, note_id: &str) -> bool {
        match self.notes.iter().find(|note| note.id == note_id) {
            Some(note) => {
                let form = NoteForm::new(note.title.clone(), note.description.clone());
                self.editing = Some(NoteEdit {
                    note_id: note.id.clone(),
                    form: FormState::prefilled(form),
                });
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Sends the edit dialog. The dialog closes on success and stays open
    /// with its values on failure.
    pub async fn save_edit<S: KeyValueStore, T: Transport>(
        &mut self,
        session: &SessionStore<S>,
        client: &ApiClient<T>,
    ) -> Submission {
        let Some(edit) = self.editing.as_mut() else {
            return Submission::Failed(Notice::warning("No note is being edited"));
        };
        let values = match edit.form.begin_submit() {
            Ok(values) => values,
            Err(rejected) => return rejected,
        };
        let note_id = edit.note_id.clone();

        let outcome = client
            .update_note(session.token(), &note_id, &NoteDraft::from(values))
            .await;
        if let Some(edit) = self.editing.as_mut() {
            edit.form.finish_submit();
        }

        match outcome {
            Ok(()) => {
                info!(note = %note_id, "note updated");
                self.editing = None;
                self.refresh(session, client).await;
                Submission::Completed(Notice::success(UPDATE_SUCCESS))
            }
            Err(err) => {
                warn!(note = %note_id, error = %err, "note update failed");
                Submission::Failed(Notice::error(UPDATE_FAILURE))
            }
        }
    }

    /// Issues exactly one delete request for `note_id`.
    pub async fn delete<S: KeyValueStore, T: Transport>(
        &mut self,
        note_id: &str,
        session: &SessionStore<S>,
        client: &ApiClient<T>,
    ) -> Submission {
        self.deleting = Some(note_id.to_string());
        let outcome = client.delete_note(session.token(), note_id).await;
        self.deleting = None;

        match outcome {
            Ok(()) => {
                info!(note = %note_id, "note deleted");
                self.refresh(session, client).await;
                Submission::Completed(Notice::success(DELETE_SUCCESS))
            }
            Err(err) => {
                warn!(note = %note_id, error = %err, "note delete failed");
                Submission::Failed(Notice::error(DELETE_FAILURE))
            }
        }
    }

    /// The screen went away: forget everything, including in-flight claims.
    pub fn dismiss(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::model::UserProfile;
    use crate::storage::memory::MemoryStorage;
    use serde_json::{json, Value};

    fn signed_in() -> SessionStore<MemoryStorage> {
        let mut session = SessionStore::new(MemoryStorage::new());
        session
            .establish("tok", UserProfile::new("Ada", "ada@example.com"))
            .unwrap();
        session
    }

    fn todos(items: &[(&str, &str, &str)]) -> Value {
        let todos: Vec<Value> = items
            .iter()
            .map(|(id, title, description)| {
                json!({"_id": id, "title": title, "description": description})
            })
            .collect();
        json!({ "todos": todos })
    }

    #[tokio::test]
    async fn mount_populates_list() {
        let transport =
            MockTransport::new().respond(200, todos(&[("1", "Groceries", "Buy milk and eggs")]));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();
        assert_eq!(notes.state(), ListState::Idle);

        let state = notes.mount(&session, &client).await;

        assert_eq!(state, ListState::Populated);
        assert_eq!(notes.notes().len(), 1);
        assert_eq!(client.transport().requests()[0].token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let transport = MockTransport::new()
            .respond(200, todos(&[("1", "Groceries", "Buy milk and eggs")]))
            .respond(500, json!({"message": "down"}));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();

        notes.mount(&session, &client).await;
        let state = notes.refresh(&session, &client).await;

        assert_eq!(state, ListState::LoadError);
        assert_eq!(notes.notes().len(), 1);
        assert!(matches!(
            notes.last_error(),
            Some(ApiError::Rejected { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn failed_first_load_leaves_list_empty() {
        let client = ApiClient::new(
            MockTransport::new().fail(ApiError::NetworkFailure("offline".into())),
        );
        let session = signed_in();
        let mut notes = NotesController::new();

        assert_eq!(notes.mount(&session, &client).await, ListState::LoadError);
        assert!(notes.notes().is_empty());
    }

    #[tokio::test]
    async fn refresh_replaces_wholesale() {
        let transport = MockTransport::new()
            .respond(
                200,
                todos(&[("1", "Groceries", "Buy milk"), ("2", "Chores", "Laundry")]),
            )
            .respond(200, todos(&[("3", "Trip", "Pack bags")]));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();

        notes.mount(&session, &client).await;
        notes.refresh(&session, &client).await;

        let ids: Vec<&str> = notes.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[tokio::test]
    async fn short_title_never_reaches_network() {
        let client = ApiClient::new(MockTransport::new());
        let session = signed_in();
        let mut notes = NotesController::new();
        notes.create_form_mut().change(Field::Title, "Hi");
        notes
            .create_form_mut()
            .change(Field::Description, "Buy milk and eggs");

        let outcome = notes.create(&session, &client).await;

        match outcome {
            Submission::Blocked(errors) => assert_eq!(
                errors.get(Field::Title),
                Some("Title must be at least 3 characters")
            ),
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn create_then_refetch() {
        let transport = MockTransport::new()
            .respond(201, json!({"message": "created"}))
            .respond(200, todos(&[("1", "Groceries", "Buy milk and eggs")]));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();
        notes.create_form_mut().change(Field::Title, "Groceries");
        notes
            .create_form_mut()
            .change(Field::Description, "Buy milk and eggs");

        let outcome = notes.create(&session, &client).await;

        assert_eq!(outcome, Submission::Completed(Notice::success(CREATE_SUCCESS)));
        assert_eq!(
            client.transport().calls(),
            vec!["POST /todo/create", "GET /todo/get-all"]
        );
        assert_eq!(notes.state(), ListState::Populated);
        assert_eq!(notes.notes()[0].title, "Groceries");
        assert_eq!(notes.create_form().value(Field::Title), "");
    }

    #[tokio::test]
    async fn failed_create_skips_refetch_and_keeps_form() {
        let transport = MockTransport::new().respond(400, json!({"message": "bad"}));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();
        notes.create_form_mut().change(Field::Title, "Groceries");
        notes
            .create_form_mut()
            .change(Field::Description, "Buy milk and eggs");

        let outcome = notes.create(&session, &client).await;

        assert_eq!(outcome, Submission::Failed(Notice::error(CREATE_FAILURE)));
        assert_eq!(client.transport().request_count(), 1);
        assert_eq!(notes.create_form().value(Field::Title), "Groceries");
        assert!(!notes.create_form().is_submitting());
    }

    #[tokio::test]
    async fn edit_round_trip() {
        let transport = MockTransport::new()
            .respond(200, todos(&[("1", "Groceries", "Buy milk")]))
            .respond(200, json!({"message": "updated"}))
            .respond(200, todos(&[("1", "Groceries", "Buy milk and eggs")]));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();
        notes.mount(&session, &client).await;

        assert!(notes.begin_edit("1"));
        notes
            .edit_form_mut()
            .unwrap()
            .change(Field::Description, "Buy milk and eggs");
        let outcome = notes.save_edit(&session, &client).await;

        assert_eq!(outcome, Submission::Completed(Notice::success(UPDATE_SUCCESS)));
        assert!(notes.editing().is_none());
        assert_eq!(notes.notes()[0].description, "Buy milk and eggs");
        assert_eq!(
            client.transport().calls(),
            vec![
                "GET /todo/get-all",
                "PATCH /todo/update-todo/1",
                "GET /todo/get-all"
            ]
        );
    }

    #[tokio::test]
    async fn failed_edit_keeps_dialog_open() {
        let transport = MockTransport::new()
            .respond(200, todos(&[("1", "Groceries", "Buy milk")]))
            .respond(404, json!({"message": "not found"}));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();
        notes.mount(&session, &client).await;
        notes.begin_edit("1");

        let outcome = notes.save_edit(&session, &client).await;

        assert_eq!(outcome, Submission::Failed(Notice::error(UPDATE_FAILURE)));
        let edit = notes.editing().unwrap();
        assert_eq!(edit.note_id, "1");
        assert!(!edit.form.is_submitting());
    }

    #[test]
    fn begin_edit_unknown_note() {
        let mut notes = NotesController::new();
        assert!(!notes.begin_edit("missing"));
        assert!(notes.editing().is_none());
    }

    #[tokio::test]
    async fn save_without_edit_sends_nothing() {
        let client = ApiClient::new(MockTransport::new());
        let session = signed_in();
        let mut notes = NotesController::new();

        let outcome = notes.save_edit(&session, &client).await;
        assert!(matches!(outcome, Submission::Failed(_)));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn delete_issues_one_request_then_refetches() {
        let transport = MockTransport::new()
            .respond(200, json!({"message": "deleted"}))
            .respond(200, todos(&[]));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();

        let outcome = notes.delete("1", &session, &client).await;

        assert_eq!(outcome, Submission::Completed(Notice::success(DELETE_SUCCESS)));
        assert_eq!(
            client.transport().calls(),
            vec!["DELETE /todo/delete-todo/1", "GET /todo/get-all"]
        );
        assert!(notes.deleting().is_none());
        assert!(notes.notes().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_list() {
        let transport = MockTransport::new()
            .respond(200, todos(&[("1", "Groceries", "Buy milk")]))
            .fail(ApiError::NetworkFailure("offline".into()));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();
        notes.mount(&session, &client).await;

        let outcome = notes.delete("1", &session, &client).await;

        assert_eq!(outcome, Submission::Failed(Notice::error(DELETE_FAILURE)));
        assert_eq!(notes.notes().len(), 1);
        assert_eq!(client.transport().request_count(), 2);
    }

    #[tokio::test]
    async fn signed_out_requests_omit_token() {
        let transport = MockTransport::new().respond(401, json!({"message": "token required"}));
        let client = ApiClient::new(transport);
        let session = SessionStore::new(MemoryStorage::new());
        let mut notes = NotesController::new();

        assert_eq!(notes.mount(&session, &client).await, ListState::LoadError);
        assert_eq!(client.transport().requests()[0].token, None);
    }

    #[tokio::test]
    async fn dismiss_resets_everything() {
        let transport =
            MockTransport::new().respond(200, todos(&[("1", "Groceries", "Buy milk")]));
        let client = ApiClient::new(transport);
        let session = signed_in();
        let mut notes = NotesController::new();
        notes.mount(&session, &client).await;
        notes.begin_edit("1");

        notes.dismiss();

        assert_eq!(notes.state(), ListState::Idle);
        assert!(notes.notes().is_empty());
        assert!(notes.editing().is_none());
    }
}
