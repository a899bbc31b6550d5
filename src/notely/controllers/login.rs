use super::form::{FormFields, FormState};
use super::{Notice, Submission};
use crate::client::{ApiClient, Transport};
use crate::error::Result;
use crate::model::Credentials;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::validation::{validate_login, Field, FieldErrors};
use tracing::{info, warn};

pub const LOGIN_SUCCESS: &str = "Welcome back!";
/// Wrong password, unknown account and outages all read the same.
pub const LOGIN_FAILURE: &str = "Invalid email or password";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl FormFields for LoginForm {
    const FIELDS: &'static [Field] = &[Field::Email, Field::Password];

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
            _ => "",
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            _ => {}
        }
    }

    fn validate(&self) -> FieldErrors {
        validate_login(&self.email, &self.password)
    }
}

#[derive(Debug, Default)]
pub struct LoginController {
    form: FormState<LoginForm>,
}

impl LoginController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState<LoginForm> {
        &self.form
    }

    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        self.form.change(field, value);
    }

    pub async fn submit<S: KeyValueStore, T: Transport>(
        &mut self,
        session: &mut SessionStore<S>,
        client: &ApiClient<T>,
    ) -> Result<Submission> {
        let values = match self.form.begin_submit() {
            Ok(values) => values,
            Err(rejected) => return Ok(rejected),
        };

        let credentials = Credentials {
            email: values.email,
            password: values.password,
        };
        let outcome = client.authenticate(&credentials).await;
        self.form.finish_submit();

        match outcome {
            Ok(grant) => {
                session.establish(grant.token, grant.user)?;
                info!(email = %credentials.email, "signed in");
                Ok(Submission::Completed(Notice::success(LOGIN_SUCCESS)))
            }
            Err(err) => {
                warn!(error = %err, "sign in failed");
                Ok(Submission::Failed(Notice::error(LOGIN_FAILURE)))
            }
        }
    }

    /// Drops any in-flight claim and starts over.
    pub fn dismiss(&mut self) {
        self.form = FormState::default();
    }
}
