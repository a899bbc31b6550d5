use super::form::{FormFields, FormState};
use super::{Notice, Submission};
use crate::client::{ApiClient, Registration, Transport};
use crate::error::Result;
use crate::model::NewAccount;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::validation::{validate_registration, Field, FieldErrors, PasswordStrength};
use tracing::{info, warn};

pub const REGISTER_SUCCESS: &str = "Account created successfully!";
pub const REGISTER_CONFLICT: &str = "User with this email already exists. Please login.";
pub const REGISTER_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormFields for RegisterForm {
    const FIELDS: &'static [Field] = &[
        Field::Name,
        Field::Email,
        Field::Password,
        Field::ConfirmPassword,
    ];

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            _ => "",
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::ConfirmPassword => self.confirm_password = value,
            _ => {}
        }
    }

    fn validate(&self) -> FieldErrors {
        validate_registration(
            &self.name,
            &self.email,
            &self.password,
            &self.confirm_password,
        )
    }
}

#[derive(Debug, Default)]
pub struct RegisterController {
    form: FormState<RegisterForm>,
}

impl RegisterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState<RegisterForm> {
        &self.form
    }

    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        self.form.change(field, value);
    }

    /// Live strength of the password typed so far.
    pub fn password_strength(&self) -> PasswordStrength {
        PasswordStrength::of(&self.form.values().password)
    }

    /// Creates the account. When the server hands back a token the user is
    /// signed in straight away; otherwise they still need to log in.
    pub async fn submit<S: KeyValueStore, T: Transport>(
        &mut self,
        session: &mut SessionStore<S>,
        client: &ApiClient<T>,
    ) -> Result<Submission> {
        let values = match self.form.begin_submit() {
            Ok(values) => values,
            Err(rejected) => return Ok(rejected),
        };

        let account = NewAccount {
            name: values.name,
            email: values.email,
            password: values.password,
        };
        let outcome = client.register(&account).await;
        self.form.finish_submit();

        match outcome {
            Ok(Registration::Created { user, token }) => {
                info!(email = %account.email, "account created");
                if let Some(token) = token {
                    session.establish(token, user)?;
                    Ok(Submission::Completed(Notice::success(REGISTER_SUCCESS)))
                } else {
                    Ok(Submission::Completed(Notice::success(format!(
                        "{} Please login.",
                        REGISTER_SUCCESS
                    ))))
                }
            }
            Ok(Registration::Conflict) => {
                warn!(email = %account.email, "account already exists");
                Ok(Submission::Failed(Notice::error(REGISTER_CONFLICT)))
            }
            Err(err) => {
                warn!(error = %err, "sign up failed");
                Ok(Submission::Failed(Notice::error(REGISTER_FAILURE)))
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.form = FormState::default();
    }
}
