use super::form::{FormFields, FormState};
use super::{Notice, Submission};
use crate::client::{ApiClient, Transport};
use crate::error::Result;
use crate::model::ProfileUpdate;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::validation::{validate_profile, Field, FieldErrors};
use tracing::{info, warn};

pub const PROFILE_SUCCESS: &str = "Profile updated successfully!";
pub const PROFILE_FAILURE: &str = "Failed to update profile.";
pub const PROFILE_SIGNED_OUT: &str = "Please login to view your profile.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

impl FormFields for ProfileForm {
    const FIELDS: &'static [Field] = &[Field::Name, Field::Email];

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            _ => "",
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            _ => {}
        }
    }

    fn validate(&self) -> FieldErrors {
        validate_profile(&self.name, &self.email)
    }
}

#[derive(Debug, Default)]
pub struct ProfileController {
    form: FormState<ProfileForm>,
}

impl ProfileController {
    /// Form prefilled from the signed-in user, empty when signed out.
    pub fn new<S: KeyValueStore>(session: &SessionStore<S>) -> Self {
        let values = session
            .user()
            .map(|user| ProfileForm {
                name: user.name.clone(),
                email: user.email.clone(),
            })
            .unwrap_or_default();
        Self {
            form: FormState::new(values),
        }
    }

    pub fn form(&self) -> &FormState<ProfileForm> {
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
        if !session.is_authenticated() {
            return Ok(Submission::Failed(Notice::warning(PROFILE_SIGNED_OUT)));
        }
        let values = match self.form.begin_submit() {
            Ok(values) => values,
            Err(rejected) => return Ok(rejected),
        };

        let update = ProfileUpdate {
            name: values.name,
            email: values.email,
        };
        let outcome = client.update_profile(session.token(), &update).await;
        self.form.finish_submit();

        match outcome {
            Ok(user) => {
                if !session.update(user)? {
                    warn!("profile not applied to the session");
                    return Ok(Submission::Failed(Notice::error(PROFILE_FAILURE)));
                }
                info!("profile updated");
                Ok(Submission::Completed(Notice::success(PROFILE_SUCCESS)))
            }
            Err(err) => {
                warn!(error = %err, "profile update failed");
                Ok(Submission::Failed(Notice::error(PROFILE_FAILURE)))
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.form = FormState::default();
    }
}
