use super::Submission;
use crate::validation::{Field, FieldErrors};
use std::collections::BTreeSet;

/// The values behind one form.
pub trait FormFields: Clone + Default {
    /// Fields in display order.
    const FIELDS: &'static [Field];

    fn value(&self, field: Field) -> &str;

    /// Fields this form does not have are ignored.
    fn set(&mut self, field: Field, value: String);

    fn validate(&self) -> FieldErrors;
}

/// Transient state of a mounted form.
///
/// Validation reruns on every change. Errors are only shown for fields the
/// user has touched; a submit attempt touches all of them.
#[derive(Debug, Clone)]
pub struct FormState<F: FormFields> {
    values: F,
    errors: FieldErrors,
    touched: BTreeSet<Field>,
    submitting: bool,
}

impl<F: FormFields> Default for FormState<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: FormFields> FormState<F> {
    pub fn new(values: F) -> Self {
        let errors = values.validate();
        Self {
            values,
            errors,
            touched: BTreeSet::new(),
            submitting: false,
        }
    }

    /// Prefilled values count as touched, so problems in them show at once.
    pub fn prefilled(values: F) -> Self {
        let mut state = Self::new(values);
        state.touch_all();
        state
    }

    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        if !F::FIELDS.contains(&field) {
            return;
        }
        self.values.set(field, value.into());
        self.touched.insert(field);
        self.errors = self.values.validate();
    }

    pub fn values(&self) -> &F {
        &self.values
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.value(field)
    }

    /// All current errors, touched or not.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Errors for touched fields only.
    pub fn visible_errors(&self) -> FieldErrors {
        let mut visible = self.errors.clone();
        visible.retain(|field| self.touched.contains(&field));
        visible
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        if self.touched.contains(&field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.submitting
    }

    /// Claims the form for one request.
    ///
    /// On success the caller owns a snapshot of the values and must call
    /// [`finish_submit`](Self::finish_submit) once the request settles.
    pub fn begin_submit(&mut self) -> Result<F, Submission> {
        if self.submitting {
            return Err(Submission::Busy);
        }
        self.touch_all();
        if !self.errors.is_empty() {
            return Err(Submission::Blocked(self.errors.clone()));
        }
        self.submitting = true;
        Ok(self.values.clone())
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Back to empty values with nothing touched.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn touch_all(&mut self) {
        self.touched.extend(F::FIELDS.iter().copied());
    }
}
