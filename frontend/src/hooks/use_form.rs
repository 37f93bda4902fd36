use shared::{FieldError, FormField};

use crate::services::api::ApiError;

/// Why a form submission did not go through
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Rejected locally; no request was sent
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
    /// The service call failed and the user has already been notified
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Field-level errors from the last submit attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn replace(&mut self, errors: Vec<FieldError>) {
        self.errors = errors;
    }

    pub fn for_field(&self, field: FormField) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Editing a field clears its error
    pub fn clear_field(&mut self, field: FormField) {
        self.errors.retain(|e| e.field != field);
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn all(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_field_only_drops_that_field() {
        let mut errors = FieldErrors::default();
        errors.replace(vec![
            FieldError::required(FormField::EmployeeId),
            FieldError::required(FormField::Email),
        ]);

        errors.clear_field(FormField::Email);
        assert!(errors.for_field(FormField::Email).is_none());
        assert!(errors.for_field(FormField::EmployeeId).is_some());
        assert_eq!(errors.all().len(), 1);
    }

    #[test]
    fn test_submit_error_display() {
        let invalid = SubmitError::Invalid(vec![FieldError::required(FormField::Email)]);
        assert_eq!(invalid.to_string(), "1 field(s) failed validation");

        let api = SubmitError::from(ApiError::Service {
            status: 409,
            message: "duplicate id".to_string(),
        });
        assert_eq!(api.to_string(), "duplicate id");
    }
}
