//! Required-field checking for the intake forms.
//!
//! A field is present when it exists and is truthy: a non-empty string, a non-zero number,
//! `true`, or any array or object. Strings are taken as-is, with no trimming, so whitespace-only
//! values pass. `null`, `false`, `0` and `""` count as missing. No format or length checks are
//! applied.
//!
//! Every record field is text. Numbers and `true` are stored in their textual form; an array or
//! object passes validation but cannot be stored, so [`ValidatedForm::stamp`] rejects it with
//! [`StoreError::Cast`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{StoreError, ValidationError};
use crate::records::{
    ContactMessage, FormKind, PatientSupportRequest, Submission, VolunteerRegistration,
};

/// Raw request fields, keyed by field name.
pub type RawFields = Map<String, Value>;

/// A submission that passed validation but has not been stamped yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    kind: FormKind,
    /// Values in `kind.required_fields()` order.
    values: Vec<Value>,
}

impl ValidatedForm {
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Value of a required field, as submitted.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.kind
            .required_fields()
            .iter()
            .position(|f| *f == field)
            .and_then(|i| self.values.get(i))
    }

    /// Attach the server-side submission timestamp, producing the record to persist.
    ///
    /// Fails with [`StoreError::Cast`] on the first field whose value has no text form.
    pub fn stamp(self, submitted_at: DateTime<Utc>) -> Result<Submission, StoreError> {
        let mut text = Vec::with_capacity(self.values.len());
        for (field, value) in self.kind.required_fields().iter().zip(&self.values) {
            text.push(as_text(value).ok_or(StoreError::Cast { field: *field })?);
        }

        let mut v = text.into_iter();
        let mut next = || v.next().unwrap_or_default();
        let record = match self.kind {
            FormKind::PatientSupport => Submission::PatientSupport(PatientSupportRequest {
                name: next(),
                email: next(),
                issue: next(),
                submitted_at,
            }),
            FormKind::Volunteer => Submission::Volunteer(VolunteerRegistration {
                name: next(),
                email: next(),
                skills: next(),
                availability: next(),
                submitted_at,
            }),
            FormKind::Contact => Submission::Contact(ContactMessage {
                name: next(),
                email: next(),
                message: next(),
                submitted_at,
            }),
        };
        Ok(record)
    }
}

/// Check `raw` against the required-field set of `kind`. Pure.
pub fn validate(kind: FormKind, raw: &RawFields) -> Result<ValidatedForm, ValidationError> {
    let mut values = Vec::with_capacity(kind.required_fields().len());
    let mut missing = Vec::new();

    for field in kind.required_fields() {
        match raw.get(*field).filter(|v| is_truthy(v)) {
            Some(v) => values.push(v.clone()),
            None => missing.push(*field),
        }
    }

    if missing.is_empty() {
        Ok(ValidatedForm { kind, values })
    } else {
        Err(ValidationError { missing })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
