//! Intake record kinds. Records are create-only: built once per valid submission, persisted,
//! and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned record identity (UUID v4).
pub type RecordId = String;

/// The three intake forms served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    PatientSupport,
    Volunteer,
    Contact,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [FormKind::PatientSupport, FormKind::Volunteer, FormKind::Contact];

    /// Required field names, in the order they are checked and stored.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            FormKind::PatientSupport => &["name", "email", "issue"],
            FormKind::Volunteer => &["name", "email", "skills", "availability"],
            FormKind::Contact => &["name", "email", "message"],
        }
    }

    /// Storage collection (sled tree) for this kind.
    pub fn collection(self) -> &'static str {
        match self {
            FormKind::PatientSupport => "patient_support",
            FormKind::Volunteer => "volunteers",
            FormKind::Contact => "contacts",
        }
    }

    /// Human label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            FormKind::PatientSupport => "patient support",
            FormKind::Volunteer => "volunteer registration",
            FormKind::Contact => "contact form",
        }
    }

    /// Confirmation returned to the caller after a successful save.
    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::PatientSupport => "Patient support submitted successfully!",
            FormKind::Volunteer => "Volunteer registration submitted successfully!",
            FormKind::Contact => "Contact form submitted successfully!",
        }
    }

    /// Generic message returned when persistence fails. Never carries store internals.
    pub fn failure_message(self) -> &'static str {
        match self {
            FormKind::PatientSupport => "Error submitting patient support.",
            FormKind::Volunteer => "Error submitting volunteer registration.",
            FormKind::Contact => "Error submitting contact form.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSupportRequest {
    pub name: String,
    pub email: String,
    pub issue: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerRegistration {
    pub name: String,
    pub email: String,
    pub skills: String,
    pub availability: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

/// A normalized record ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    PatientSupport(PatientSupportRequest),
    Volunteer(VolunteerRegistration),
    Contact(ContactMessage),
}

impl Submission {
    pub fn kind(&self) -> FormKind {
        match self {
            Submission::PatientSupport(_) => FormKind::PatientSupport,
            Submission::Volunteer(_) => FormKind::Volunteer,
            Submission::Contact(_) => FormKind::Contact,
        }
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        match self {
            Submission::PatientSupport(r) => r.submitted_at,
            Submission::Volunteer(r) => r.submitted_at,
            Submission::Contact(r) => r.submitted_at,
        }
    }
}

/// A persisted submission as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub submission: Submission,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_distinct_collection() {
        let mut seen: Vec<&str> = FormKind::ALL.iter().map(|k| k.collection()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn stored_record_serializes_flat_with_camel_case_timestamp() {
        let at = Utc::now();
        let rec = StoredRecord {
            id: "abc".into(),
            submission: Submission::Contact(ContactMessage {
                name: "A".into(),
                email: "a@b.com".into(),
                message: "hello".into(),
                submitted_at: at,
            }),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["kind"], "contact");
        assert_eq!(json["message"], "hello");
        assert!(json.get("submittedAt").is_some());

        let back: StoredRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }
}
