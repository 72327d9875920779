//! Submission handlers: validate, stamp, persist. One entry point shared by every form kind.

use std::sync::Arc;

use chrono::Utc;

use crate::error::SubmissionError;
use crate::records::{FormKind, RecordId};
use crate::store::SubmissionStore;
use crate::validation::{validate, RawFields};

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub id: RecordId,
    pub message: &'static str,
}

/// Composes validation and persistence. Request-scoped; holds no mutable state.
#[derive(Clone)]
pub struct SubmissionService {
    store: Arc<dyn SubmissionStore>,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SubmissionStore> {
        &self.store
    }

    /// Validate `raw` for `kind` and persist it with the current time as `submittedAt`.
    /// Invalid input performs no write. Store failures are returned, not retried.
    pub async fn submit(&self, kind: FormKind, raw: &RawFields) -> Result<Accepted, SubmissionError> {
        tracing::info!("[INTAKE] Received {} request", kind.label());

        let form = validate(kind, raw).map_err(|e| {
            tracing::warn!("[INTAKE] Validation failed for {}: {}", kind.label(), e);
            e
        })?;

        let record = form.stamp(Utc::now()).map_err(|e| {
            tracing::error!("[INTAKE] Error submitting {}: {}", kind.label(), e);
            e
        })?;
        let id = self
            .store
            .save(kind.collection(), &record)
            .await
            .map_err(|e| {
                tracing::error!("[INTAKE] Error submitting {}: {}", kind.label(), e);
                e
            })?;

        tracing::info!("[INTAKE] {} saved as {}", kind.label(), id);
        Ok(Accepted {
            id,
            message: kind.success_message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::records::{StoredRecord, Submission};
    use crate::store::SledStore;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct BrokenStore;

    #[async_trait]
    impl SubmissionStore for BrokenStore {
        async fn save(&self, _: &str, _: &Submission) -> Result<RecordId, StoreError> {
            Err(StoreError::Worker("disk unavailable".into()))
        }
        async fn count(&self, _: &str) -> Result<usize, StoreError> {
            Err(StoreError::Worker("disk unavailable".into()))
        }
        async fn recent(&self, _: &str, _: usize) -> Result<Vec<StoredRecord>, StoreError> {
            Err(StoreError::Worker("disk unavailable".into()))
        }
    }

    fn fields(v: Value) -> RawFields {
        v.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn valid_contact_is_persisted_once() {
        let store = Arc::new(SledStore::temporary().unwrap());
        let service = SubmissionService::new(store.clone());
        let before = Utc::now();

        let accepted = service
            .submit(
                FormKind::Contact,
                &fields(json!({"name": "A", "email": "a@b.com", "message": "hello"})),
            )
            .await
            .unwrap();

        assert_eq!(accepted.message, "Contact form submitted successfully!");
        let recent = store.recent("contacts", 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, accepted.id);
        match &recent[0].submission {
            Submission::Contact(c) => {
                assert_eq!(c.name, "A");
                assert_eq!(c.email, "a@b.com");
                assert_eq!(c.message, "hello");
                assert!(c.submitted_at >= before);
                assert!(c.submitted_at <= Utc::now());
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_submission_writes_nothing() {
        let store = Arc::new(SledStore::temporary().unwrap());
        let service = SubmissionService::new(store.clone());

        let err = service
            .submit(FormKind::PatientSupport, &fields(json!({"name": "A"})))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Validation(_)));
        assert_eq!(store.count("patient_support").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn structured_field_is_a_persistence_failure_without_write() {
        let store = Arc::new(SledStore::temporary().unwrap());
        let service = SubmissionService::new(store.clone());

        let err = service
            .submit(
                FormKind::Contact,
                &fields(json!({"name": "A", "email": ["a@b.com"], "message": "m"})),
            )
            .await
            .unwrap_err();

        assert!(
            matches!(err, SubmissionError::Persistence(StoreError::Cast { field: "email" })),
            "got {:?}",
            err
        );
        assert_eq!(store.count("contacts").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_reported_as_persistence() {
        let service = SubmissionService::new(Arc::new(BrokenStore));
        let err = service
            .submit(
                FormKind::Volunteer,
                &fields(json!({"name": "A", "email": "e", "skills": "s", "availability": "a"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Persistence(_)));
    }
}
