//! Persistence adapter for intake submissions: a sled document store on the local disk, one
//! tree per form collection (`patient_support`, `volunteers`, `contacts`).

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::records::{RecordId, StoredRecord, Submission};

const DEFAULT_STORE_PATH: &str = "./data/healthdesk";
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Save/query contract the submission service depends on.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a new record in `collection`. Each call creates a distinct record.
    async fn save(&self, collection: &str, record: &Submission) -> Result<RecordId, StoreError>;

    /// Number of records in `collection`.
    async fn count(&self, collection: &str) -> Result<usize, StoreError>;

    /// Up to `limit` records from `collection`, newest first.
    async fn recent(&self, collection: &str, limit: usize) -> Result<Vec<StoredRecord>, StoreError>;
}

/// Sled document store. Keys are `{submitted_at millis, zero padded}_{record id}` so tree order
/// is submission order.
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
    call_timeout: Duration,
}

impl SledStore {
    /// Open (or create) the store at `path`, falling back to `./data/healthdesk`.
    pub fn open(path: Option<impl AsRef<Path>>) -> Result<Self, StoreError> {
        let p = path
            .map(|x| x.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new(DEFAULT_STORE_PATH).to_path_buf());
        let db = sled::open(p)?;
        Ok(Self {
            db,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        })
    }

    /// In-memory store removed on drop. Used by tests and dry runs.
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self {
            db,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        })
    }

    /// Bound every store call; a call that exceeds it fails with `StoreError::Timeout`.
    ///
    /// The deadline only stops the wait. Sled work already running on the blocking pool is not
    /// cancelled, so a `save` that reported `Timeout` may still land, and a client that retries
    /// can end up with two records.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(sled::Db) -> Result<T, StoreError> + Send + 'static,
    {
        let db = self.db.clone();
        let task = tokio::task::spawn_blocking(move || f(db));
        match tokio::time::timeout(self.call_timeout, task).await {
            Ok(Ok(res)) => res,
            Ok(Err(join)) => Err(StoreError::Worker(join.to_string())),
            Err(_) => Err(StoreError::Timeout(self.call_timeout)),
        }
    }
}

fn record_key(record: &Submission, id: &str) -> String {
    format!("{:020}_{}", record.submitted_at().timestamp_millis().max(0), id)
}

#[async_trait]
impl SubmissionStore for SledStore {
    async fn save(&self, collection: &str, record: &Submission) -> Result<RecordId, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let key = record_key(record, &id);
        let doc = serde_json::to_vec(&StoredRecord {
            id: id.clone(),
            submission: record.clone(),
        })?;
        let collection = collection.to_string();

        self.blocking(move |db| {
            let tree = db.open_tree(collection.as_bytes())?;
            tree.insert(key.as_bytes(), doc)?;
            tree.flush()?;
            Ok(())
        })
        .await?;

        Ok(id)
    }

    async fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let collection = collection.to_string();
        self.blocking(move |db| Ok(db.open_tree(collection.as_bytes())?.len()))
            .await
    }

    async fn recent(&self, collection: &str, limit: usize) -> Result<Vec<StoredRecord>, StoreError> {
        let collection = collection.to_string();
        self.blocking(move |db| {
            let tree = db.open_tree(collection.as_bytes())?;
            let mut out = Vec::with_capacity(limit.min(64));
            for entry in tree.iter().rev().take(limit) {
                let (_, value) = entry?;
                out.push(serde_json::from_slice::<StoredRecord>(&value)?);
            }
            Ok(out)
        })
        .await
    }
}
