//! Healthdesk core library.
//! Intake records, validation, sled persistence, and the FAQ chatbot responder.

pub mod chatbot;
pub mod settings;
pub mod error;
pub mod records;
pub mod store;
pub mod submission;
pub mod validation;

pub use chatbot::{
    ChatReply, ChatResponder, ChatTurn, FallbackTable, OpenRouterOracle, Oracle, ReplySource,
    SessionCache, DEFAULT_REPLY, FAQ_TABLE,
};
pub use settings::GatewayConfig;
pub use error::{OracleError, StoreError, SubmissionError, ValidationError};
pub use records::{
    ContactMessage, FormKind, PatientSupportRequest, RecordId, StoredRecord, Submission,
    VolunteerRegistration,
};
pub use store::{SledStore, SubmissionStore};
pub use submission::{Accepted, SubmissionService};
pub use validation::{validate, RawFields, ValidatedForm};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
