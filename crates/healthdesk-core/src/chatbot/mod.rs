//! FAQ chatbot responder.
//!
//! Each call is independent: the oracle is tried first when configured; if it is absent, errors,
//! or runs past its timeout, the keyword fallback answers. `respond` cannot fail.

mod fallback;
mod oracle;
mod session;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

pub use fallback::{FallbackTable, DEFAULT_REPLY, FAQ_TABLE};
pub use oracle::{OpenRouterOracle, Oracle, DEFAULT_MODEL, OPENROUTER_API_BASE};
pub use session::{ChatTurn, ReplySource, SessionCache};

const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(20);

/// A chatbot answer and the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
}

pub struct ChatResponder {
    oracle: Option<Arc<dyn Oracle>>,
    fallback: FallbackTable,
    sessions: Arc<SessionCache>,
    oracle_timeout: Duration,
}

impl ChatResponder {
    pub fn new(oracle: Option<Arc<dyn Oracle>>, sessions: Arc<SessionCache>) -> Self {
        Self {
            oracle,
            fallback: FallbackTable::default(),
            sessions,
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackTable) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Answer `utterance`. `session_id` only keys the advisory history.
    pub async fn respond(&self, utterance: &str, session_id: &str) -> ChatReply {
        let reply = match self.ask_oracle(utterance).await {
            Some(text) => ChatReply {
                text,
                source: ReplySource::Oracle,
            },
            None => ChatReply {
                text: self.fallback.reply(utterance).to_string(),
                source: ReplySource::Fallback,
            },
        };

        tracing::debug!("[CHATBOT] session={} answered via {:?}", session_id, reply.source);
        self.sessions.record(
            session_id,
            ChatTurn {
                utterance: utterance.to_string(),
                reply: reply.text.clone(),
                source: reply.source,
                at: Utc::now(),
            },
        );
        reply
    }

    async fn ask_oracle(&self, utterance: &str) -> Option<String> {
        let oracle = self.oracle.as_ref()?;
        match tokio::time::timeout(self.oracle_timeout, oracle.complete(utterance)).await {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                tracing::warn!("[CHATBOT] Oracle failed, using fallback: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "[CHATBOT] Oracle exceeded {:?}, using fallback",
                    self.oracle_timeout
                );
                None
            }
        }
    }
}
