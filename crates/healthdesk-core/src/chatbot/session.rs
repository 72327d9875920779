//! Per-session chat history with expiry. Advisory only: replies never depend on it.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

/// Which path produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Oracle,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub utterance: String,
    pub reply: String,
    pub source: ReplySource,
    pub at: DateTime<Utc>,
}

struct SessionEntry {
    turns: Vec<ChatTurn>,
    last_seen: Instant,
}

/// Session id -> recent turns. Entries idle longer than `ttl` are invisible and purgeable.
pub struct SessionCache {
    entries: DashMap<String, SessionEntry>,
    ttl: Duration,
    max_turns: usize,
}

impl SessionCache {
    pub fn new(ttl: Duration, max_turns: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_turns: max_turns.max(1),
        }
    }

    /// Append a turn, keeping at most `max_turns` per session. Blank ids are not recorded.
    pub fn record(&self, session_id: &str, turn: ChatTurn) {
        if session_id.trim().is_empty() {
            return;
        }
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                turns: Vec::new(),
                last_seen: now,
            });
        if now.duration_since(entry.last_seen) > self.ttl {
            entry.turns.clear();
        }
        entry.turns.push(turn);
        let overflow = entry.turns.len().saturating_sub(self.max_turns);
        if overflow > 0 {
            entry.turns.drain(..overflow);
        }
        entry.last_seen = now;
    }

    /// Turns for a live session, oldest first. Expired or unknown sessions yield nothing.
    pub fn history(&self, session_id: &str) -> Vec<ChatTurn> {
        self.entries
            .get(session_id)
            .filter(|e| e.last_seen.elapsed() <= self.ttl)
            .map(|e| e.turns.clone())
            .unwrap_or_default()
    }

    /// Drop expired sessions. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.last_seen.elapsed() <= ttl);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(text: &str) -> ChatTurn {
        ChatTurn {
            utterance: text.to_string(),
            reply: format!("re: {text}"),
            source: ReplySource::Fallback,
            at: Utc::now(),
        }
    }

    #[test]
    fn keeps_only_latest_turns() {
        let cache = SessionCache::new(Duration::from_secs(60), 2);
        for t in ["a", "b", "c"] {
            cache.record("s1", turn(t));
        }
        let history = cache.history("s1");
        let texts: Vec<&str> = history.iter().map(|t| t.utterance.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn blank_session_is_not_recorded() {
        let cache = SessionCache::new(Duration::from_secs(60), 5);
        cache.record("", turn("a"));
        cache.record("  ", turn("b"));
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_sessions_are_hidden_and_purged() {
        let cache = SessionCache::new(Duration::from_millis(10), 5);
        cache.record("s1", turn("a"));
        std::thread::sleep(Duration::from_millis(30));
        assert!(cache.history("s1").is_empty());
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn sessions_are_independent() {
        let cache = SessionCache::new(Duration::from_secs(60), 5);
        cache.record("s1", turn("a"));
        cache.record("s2", turn("b"));
        assert_eq!(cache.history("s1").len(), 1);
        assert_eq!(cache.history("s2")[0].utterance, "b");
        assert_eq!(cache.len(), 2);
    }
}
