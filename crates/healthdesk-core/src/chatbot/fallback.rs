//! Deterministic FAQ fallback: ordered keyword table, first substring match wins.

/// Reply when no keyword matches.
pub const DEFAULT_REPLY: &str =
    "I'm sorry, I don't have an answer for that. Please contact support.";

/// Keyword to canned reply, in match order. The order is part of the observable behavior:
/// an utterance containing several keywords gets the reply of the earliest entry.
pub const FAQ_TABLE: &[(&str, &str)] = &[
    (
        "symptoms",
        "Common symptoms include fever, cough, and fatigue. Consult a doctor for advice.",
    ),
    (
        "vaccine",
        "Vaccines are available at local clinics. Check eligibility on health.gov.",
    ),
    (
        "appointment",
        "Book an appointment via our portal or call 1-800-HEALTH.",
    ),
    ("volunteer", "Register as a volunteer using the form above."),
    ("default", DEFAULT_REPLY),
];

/// Ordered keyword table with a last-resort reply.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    entries: Vec<(String, String)>,
    default_reply: String,
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::new(FAQ_TABLE.iter().copied(), DEFAULT_REPLY)
    }
}

impl FallbackTable {
    /// Keywords are matched against the lower-cased utterance, so they should be lower case.
    pub fn new<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
        default_reply: &str,
    ) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, r)| (k.to_string(), r.to_string()))
                .collect(),
            default_reply: default_reply.to_string(),
        }
    }

    /// Reply for the first keyword (in table order) contained in the lower-cased utterance.
    pub fn reply(&self, utterance: &str) -> &str {
        let lower = utterance.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| lower.contains(keyword.as_str()))
            .map(|(_, reply)| reply.as_str())
            .unwrap_or(&self.default_reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symptoms_question_gets_symptoms_entry() {
        let table = FallbackTable::default();
        assert_eq!(table.reply("What are the symptoms?"), FAQ_TABLE[0].1);
    }

    #[test]
    fn unmatched_input_gets_default() {
        let table = FallbackTable::default();
        assert_eq!(table.reply("xyz123"), DEFAULT_REPLY);
        assert_eq!(table.reply(""), DEFAULT_REPLY);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let table = FallbackTable::default();
        assert_eq!(table.reply("VACCINES near me"), FAQ_TABLE[1].1);
        assert_eq!(table.reply("can I reschedule my appointments"), FAQ_TABLE[2].1);
    }

    #[test]
    fn earliest_table_entry_wins_over_utterance_position() {
        let table = FallbackTable::default();
        // "volunteer" appears first in the text, "symptoms" first in the table.
        assert_eq!(
            table.reply("volunteer question about symptoms"),
            FAQ_TABLE[0].1
        );
    }

    #[test]
    fn custom_table_keeps_declared_order() {
        let table = FallbackTable::new([("hi", "short"), ("this", "long")], "none");
        // "this" contains "hi", so the earlier entry shadows it.
        assert_eq!(table.reply("this"), "short");
        assert_eq!(table.reply("zzz"), "none");
    }
}
