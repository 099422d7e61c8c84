//! Keyword Tables
//!
//! Fixed trigger phrases for intent and sentiment detection.
//! Declaration order is significant: when two categories score the same,
//! the one declared first wins.

use super::types::{IntentCategory, Sentiment};

/// An ordered, read-only mapping from a label to its trigger phrases.
#[derive(Debug, Clone, Copy)]
pub struct KeywordTable<L: 'static> {
    entries: &'static [(L, &'static [&'static str])],
}

impl<L: Copy + 'static> KeywordTable<L> {
    pub const fn new(entries: &'static [(L, &'static [&'static str])]) -> Self {
        Self { entries }
    }

    /// Iterate categories in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (L, &'static [&'static str])> + '_ {
        self.entries.iter().map(|(label, phrases)| (*label, *phrases))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================
// INTENT TABLE
// ============================================================

const INTENT_ENTRIES: &[(IntentCategory, &[&str])] = &[
    (
        IntentCategory::Complaint,
        &["damaged", "broken", "issue", "problem", "wrong", "defective", "not working"],
    ),
    (
        IntentCategory::Cancellation,
        &["cancel", "terminate", "stop", "close account", "quit"],
    ),
    (
        IntentCategory::Billing,
        &["charge", "billing", "refund", "payment", "invoice", "duplicate", "expensive"],
    ),
    (
        IntentCategory::Upgrade,
        &["upgrade", "premium", "increase", "add", "more features"],
    ),
    (
        IntentCategory::AccountAccess,
        &["login", "password", "reset", "access", "lock", "forgot"],
    ),
    (
        IntentCategory::Support,
        &["help", "question", "howto", "how do i", "can you"],
    ),
    (
        IntentCategory::ComplaintResolution,
        &["sorry", "apologize", "make it right", "compensation"],
    ),
];

pub const INTENT_KEYWORDS: KeywordTable<IntentCategory> = KeywordTable::new(INTENT_ENTRIES);

// ============================================================
// SENTIMENT TABLE
// ============================================================

const SENTIMENT_ENTRIES: &[(Sentiment, &[&str])] = &[
    (
        Sentiment::Positive,
        &["thank", "appreciate", "great", "perfect", "love", "excellent", "satisfied", "happy"],
    ),
    (
        Sentiment::Negative,
        &["frustrated", "angry", "upset", "furious", "terrible", "horrible", "unacceptable", "annoyed"],
    ),
    (
        Sentiment::Neutral,
        &["okay", "fine", "alright", "sure", "understand"],
    ),
];

pub const SENTIMENT_KEYWORDS: KeywordTable<Sentiment> = KeywordTable::new(SENTIMENT_ENTRIES);
