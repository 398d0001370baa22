//! Domain guard: a keyword pre-filter run before any upstream call.
//!
//! Matching is a plain substring test over the lowercased, space-joined
//! content of the whole transcript. A keyword embedded in a longer word
//! still refuses ("stockings" contains "stock"); that over-blocking is kept
//! on purpose, the persona catches what the filter misses.
//!
//! The guard only sees transcripts that decode. A message with an unknown
//! role fails decoding with a 400 before the guard runs, even when its
//! content holds a denylisted term, so "adding a keyword always refuses"
//! holds for well-formed transcripts only.

use super::persona::OUT_OF_SCOPE_MESSAGE;
use crate::models::Message;

pub const OUT_OF_SCOPE_REASON: &str = "out_of_scope";

pub const DENYLIST: &[&str] = &[
    "politics",
    "vote",
    "election",
    "tax",
    "bank",
    "investment",
    "stock",
    "crypto",
    "lawyer",
    "legal",
    "prescription",
    "diagnose",
    "suicide",
    "weapon",
    "bomb",
    "crime",
    "hack",
    "password",
    "ssn",
    "social security",
    "loan",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardVerdict {
    Allowed,
    Refused {
        reason: &'static str,
        user_message: String,
    },
}

impl GuardVerdict {
    pub fn is_refused(&self) -> bool {
        matches!(self, GuardVerdict::Refused { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainGuard {
    keywords: Vec<String>,
}

impl Default for DomainGuard {
    fn default() -> Self {
        Self::with_keywords(DENYLIST.iter().copied())
    }
}

impl DomainGuard {
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn evaluate(&self, messages: &[Message]) -> GuardVerdict {
        match self.matched_keyword(messages) {
            Some(_) => GuardVerdict::Refused {
                reason: OUT_OF_SCOPE_REASON,
                user_message: OUT_OF_SCOPE_MESSAGE.to_string(),
            },
            None => GuardVerdict::Allowed,
        }
    }

    /// First denylisted keyword found in the transcript, in denylist order.
    pub fn matched_keyword(&self, messages: &[Message]) -> Option<&str> {
        let combined = combined_text(messages);
        self.keywords
            .iter()
            .find(|k| combined.contains(k.as_str()))
            .map(String::as_str)
    }
}

fn combined_text(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
