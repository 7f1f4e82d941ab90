//! Best-effort recovery of structured fields from free-form assistant output.
//!
//! An [`Interpreter`] runs its strategies in order. The first
//! [`Outcome::Matched`] wins, [`Outcome::NoMatch`] moves on to the next
//! strategy and [`Outcome::GiveUp`] skips straight to the raw-text fallback.

mod strategies;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use strategies::{FencedJson, PlainTextReview};

const RAW_SUMMARY_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewFields {
    pub summary: String,
    pub issues: Vec<Value>,
    pub suggestions: Vec<String>,
    pub rating: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Review(ReviewFields),
    Text(String),
}

impl Interpretation {
    /// The plain text view: the text itself, or a review's summary.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Review(review) => review.summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Matched(Interpretation),
    NoMatch,
    GiveUp,
}

pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, text: &str) -> Outcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawShape {
    Review,
    Text,
}

pub struct Interpreter {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    raw: RawShape,
}

impl Interpreter {
    /// Fenced JSON, then plain-text slicing, then the raw text as a review.
    #[must_use]
    pub fn review() -> Self {
        Self {
            strategies: vec![Box::new(FencedJson), Box::new(PlainTextReview)],
            raw: RawShape::Review,
        }
    }

    /// Passes the text through untouched.
    #[must_use]
    pub fn text() -> Self {
        Self {
            strategies: Vec::new(),
            raw: RawShape::Text,
        }
    }

    #[must_use]
    pub fn extract(&self, text: &str) -> Interpretation {
        for strategy in &self.strategies {
            match strategy.extract(text) {
                Outcome::Matched(interpretation) => {
                    tracing::debug!(strategy = strategy.name(), "Response interpreted");
                    return interpretation;
                }
                Outcome::NoMatch => {}
                Outcome::GiveUp => break,
            }
        }
        self.raw(text)
    }

    fn raw(&self, text: &str) -> Interpretation {
        match self.raw {
            RawShape::Text => Interpretation::Text(text.to_string()),
            RawShape::Review => Interpretation::Review(ReviewFields {
                summary: truncate_chars(text, RAW_SUMMARY_LIMIT),
                issues: Vec::new(),
                suggestions: vec![text.to_string()],
                rating: "Review completed (text format)".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("raw", &self.raw)
            .finish()
    }
}

/// First `limit` characters, with `...` appended when anything was cut.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
