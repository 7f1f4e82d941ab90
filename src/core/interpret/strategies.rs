use serde_json::Value;

use super::{ExtractionStrategy, Interpretation, Outcome, ReviewFields, truncate_chars};

const JSON_FENCE: &str = "```json";
const CLOSING_FENCE: &str = "```";
const SUMMARY_LIMIT: usize = 500;

/// Reads the first ```` ```json ```` block as a review payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct FencedJson;

impl FencedJson {
    fn fenced_block(text: &str) -> Option<&str> {
        let start = text.find(JSON_FENCE)? + JSON_FENCE.len();
        let rest = &text[start..];
        let end = rest.find(CLOSING_FENCE)?;
        Some(rest[..end].trim())
    }

    fn parse(block: &str) -> Option<ReviewFields> {
        let Value::Object(map) = serde_json::from_str::<Value>(block).ok()? else {
            return None;
        };

        let text_field = |key: &str, default: &str| match map.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => default.to_string(),
            Some(other) => other.to_string(),
        };

        let issues = match map.get("issues") {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        };

        let suggestions = match map.get("suggestions") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        };

        Some(ReviewFields {
            summary: text_field("summary", "Code review completed"),
            issues,
            suggestions,
            rating: text_field("rating", "Review completed"),
        })
    }
}

impl ExtractionStrategy for FencedJson {
    fn name(&self) -> &'static str {
        "fenced_json"
    }

    fn extract(&self, text: &str) -> Outcome {
        if !text.contains(JSON_FENCE) {
            return Outcome::NoMatch;
        }
        let Some(block) = Self::fenced_block(text) else {
            tracing::debug!("Unterminated ```json fence, trying next strategy");
            return Outcome::NoMatch;
        };
        match Self::parse(block) {
            Some(fields) => Outcome::Matched(Interpretation::Review(fields)),
            None => {
                tracing::debug!("Fenced block is not a JSON object, using raw text");
                Outcome::GiveUp
            }
        }
    }
}

/// Slices plain text into a review: leading summary, one suggestion per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextReview;

impl ExtractionStrategy for PlainTextReview {
    fn name(&self) -> &'static str {
        "plain_text_review"
    }

    fn extract(&self, text: &str) -> Outcome {
        let suggestions = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        Outcome::Matched(Interpretation::Review(ReviewFields {
            summary: truncate_chars(text, SUMMARY_LIMIT),
            issues: Vec::new(),
            suggestions,
            rating: "Review completed".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn review(outcome: Outcome) -> ReviewFields {
        match outcome {
            Outcome::Matched(Interpretation::Review(fields)) => fields,
            other => panic!("Expected review match, got {other:?}"),
        }
    }

    #[test]
    fn test_fenced_json_extracts_fields() {
        let text = "Here you go:\n```json\n{\"summary\": \"Looks fine\", \"issues\": [{\"line\": 3, \"message\": \"unused\"}], \"suggestions\": [\"rename x\"], \"rating\": \"B\"}\n```\nThanks";
        let fields = review(FencedJson.extract(text));

        assert_eq!(fields.summary, "Looks fine");
        assert_eq!(fields.issues, vec![json!({"line": 3, "message": "unused"})]);
        assert_eq!(fields.suggestions, vec!["rename x"]);
        assert_eq!(fields.rating, "B");
    }

    #[test]
    fn test_fenced_json_defaults() {
        let fields = review(FencedJson.extract("```json\n{}\n```"));

        assert_eq!(fields.summary, "Code review completed");
        assert!(fields.issues.is_empty());
        assert!(fields.suggestions.is_empty());
        assert_eq!(fields.rating, "Review completed");
    }

    #[test]
    fn test_fenced_json_stringifies_odd_values() {
        let fields = review(FencedJson.extract(
            "```json\n{\"rating\": 8, \"suggestions\": [\"a\", {\"b\": 1}], \"issues\": \"one\"}\n```",
        ));

        assert_eq!(fields.rating, "8");
        assert_eq!(fields.suggestions, vec!["a".to_string(), "{\"b\":1}".to_string()]);
        assert_eq!(fields.issues, vec![json!("one")]);
    }

    #[test]
    fn test_fenced_json_no_fence() {
        assert!(matches!(FencedJson.extract("plain answer"), Outcome::NoMatch));
    }

    #[test]
    fn test_fenced_json_unterminated() {
        assert!(matches!(
            FencedJson.extract("```json\n{\"summary\": \"x\"}"),
            Outcome::NoMatch
        ));
    }

    #[test]
    fn test_fenced_json_invalid_gives_up() {
        assert!(matches!(
            FencedJson.extract("```json\n{not json\n```"),
            Outcome::GiveUp
        ));
        assert!(matches!(
            FencedJson.extract("```json\n[1, 2]\n```"),
            Outcome::GiveUp
        ));
    }

    #[test]
    fn test_plain_text_review() {
        let fields = review(PlainTextReview.extract("Line one\n\n  \nLine two\n"));

        assert_eq!(fields.summary, "Line one\n\n  \nLine two\n");
        assert!(fields.issues.is_empty());
        assert_eq!(fields.suggestions, vec!["Line one", "Line two"]);
        assert_eq!(fields.rating, "Review completed");
    }

    #[test]
    fn test_plain_text_review_truncates_summary() {
        let text = "é".repeat(600);
        let fields = review(PlainTextReview.extract(&text));

        assert_eq!(fields.summary.chars().count(), SUMMARY_LIMIT + 3);
        assert!(fields.summary.ends_with("..."));
    }
}
