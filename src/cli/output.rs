//! Human and JSON renderings of command results.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::server::resources::AssistantStatus;
use crate::tools::{CodeReviewResponse, GeminiToolResponse};

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pub json: bool,
    pub show_prompts: bool,
}

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}\n{}", rule());
}

fn issue_line(issue: &Value) -> String {
    let Some(obj) = issue.as_object() else {
        return issue.as_str().map_or_else(|| issue.to_string(), str::to_string);
    };
    let field = |key: &str| obj.get(key).and_then(Value::as_str);
    let line = obj
        .get("line_numbers")
        .and_then(Value::as_array)
        .and_then(|lines| lines.first())
        .map(|line| format!(" (line {line})"))
        .unwrap_or_default();

    format!(
        "[{}/{}] {}{line}",
        field("type").unwrap_or("Unknown"),
        field("severity").unwrap_or("Unknown"),
        field("description").unwrap_or("No description"),
    )
}

impl Printer {
    #[must_use]
    pub const fn new(json: bool, show_prompts: bool) -> Self {
        Self { json, show_prompts }
    }

    fn prompts(self, out: &mut String, input_prompt: &str, gemini_response: &str) {
        if !self.show_prompts {
            return;
        }
        out.push('\n');
        heading(out, "Prompt sent to Gemini");
        let _ = writeln!(out, "{input_prompt}\n");
        heading(out, "Raw response from Gemini");
        let _ = writeln!(out, "{gemini_response}");
    }

    #[must_use]
    pub fn render_review(self, review: &CodeReviewResponse) -> String {
        let mut out = String::new();
        heading(&mut out, "Review summary");
        let _ = writeln!(out, "{}", review.summary);

        if !review.issues.is_empty() {
            out.push('\n');
            heading(&mut out, "Issues");
            for issue in &review.issues {
                let _ = writeln!(out, "  - {}", issue_line(issue));
            }
        }

        if !review.suggestions.is_empty() {
            out.push('\n');
            heading(&mut out, "Suggestions");
            for (i, suggestion) in review.suggestions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {suggestion}", i + 1);
            }
        }

        let _ = writeln!(out, "\nOverall rating: {}", review.rating);
        self.prompts(&mut out, &review.input_prompt, &review.gemini_response);
        out
    }

    #[must_use]
    pub fn render_text(self, title: &str, response: &GeminiToolResponse) -> String {
        let mut out = String::new();
        heading(&mut out, title);
        let _ = writeln!(out, "{}", response.result);
        self.prompts(&mut out, &response.input_prompt, &response.gemini_response);
        out
    }

    #[must_use]
    pub fn render_status(status: &AssistantStatus) -> String {
        let mark = |ok: bool| if ok { "✓" } else { "✗" };
        let mut out = String::new();
        heading(&mut out, "Gemini CLI status");
        let _ = writeln!(out, "CLI available   {}", mark(status.cli_available));
        let _ = writeln!(out, "Authenticated   {}", mark(status.authenticated));
        let _ = writeln!(
            out,
            "Model           {}",
            status.model.as_deref().unwrap_or("Unknown")
        );
        if let Some(error) = &status.error {
            let _ = writeln!(out, "Error           {error}");
        }
        out
    }

    #[must_use]
    pub fn render_templates(templates: &BTreeMap<String, String>) -> String {
        let width = templates.keys().map(String::len).max().unwrap_or(0);
        let mut out = String::new();
        heading(&mut out, "Available templates");
        for (name, description) in templates {
            let _ = writeln!(out, "{name:<width$}  {description}");
        }
        out
    }

    /// `value` as pretty JSON, or the human rendering otherwise.
    pub fn render<T: Serialize>(self, value: &T, human: impl FnOnce() -> String) -> Result<String> {
        if self.json {
            Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
        } else {
            Ok(human())
        }
    }

    pub fn emit<T: Serialize>(self, value: &T, human: impl FnOnce() -> String) -> Result<()> {
        print!("{}", self.render(value, human)?);
        Ok(())
    }

    /// Like [`Printer::emit`], but saves to `output` when one is given.
    pub fn deliver<T: Serialize>(
        self,
        output: Option<&Path>,
        value: &T,
        human: impl FnOnce() -> String,
    ) -> Result<()> {
        let Some(path) = output else {
            return self.emit(value, human);
        };
        fs::write(path, self.render(value, human)?)?;
        eprintln!("✓ Output saved to {}", path.display());
        Ok(())
    }
}
