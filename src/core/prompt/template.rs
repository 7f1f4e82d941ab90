use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;

static SLOT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex")
});

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template '{template}' has no value for slot '{slot}'")]
    MissingSlot { template: String, slot: String },

    #[error("Failed to read template file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    pub user_template: String,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl PromptTemplate {
    /// Renders `(system_prompt, user_prompt)`.
    ///
    /// `{slot}` is replaced by the matching field value, `{{` and `}}` become
    /// literal braces. Values are inserted as-is and never re-scanned.
    pub fn format(&self, fields: &[(&str, &str)]) -> Result<(String, String), TemplateError> {
        let system = self.render(&self.system_prompt, fields)?;
        let user = self.render(&self.user_template, fields)?;
        Ok((system, user))
    }

    /// Slots referenced by either prompt, in order of first appearance.
    #[must_use]
    pub fn slots(&self) -> Vec<String> {
        let mut slots: Vec<String> = Vec::new();
        for text in [&self.system_prompt, &self.user_template] {
            for caps in SLOT_REGEX.captures_iter(text) {
                if let Some(slot) = caps.get(1)
                    && !slots.iter().any(|s| s == slot.as_str())
                {
                    slots.push(slot.as_str().to_string());
                }
            }
        }
        slots
    }

    fn render(&self, text: &str, fields: &[(&str, &str)]) -> Result<String, TemplateError> {
        let lookup = |slot: &str| {
            fields
                .iter()
                .find(|(name, _)| *name == slot)
                .map(|(_, value)| *value)
        };

        for caps in SLOT_REGEX.captures_iter(text) {
            if let Some(slot) = caps.get(1)
                && lookup(slot.as_str()).is_none()
            {
                return Err(TemplateError::MissingSlot {
                    template: self.name.clone(),
                    slot: slot.as_str().to_string(),
                });
            }
        }

        let rendered = SLOT_REGEX.replace_all(text, |caps: &Captures<'_>| match caps.get(1) {
            Some(slot) => lookup(slot.as_str()).unwrap_or_default().to_string(),
            None => caps[0][..1].to_string(),
        });

        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(system: &str, user: &str) -> PromptTemplate {
        PromptTemplate {
            name: "test".to_string(),
            description: "Test template".to_string(),
            system_prompt: system.to_string(),
            user_template: user.to_string(),
            variables: BTreeMap::new(),
        }
    }

    #[test]
    fn test_format_substitutes_both_prompts() {
        let t = template("You review {language}.", "Review:\n{code}\n{language}");
        let (system, user) = t
            .format(&[("language", "rust"), ("code", "fn main() {}")])
            .unwrap();

        assert_eq!(system, "You review rust.");
        assert_eq!(user, "Review:\nfn main() {}\nrust");
    }

    #[test]
    fn test_format_missing_slot() {
        let t = template("sys", "Code: {code} Focus: {focus_instruction}");
        let err = t.format(&[("code", "x")]).unwrap_err();

        match err {
            TemplateError::MissingSlot { template, slot } => {
                assert_eq!(template, "test");
                assert_eq!(slot, "focus_instruction");
            }
            other => panic!("Expected MissingSlot, got {other:?}"),
        }
    }

    #[test]
    fn test_format_escaped_braces() {
        let t = template("Reply as {{\"summary\": ...}}", "{{literal}} {value}");
        let (system, user) = t.format(&[("value", "v")]).unwrap();

        assert_eq!(system, "Reply as {\"summary\": ...}");
        assert_eq!(user, "{literal} v");
    }

    #[test]
    fn test_format_values_are_not_rescanned() {
        let t = template("", "```\n{code}\n```");
        let code = "let s = format!(\"{name} {{x}}\");\n\\n $1 ${code}";
        let (_, user) = t.format(&[("code", code)]).unwrap();

        let echoed = user
            .strip_prefix("```\n")
            .and_then(|rest| rest.strip_suffix("\n```"))
            .unwrap();
        assert_eq!(echoed, code);
    }

    #[test]
    fn test_format_ignores_non_identifier_braces() {
        let t = template("Return {\"issues\": []}", "{ not a slot } {a-b}");
        let (system, user) = t.format(&[]).unwrap();

        assert_eq!(system, "Return {\"issues\": []}");
        assert_eq!(user, "{ not a slot } {a-b}");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let t = template("", "{a}");
        let (_, user) = t.format(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(user, "1");
    }

    #[test]
    fn test_slots() {
        let t = template("{language} expert", "{code} in {language} {{skip}} {focus}");
        assert_eq!(t.slots(), vec!["language", "code", "focus"]);
    }
}
