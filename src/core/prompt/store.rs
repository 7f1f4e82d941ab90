use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::defaults::builtin_templates;
use super::{PromptTemplate, TemplateError};

/// Named prompt templates, assembled once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: BTreeMap<String, PromptTemplate>,
}

impl TemplateStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for template in builtin_templates() {
            store.add_template(template);
        }
        store
    }

    /// Built-in templates overlaid with every `*.toml` file in `dir`.
    pub fn with_overrides(dir: &Path) -> Result<Self, TemplateError> {
        let mut store = Self::with_defaults();
        let loaded = store.load_dir(dir)?;
        tracing::info!("Loaded {} custom template(s) from {}", loaded, dir.display());
        Ok(store)
    }

    pub fn add_template(&mut self, template: PromptTemplate) {
        tracing::debug!(
            template = %template.name,
            slots = ?template.slots(),
            "Registered prompt template"
        );
        self.templates.insert(template.name.clone(), template);
    }

    #[must_use]
    pub fn get_template(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.get(name)
    }

    /// Template names mapped to their descriptions, ordered by name.
    #[must_use]
    pub fn list_templates(&self) -> BTreeMap<String, String> {
        self.templates
            .values()
            .map(|t| (t.name.clone(), t.description.clone()))
            .collect()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn load_dir(&mut self, dir: &Path) -> Result<usize, TemplateError> {
        let read_err = |source| TemplateError::Read {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let content = fs::read_to_string(path).map_err(|source| TemplateError::Read {
                path: path.clone(),
                source,
            })?;
            let template: PromptTemplate =
                toml::from_str(&content).map_err(|source| TemplateError::Parse {
                    path: path.clone(),
                    source,
                })?;
            if self.templates.contains_key(&template.name) {
                tracing::info!("Template '{}' overridden by {}", template.name, path.display());
            }
            self.add_template(template);
        }

        Ok(paths.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::defaults::{BUG_ANALYSIS, CODE_EXPLANATION, CODE_REVIEW, FEATURE_PLAN_REVIEW};
    use tempfile::TempDir;

    #[test]
    fn test_store_new_is_empty() {
        let store = TemplateStore::new();
        assert!(store.is_empty());
        assert!(store.get_template(CODE_REVIEW).is_none());
    }

    #[test]
    fn test_store_defaults() {
        let store = TemplateStore::with_defaults();
        assert_eq!(store.len(), 4);
        for name in [CODE_REVIEW, FEATURE_PLAN_REVIEW, BUG_ANALYSIS, CODE_EXPLANATION] {
            assert!(store.get_template(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_list_templates_is_ordered() {
        let store = TemplateStore::with_defaults();
        let listed = store.list_templates();
        let names: Vec<&String> = listed.keys().collect();

        assert_eq!(
            names,
            vec![BUG_ANALYSIS, CODE_EXPLANATION, CODE_REVIEW, FEATURE_PLAN_REVIEW]
        );
        assert_eq!(
            listed.get(CODE_REVIEW).map(String::as_str),
            Some("Template for code review and analysis")
        );
        assert_eq!(store.names().len(), 4);
    }

    #[test]
    fn test_with_overrides_loads_and_replaces() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("review.toml"),
            r#"
name = "code_review"
description = "Terse review"
system_prompt = "Be terse."
user_template = "{code}"
"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("haiku.toml"),
            r#"
name = "haiku"
description = "Explain code as a haiku"
system_prompt = "You write haiku."
user_template = "{code}"

[variables]
code = "Code to describe"
"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = TemplateStore::with_overrides(dir.path()).unwrap();

        assert_eq!(store.len(), 5);
        let review = store.get_template(CODE_REVIEW).unwrap();
        assert_eq!(review.description, "Terse review");
        assert_eq!(review.system_prompt, "Be terse.");
        assert!(store.get_template("haiku").unwrap().variables.contains_key("code"));
    }

    #[test]
    fn test_with_overrides_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.toml"), "name = ").unwrap();

        let err = TemplateStore::with_overrides(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }));
    }

    #[test]
    fn test_with_overrides_missing_dir() {
        let err = TemplateStore::with_overrides(Path::new("/nonexistent/templates")).unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }
}
