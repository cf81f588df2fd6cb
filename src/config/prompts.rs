//! Prompt templates for Nexus.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// Prompts for answering questions about an uploaded file.
    pub file: QaPrompts,
    /// Prompts for answering questions about a web page.
    pub url: QaPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// A system instruction plus a user message template.
///
/// The user template receives `{{document}}` and `{{question}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaPrompts {
    pub system: String,
    pub user: String,
}

impl QaPrompts {
    fn file_defaults() -> Self {
        Self {
            system: "You are a helpful assistant. Use the uploaded file content to answer questions."
                .to_string(),
            user: "{{document}}\n\nQuestion: {{question}}".to_string(),
        }
    }

    fn url_defaults() -> Self {
        Self {
            system: "You are a helpful assistant. Use the website content to answer the user's question."
                .to_string(),
            user: "Website Content:\n{{document}}\n\nNow answer this question:\n{{question}}"
                .to_string(),
        }
    }
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self::file_defaults()
    }
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            file: QaPrompts::file_defaults(),
            url: QaPrompts::url_defaults(),
            variables: Default::default(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let file_path = custom_path.join("file.toml");
            if file_path.exists() {
                let content = std::fs::read_to_string(&file_path)?;
                prompts.file = toml::from_str(&content)?;
            }

            let url_path = custom_path.join("url.toml");
            if url_path.exists() {
                let content = std::fs::read_to_string(&url_path)?;
                prompts.url = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass: inserted values are never scanned for
    /// placeholders, and unknown placeholders are left as they are.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    match vars.get(&after[..end]) {
                        Some(value) => result.push_str(value),
                        None => result.push_str(&rest[start..start + 2 + end + 2]),
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
