//! Prompt template engine with variable substitution and conditional sections.

use std::collections::HashMap;

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

const SECTION_OPEN: &str = "{{#if ";
const SECTION_CLOSE: &str = "{{/if}}";

/// Errors that can occur during template operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A required variable was not provided.
    #[error("missing required variable: {name}")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
    },

    /// A `{{#if ...}}` section has no matching `{{/if}}`, or the reverse.
    #[error("unbalanced section: {name}")]
    UnbalancedSection {
        /// Name of the section, or `/if` for a stray close tag.
        name: String,
    },
}

/// A prompt template.
///
/// `{{variable}}` is replaced by the variable's value. A block wrapped in
/// `{{#if variable}} ... {{/if}}` is kept only when the variable is set to a
/// non-blank value. After rendering, consecutive blank lines collapse into
/// one so omitted sections leave no holes.
///
/// # Examples
///
/// ```
/// use recipe_prompts::template::PromptTemplate;
///
/// let template = PromptTemplate::builder("Cook {{dish}}.\n{{#if note}}\nNote: {{note}}\n{{/if}}")
///     .with_required_variable("dish")
///     .build();
///
/// let mut vars = std::collections::HashMap::new();
/// vars.insert("dish".to_owned(), "soup".to_owned());
/// assert_eq!(template.render_with(&vars).unwrap(), "Cook soup.");
/// ```
#[derive(Clone, Debug)]
pub struct PromptTemplate {
    template: String,
    required_variables: Vec<String>,
}

impl PromptTemplate {
    /// Returns a builder for constructing templates.
    #[must_use]
    pub fn builder(template: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder::new(template)
    }

    /// Renders the template with the supplied variables.
    ///
    /// Values are inserted as-is: placeholder syntax inside a value is not
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] if a required variable is not
    /// set and [`TemplateError::UnbalancedSection`] for mismatched section tags.
    pub fn render_with(&self, vars: &HashMap<String, String>) -> TemplateResult<String> {
        let lookup = |name: &str| vars.get(name).map(String::as_str);

        for name in &self.required_variables {
            if lookup(name.as_str()).is_none_or(|value| value.trim().is_empty()) {
                return Err(TemplateError::MissingVariable { name: name.clone() });
            }
        }

        let expanded = expand_sections(&self.template, &lookup)?;
        Ok(tidy(&substitute(&expanded, &lookup)))
    }
}

/// Builder for constructing prompt templates.
pub struct TemplateBuilder {
    template: String,
    required_variables: Vec<String>,
}

impl TemplateBuilder {
    /// Creates a new builder with the supplied template text.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            required_variables: Vec::new(),
        }
    }

    /// Declares a variable that must be non-blank at render time.
    #[must_use]
    pub fn with_required_variable(mut self, name: impl Into<String>) -> Self {
        self.required_variables.push(name.into());
        self
    }

    /// Builds the template.
    #[must_use]
    pub fn build(self) -> PromptTemplate {
        PromptTemplate {
            template: self.template,
            required_variables: self.required_variables,
        }
    }
}

/// Renders items one per line as `- item`, skipping blank entries.
pub fn bullet_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .filter_map(|item| {
            let item = item.as_ref().trim();
            (!item.is_empty()).then(|| format!("- {item}"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolves `{{#if name}} ... {{/if}}` blocks, innermost content included.
fn expand_sections<'a, F>(text: &str, lookup: &F) -> TemplateResult<String>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    loop {
        let open = rest.find(SECTION_OPEN);
        let close = rest.find(SECTION_CLOSE);
        match (open, close) {
            (None, None) => {
                out.push_str(rest);
                return Ok(out);
            }
            (None, Some(_)) => {
                return Err(TemplateError::UnbalancedSection {
                    name: "/if".to_owned(),
                });
            }
            (Some(open), Some(close)) if close < open => {
                return Err(TemplateError::UnbalancedSection {
                    name: "/if".to_owned(),
                });
            }
            (Some(open), _) => {
                out.push_str(&rest[..open]);
                let after_open = &rest[open + SECTION_OPEN.len()..];
                let name_end =
                    after_open
                        .find("}}")
                        .ok_or_else(|| TemplateError::UnbalancedSection {
                            name: after_open.chars().take(16).collect(),
                        })?;
                let name = after_open[..name_end].trim();
                let body_start = &after_open[name_end + 2..];
                let body_len = matching_close(body_start).ok_or_else(|| {
                    TemplateError::UnbalancedSection {
                        name: name.to_owned(),
                    }
                })?;

                if lookup(name).is_some_and(|value| !value.trim().is_empty()) {
                    out.push_str(&expand_sections(&body_start[..body_len], lookup)?);
                }
                rest = &body_start[body_len + SECTION_CLOSE.len()..];
            }
        }
    }
}

/// Byte offset of the `{{/if}}` that closes a section whose body starts at `body`.
fn matching_close(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut offset = 0;
    loop {
        let tail = &body[offset..];
        let open = tail.find(SECTION_OPEN);
        let close = tail.find(SECTION_CLOSE)?;
        match open {
            Some(open) if open < close => {
                depth += 1;
                offset += open + SECTION_OPEN.len();
            }
            _ if depth == 0 => return Some(offset + close),
            _ => {
                depth -= 1;
                offset += close + SECTION_CLOSE.len();
            }
        }
    }
}

/// Replaces each `{{name}}` in one pass; inserted values are not rescanned.
fn substitute<'a, F>(text: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let Some(len) = rest[open + 2..].find("}}") else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = rest[open + 2..open + 2 + len].trim();
        out.push_str(lookup(name).unwrap_or_default());
        rest = &rest[open + 2 + len + 2..];
    }
    out.push_str(rest);
    out
}

/// Strips trailing whitespace per line and collapses runs of blank lines.
fn tidy(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        let previous_blank = lines.last().is_some_and(|last| last.is_empty());
        if line.is_empty() && (previous_blank || lines.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn template(text: &str) -> PromptTemplate {
        PromptTemplate::builder(text).build()
    }

    #[test]
    fn renders_simple_template() {
        let rendered = template("Hello {{name}}! {{ name }}")
            .render_with(&vars(&[("name", "World")]))
            .unwrap();
        assert_eq!(rendered, "Hello World! World");
    }

    #[test]
    fn unknown_variables_render_empty() {
        assert_eq!(template("a{{missing}}b").render_with(&vars(&[])).unwrap(), "ab");
    }

    #[test]
    fn values_are_not_rescanned() {
        let rendered = template("Ingredients: {{ingredients}}\nDiet: {{restrictions}}")
            .render_with(&vars(&[
                ("ingredients", "rice, {{restrictions}}"),
                ("restrictions", "vegan"),
            ]))
            .unwrap();
        assert_eq!(rendered, "Ingredients: rice, {{restrictions}}\nDiet: vegan");
    }

    #[test]
    fn required_variables_error_when_missing_or_blank() {
        let template = PromptTemplate::builder("Hello {{name}}!")
            .with_required_variable("name")
            .build();

        let err = template.render_with(&vars(&[])).expect_err("should error");
        assert!(matches!(err, TemplateError::MissingVariable { .. }));

        let err = template
            .render_with(&vars(&[("name", "  ")]))
            .expect_err("blank counts as missing");
        assert!(matches!(err, TemplateError::MissingVariable { .. }));
    }

    #[test]
    fn sections_follow_their_variable() {
        let template =
            template("Intro.\n\n{{#if extra}}\n## Extra\n- {{extra}}\n{{/if}}\n\nOutro.");

        let with = template.render_with(&vars(&[("extra", "vegan")])).unwrap();
        assert_eq!(with, "Intro.\n\n## Extra\n- vegan\n\nOutro.");

        let without = template.render_with(&vars(&[])).unwrap();
        assert_eq!(without, "Intro.\n\nOutro.");
        assert!(!without.contains("##"));
        assert!(!without.contains("- "));
    }

    #[test]
    fn nested_sections() {
        let template = template("{{#if a}}A{{#if b}}B{{/if}}{{/if}}C");
        assert_eq!(template.render_with(&vars(&[("a", "1")])).unwrap(), "AC");
        assert_eq!(
            template.render_with(&vars(&[("a", "1"), ("b", "1")])).unwrap(),
            "ABC"
        );
        assert_eq!(template.render_with(&vars(&[("b", "1")])).unwrap(), "C");
    }

    #[test]
    fn unbalanced_sections_are_reported() {
        let err = template("{{#if a}}never closed")
            .render_with(&vars(&[]))
            .expect_err("unbalanced");
        assert_eq!(
            err,
            TemplateError::UnbalancedSection {
                name: "a".to_owned()
            }
        );

        template("stray {{/if}}")
            .render_with(&vars(&[]))
            .expect_err("stray close");
    }

    #[test]
    fn bullet_list_skips_blank_items() {
        assert_eq!(bullet_list(["rice", " ", " beans "]), "- rice\n- beans");
        assert_eq!(bullet_list(Vec::<String>::new()), "");
    }

    #[test]
    fn tidy_collapses_blank_runs() {
        assert_eq!(tidy("\n\na  \n\n\n\nb\n\n"), "a\n\nb");
    }
}
