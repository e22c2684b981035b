//! Display formatting for model-written instructions.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\. ").expect("step marker pattern is valid"));

/// Renders numbered instructions as HTML-ish markup.
///
/// Literal `\n` escapes become newlines, every ASCII `<n>. ` marker becomes
/// `<b><n>.</b> `, one `<br>` is appended and every newline becomes `<br>`.
/// Nothing else in the text changes.
///
/// Apply exactly once per raw text: a second pass appends another `<br>`.
#[must_use]
pub fn format_instructions(raw: &str) -> String {
    let text = raw.replace("\\n", "\n");
    let mut out = STEP_MARKER
        .replace_all(&text, |caps: &Captures<'_>| format!("<b>{}.</b> ", &caps[1]))
        .into_owned();
    out.push_str("<br>");
    out.replace('\n', "<br>")
}
