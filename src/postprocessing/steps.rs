//! The individual rewrites the formatter composes.
//!
//! Later steps see markup inserted by earlier ones, so the order in which
//! [`crate::postprocessing::ResponseFormatter`] applies them matters.

use crate::postprocessing::traits::TextTransform;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"##\s+([^\n]*)").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static PERCENT_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)-(\d+)%").unwrap());

pub const PARAGRAPH_OPEN: &str = "<p class=\"mb-4\">";
pub const PARAGRAPH_BREAK: &str = "</p><p class=\"mb-4\">";

/// A `Regex::replace_all` step with a fixed replacement template.
pub struct RegexStep {
    name: &'static str,
    pattern: &'static Lazy<Regex>,
    replacement: &'static str,
}

impl TextTransform for RegexStep {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// `## text` → `<h2>`.
pub fn headings() -> RegexStep {
    RegexStep {
        name: "headings",
        pattern: &HEADING,
        replacement: "<h2 class=\"response-heading\">${1}</h2>",
    }
}

/// `**text**` → `<strong>`.
pub fn bold() -> RegexStep {
    RegexStep {
        name: "bold",
        pattern: &BOLD,
        replacement: "<strong class=\"response-strong\">${1}</strong>",
    }
}

/// `*text*` → `<em>`. Must run after [`bold`].
pub fn italic() -> RegexStep {
    RegexStep {
        name: "italic",
        pattern: &ITALIC,
        replacement: "<em class=\"response-em\">${1}</em>",
    }
}

/// `90-100%` → highlighted badge. Rubric output only.
pub fn percent_badges() -> RegexStep {
    RegexStep {
        name: "percent_badges",
        pattern: &PERCENT_RANGE,
        replacement: "<span class=\"range-badge\">${1}-${2}%</span>",
    }
}

/// Blank-line-separated paragraphs → paragraph breaks.
pub struct ParagraphBreaks;

impl TextTransform for ParagraphBreaks {
    fn name(&self) -> &'static str {
        "paragraphs"
    }

    fn apply(&self, text: &str) -> String {
        text.replace("\n\n", PARAGRAPH_BREAK)
    }
}

/// Remaining newlines → `<br>`.
pub struct LineBreaks;

impl TextTransform for LineBreaks {
    fn name(&self) -> &'static str {
        "line_breaks"
    }

    fn apply(&self, text: &str) -> String {
        text.replace('\n', "<br>")
    }
}

/// Wraps the whole text in one paragraph container.
pub struct WrapParagraph;

impl TextTransform for WrapParagraph {
    fn name(&self) -> &'static str {
        "wrap"
    }

    fn apply(&self, text: &str) -> String {
        format!("{}{}</p>", PARAGRAPH_OPEN, text)
    }
}

/// Trims the response and drops a surrounding code fence.
pub struct StripCodeFence;

impl TextTransform for StripCodeFence {
    fn name(&self) -> &'static str {
        "strip_code_fence"
    }

    fn apply(&self, text: &str) -> String {
        clean(text)
    }
}

/// Cleans and trims the raw LLM response.
pub fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() >= 6) {
        return trimmed.to_string();
    }

    let inner = &trimmed[3..trimmed.len() - 3];
    // Drop an info string such as ```markdown on the opening fence.
    let inner = match inner.split_once('\n') {
        Some((info, rest)) if !info.trim().contains(' ') => rest,
        _ => inner,
    };
    inner.trim().to_string()
}
