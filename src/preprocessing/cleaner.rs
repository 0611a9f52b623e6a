use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Uploaded file is empty")]
    Empty,
    #[error("Could not extract readable text from {filename}: found {found} recognizable characters, need at least {required}")]
    InsufficientText {
        filename: String,
        found: usize,
        required: usize,
    },
}

static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap());

pub struct Cleaner;

impl Cleaner {
    pub const MIN_READABLE_CHARS: usize = 10;
    pub const PREVIEW_CHARS: usize = 100;

    const PLAIN_EXTENSIONS: [&'static str; 4] = ["txt", "text", "md", "csv"];

    /// Turns an uploaded file into prompt text.
    ///
    /// Plain-text files are decoded and passed through. Anything else is
    /// decoded lossily and stripped down to printable characters, which must
    /// leave at least [`Self::MIN_READABLE_CHARS`] letters or digits.
    pub fn extract(filename: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::Empty);
        }

        let decoded = String::from_utf8_lossy(bytes);
        if Self::is_plain_text(filename) {
            debug!(filename, bytes = bytes.len(), "Plain-text upload passed through");
            return Ok(decoded.into_owned());
        }

        let cleaned = Self::strip_unreadable(&decoded);
        let found = cleaned.chars().filter(|c| c.is_alphanumeric()).count();
        if found < Self::MIN_READABLE_CHARS {
            warn!(filename, found, "Upload yielded too little readable text");
            return Err(ExtractionError::InsufficientText {
                filename: filename.to_string(),
                found,
                required: Self::MIN_READABLE_CHARS,
            });
        }

        debug!(
            filename,
            original_length = decoded.len(),
            cleaned_length = cleaned.len(),
            "Best-effort text extraction completed"
        );
        Ok(cleaned)
    }

    /// Short form of the user's input kept alongside history entries.
    pub fn preview(input: &str) -> String {
        if input.chars().count() <= Self::PREVIEW_CHARS {
            return input.to_string();
        }
        let head: String = input.chars().take(Self::PREVIEW_CHARS).collect();
        format!("{}...", head)
    }

    fn is_plain_text(filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                Self::PLAIN_EXTENSIONS
                    .iter()
                    .any(|plain| plain.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    fn strip_unreadable(text: &str) -> String {
        let printable: String = text
            .chars()
            .map(|c| match c {
                '\r' => '\n',
                '\n' | '\t' => c,
                '\u{FFFD}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        let collapsed = INLINE_WHITESPACE.replace_all(&printable, " ");
        BLANK_LINES
            .replace_all(&collapsed, "\n\n")
            .trim()
            .to_string()
    }
}
