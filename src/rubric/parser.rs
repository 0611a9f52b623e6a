use crate::rubric::{fallback_rubric, PerformanceLevel, RubricRow};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const LEVEL_WORDS: &str = r"excellent|outstanding|exemplary|good|proficient|satisfactory|fair|adequate|needs?\s*improvement|poor|unsatisfactory";

/// A numbered, bulleted, dashed or heading line ending its label with a colon.
static CRITERION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.|•|\*|-|#{1,3})\s*(.+?):").unwrap());

/// A level word at the start of the line, optionally bulleted or bold, with an
/// optional parenthesised range before the separator.
static LEVEL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?:(?:\d+\.|•|\*|-)\s*)?(?:\*\*)?({})(?:\*\*)?\s*(?:\(\s*(\d+\s*-\s*\d+\s*%?)\s*\))?\s*(?:\*\*)?\s*[:\-]\s*(?:\*\*)?\s*(.+)$",
        LEVEL_WORDS
    ))
    .unwrap()
});

/// A level word anywhere in the line followed by a separator.
static LEVEL_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)({})\s*[:\-]\s*(.+)", LEVEL_WORDS)).unwrap());

static POINTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(points?|pts?|%)").unwrap());
static WEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)weight\s*:?\s*(\d+%?)").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

struct LevelLine {
    level: PerformanceLevel,
    range: Option<String>,
    text: String,
}

/// Extracts rubric rows from model text, in document order.
///
/// Never fails: text with no recognizable criterion yields
/// [`fallback_rubric`].
pub fn parse_rubric(text: &str) -> Vec<RubricRow> {
    let mut rows: Vec<RubricRow> = Vec::new();
    let mut current: Option<RubricRow> = None;

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        if let Some(row) = current.as_mut() {
            if let Some(level) = leading_level(line) {
                apply_level(row, level);
                continue;
            }
        }

        if let Some(criteria) = criterion(line) {
            if let Some(done) = current.take() {
                rows.push(done);
            }
            let mut row = RubricRow::new(criteria);
            row.points = POINTS.find(line).map(|m| m.as_str().to_string());
            current = Some(row);
            continue;
        }

        let Some(row) = current.as_mut() else {
            continue;
        };

        if let Some(level) = embedded_level(line) {
            apply_level(row, level);
            continue;
        }

        if row.points.is_none() {
            row.points = POINTS.find(line).map(|m| m.as_str().to_string());
        }
        if row.weight.is_none() {
            row.weight = WEIGHT.captures(line).map(|caps| caps[1].to_string());
        }
    }

    if let Some(done) = current.take() {
        rows.push(done);
    }

    if rows.is_empty() {
        debug!("No rubric criteria recognized, using the fallback rubric");
        return fallback_rubric();
    }

    debug!(rows = rows.len(), "Parsed rubric rows");
    rows
}

fn criterion(line: &str) -> Option<String> {
    let caps = CRITERION.captures(line)?;
    let label = caps[2].trim_matches(|c: char| c == '*' || c == '#' || c.is_whitespace());
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

fn leading_level(line: &str) -> Option<LevelLine> {
    let caps = LEVEL_LINE.captures(line)?;
    let level = PerformanceLevel::from_label(&caps[1])?;
    let range = caps.get(2).map(|m| normalize_range(m.as_str()));
    Some(LevelLine {
        level,
        range,
        text: caps[3].trim().trim_end_matches("**").trim().to_string(),
    })
}

fn embedded_level(line: &str) -> Option<LevelLine> {
    let caps = LEVEL_ANYWHERE.captures(line)?;
    Some(LevelLine {
        level: PerformanceLevel::from_label(&caps[1])?,
        range: None,
        text: caps[2].trim().to_string(),
    })
}

fn apply_level(row: &mut RubricRow, line: LevelLine) {
    if let Some(range) = line.range {
        row.set_range(line.level, range);
    }
    row.set_level(line.level, line.text);
}

fn normalize_range(range: &str) -> String {
    let compact = WHITESPACE.replace_all(range, "");
    if compact.ends_with('%') {
        compact.into_owned()
    } else {
        format!("{}%", compact)
    }
}
