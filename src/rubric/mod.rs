//! Structured rubric rows recovered from free-form model output.

pub mod fallback;
pub mod html;
pub mod parser;

pub use fallback::fallback_rubric;
pub use html::{render_html_table, total_points};
pub use parser::parse_rubric;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Points assumed for a row whose `points` carries no integer.
pub const DEFAULT_ROW_POINTS: u32 = 25;

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// The four performance columns of a rubric.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub const ALL: [PerformanceLevel; 4] = [
        PerformanceLevel::Excellent,
        PerformanceLevel::Good,
        PerformanceLevel::Satisfactory,
        PerformanceLevel::NeedsImprovement,
    ];

    /// Maps a level word (any accepted synonym, any case) to its column.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if ["excellent", "outstanding", "exemplary"]
            .iter()
            .any(|word| label.contains(word))
        {
            Some(PerformanceLevel::Excellent)
        } else if ["good", "proficient"].iter().any(|word| label.contains(word)) {
            Some(PerformanceLevel::Good)
        } else if ["unsatisfactory", "needs", "need", "poor"]
            .iter()
            .any(|word| label.contains(word))
        {
            Some(PerformanceLevel::NeedsImprovement)
        } else if ["satisfactory", "fair", "adequate"]
            .iter()
            .any(|word| label.contains(word))
        {
            Some(PerformanceLevel::Satisfactory)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Satisfactory => "Satisfactory",
            PerformanceLevel::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn default_range(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "90-100%",
            PerformanceLevel::Good => "80-89%",
            PerformanceLevel::Satisfactory => "70-79%",
            PerformanceLevel::NeedsImprovement => "0-69%",
        }
    }

    /// Text shown for a level the model left undescribed.
    pub fn default_description(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Exceptional performance that exceeds all expectations. Demonstrates mastery and innovation with sophisticated understanding.",
            PerformanceLevel::Good => "Strong performance that meets most expectations. Shows solid understanding and skill with good application of concepts.",
            PerformanceLevel::Satisfactory => "Adequate performance that meets basic requirements. Shows developing understanding with standard application.",
            PerformanceLevel::NeedsImprovement => "Performance below expectations. Requires significant development and additional support to meet standards.",
        }
    }

    /// One-line meaning used in the scoring guide.
    pub fn guide(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Exceeds expectations with exceptional quality",
            PerformanceLevel::Good => "Meets expectations with solid performance",
            PerformanceLevel::Satisfactory => "Approaching expectations with adequate work",
            PerformanceLevel::NeedsImprovement => "Below expectations requiring additional support",
        }
    }
}

/// One assessment criterion with its per-level descriptions.
///
/// Levels the source text never described stay `None`; renderers fall back
/// to [`RubricRow::level_text`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RubricRow {
    pub criteria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excellent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfactory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_improvement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub excellent_range: String,
    pub good_range: String,
    pub satisfactory_range: String,
    pub needs_improvement_range: String,
}

impl RubricRow {
    /// A row with no level text and the default percentage ranges.
    pub fn new(criteria: impl Into<String>) -> Self {
        Self {
            criteria: criteria.into(),
            excellent: None,
            good: None,
            satisfactory: None,
            needs_improvement: None,
            points: None,
            weight: None,
            description: None,
            excellent_range: PerformanceLevel::Excellent.default_range().to_string(),
            good_range: PerformanceLevel::Good.default_range().to_string(),
            satisfactory_range: PerformanceLevel::Satisfactory.default_range().to_string(),
            needs_improvement_range: PerformanceLevel::NeedsImprovement
                .default_range()
                .to_string(),
        }
    }

    pub fn level(&self, level: PerformanceLevel) -> Option<&str> {
        match level {
            PerformanceLevel::Excellent => self.excellent.as_deref(),
            PerformanceLevel::Good => self.good.as_deref(),
            PerformanceLevel::Satisfactory => self.satisfactory.as_deref(),
            PerformanceLevel::NeedsImprovement => self.needs_improvement.as_deref(),
        }
    }

    pub fn set_level(&mut self, level: PerformanceLevel, text: impl Into<String>) {
        let slot = match level {
            PerformanceLevel::Excellent => &mut self.excellent,
            PerformanceLevel::Good => &mut self.good,
            PerformanceLevel::Satisfactory => &mut self.satisfactory,
            PerformanceLevel::NeedsImprovement => &mut self.needs_improvement,
        };
        *slot = Some(text.into());
    }

    pub fn range(&self, level: PerformanceLevel) -> &str {
        match level {
            PerformanceLevel::Excellent => &self.excellent_range,
            PerformanceLevel::Good => &self.good_range,
            PerformanceLevel::Satisfactory => &self.satisfactory_range,
            PerformanceLevel::NeedsImprovement => &self.needs_improvement_range,
        }
    }

    pub fn set_range(&mut self, level: PerformanceLevel, range: impl Into<String>) {
        let slot = match level {
            PerformanceLevel::Excellent => &mut self.excellent_range,
            PerformanceLevel::Good => &mut self.good_range,
            PerformanceLevel::Satisfactory => &mut self.satisfactory_range,
            PerformanceLevel::NeedsImprovement => &mut self.needs_improvement_range,
        };
        *slot = range.into();
    }

    /// The level's description, or the stock text when it is unset or blank.
    pub fn level_text(&self, level: PerformanceLevel) -> &str {
        match self.level(level) {
            Some(text) if !text.trim().is_empty() => text,
            _ => level.default_description(),
        }
    }

    /// First integer in `points`, or [`DEFAULT_ROW_POINTS`].
    pub fn point_value(&self) -> u32 {
        self.points
            .as_deref()
            .and_then(|points| FIRST_INTEGER.find(points))
            .and_then(|digits| digits.as_str().parse().ok())
            .unwrap_or(DEFAULT_ROW_POINTS)
    }
}
