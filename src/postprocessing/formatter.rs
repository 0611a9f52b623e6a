//! Converts raw model text into display text.

use crate::postprocessing::steps::{self, LineBreaks, ParagraphBreaks, StripCodeFence, WrapParagraph};
use crate::postprocessing::traits::TextTransform;
use crate::preprocessing::TaskKind;

/// An ordered pipeline of [`TextTransform`] steps applied in sequence.
///
/// Every step is a pure function of its input, so formatting the same raw
/// text always produces byte-identical output.
pub struct ResponseFormatter {
    steps: Vec<Box<dyn TextTransform>>,
}

impl ResponseFormatter {
    pub fn new(steps: Vec<Box<dyn TextTransform>>) -> Self {
        Self { steps }
    }

    /// Trimmed text with any wrapping code fence removed.
    pub fn plain() -> Self {
        Self::new(vec![Box::new(StripCodeFence)])
    }

    /// Headings, emphasis, paragraphs and line breaks.
    pub fn markup() -> Self {
        Self::new(vec![
            Box::new(steps::headings()),
            Box::new(steps::bold()),
            Box::new(steps::italic()),
            Box::new(ParagraphBreaks),
            Box::new(LineBreaks),
            Box::new(WrapParagraph),
        ])
    }

    /// [`Self::markup`] plus percentage-range badges.
    pub fn rubric() -> Self {
        Self::new(vec![
            Box::new(steps::headings()),
            Box::new(steps::bold()),
            Box::new(steps::italic()),
            Box::new(steps::percent_badges()),
            Box::new(ParagraphBreaks),
            Box::new(LineBreaks),
            Box::new(WrapParagraph),
        ])
    }

    pub fn for_task(task: TaskKind) -> Self {
        if task.is_rubric() {
            Self::rubric()
        } else {
            Self::markup()
        }
    }

    pub fn format(&self, raw: &str) -> String {
        self.steps
            .iter()
            .fold(raw.to_string(), |text, step| step.apply(&text))
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }
}
