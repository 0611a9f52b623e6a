//! Turns a [`PromptRequest`] into the instruction string sent to the model.

use crate::preprocessing::TaskKind;
use crate::prompts::schema::PromptRequest;
use crate::prompts::templates;

/// Builds the prompt for a request. Pure and deterministic: absent or blank
/// auxiliary fields fall back to the task's documented defaults.
pub fn build_prompt(request: &PromptRequest) -> String {
    let task = request.task();
    let fields = task.aux_fields();
    let text = request.primary_text();

    match task {
        TaskKind::AutomaticGrading => {
            templates::automatic_grading(text, request.field_or_default(&fields[0]))
        }
        TaskKind::SummarizeArticle => templates::summarize_article(text),
        TaskKind::PlagiarismCheck => templates::plagiarism_check(text),
        TaskKind::IepRewrite => templates::iep_rewrite(text, request.field_or_default(&fields[0])),
        TaskKind::RubricGenerator => templates::rubric(text, request.field_or_default(&fields[0])),
        TaskKind::ReportCardComments => templates::report_card_comments(
            request.field_or_default(&fields[0]),
            request.field_or_default(&fields[1]),
            text,
        ),
        TaskKind::CurriculumAnalyzer => {
            templates::curriculum_analysis(text, request.field_or_default(&fields[0]))
        }
        TaskKind::LessonPlanGenerator => templates::lesson_plan(
            text,
            request.field_or_default(&fields[0]),
            request.field_or_default(&fields[1]),
        ),
    }
}

impl PromptRequest {
    pub fn build(&self) -> String {
        build_prompt(self)
    }
}
