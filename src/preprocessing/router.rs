use serde::{Deserialize, Serialize};

/// The educational operations a request can be routed to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    AutomaticGrading,
    SummarizeArticle,
    PlagiarismCheck,
    IepRewrite,
    RubricGenerator,
    ReportCardComments,
    CurriculumAnalyzer,
    LessonPlanGenerator,
}

/// A labelled input that a task reads from the auxiliary field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxField {
    pub key: &'static str,
    pub label: &'static str,
    pub default: &'static str,
}

const GRADING_FIELDS: &[AuxField] = &[AuxField {
    key: "criteria",
    label: "Grading Criteria",
    default: "Standard grading criteria",
}];

const IEP_FIELDS: &[AuxField] = &[AuxField {
    key: "accommodations",
    label: "IEP Accommodations",
    default: "",
}];

const RUBRIC_FIELDS: &[AuxField] = &[AuxField {
    key: "criteria",
    label: "Assessment Criteria",
    default: "",
}];

const REPORT_CARD_FIELDS: &[AuxField] = &[
    AuxField {
        key: "student",
        label: "Student Name",
        default: "Student",
    },
    AuxField {
        key: "subject",
        label: "Subject",
        default: "General",
    },
];

const CURRICULUM_FIELDS: &[AuxField] = &[AuxField {
    key: "standards",
    label: "Educational Standards",
    default: "Common Core Standards",
}];

const LESSON_PLAN_FIELDS: &[AuxField] = &[
    AuxField {
        key: "grade",
        label: "Grade Level",
        default: "Elementary",
    },
    AuxField {
        key: "objectives",
        label: "Learning Objectives",
        default: "",
    },
];

impl TaskKind {
    pub const ALL: [TaskKind; 8] = [
        TaskKind::AutomaticGrading,
        TaskKind::SummarizeArticle,
        TaskKind::PlagiarismCheck,
        TaskKind::IepRewrite,
        TaskKind::RubricGenerator,
        TaskKind::ReportCardComments,
        TaskKind::CurriculumAnalyzer,
        TaskKind::LessonPlanGenerator,
    ];

    pub fn select_task(task: u32) -> Result<Self, String> {
        Self::ALL
            .get(task as usize)
            .copied()
            .ok_or_else(|| "Invalid task selected!".to_string())
    }

    /// Feature label used for history entries and export filenames.
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::AutomaticGrading => "Automatic Grading",
            TaskKind::SummarizeArticle => "Summarize Articles",
            TaskKind::PlagiarismCheck => "Plagiarism Check",
            TaskKind::IepRewrite => "IEP-Aware Rewrite",
            TaskKind::RubricGenerator => "Rubric Generator",
            TaskKind::ReportCardComments => "Report Card Comments",
            TaskKind::CurriculumAnalyzer => "Curriculum Analyzer",
            TaskKind::LessonPlanGenerator => "Lesson Plan Generator",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            TaskKind::AutomaticGrading => "automatic-grading",
            TaskKind::SummarizeArticle => "summarize-article",
            TaskKind::PlagiarismCheck => "plagiarism-check",
            TaskKind::IepRewrite => "iep-rewrite",
            TaskKind::RubricGenerator => "rubric-generator",
            TaskKind::ReportCardComments => "report-card-comments",
            TaskKind::CurriculumAnalyzer => "curriculum-analyzer",
            TaskKind::LessonPlanGenerator => "lesson-plan-generator",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|task| task.slug().eq_ignore_ascii_case(slug))
    }

    /// Auxiliary inputs the task's prompt reads, in display order.
    pub fn aux_fields(&self) -> &'static [AuxField] {
        match self {
            TaskKind::AutomaticGrading => GRADING_FIELDS,
            TaskKind::IepRewrite => IEP_FIELDS,
            TaskKind::RubricGenerator => RUBRIC_FIELDS,
            TaskKind::ReportCardComments => REPORT_CARD_FIELDS,
            TaskKind::CurriculumAnalyzer => CURRICULUM_FIELDS,
            TaskKind::LessonPlanGenerator => LESSON_PLAN_FIELDS,
            TaskKind::SummarizeArticle | TaskKind::PlagiarismCheck => &[],
        }
    }

    pub fn is_rubric(&self) -> bool {
        matches!(self, TaskKind::RubricGenerator)
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_task_by_index() {
        assert_eq!(TaskKind::select_task(0), Ok(TaskKind::AutomaticGrading));
        assert_eq!(TaskKind::select_task(4), Ok(TaskKind::RubricGenerator));
        assert_eq!(TaskKind::select_task(7), Ok(TaskKind::LessonPlanGenerator));
        assert!(TaskKind::select_task(8).is_err());
    }

    #[test]
    fn slug_round_trips_and_matches_serde() {
        for task in TaskKind::ALL {
            assert_eq!(TaskKind::from_slug(task.slug()), Some(task));
            let json = serde_json::to_string(&task).unwrap();
            assert_eq!(json, format!("\"{}\"", task.slug()));
        }
        assert_eq!(TaskKind::from_slug("nope"), None);
    }

    #[test]
    fn documented_defaults() {
        assert_eq!(
            TaskKind::AutomaticGrading.aux_fields()[0].default,
            "Standard grading criteria"
        );
        assert_eq!(
            TaskKind::CurriculumAnalyzer.aux_fields()[0].default,
            "Common Core Standards"
        );
        assert_eq!(
            TaskKind::LessonPlanGenerator.aux_fields()[0].default,
            "Elementary"
        );
        assert!(TaskKind::SummarizeArticle.aux_fields().is_empty());
    }
}
