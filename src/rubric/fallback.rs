use crate::rubric::RubricRow;

struct FallbackRow {
    criteria: &'static str,
    excellent: &'static str,
    good: &'static str,
    satisfactory: &'static str,
    needs_improvement: &'static str,
    points: &'static str,
    weight: &'static str,
    description: &'static str,
}

const FALLBACK_ROWS: [FallbackRow; 5] = [
    FallbackRow {
        criteria: "Content Quality & Understanding",
        excellent: "Demonstrates exceptional understanding with comprehensive analysis, original insights, and sophisticated reasoning. Shows mastery of all concepts with innovative applications.",
        good: "Shows solid understanding with good analysis and clear reasoning. Demonstrates proficiency in most concepts with some creative applications.",
        satisfactory: "Displays basic understanding with adequate analysis. Shows developing grasp of fundamental concepts with standard applications.",
        needs_improvement: "Shows limited understanding with weak analysis. Demonstrates minimal grasp of concepts requiring significant support and instruction.",
        points: "25 points",
        weight: "25%",
        description: "Evaluates depth of understanding and quality of content",
    },
    FallbackRow {
        criteria: "Organization & Structure",
        excellent: "Exceptionally well-organized with clear, logical flow and seamless transitions. Compelling introduction that hooks the reader and conclusion that synthesizes key points effectively.",
        good: "Well-organized with good structure and adequate transitions. Clear introduction and conclusion that support the main content effectively.",
        satisfactory: "Basic organization with some structure. Adequate introduction and conclusion that meet minimum requirements.",
        needs_improvement: "Poor organization with unclear structure. Weak or missing introduction/conclusion that fail to support the content.",
        points: "20 points",
        weight: "20%",
        description: "Assesses logical flow and structural elements",
    },
    FallbackRow {
        criteria: "Research & Evidence",
        excellent: "Outstanding use of diverse, credible sources with excellent integration and critical analysis. Proper citations throughout with sophisticated synthesis of information.",
        good: "Good use of credible sources with adequate integration and analysis. Most citations are proper with effective use of supporting evidence.",
        satisfactory: "Basic use of acceptable sources with some integration. Citations are generally correct with adequate supporting evidence.",
        needs_improvement: "Limited or poor use of sources with minimal integration. Missing or incorrect citations with insufficient supporting evidence.",
        points: "20 points",
        weight: "20%",
        description: "Evaluates use of sources and supporting evidence",
    },
    FallbackRow {
        criteria: "Writing Mechanics & Style",
        excellent: "Excellent grammar, spelling, and style throughout. Engaging, professional writing with varied sentence structure and sophisticated vocabulary.",
        good: "Good grammar and spelling with clear, effective writing style. Minor errors that don't impede understanding with appropriate vocabulary.",
        satisfactory: "Adequate grammar and spelling with basic writing style. Writing is clear but may lack engagement with standard vocabulary.",
        needs_improvement: "Frequent errors in grammar/spelling that impede understanding. Poor writing style with limited vocabulary and unclear expression.",
        points: "15 points",
        weight: "15%",
        description: "Assesses technical writing skills and presentation",
    },
    FallbackRow {
        criteria: "Critical Thinking & Analysis",
        excellent: "Demonstrates sophisticated critical thinking with in-depth analysis, evaluation of multiple perspectives, and original conclusions supported by evidence.",
        good: "Shows solid critical thinking with good analysis and consideration of different viewpoints. Conclusions are well-supported and logical.",
        satisfactory: "Displays basic critical thinking with adequate analysis. Shows some consideration of different perspectives with acceptable conclusions.",
        needs_improvement: "Limited critical thinking with superficial analysis. Minimal consideration of perspectives with weak or unsupported conclusions.",
        points: "20 points",
        weight: "20%",
        description: "Evaluates analytical and critical thinking skills",
    },
];

/// The canonical five-criterion rubric returned when nothing could be parsed.
///
/// Always the same rows, in the same order, with every field populated.
pub fn fallback_rubric() -> Vec<RubricRow> {
    FALLBACK_ROWS
        .iter()
        .map(|row| RubricRow {
            excellent: Some(row.excellent.to_string()),
            good: Some(row.good.to_string()),
            satisfactory: Some(row.satisfactory.to_string()),
            needs_improvement: Some(row.needs_improvement.to_string()),
            points: Some(row.points.to_string()),
            weight: Some(row.weight.to_string()),
            description: Some(row.description.to_string()),
            ..RubricRow::new(row.criteria)
        })
        .collect()
}
