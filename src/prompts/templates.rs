//! Re-usable prompt skeletons, one per task.

pub fn automatic_grading(content: &str, criteria: &str) -> String {
    format!(
        "As an expert teacher, grade the following student work based on the criteria provided. Provide a detailed analysis with scores, feedback, and suggestions for improvement.

Grading Criteria: {criteria}

Student Work:
{content}

Please provide:
1. Overall Grade (percentage or letter grade)
2. Detailed feedback for each criterion
3. Strengths identified
4. Areas for improvement
5. Specific suggestions for enhancement"
    )
}

pub fn summarize_article(content: &str) -> String {
    format!(
        "Please provide a comprehensive summary of the following article. Include:
1. Main points and key ideas
2. Supporting arguments or evidence
3. Conclusion or implications
4. Important details that shouldn't be missed

Article:
{content}"
    )
}

pub fn plagiarism_check(content: &str) -> String {
    format!(
        "Analyze the following text for potential plagiarism indicators. Look for:
1. Unusual style changes or inconsistencies
2. Overly sophisticated language for the context
3. Lack of proper citations
4. Generic or template-like content
5. Provide recommendations for verification

Text to analyze:
{content}

Please provide a detailed analysis with specific concerns and recommendations."
    )
}

pub fn iep_rewrite(content: &str, accommodations: &str) -> String {
    format!(
        "Rewrite the following content to be appropriate for a student with IEP accommodations. Make it accessible while maintaining educational value.

IEP Accommodations to consider: {accommodations}

Original Content:
{content}

Please provide:
1. Rewritten content with appropriate modifications
2. Explanation of changes made
3. Additional support strategies
4. Assessment adaptations if needed"
    )
}

pub fn rubric(assignment: &str, criteria: &str) -> String {
    format!(
        "Create a detailed rubric for the following assignment. Include multiple performance levels and clear criteria.

Assignment: {assignment}

Key Criteria to include: {criteria}

Please create a rubric with:
1. 4-5 performance levels (Excellent, Good, Satisfactory, Needs Improvement, etc.)
2. Clear descriptors for each level
3. Point values or percentage weights
4. Specific, measurable criteria"
    )
}

pub fn report_card_comments(student: &str, subject: &str, performance: &str) -> String {
    format!(
        "Generate professional, constructive report card comments for a student.

Student: {student}
Subject: {subject}
Performance Overview: {performance}

Please provide:
1. Positive comments highlighting strengths
2. Areas for growth and improvement
3. Specific suggestions for continued success
4. Encouraging and professional tone appropriate for parents"
    )
}

pub fn curriculum_analysis(curriculum: &str, standards: &str) -> String {
    format!(
        "Analyze the following curriculum content against educational standards and best practices.

Curriculum Content: {curriculum}

Standards to evaluate against: {standards}

Please provide:
1. Alignment analysis with standards
2. Strengths and gaps identified
3. Suggestions for improvement
4. Missing components or topics
5. Recommended enhancements"
    )
}

pub fn lesson_plan(topic: &str, grade: &str, objectives: &str) -> String {
    format!(
        "Create a comprehensive lesson plan for the specified topic and grade level.

Topic: {topic}
Grade Level: {grade}
Learning Objectives: {objectives}

Please include:
1. Lesson overview and duration
2. Materials needed
3. Step-by-step activities
4. Assessment methods
5. Differentiation strategies
6. Extension activities
7. Homework/follow-up assignments"
    )
}
