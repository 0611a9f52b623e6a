//! Standalone HTML document for downloading a rubric.

use crate::rubric::{PerformanceLevel, RubricRow};
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

pub const DOCUMENT_TITLE: &str = "Professional Assessment Rubric";
const SUBTITLE: &str = "Comprehensive Evaluation Framework with Percentage-Based Scoring";

const STYLE: &str = r#"
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #f5f7fa; }
        .rubric-container { background: white; padding: 40px; border-radius: 12px; max-width: 1400px; margin: 0 auto; }
        .header { text-align: center; margin-bottom: 40px; padding-bottom: 20px; border-bottom: 3px solid rgb(63, 159, 255); }
        h1 { color: #2c3e50; font-size: 2.5em; margin-bottom: 10px; }
        .subtitle { color: #7f8c8d; font-size: 1.2em; }
        table { width: 100%; border-collapse: collapse; margin: 30px 0; font-size: 14px; }
        th, td { border: 1px solid #e0e6ed; padding: 16px 12px; text-align: left; vertical-align: top; line-height: 1.5; }
        th { background: rgb(63, 159, 255); color: white; font-weight: 600; text-transform: uppercase; font-size: 13px; }
        .criteria-title { font-size: 15px; font-weight: 600; margin-bottom: 8px; color: rgb(63, 159, 255); }
        .criteria-desc { font-size: 12px; color: #7f8c8d; font-style: italic; }
        .points-weight { background: #f8f9fa; font-weight: 600; color: rgb(156, 77, 255); text-align: center; }
        .excellent { background: #d4edda; border-left: 4px solid #28a745; }
        .good { background: #d1ecf1; border-left: 4px solid #17a2b8; }
        .satisfactory { background: #fff3cd; border-left: 4px solid #ffc107; }
        .needs-improvement { background: #f8d7da; border-left: 4px solid #dc3545; }
        .performance-level { font-weight: 600; margin-bottom: 8px; text-transform: uppercase; font-size: 12px; }
        .percentage-range { font-weight: 700; padding: 4px 8px; border-radius: 4px; display: inline-block; color: white; margin-bottom: 6px; }
        .guide { margin-top: 30px; padding: 20px; background: #f8f9fa; border-left: 4px solid rgb(63, 159, 255); font-size: 13px; }
        .footer { text-align: center; margin-top: 40px; padding-top: 20px; border-top: 2px solid #ecf0f1; color: #7f8c8d; font-size: 14px; }
        @media print { body { background: white; padding: 0; } }
"#;

fn css_class(level: PerformanceLevel) -> &'static str {
    match level {
        PerformanceLevel::Excellent => "excellent",
        PerformanceLevel::Good => "good",
        PerformanceLevel::Satisfactory => "satisfactory",
        PerformanceLevel::NeedsImprovement => "needs-improvement",
    }
}

fn color(level: PerformanceLevel) -> &'static str {
    match level {
        PerformanceLevel::Excellent => "#28a745",
        PerformanceLevel::Good => "#17a2b8",
        PerformanceLevel::Satisfactory => "#ffc107",
        PerformanceLevel::NeedsImprovement => "#dc3545",
    }
}

/// Sum of every row's point value, counting [`crate::rubric::DEFAULT_ROW_POINTS`]
/// for rows without one. Saturates at `u32::MAX`.
pub fn total_points(rows: &[RubricRow]) -> u32 {
    rows.iter()
        .map(RubricRow::point_value)
        .fold(0, u32::saturating_add)
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Renders `rows` as the downloadable rubric document, signed `product_name`
/// in the footer.
///
/// Unset levels show their stock description; rows without points show the
/// default allowance.
pub fn render_html_table<Tz>(
    rows: &[RubricRow],
    product_name: &str,
    generated_at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut html, rows, product_name, generated_at);
    html
}

fn write_document<Tz>(
    out: &mut String,
    rows: &[RubricRow],
    product_name: &str,
    generated_at: &DateTime<Tz>,
) -> std::fmt::Result
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "    <meta charset=\"UTF-8\">")?;
    writeln!(
        out,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(out, "    <title>{}</title>", DOCUMENT_TITLE)?;
    writeln!(out, "    <style>{}    </style>", STYLE)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<div class=\"rubric-container\">")?;
    writeln!(
        out,
        "    <div class=\"header\"><h1>{}</h1><div class=\"subtitle\">{}</div></div>",
        DOCUMENT_TITLE, SUBTITLE
    )?;

    writeln!(out, "    <table>")?;
    writeln!(out, "        <thead><tr>")?;
    writeln!(out, "            <th style=\"width: 18%;\">Assessment Criteria</th>")?;
    writeln!(out, "            <th style=\"width: 8%;\">Points/Weight</th>")?;
    for level in PerformanceLevel::ALL {
        writeln!(
            out,
            "            <th>{} ({})</th>",
            level.label(),
            level.default_range()
        )?;
    }
    writeln!(out, "        </tr></thead>")?;
    writeln!(out, "        <tbody>")?;
    for row in rows {
        write_row(out, row)?;
    }
    writeln!(out, "        </tbody>")?;
    writeln!(out, "    </table>")?;

    writeln!(out, "    <div class=\"guide\">")?;
    writeln!(out, "        <h3>Percentage-Based Scoring Guide</h3>")?;
    for level in PerformanceLevel::ALL {
        writeln!(
            out,
            "        <div><strong>{} ({}):</strong> {}</div>",
            level.label(),
            level.default_range(),
            level.guide()
        )?;
    }
    writeln!(
        out,
        "        <p><em>Total possible points: {} points</em></p>",
        total_points(rows)
    )?;
    writeln!(out, "    </div>")?;

    writeln!(out, "    <div class=\"footer\">")?;
    writeln!(
        out,
        "        <div>Generated on {}</div>",
        generated_at.format("%B %-d, %Y, %I:%M %p")
    )?;
    writeln!(out, "        <div>{}</div>", escape_html(product_name))?;
    writeln!(out, "    </div>")?;
    writeln!(out, "</div>")?;
    writeln!(out, "</body>")?;
    write!(out, "</html>")
}

fn write_row(out: &mut String, row: &RubricRow) -> std::fmt::Result {
    let criteria = if row.criteria.trim().is_empty() {
        "Assessment Criterion"
    } else {
        row.criteria.as_str()
    };

    writeln!(out, "            <tr>")?;
    write!(
        out,
        "                <td><div class=\"criteria-title\">{}</div>",
        escape_html(criteria)
    )?;
    if let Some(description) = row.description.as_deref().filter(|d| !d.is_empty()) {
        write!(
            out,
            "<div class=\"criteria-desc\">{}</div>",
            escape_html(description)
        )?;
    }
    writeln!(out, "</td>")?;

    let points = match row.points.as_deref().filter(|p| !p.is_empty()) {
        Some(points) => escape_html(points),
        None => format!("{} pts", crate::rubric::DEFAULT_ROW_POINTS),
    };
    write!(
        out,
        "                <td class=\"points-weight\"><div>{}</div>",
        points
    )?;
    if let Some(weight) = row.weight.as_deref().filter(|w| !w.is_empty()) {
        write!(out, "<div>{}</div>", escape_html(weight))?;
    }
    writeln!(out, "</td>")?;

    for level in PerformanceLevel::ALL {
        writeln!(
            out,
            "                <td class=\"{}\"><div class=\"performance-level\" style=\"color: {};\">{}</div><div class=\"percentage-range\" style=\"background: {};\">{}</div><div>{}</div></td>",
            css_class(level),
            color(level),
            level.label(),
            color(level),
            escape_html(row.range(level)),
            escape_html(row.level_text(level))
        )?;
    }
    writeln!(out, "            </tr>")
}
