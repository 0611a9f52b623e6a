//! Unit tests for export encoding and filenames.

use super::*;
use crate::config::PRODUCT_NAME;
use chrono::{FixedOffset, TimeZone, Utc};
use regex::Regex;
use tempfile::TempDir;

#[test]
fn txt_filename_and_layout() {
    let now = Utc::now();
    let artifact = export_response("x", "My  Feature!", ExportFormat::Txt, PRODUCT_NAME, &now).unwrap();

    let pattern = Regex::new(r"^my_feature!_\d{4}-\d{2}-\d{2}\.txt$").unwrap();
    assert!(pattern.is_match(&artifact.filename), "{}", artifact.filename);
    assert_eq!(artifact.mime_type, "text/plain");

    let text = std::str::from_utf8(&artifact.bytes).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("My  Feature!"));
    assert!(lines.next().unwrap().starts_with("Generated on: "));
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.next(), Some("x"));
    assert!(text.ends_with("\n\nx"));
}

#[test]
fn generated_on_uses_local_zone_and_filename_uses_utc_date() {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let now = offset.with_ymd_and_hms(2024, 6, 18, 21, 5, 9).unwrap();
    let artifact = export_response("body", "Lesson Plan Generator", ExportFormat::Txt, PRODUCT_NAME, &now).unwrap();

    assert_eq!(artifact.filename, "lesson_plan_generator_2024-06-19.txt");
    let text = std::str::from_utf8(&artifact.bytes).unwrap();
    assert!(text.contains("Generated on: 6/18/2024, 9:05:09 PM"));
}

#[test]
fn json_export_fields() {
    let now = Utc.with_ymd_and_hms(2024, 6, 18, 9, 30, 0).unwrap();
    let artifact = export_response("Great work", "Automatic Grading", ExportFormat::Json, PRODUCT_NAME, &now).unwrap();

    assert_eq!(artifact.filename, "automatic_grading_2024-06-18.json");
    let text = std::str::from_utf8(&artifact.bytes).unwrap();
    assert!(text.contains("\n  \"feature\""));

    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(value["feature"], "Automatic Grading");
    assert_eq!(value["content"], "Great work");
    assert_eq!(value["timestamp"], "2024-06-18T09:30:00.000Z");
    assert_eq!(value["exported_by"], "Auralis");
}

#[test]
fn pdf_export_is_a_pdf() {
    let now = Utc::now();
    let artifact = export_response("Some content", "Rubric Generator", ExportFormat::Pdf, PRODUCT_NAME, &now).unwrap();
    assert!(artifact.filename.ends_with(".pdf"));
    assert_eq!(artifact.mime_type, "application/pdf");
    assert!(artifact.bytes.starts_with(b"%PDF-1.4"));
    assert!(String::from_utf8_lossy(&artifact.bytes).contains("(Rubric Generator) Tj"));
}

#[test]
fn format_parsing() {
    assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    assert_eq!(" json ".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
    assert!(matches!(
        "docx".parse::<ExportFormat>(),
        Err(ExportError::UnknownFormat(f)) if f == "docx"
    ));
}

#[test]
fn slugify_collapses_whitespace() {
    assert_eq!(slugify("IEP-Aware Rewrite"), "iep-aware_rewrite");
    assert_eq!(slugify("a \t\n b"), "a_b");
}

#[test]
fn rubric_html_artifact() {
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let artifact = export_rubric_html(&crate::rubric::fallback_rubric(), "Northside Tutors", &now);
    assert_eq!(artifact.filename, "professional_rubric_2024-01-02.html");
    assert_eq!(artifact.mime_type, "text/html");
    assert!(std::str::from_utf8(&artifact.bytes)
        .unwrap()
        .contains("Total possible points: 100 points"));
    assert!(std::str::from_utf8(&artifact.bytes)
        .unwrap()
        .contains("<div>Northside Tutors</div>"));
}

#[test]
fn write_to_dir_persists_bytes() {
    let dir = TempDir::new().unwrap();
    let now = Utc::now();
    let artifact = export_response("saved", "Plagiarism Check", ExportFormat::Txt, PRODUCT_NAME, &now).unwrap();

    let path = write_to_dir(&artifact, dir.path().join("exports")).unwrap();
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), artifact.filename);
    assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes.to_vec());
}

#[test]
fn json_export_is_stamped_with_the_given_product() {
    let now = Utc::now();
    let artifact = export_response("x", "Quiz", ExportFormat::Json, "Northside Tutors", &now).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(value["exported_by"], "Northside Tutors");
}

#[test]
fn write_to_dir_refuses_paths_outside_the_directory() {
    let dir = TempDir::new().unwrap();
    let exports = dir.path().join("exports");
    let now = Utc::now();

    let artifact = export_response("x", "../escaped", ExportFormat::Txt, PRODUCT_NAME, &now).unwrap();
    assert!(matches!(
        write_to_dir(&artifact, &exports),
        Err(ExportError::UnsafeFilename(_))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let nested = export_response("x", "a/b", ExportFormat::Txt, PRODUCT_NAME, &now).unwrap();
    assert!(write_to_dir(&nested, &exports).is_err());
}
