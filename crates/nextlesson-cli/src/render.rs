//! Plain-text and JSON rendering.

use nextlesson_core::{ElementRef, ElementType, Lesson};
use nextlesson_providers::ElementDirectory;

use crate::error::CliResult;

/// One line per lesson, aligned on the subject column.
pub fn render_lessons(lessons: &[Lesson]) -> String {
    if lessons.is_empty() {
        return "No lessons.".to_string();
    }

    let subject_width = lessons
        .iter()
        .map(|l| l.subject.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(lessons.len());
    for lesson in lessons {
        let mut line = format!(
            "{}-{}  {:subject_width$}",
            lesson.start.format("%H:%M"),
            lesson.end.format("%H:%M"),
            lesson.subject,
        );
        line.push_str(&format!("  {}", lesson.room));
        if !lesson.teacher.is_empty() {
            line.push_str(&format!("  {}", lesson.teacher));
        }
        if lesson.is_cancelled {
            line.push_str("  (cancelled)");
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// The lessons as pretty-printed JSON.
pub fn lessons_json(lessons: &[Lesson]) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(lessons)?)
}

/// A resolved element with its week-view link.
pub fn render_element(element: &ElementRef, week_url: &str) -> String {
    format!(
        "{} ({}, id {})\n{}",
        element.label,
        kind_name(element.kind),
        element.id,
        week_url
    )
}

/// The resolved element as pretty-printed JSON.
pub fn element_json(element: &ElementRef) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(element)?)
}

/// The class and teacher listing, with unavailable sources called out.
pub fn render_directory(directory: &ElementDirectory) -> String {
    let mut out = String::new();
    out.push_str(&render_section(
        "Classes",
        &directory.classes,
        directory.classes_available,
    ));
    out.push('\n');
    out.push_str(&render_section(
        "Teachers",
        &directory.teachers,
        directory.teachers_available,
    ));
    out
}

fn render_section(title: &str, elements: &[ElementRef], available: bool) -> String {
    if !available {
        return format!("{title}: (source unavailable)\n");
    }
    if elements.is_empty() {
        return format!("{title}: (none)\n");
    }
    let mut out = format!("{title}:\n");
    for element in elements {
        out.push_str(&format!("  {}\n", element.label));
    }
    out
}

fn kind_name(kind: ElementType) -> &'static str {
    match kind {
        ElementType::Class => "class",
        ElementType::Teacher => "teacher",
        ElementType::Subject => "subject",
        ElementType::Room => "room",
    }
}
