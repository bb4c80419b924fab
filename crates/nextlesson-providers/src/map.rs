//! Normalizes one raw period into a canonical [`Lesson`].
//!
//! Extraction is table-driven: each of subject/room/teacher has a fixed
//! label-field priority (see [`crate::raw`]) applied first to the RPC
//! short-code arrays, then, for public-source data, to the period's typed
//! element references resolved through the [`ElementLookup`]. The lookup
//! only overrides a direct subject when the direct label is a generic
//! placeholder; for room and teacher it is consulted only when direct
//! extraction produced nothing.

use nextlesson_core::{
    ElementType, Lesson, PLACEHOLDER, decode_date, decode_time, is_generic_subject, to_initials,
};

use crate::lookup::ElementLookup;
use crate::raw::{
    LabelField, RawPeriod, ROOM_LABEL_ORDER, ShortEntry, SUBJECT_LABEL_ORDER, TEACHER_LABEL_ORDER,
};

/// Substrings that mark a period as cancelled. Matching is conservative:
/// anything else, however irregular, counts as not cancelled.
const CANCEL_KEYWORDS: &[&str] = &["cancel"];

/// Maps one raw period (from either source) to a canonical lesson.
///
/// Pass the lookup index when the period came from the public weekly
/// source; RPC periods carry their labels inline and need none. The mapper
/// assumes a dated, well-formed period.
pub fn map_period(raw: &RawPeriod, lookup: Option<&ElementLookup>) -> Lesson {
    let date_number = raw.date_number().unwrap_or(0);
    let date = decode_date(date_number).unwrap_or_default();
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let start = raw
        .start_time
        .and_then(|t| decode_time(date, t))
        .unwrap_or(midnight);
    let end = raw
        .end_time
        .and_then(|t| decode_time(date, t))
        .unwrap_or(midnight)
        .max(start);

    let mut subject = direct_label(&[&raw.su, &raw.subjects], SUBJECT_LABEL_ORDER);
    let mut room = direct_label(&[&raw.ro, &raw.rooms], ROOM_LABEL_ORDER);
    let mut teacher = direct_label(&[&raw.te, &raw.teachers], TEACHER_LABEL_ORDER);

    if let Some(lookup) = lookup {
        if subject.as_deref().is_none_or(is_generic_subject) {
            let indexed = referenced_label(raw, lookup, ElementType::Subject, SUBJECT_LABEL_ORDER);
            if let Some(label) = indexed.filter(|l| !is_generic_subject(l)) {
                subject = Some(label);
            }
        }
        if room.is_none() {
            room = referenced_label(raw, lookup, ElementType::Room, ROOM_LABEL_ORDER);
        }
        if teacher.is_none() {
            teacher = referenced_label(raw, lookup, ElementType::Teacher, TEACHER_LABEL_ORDER);
        }
    }

    let teacher = teacher
        .map(|t| to_initials(&t))
        .unwrap_or_default();

    let is_cancelled = [&raw.code, &raw.lstext, &raw.cell_state, &raw.state]
        .into_iter()
        .flatten()
        .map(|s| s.to_lowercase())
        .any(|s| CANCEL_KEYWORDS.iter().any(|kw| s.contains(kw)));

    let id = match raw.id {
        Some(id) => id.to_string(),
        None => format!(
            "{}-{}-{}",
            date_number,
            raw.start_time.unwrap_or(0),
            subject.as_deref().unwrap_or("unknown")
        ),
    };

    Lesson {
        id,
        start,
        end,
        subject: subject.unwrap_or_else(|| PLACEHOLDER.to_string()),
        room: room.unwrap_or_else(|| PLACEHOLDER.to_string()),
        teacher,
        is_cancelled,
    }
}

/// Orders a day's mapped lessons by start time and cleans up duplicates.
///
/// The sort is stable, so lessons sharing a start keep their source
/// order. Exact duplicates (every field equal) collapse to one; distinct
/// lessons that ended up with the same derived id get a numeric suffix so
/// ids stay unique within the day.
pub fn dedup_sorted(mut lessons: Vec<Lesson>) -> Vec<Lesson> {
    lessons.sort_by_key(|lesson| lesson.start);

    let mut kept: Vec<Lesson> = Vec::with_capacity(lessons.len());
    for lesson in lessons {
        if !kept.contains(&lesson) {
            kept.push(lesson);
        }
    }

    let mut seen: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
    for lesson in &mut kept {
        let count = seen.entry(lesson.id.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            lesson.id = format!("{}-{}", lesson.id, count);
        }
    }
    kept
}

/// First non-empty label across the given short-code arrays, field-major
/// per the priority order. A zero-length array is simply no match.
fn direct_label(arrays: &[&[ShortEntry]], order: &[LabelField]) -> Option<String> {
    for field in order {
        for array in arrays {
            if let Some(label) = array.first().and_then(|entry| entry.label(&[*field])) {
                return Some(label.to_string());
            }
        }
    }
    None
}

/// Label for the period's referenced element of the given kind: the
/// in-record element's own label when it has one, otherwise the record
/// resolved through the lookup index.
fn referenced_label(
    raw: &RawPeriod,
    lookup: &ElementLookup,
    kind: ElementType,
    order: &[LabelField],
) -> Option<String> {
    let element = raw.element_of(kind.code())?;
    if let Some(label) = element.label(order) {
        return Some(label.to_string());
    }
    let id = element.id?;
    lookup
        .get(kind.code(), id)
        .and_then(|record| record.label(order))
        .map(|label| label.to_string())
}
