//! Canonical lesson and element types.
//!
//! Everything downstream of the mappers works with [`Lesson`] values;
//! source-shaped records never leave the provider layer. Times are naive
//! local wall-clock times, matching how the upstream encodes them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Placeholder glyph for a subject or room that could not be resolved.
pub const PLACEHOLDER: &str = "—";

/// The kind of timetable element, with the upstream's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// A school class (upstream code 1).
    Class,
    /// A teacher (upstream code 2).
    Teacher,
    /// A subject (upstream code 3). Only appears in period element lists.
    Subject,
    /// A room (upstream code 4).
    Room,
}

impl ElementType {
    /// The upstream numeric code for this element type.
    pub fn code(self) -> i64 {
        match self {
            Self::Class => 1,
            Self::Teacher => 2,
            Self::Subject => 3,
            Self::Room => 4,
        }
    }

    /// Decodes an upstream numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Class),
            2 => Some(Self::Teacher),
            3 => Some(Self::Subject),
            4 => Some(Self::Room),
            _ => None,
        }
    }
}

/// A resolved reference to a class, teacher or room.
///
/// Immutable once created; picking a new entity replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    /// Provider-assigned identifier.
    pub id: i64,
    /// What kind of element this is.
    pub kind: ElementType,
    /// Display label: class long name, or teacher initials.
    pub label: String,
}

impl ElementRef {
    /// Creates a new element reference.
    pub fn new(id: i64, kind: ElementType, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
        }
    }
}

/// One canonical lesson, normalized from either upstream source.
///
/// Invariants: `start <= end`; `subject` and `room` fall back to
/// [`PLACEHOLDER`] rather than being empty; `teacher` is always in initials
/// form when present and empty when unresolved. Created fresh on every
/// fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Source identifier when available, else a derived date+start+subject
    /// composite unique within one day's fetch.
    pub id: String,
    /// Start of the lesson, local wall-clock time.
    pub start: NaiveDateTime,
    /// End of the lesson, local wall-clock time.
    pub end: NaiveDateTime,
    /// Subject label, never empty.
    pub subject: String,
    /// Room label, never empty.
    pub room: String,
    /// Teacher initials, empty when unresolved.
    pub teacher: String,
    /// True only when the source explicitly marks the period cancelled.
    pub is_cancelled: bool,
}

impl Lesson {
    /// True if the lesson has not started yet at `now`.
    pub fn starts_after(&self, now: NaiveDateTime) -> bool {
        self.start > now
    }
}
