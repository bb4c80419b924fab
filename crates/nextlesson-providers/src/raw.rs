//! Source-shaped raw records.
//!
//! Both upstream APIs describe a scheduled period with overlapping but
//! differently named fields: the RPC source attaches short-code arrays
//! (`su`/`ro`/`te` or their verbose `subjects`/`rooms`/`teachers`
//! spellings), while the public weekly source attaches a generic typed
//! `elements` array whose ids must be resolved through a lookup index.
//! [`RawPeriod`] is deliberately permissive and deserializes either shape;
//! which fields win is decided by the priority tables consumed in
//! [`crate::map`].

use serde::Deserialize;
use std::collections::HashMap;

/// Which label field to read from an element record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    /// Short code (`name`).
    Name,
    /// Long descriptive name (`longName`/`longname`).
    LongName,
    /// Display name (`displayName`/`displayname`).
    DisplayName,
}

/// Label priority for subjects: prefer the descriptive name over the code.
pub const SUBJECT_LABEL_ORDER: &[LabelField] =
    &[LabelField::LongName, LabelField::Name, LabelField::DisplayName];
/// Label priority for rooms: the short code is the room number.
pub const ROOM_LABEL_ORDER: &[LabelField] =
    &[LabelField::Name, LabelField::DisplayName, LabelField::LongName];
/// Label priority for teachers: the short code is usually already initials.
pub const TEACHER_LABEL_ORDER: &[LabelField] =
    &[LabelField::Name, LabelField::DisplayName, LabelField::LongName];

fn pick<'a>(
    order: &[LabelField],
    name: &'a Option<String>,
    longname: &'a Option<String>,
    displayname: &'a Option<String>,
) -> Option<&'a str> {
    order
        .iter()
        .filter_map(|field| match field {
            LabelField::Name => name.as_deref(),
            LabelField::LongName => longname.as_deref(),
            LabelField::DisplayName => displayname.as_deref(),
        })
        .find(|label| !label.trim().is_empty())
}

/// One entry of an RPC short-code array (`su`, `ro`, `te`, ...).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShortEntry {
    /// Element id, when the source includes one.
    pub id: Option<i64>,
    /// Short code.
    pub name: Option<String>,
    /// Long name; both upstream spellings occur.
    #[serde(alias = "longName")]
    pub longname: Option<String>,
    /// Display name; both upstream spellings occur.
    #[serde(alias = "displayName")]
    pub displayname: Option<String>,
}

impl ShortEntry {
    /// First non-empty label in the given priority order.
    pub fn label(&self, order: &[LabelField]) -> Option<&str> {
        pick(order, &self.name, &self.longname, &self.displayname)
    }
}

/// A typed element record, as found in a period's `elements` array or in
/// the weekly payload's referenced-element lists.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElementInfo {
    /// Upstream element-type code (1 class, 2 teacher, 3 subject, 4 room).
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    /// Element id.
    pub id: Option<i64>,
    /// Short code.
    pub name: Option<String>,
    /// Long name; both upstream spellings occur.
    #[serde(alias = "longName")]
    pub longname: Option<String>,
    /// Display name; both upstream spellings occur.
    #[serde(alias = "displayName")]
    pub displayname: Option<String>,
}

impl ElementInfo {
    /// First non-empty label in the given priority order.
    pub fn label(&self, order: &[LabelField]) -> Option<&str> {
        pick(order, &self.name, &self.longname, &self.displayname)
    }
}

/// One scheduled period, as either source shapes it. Opaque to everything
/// except the mapper; lives for one fetch cycle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPeriod {
    /// Source period id.
    pub id: Option<i64>,
    /// Period date as `YYYYMMDD`.
    pub date: Option<i64>,
    /// Some payloads carry the date as `startDate`/`endDate` instead.
    pub start_date: Option<i64>,
    /// See `start_date`.
    pub end_date: Option<i64>,
    /// Start time as `HHMM`.
    pub start_time: Option<i64>,
    /// End time as `HHMM`.
    pub end_time: Option<i64>,

    /// RPC subject short codes.
    pub su: Vec<ShortEntry>,
    /// Verbose spelling of `su`.
    pub subjects: Vec<ShortEntry>,
    /// RPC room short codes.
    pub ro: Vec<ShortEntry>,
    /// Verbose spelling of `ro`.
    pub rooms: Vec<ShortEntry>,
    /// RPC teacher short codes.
    pub te: Vec<ShortEntry>,
    /// Verbose spelling of `te`.
    pub teachers: Vec<ShortEntry>,

    /// Public-source typed element references; `els` in some deployments.
    #[serde(alias = "els")]
    pub elements: Vec<ElementInfo>,

    /// Status code, e.g. `cancelled`.
    pub code: Option<String>,
    /// Free status text.
    pub lstext: Option<String>,
    /// Cell state from the weekly view.
    pub cell_state: Option<String>,
    /// Alternate state field.
    pub state: Option<String>,
}

impl RawPeriod {
    /// The period's date number, whichever field the source used.
    pub fn date_number(&self) -> Option<i64> {
        self.date.or(self.start_date).or(self.end_date)
    }

    /// The period's typed element of the given kind, if any.
    pub fn element_of(&self, kind: i64) -> Option<&ElementInfo> {
        self.elements.iter().find(|e| e.kind == Some(kind))
    }

    /// True if the period references the given `(type, id)` pair.
    pub fn references(&self, kind: i64, id: i64) -> bool {
        self.elements
            .iter()
            .any(|e| e.kind == Some(kind) && e.id == Some(id))
    }
}

/// Root of one weekly-data response: periods plus whichever
/// referenced-element list this deployment emits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeeklyRoot {
    /// Per-entity period lists keyed by stringified element id.
    pub element_periods: HashMap<String, Vec<RawPeriod>>,
    /// Referenced elements, primary spelling.
    pub elements: Vec<ElementInfo>,
    /// Referenced elements, alternate spelling.
    pub element_list: Vec<ElementInfo>,
    /// Referenced elements, alternate spelling.
    pub element_ids: Vec<ElementInfo>,
    /// Flat period list across all entities of the requested view.
    pub periods: Vec<RawPeriod>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_rpc_shape() {
        let period: RawPeriod = serde_json::from_value(serde_json::json!({
            "id": 111,
            "date": 20250825,
            "startTime": 810,
            "endTime": 905,
            "su": [{"id": 1, "name": "MAT", "longname": "Mathematics"}],
            "ro": [{"id": 2, "name": "A12"}],
            "te": [{"id": 3, "name": "WP"}]
        }))
        .unwrap();

        assert_eq!(period.date_number(), Some(20250825));
        assert_eq!(period.su[0].label(SUBJECT_LABEL_ORDER), Some("Mathematics"));
        assert_eq!(period.ro[0].label(ROOM_LABEL_ORDER), Some("A12"));
        assert!(period.elements.is_empty());
    }

    #[test]
    fn deserializes_public_shape_with_els_alias() {
        let period: RawPeriod = serde_json::from_value(serde_json::json!({
            "startDate": 20250825,
            "startTime": 1000,
            "endTime": 1045,
            "els": [{"type": 3, "id": 40}, {"type": 4, "id": 50}],
            "cellState": "STANDARD"
        }))
        .unwrap();

        assert_eq!(period.date_number(), Some(20250825));
        assert!(period.references(3, 40));
        assert!(!period.references(3, 50));
        assert_eq!(period.element_of(4).and_then(|e| e.id), Some(50));
        assert_eq!(period.cell_state.as_deref(), Some("STANDARD"));
    }

    #[test]
    fn label_priority_tables() {
        let entry = ShortEntry {
            id: Some(1),
            name: Some("MAT".to_string()),
            longname: Some("Mathematics".to_string()),
            displayname: None,
        };
        assert_eq!(entry.label(SUBJECT_LABEL_ORDER), Some("Mathematics"));
        assert_eq!(entry.label(ROOM_LABEL_ORDER), Some("MAT"));
    }

    #[test]
    fn blank_labels_are_skipped() {
        let entry = ShortEntry {
            id: None,
            name: Some("  ".to_string()),
            longname: Some("Long".to_string()),
            displayname: None,
        };
        assert_eq!(entry.label(ROOM_LABEL_ORDER), Some("Long"));
    }

    #[test]
    fn long_name_camel_case_alias() {
        let entry: ShortEntry =
            serde_json::from_value(serde_json::json!({"id": 1, "longName": "History"})).unwrap();
        assert_eq!(entry.longname.as_deref(), Some("History"));
    }

    #[test]
    fn weekly_root_defaults_to_empty() {
        let root: WeeklyRoot = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(root.periods.is_empty());
        assert!(root.element_periods.is_empty());
        assert!(root.elements.is_empty());
    }
}
