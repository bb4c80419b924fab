//! Referenced-element lookup index for public weekly payloads.
//!
//! The public source's "referenced elements" list has moved between three
//! field names across deployments (`elements`, `elementList`,
//! `elementIds`). The index is built from whichever is present and
//! non-empty, checked in that fixed priority order, and insulates the
//! mapper from the variance. Built fresh per weekly fetch and discarded
//! after mapping that week's periods.

use std::collections::HashMap;

use crate::raw::{ElementInfo, WeeklyRoot};

/// Map from `(element type, element id)` to the element's record.
#[derive(Debug, Default)]
pub struct ElementLookup {
    entries: HashMap<(i64, i64), ElementInfo>,
}

impl ElementLookup {
    /// Builds the index from a weekly payload root.
    pub fn from_root(root: &WeeklyRoot) -> Self {
        let source = [&root.elements, &root.element_list, &root.element_ids]
            .into_iter()
            .find(|list| !list.is_empty());

        let mut entries = HashMap::new();
        if let Some(list) = source {
            for element in list {
                if let (Some(kind), Some(id)) = (element.kind, element.id) {
                    entries.insert((kind, id), element.clone());
                }
            }
        }
        Self { entries }
    }

    /// Looks up an element record; a miss is `None`, never an error.
    pub fn get(&self, kind: i64, id: i64) -> Option<&ElementInfo> {
        self.entries.get(&(kind, id))
    }

    /// Number of indexed elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
