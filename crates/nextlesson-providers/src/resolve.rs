//! Resolves a user-supplied name to a timetable element.
//!
//! Classes are matched first, by folded-key equality against either
//! label. Teachers come next, merged from the RPC list and the public
//! directory (the public labels win when both know an id), matched by
//! folded-key equality and then by initials. Resolution degrades: a
//! failed login or a denied teacher list narrows the candidate pool
//! instead of failing the operation, and only exhausting every strategy
//! yields [`SourceError::NotFound`].

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use nextlesson_core::{ElementRef, ElementType, fold_key, initials_key, to_initials};

use crate::error::{SourceError, SourceResult};
use crate::public::PublicClient;
use crate::raw::ElementInfo;
use crate::rpc::{RpcClient, RpcElement, RpcSession};

/// A teacher candidate after merging both sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TeacherEntry {
    pub id: i64,
    pub name: String,
    pub longname: String,
}

impl TeacherEntry {
    /// Display label, always in initials form: derived from the short
    /// code, or from the long name when there is no code. Codes that are
    /// already compact pass through unchanged.
    pub(crate) fn display(&self) -> String {
        if !self.name.trim().is_empty() {
            to_initials(&self.name)
        } else {
            to_initials(&self.longname)
        }
    }
}

/// Resolves `name` to a class or teacher reference.
pub async fn resolve_name(
    rpc: &RpcClient,
    public: &PublicClient,
    name: &str,
    today: NaiveDate,
) -> SourceResult<ElementRef> {
    let session = match rpc.login().await {
        Ok(session) => Some(session),
        Err(err) => {
            warn!(error = %err, "rpc login failed, resolving without it");
            None
        }
    };

    let result = resolve_with(session.as_ref(), public, name, today).await;
    if let Some(session) = session {
        session.logout().await;
    }
    result
}

async fn resolve_with(
    session: Option<&RpcSession<'_>>,
    public: &PublicClient,
    name: &str,
    today: NaiveDate,
) -> SourceResult<ElementRef> {
    let classes = match session {
        Some(session) => session.classes().await.unwrap_or_else(|err| {
            warn!(error = %err, "class list unavailable");
            Vec::new()
        }),
        None => Vec::new(),
    };
    if let Some(class) = match_class(&classes, name) {
        return Ok(class);
    }

    let rpc_teachers = match session {
        Some(session) => session.teachers().await.unwrap_or_else(|err| {
            // Routinely denied to anonymous sessions.
            debug!(error = %err, "rpc teacher list unavailable");
            Vec::new()
        }),
        None => Vec::new(),
    };
    let directory = public.teacher_directory(today).await.unwrap_or_else(|err| {
        warn!(error = %err, "public teacher directory unavailable");
        Vec::new()
    });

    let teachers = merge_teachers(rpc_teachers, &directory);
    match_teacher(&teachers, name).ok_or_else(|| SourceError::NotFound(name.to_string()))
}

/// Folded-key equality against either class label.
pub(crate) fn match_class(classes: &[RpcElement], name: &str) -> Option<ElementRef> {
    let wanted = fold_key(name);
    classes
        .iter()
        .find(|class| {
            class.name.as_deref().is_some_and(|n| fold_key(n) == wanted)
                || class
                    .longname
                    .as_deref()
                    .is_some_and(|n| fold_key(n) == wanted)
        })
        .map(|class| ElementRef::new(class.id, ElementType::Class, class.label()))
}

/// Exact folded match first, initials match second.
pub(crate) fn match_teacher(teachers: &[TeacherEntry], name: &str) -> Option<ElementRef> {
    let wanted = fold_key(name);
    let exact = teachers.iter().find(|t| {
        (!t.name.is_empty() && fold_key(&t.name) == wanted)
            || (!t.longname.is_empty() && fold_key(&t.longname) == wanted)
    });

    let by_initials = || {
        let wanted = initials_key(name);
        if wanted.is_empty() {
            return None;
        }
        teachers.iter().find(|t| {
            (!t.name.is_empty() && initials_key(&t.name) == wanted)
                || (!t.longname.is_empty() && initials_key(&to_initials(&t.longname)) == wanted)
        })
    };

    exact
        .or_else(by_initials)
        .map(|t| ElementRef::new(t.id, ElementType::Teacher, t.display()))
}

/// Merges the RPC teacher list with the public directory. Order follows
/// first sighting; for ids both sources know, the public labels replace
/// the RPC ones. Entries whose display label duplicates an earlier one
/// are dropped.
pub(crate) fn merge_teachers(rpc: Vec<RpcElement>, directory: &[ElementInfo]) -> Vec<TeacherEntry> {
    let mut merged: Vec<TeacherEntry> = Vec::with_capacity(rpc.len() + directory.len());
    let mut by_id: HashMap<i64, usize> = HashMap::new();

    for teacher in rpc {
        by_id.insert(teacher.id, merged.len());
        merged.push(TeacherEntry {
            id: teacher.id,
            name: teacher.name.unwrap_or_default(),
            longname: teacher.longname.unwrap_or_default(),
        });
    }

    for record in directory {
        let Some(id) = record.id else { continue };
        let name = record.name.clone().unwrap_or_default();
        let longname = record.longname.clone().unwrap_or_default();
        match by_id.get(&id) {
            Some(&index) => {
                let entry = &mut merged[index];
                if !name.trim().is_empty() {
                    entry.name = name;
                }
                if !longname.trim().is_empty() {
                    entry.longname = longname;
                }
            }
            None => {
                by_id.insert(id, merged.len());
                merged.push(TeacherEntry { id, name, longname });
            }
        }
    }

    let mut seen_labels = HashSet::new();
    merged.retain(|entry| {
        let label = fold_key(&entry.display());
        label.is_empty() || seen_labels.insert(label)
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: i64, name: &str, longname: &str) -> RpcElement {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": name, "longname": longname
        }))
        .unwrap()
    }

    fn teacher(id: i64, name: &str, longname: &str) -> TeacherEntry {
        TeacherEntry {
            id,
            name: name.to_string(),
            longname: longname.to_string(),
        }
    }

    mod classes {
        use super::*;

        #[test]
        fn matches_short_code() {
            let classes = vec![element(7, "M5", "Machinist year 5"), element(8, "E3", "Electrician")];
            let found = match_class(&classes, "m5").unwrap();
            assert_eq!(found.id, 7);
            assert_eq!(found.kind, ElementType::Class);
            assert_eq!(found.label, "M5");
        }

        #[test]
        fn matches_long_name_with_diacritics_folded() {
            let classes = vec![element(7, "M5", "Maskinmeistari ár 5")];
            assert_eq!(match_class(&classes, "maskinmeistari ar 5").unwrap().id, 7);
        }

        #[test]
        fn digit_only_name_matches_a_class() {
            let classes = vec![element(3, "5", "Year five")];
            assert_eq!(match_class(&classes, "5").unwrap().id, 3);
        }

        #[test]
        fn no_match_is_none() {
            assert!(match_class(&[element(7, "M5", "")], "x9").is_none());
        }
    }

    mod teachers {
        use super::*;

        #[test]
        fn matches_short_code_exactly() {
            let teachers = vec![teacher(9, "WP", "Winston Pedersen")];
            let found = match_teacher(&teachers, "WP").unwrap();
            assert_eq!(found.id, 9);
            assert_eq!(found.kind, ElementType::Teacher);
            assert_eq!(found.label, "WP");
        }

        #[test]
        fn matches_full_name() {
            let teachers = vec![teacher(9, "WP", "Winston Pedersen")];
            assert_eq!(match_teacher(&teachers, "winston pedersen").unwrap().id, 9);
        }

        #[test]
        fn matches_initials_of_long_name() {
            let teachers = vec![teacher(9, "", "Niels á Váli")];
            let found = match_teacher(&teachers, "NAV").unwrap();
            assert_eq!(found.id, 9);
            assert_eq!(found.label, "NAV");
        }

        #[test]
        fn full_name_in_the_code_field_still_labels_as_initials() {
            let teachers = vec![teacher(9, "Winston Pedersen", "")];
            let found = match_teacher(&teachers, "winston pedersen").unwrap();
            assert_eq!(found.id, 9);
            assert_eq!(found.label, "WP");
        }

        #[test]
        fn exact_match_beats_initials_match() {
            let teachers = vec![
                teacher(1, "AB", "Someone Else"),
                teacher(2, "XY", "Anna Berg"),
            ];
            assert_eq!(match_teacher(&teachers, "AB").unwrap().id, 1);
        }

        #[test]
        fn no_match_is_none() {
            assert!(match_teacher(&[teacher(9, "WP", "")], "ZZ").is_none());
        }
    }

    mod merging {
        use super::*;

        fn record(id: i64, name: &str, longname: &str) -> ElementInfo {
            serde_json::from_value(serde_json::json!({
                "type": 2, "id": id, "name": name, "longName": longname
            }))
            .unwrap()
        }

        #[test]
        fn public_labels_override_rpc_labels() {
            let rpc = vec![element(9, "W", "W. Pedersen")];
            let merged = merge_teachers(rpc, &[record(9, "WP", "Winston Pedersen")]);
            assert_eq!(merged, vec![teacher(9, "WP", "Winston Pedersen")]);
        }

        #[test]
        fn blank_public_labels_do_not_clobber() {
            let rpc = vec![element(9, "WP", "Winston Pedersen")];
            let merged = merge_teachers(rpc, &[record(9, "", "")]);
            assert_eq!(merged[0].name, "WP");
            assert_eq!(merged[0].longname, "Winston Pedersen");
        }

        #[test]
        fn directory_only_teachers_are_appended() {
            let rpc = vec![element(1, "AA", "")];
            let merged = merge_teachers(rpc, &[record(2, "BB", "")]);
            assert_eq!(merged.len(), 2);
            assert_eq!(merged[1].id, 2);
        }

        #[test]
        fn duplicate_labels_keep_the_first_entry() {
            let rpc = vec![element(1, "WP", "Winston Pedersen")];
            let merged = merge_teachers(rpc, &[record(2, "WP", "Wendy Park")]);
            assert_eq!(merged.len(), 1);
            assert_eq!(merged[0].id, 1);
        }

        #[test]
        fn order_follows_first_sighting() {
            let rpc = vec![element(1, "AA", ""), element(2, "BB", "")];
            let merged = merge_teachers(rpc, &[record(3, "CC", ""), record(1, "AX", "")]);
            let ids: Vec<i64> = merged.iter().map(|t| t.id).collect();
            assert_eq!(ids, vec![1, 2, 3]);
            assert_eq!(merged[0].name, "AX");
        }
    }
}
