//! High-level timetable service.
//!
//! One [`Timetable`] per deployment; it owns both source clients and is
//! the only surface the presentation layers talk to. Day fetches never
//! fail, resolution fails only with `NotFound`, and the element listing
//! reports per-category availability instead of erroring.

use chrono::NaiveDate;
use tracing::warn;

use nextlesson_core::{ElementRef, ElementType, Lesson, fold_key};

use crate::config::UntisConfig;
use crate::error::SourceResult;
use crate::fetch::{fetch_for_date, fetch_today};
use crate::public::PublicClient;
use crate::raw::ElementInfo;
use crate::resolve::{TeacherEntry, resolve_name};
use crate::rpc::{RpcClient, RpcElement};

/// Elements known to the deployment, for interactive pickers and the
/// `list` command. `*_available` tells an empty category apart from one
/// whose source was down or denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDirectory {
    /// Classes, folded-alphabetical by label, deduplicated by label.
    pub classes: Vec<ElementRef>,
    /// Teachers, folded-alphabetical by label, deduplicated by label.
    pub teachers: Vec<ElementRef>,
    /// False when the class source could not be consulted.
    pub classes_available: bool,
    /// False when neither teacher source could be consulted.
    pub teachers_available: bool,
}

/// Facade over both timetable sources for one deployment.
#[derive(Debug)]
pub struct Timetable {
    config: UntisConfig,
    rpc: RpcClient,
    public: PublicClient,
}

impl Timetable {
    /// Creates the service for the given deployment.
    pub fn new(config: UntisConfig) -> SourceResult<Self> {
        let rpc = RpcClient::new(&config)?;
        let public = PublicClient::new(config.clone())?;
        Ok(Self {
            config,
            rpc,
            public,
        })
    }

    /// Creates the service from `UNTIS_SERVER` / `UNTIS_SCHOOL`.
    pub fn from_env() -> SourceResult<Self> {
        Self::new(UntisConfig::from_env())
    }

    /// The deployment this service talks to.
    pub fn config(&self) -> &UntisConfig {
        &self.config
    }

    /// Resolves a class or teacher name to an element reference.
    pub async fn resolve(&self, name: &str, today: NaiveDate) -> SourceResult<ElementRef> {
        resolve_name(&self.rpc, &self.public, name, today).await
    }

    /// Today's lessons, sorted, normalized, never failing.
    pub async fn today(&self, element: &ElementRef, today: NaiveDate) -> Vec<Lesson> {
        fetch_today(&self.rpc, &self.public, element, today).await
    }

    /// Lessons for an arbitrary date, public source only.
    pub async fn for_date(&self, element: &ElementRef, date: NaiveDate) -> Vec<Lesson> {
        fetch_for_date(&self.public, element, date).await
    }

    /// Every class and teacher name the deployment will admit to.
    pub async fn list_elements(&self, today: NaiveDate) -> ElementDirectory {
        let session = match self.rpc.login().await {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, "rpc login failed, listing from public source only");
                None
            }
        };

        let (classes, classes_available) = match &session {
            Some(session) => match session.classes().await {
                Ok(list) => (list, true),
                Err(err) => {
                    warn!(error = %err, "class list unavailable");
                    (Vec::new(), false)
                }
            },
            None => (Vec::new(), false),
        };

        let (rpc_teachers, rpc_teachers_ok) = match &session {
            Some(session) => match session.teachers().await {
                Ok(list) => (list, true),
                Err(_) => (Vec::new(), false),
            },
            None => (Vec::new(), false),
        };

        let (directory, directory_ok) = match self.public.teacher_directory(today).await {
            Ok(list) => (list, true),
            Err(err) => {
                warn!(error = %err, "public teacher directory unavailable");
                (Vec::new(), false)
            }
        };

        if let Some(session) = session {
            session.logout().await;
        }

        ElementDirectory {
            classes: sorted_refs(
                classes
                    .iter()
                    .map(|c| ElementRef::new(c.id, ElementType::Class, c.label())),
            ),
            teachers: sorted_refs(
                listing_teachers(rpc_teachers, &directory)
                    .iter()
                    .map(|t| ElementRef::new(t.id, ElementType::Teacher, t.display())),
            ),
            classes_available,
            teachers_available: rpc_teachers_ok || directory_ok,
        }
    }

    /// Deep link into the upstream week view for an element and date.
    pub fn week_view_url(&self, element: &ElementRef, date: NaiveDate) -> String {
        self.config.week_view_url(element.kind, element.id, date)
    }
}

/// Teacher entries for listing: the RPC labels are authoritative here,
/// the public directory only contributes ids the RPC list lacked.
fn listing_teachers(rpc: Vec<RpcElement>, directory: &[ElementInfo]) -> Vec<TeacherEntry> {
    let mut entries: Vec<TeacherEntry> = rpc
        .into_iter()
        .map(|t| TeacherEntry {
            id: t.id,
            name: t.name.unwrap_or_default(),
            longname: t.longname.unwrap_or_default(),
        })
        .collect();

    for record in directory {
        let Some(id) = record.id else { continue };
        if entries.iter().any(|entry| entry.id == id) {
            continue;
        }
        entries.push(TeacherEntry {
            id,
            name: record.name.clone().unwrap_or_default(),
            longname: record.longname.clone().unwrap_or_default(),
        });
    }
    entries
}

/// Drops blank labels and folded duplicates (first occurrence wins), then
/// sorts by folded key so diacritics do not scatter the listing.
fn sorted_refs(refs: impl IntoIterator<Item = ElementRef>) -> Vec<ElementRef> {
    let mut kept: Vec<ElementRef> = Vec::new();
    for element in refs {
        if element.label.trim().is_empty() {
            continue;
        }
        if kept.iter().any(|k| fold_key(&k.label) == fold_key(&element.label)) {
            continue;
        }
        kept.push(element);
    }
    kept.sort_by_key(|element| fold_key(&element.label));
    kept
}
