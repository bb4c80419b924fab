//! Day-fetch orchestration across both sources.
//!
//! Today's lessons are tried over RPC first; an empty or failed RPC
//! answer falls through to the public weekly view. Arbitrary dates go
//! straight to the public view. The public fetch itself walks a chain of
//! weekly format variants, because which `formatId` a deployment accepts
//! for a given element type is not discoverable up front. Failures are
//! logged and absorbed; an exhausted chain is an empty day, not an
//! error.

use chrono::NaiveDate;
use tracing::{debug, warn};

use nextlesson_core::{ElementRef, ElementType, Lesson, date_number};

use crate::lookup::ElementLookup;
use crate::map::{dedup_sorted, map_period};
use crate::public::PublicClient;
use crate::raw::{RawPeriod, WeeklyRoot};
use crate::rpc::RpcClient;

/// Format variants observed across deployments, in probe order.
const KNOWN_FORMATS: &[i64] = &[1, 3, 4];

/// Outcome of the RPC attempt: lessons, a clean-but-empty answer, or a
/// failure. The last two both fall through to the public source but are
/// logged differently.
enum Attempt {
    Hit(Vec<Lesson>),
    Miss,
    Failed,
}

/// The format variant a deployment most likely uses for an element type.
pub fn primary_format(kind: ElementType) -> i64 {
    match kind {
        ElementType::Class | ElementType::Subject => 1,
        ElementType::Teacher => 3,
        ElementType::Room => 4,
    }
}

/// Probe order for the public fetch: the primary variant first, then the
/// remaining known variants, without repeats.
pub fn format_chain(kind: ElementType) -> Vec<i64> {
    let mut chain = vec![primary_format(kind)];
    for &format_id in KNOWN_FORMATS {
        if !chain.contains(&format_id) {
            chain.push(format_id);
        }
    }
    chain
}

/// Today's lessons for an element, RPC first, public as fallback.
pub async fn fetch_today(
    rpc: &RpcClient,
    public: &PublicClient,
    element: &ElementRef,
    today: NaiveDate,
) -> Vec<Lesson> {
    match rpc_day(rpc, element, today).await {
        Attempt::Hit(lessons) => return lessons,
        Attempt::Miss => debug!("rpc answered with no lessons, trying public source"),
        Attempt::Failed => warn!("rpc source unavailable, trying public source"),
    }
    fetch_public_day(public, element, today).await
}

/// Lessons for an arbitrary date. Only the public source serves these.
pub async fn fetch_for_date(
    public: &PublicClient,
    element: &ElementRef,
    date: NaiveDate,
) -> Vec<Lesson> {
    fetch_public_day(public, element, date).await
}

async fn rpc_day(rpc: &RpcClient, element: &ElementRef, date: NaiveDate) -> Attempt {
    let session = match rpc.login().await {
        Ok(session) => session,
        Err(err) => {
            warn!(error = %err, "rpc login failed");
            return Attempt::Failed;
        }
    };

    let result = session.timetable(element.kind, element.id).await;
    session.logout().await;

    match result {
        Ok(periods) => {
            let wanted = date_number(date);
            let lessons: Vec<Lesson> = periods
                .iter()
                .filter(|p| p.date_number() == Some(wanted))
                .map(|p| map_period(p, None))
                .collect();
            if lessons.is_empty() {
                Attempt::Miss
            } else {
                Attempt::Hit(dedup_sorted(lessons))
            }
        }
        Err(err) => {
            warn!(error = %err, "rpc timetable fetch failed");
            Attempt::Failed
        }
    }
}

async fn fetch_public_day(
    public: &PublicClient,
    element: &ElementRef,
    date: NaiveDate,
) -> Vec<Lesson> {
    for format_id in format_chain(element.kind) {
        match public
            .weekly_data(element.kind, element.id, date, format_id)
            .await
        {
            Ok(root) => {
                let lessons = day_lessons(&root, element, date);
                if !lessons.is_empty() {
                    return lessons;
                }
                debug!(format_id, "format variant had no lessons for the day");
            }
            Err(err) => warn!(format_id, error = %err, "format variant failed"),
        }
    }
    Vec::new()
}

/// Extracts, maps, and orders one day's lessons from a weekly payload.
pub(crate) fn day_lessons(root: &WeeklyRoot, element: &ElementRef, date: NaiveDate) -> Vec<Lesson> {
    let lookup = ElementLookup::from_root(root);
    let wanted = date_number(date);
    let lessons: Vec<Lesson> = day_periods(root, element)
        .into_iter()
        .filter(|p| p.date_number() == Some(wanted))
        .map(|p| map_period(p, Some(&lookup)))
        .collect();
    dedup_sorted(lessons)
}

/// The payload's periods for one element: its own `elementPeriods` bucket
/// when present and non-empty, otherwise every period in the payload
/// whose element references include the requested `(type, id)` pair.
fn day_periods<'a>(root: &'a WeeklyRoot, element: &ElementRef) -> Vec<&'a RawPeriod> {
    if let Some(list) = root.element_periods.get(&element.id.to_string())
        && !list.is_empty()
    {
        return list.iter().collect();
    }
    root.element_periods
        .values()
        .flatten()
        .chain(root.periods.iter())
        .filter(|p| p.references(element.kind.code(), element.id))
        .collect()
}
