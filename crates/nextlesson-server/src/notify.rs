//! Lesson and break notifications.
//!
//! Planning is pure: [`plan_triggers`] turns a day's lessons into the
//! toasts that should fire and when, and the tests pin that logic down.
//! [`NotifyEngine`] then arms one timer per planned trigger; re-arming
//! after a refresh drops the previous plan wholesale, so an updated
//! schedule never double-fires.

use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};
use notify_rust::Notification;
use tracing::{debug, error, info};

use nextlesson_core::{Lesson, PLACEHOLDER};

use crate::timers::{TimerKey, TimerTable};

/// Configuration for lesson and break toasts.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Application name shown by the desktop shell.
    pub app_name: String,
    /// Minutes of warning before a lesson starts.
    pub lead_minutes: u32,
    /// Whether toasts fire at all.
    pub enabled: bool,
    /// Triggers closer than this are already stale and are skipped.
    pub guard: Duration,
    /// Morning break start, if the school has one.
    pub morning_break: Option<NaiveTime>,
    /// Midday break start, if the school has one.
    pub midday_break: Option<NaiveTime>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            app_name: "nextlesson".to_string(),
            lead_minutes: 5,
            enabled: true,
            guard: Duration::from_millis(500),
            morning_break: NaiveTime::from_hms_opt(9, 20, 0),
            midday_break: NaiveTime::from_hms_opt(12, 15, 0),
        }
    }
}

impl NotifyConfig {
    /// Builder: set the warning lead.
    #[must_use]
    pub fn with_lead_minutes(mut self, minutes: u32) -> Self {
        self.lead_minutes = minutes;
        self
    }

    /// Builder: enable or disable toasts.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder: drop both break toasts.
    #[must_use]
    pub fn without_breaks(mut self) -> Self {
        self.morning_break = None;
        self.midday_break = None;
        self
    }
}

/// What kind of toast a trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// A lesson starts in `lead_minutes`.
    LessonSoon,
    /// The morning break starts now.
    MorningBreak,
    /// The midday break starts now.
    MiddayBreak,
}

/// One toast that should fire at a known time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTrigger {
    /// Stable identity; re-planning the same trigger replaces its timer.
    pub id: String,
    /// When the toast fires.
    pub at: NaiveDateTime,
    /// What kind of toast.
    pub kind: TriggerKind,
    /// Toast headline.
    pub summary: String,
    /// Toast body.
    pub body: String,
}

/// Plans the toasts for one day's lessons, earliest first: at most one
/// next-lesson warning plus the two fixed break reminders.
///
/// The warning covers only the earliest non-cancelled lesson still ahead
/// of `now`; each refresh re-plans, so later lessons get their warning in
/// a later pass. Break reminders fire only while the teaching day is
/// still running, judged by the last lesson's end.
pub fn plan_triggers(
    lessons: &[Lesson],
    now: NaiveDateTime,
    config: &NotifyConfig,
) -> Vec<PlannedTrigger> {
    if !config.enabled {
        return Vec::new();
    }

    let horizon = now + chrono::Duration::from_std(config.guard).unwrap_or_default();
    let mut triggers = Vec::new();

    let next = lessons
        .iter()
        .filter(|l| !l.is_cancelled && l.starts_after(now))
        .min_by_key(|l| l.start);
    if let Some(lesson) = next {
        let at = lesson.start - chrono::Duration::minutes(i64::from(config.lead_minutes));
        if at > horizon {
            triggers.push(PlannedTrigger {
                id: format!("lesson-{}", lesson.id),
                at,
                kind: TriggerKind::LessonSoon,
                summary: format!("{} in {} min.", lesson.subject, config.lead_minutes),
                body: lesson_body(lesson),
            });
        }
    }

    let last_end = lessons.iter().map(|l| l.end).max();
    let breaks = [
        (config.morning_break, TriggerKind::MorningBreak, "Morning break", "20 min."),
        (config.midday_break, TriggerKind::MiddayBreak, "Lunch break", "30 min."),
    ];
    for (time, kind, summary, body) in breaks {
        let Some(time) = time else { continue };
        let at = now.date().and_time(time);
        if at <= horizon {
            continue;
        }
        // No reminder once the day's last lesson ends before the break.
        if last_end.is_none_or(|end| end < at) {
            continue;
        }
        triggers.push(PlannedTrigger {
            id: format!("{}-{}", summary.to_lowercase().replace(' ', "-"), at.date()),
            at,
            kind,
            summary: summary.to_string(),
            body: body.to_string(),
        });
    }

    triggers.sort_by_key(|t| t.at);
    triggers
}

fn lesson_body(lesson: &Lesson) -> String {
    let mut body = format!("Starts at {}", lesson.start.format("%H:%M"));
    if lesson.room != PLACEHOLDER {
        body.push_str(&format!(", room {}", lesson.room));
    }
    if !lesson.teacher.is_empty() {
        body.push_str(&format!(", {}", lesson.teacher));
    }
    body
}

/// Arms timers for planned triggers and fires desktop toasts.
#[derive(Debug)]
pub struct NotifyEngine {
    config: NotifyConfig,
    timers: TimerTable,
}

impl NotifyEngine {
    /// Creates an engine with the given config.
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            config,
            timers: TimerTable::new(),
        }
    }

    /// Replaces the armed plan with one derived from `lessons`. Returns
    /// how many triggers were armed.
    pub fn schedule(&self, lessons: &[Lesson], now: NaiveDateTime) -> usize {
        self.timers.cancel_all();

        let triggers = plan_triggers(lessons, now, &self.config);
        let count = triggers.len();
        for trigger in triggers {
            let delay = (trigger.at - now).to_std().unwrap_or(Duration::ZERO);
            let app_name = self.config.app_name.clone();
            debug!(id = %trigger.id, at = %trigger.at, "arming trigger");
            self.timers.schedule(
                TimerKey::Trigger(trigger.id.clone()),
                delay,
                async move {
                    show_toast(&app_name, &trigger.summary, &trigger.body);
                },
            );
        }
        info!(count, "notification plan armed");
        count
    }

    /// Disarms every pending trigger.
    pub fn clear(&self) {
        self.timers.cancel_all();
    }

    /// Number of pending triggers.
    pub fn armed(&self) -> usize {
        self.timers.len()
    }
}

fn show_toast(app_name: &str, summary: &str, body: &str) {
    let result = Notification::new()
        .appname(app_name)
        .summary(summary)
        .body(body)
        .timeout(Duration::from_secs(10))
        .show();
    match result {
        Ok(_) => info!(summary, "toast shown"),
        Err(err) => error!(error = %err, summary, "toast failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 25)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn lesson(id: &str, start: NaiveDateTime) -> Lesson {
        Lesson {
            id: id.to_string(),
            start,
            end: start + chrono::Duration::minutes(45),
            subject: "Mathematics".to_string(),
            room: "A12".to_string(),
            teacher: "WP".to_string(),
            is_cancelled: false,
        }
    }

    mod planning {
        use super::*;

        #[test]
        fn warns_before_the_next_lesson_only() {
            let lessons = vec![lesson("1", at(8, 10)), lesson("2", at(9, 0))];
            let plan = plan_triggers(&lessons, at(7, 0), &NotifyConfig::default().without_breaks());
            assert_eq!(plan.len(), 1);
            assert_eq!(plan[0].at, at(8, 5));
            assert_eq!(plan[0].kind, TriggerKind::LessonSoon);
            assert_eq!(plan[0].summary, "Mathematics in 5 min.");
            assert_eq!(plan[0].body, "Starts at 08:10, room A12, WP");
        }

        #[test]
        fn a_lesson_already_inside_the_lead_gets_no_warning() {
            let lessons = vec![lesson("1", at(8, 10))];
            let plan = plan_triggers(&lessons, at(8, 7), &NotifyConfig::default().without_breaks());
            assert!(plan.is_empty());
        }

        #[test]
        fn cancelled_lessons_get_no_warning() {
            let mut cancelled = lesson("1", at(10, 0));
            cancelled.is_cancelled = true;
            let upcoming = lesson("2", at(11, 0));
            let plan = plan_triggers(
                &[cancelled, upcoming],
                at(7, 0),
                &NotifyConfig::default().without_breaks(),
            );
            assert_eq!(plan.len(), 1);
            assert_eq!(plan[0].at, at(10, 55));
        }

        #[test]
        fn disabled_config_plans_nothing() {
            let lessons = vec![lesson("1", at(10, 0))];
            let config = NotifyConfig::default().with_enabled(false);
            assert!(plan_triggers(&lessons, at(7, 0), &config).is_empty());
        }

        #[test]
        fn breaks_fire_while_the_day_continues() {
            let lessons = vec![lesson("1", at(8, 10)), lesson("2", at(13, 0))];
            let plan = plan_triggers(&lessons, at(7, 0), &NotifyConfig::default());
            let kinds: Vec<TriggerKind> = plan.iter().map(|t| t.kind).collect();
            assert!(kinds.contains(&TriggerKind::MorningBreak));
            assert!(kinds.contains(&TriggerKind::MiddayBreak));
            let lunch = plan
                .iter()
                .find(|t| t.kind == TriggerKind::MiddayBreak)
                .unwrap();
            assert_eq!(lunch.at, at(12, 15));
            assert_eq!(lunch.body, "30 min.");
        }

        #[test]
        fn breaks_after_the_day_ends_are_dropped() {
            // Last lesson ends 10:45, before lunch at 12:15.
            let lessons = vec![lesson("1", at(8, 10)), lesson("2", at(10, 0))];
            let plan = plan_triggers(&lessons, at(7, 0), &NotifyConfig::default());
            let kinds: Vec<TriggerKind> = plan.iter().map(|t| t.kind).collect();
            assert!(kinds.contains(&TriggerKind::MorningBreak));
            assert!(!kinds.contains(&TriggerKind::MiddayBreak));
        }

        #[test]
        fn break_already_past_is_not_scheduled() {
            // Day runs until 11:00 but the 09:20 break is behind us.
            let lessons = vec![lesson("1", at(10, 15))];
            let plan = plan_triggers(&lessons, at(9, 25), &NotifyConfig::default());
            let kinds: Vec<TriggerKind> = plan.iter().map(|t| t.kind).collect();
            assert!(!kinds.contains(&TriggerKind::MorningBreak));
        }

        #[test]
        fn empty_day_plans_no_breaks() {
            assert!(plan_triggers(&[], at(7, 0), &NotifyConfig::default()).is_empty());
        }

        #[test]
        fn plan_is_ordered_by_fire_time() {
            let lessons = vec![lesson("1", at(8, 10)), lesson("2", at(13, 0))];
            let plan = plan_triggers(&lessons, at(7, 0), &NotifyConfig::default());
            let times: Vec<NaiveDateTime> = plan.iter().map(|t| t.at).collect();
            let mut sorted = times.clone();
            sorted.sort();
            assert_eq!(times, sorted);
        }

        #[test]
        fn placeholder_room_and_empty_teacher_stay_out_of_the_body() {
            let mut bare = lesson("1", at(10, 0));
            bare.room = PLACEHOLDER.to_string();
            bare.teacher = String::new();
            let plan = plan_triggers(&[bare], at(7, 0), &NotifyConfig::default().without_breaks());
            assert_eq!(plan[0].body, "Starts at 10:00");
        }
    }

    mod engine {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn rescheduling_replaces_the_whole_plan() {
            let engine = NotifyEngine::new(NotifyConfig::default());
            let armed = engine.schedule(
                &[lesson("1", at(8, 10)), lesson("2", at(13, 0))],
                at(7, 0),
            );
            assert_eq!(armed, 3);
            assert_eq!(engine.armed(), 3);

            let armed = engine.schedule(&[lesson("3", at(10, 0))], at(7, 0));
            assert_eq!(armed, 2);
            assert_eq!(engine.armed(), 2);
        }

        #[tokio::test(start_paused = true)]
        async fn clear_disarms_everything() {
            let engine = NotifyEngine::new(NotifyConfig::default().without_breaks());
            engine.schedule(&[lesson("1", at(8, 10))], at(7, 0));
            engine.clear();
            assert_eq!(engine.armed(), 0);
        }
    }
}
