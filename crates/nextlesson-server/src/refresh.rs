//! Lesson-aware refresh cadence and day-boundary rules.
//!
//! The cadence tightens as the next lesson approaches: refresh every
//! fifteen minutes at most, but early enough to catch late schedule
//! changes two minutes before a lesson starts, and never spin faster
//! than once per ten seconds. With nothing left on the day the cadence
//! relaxes to half an hour.

use std::time::Duration;

use chrono::{NaiveDateTime, Timelike};

use nextlesson_core::Lesson;

/// Upper bound between refreshes while lessons remain.
const MAX_INTERVAL: Duration = Duration::from_secs(15 * 60);
/// Refresh this far before the next lesson starts.
const START_LEAD: Duration = Duration::from_secs(2 * 60);
/// Lower bound between refreshes.
const MIN_INTERVAL: Duration = Duration::from_secs(10);
/// Interval once the day is over.
const IDLE_INTERVAL: Duration = Duration::from_secs(30 * 60);
/// From this hour on, a finished day shows tomorrow instead.
const TOMORROW_HOUR: u32 = 18;

/// What the watch loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPlan {
    /// Delay until the next data refresh.
    pub delay: Duration,
    /// Whether the display should move on to tomorrow's lessons.
    pub show_tomorrow: bool,
}

/// Combines the cadence and the tomorrow rule for one loop iteration.
pub fn plan_refresh(lessons: &[Lesson], now: NaiveDateTime) -> RefreshPlan {
    RefreshPlan {
        delay: next_refresh_delay(lessons, now),
        show_tomorrow: should_show_tomorrow(lessons, now),
    }
}

/// Delay until the next refresh, given the current day's lessons.
pub fn next_refresh_delay(lessons: &[Lesson], now: NaiveDateTime) -> Duration {
    let next_start = lessons
        .iter()
        .filter(|lesson| lesson.starts_after(now))
        .map(|lesson| lesson.start)
        .min();

    let Some(start) = next_start else {
        return IDLE_INTERVAL;
    };

    let eta = (start - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
        .saturating_sub(START_LEAD);
    eta.min(MAX_INTERVAL).max(MIN_INTERVAL)
}

/// True once every lesson of the day has ended and the evening has
/// reached the switch-over hour.
pub fn should_show_tomorrow(lessons: &[Lesson], now: NaiveDateTime) -> bool {
    !lessons.is_empty()
        && lessons.iter().all(|lesson| lesson.end <= now)
        && now.hour() >= TOMORROW_HOUR
}

/// Delay until just past the end of the day's last lesson, or `None`
/// once every lesson has ended. Waking here flips a finished day off the
/// screen without waiting out the idle interval.
pub fn end_of_day_delay(lessons: &[Lesson], now: NaiveDateTime) -> Option<Duration> {
    let last_end = lessons.iter().map(|lesson| lesson.end).max()?;
    if last_end <= now {
        return None;
    }
    Some((last_end - now).to_std().unwrap_or(Duration::ZERO) + Duration::from_secs(1))
}

/// Delay until just past the next local midnight.
pub fn midnight_delay(now: NaiveDateTime) -> Duration {
    let next_midnight = now
        .date()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(now);
    (next_midnight - now).to_std().unwrap_or(Duration::ZERO) + Duration::from_secs(2)
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

    fn lesson(start: NaiveDateTime, end: NaiveDateTime) -> Lesson {
        Lesson {
            id: "1".to_string(),
            start,
            end,
            subject: "Mathematics".to_string(),
            room: "A12".to_string(),
            teacher: "WP".to_string(),
            is_cancelled: false,
        }
    }

    mod cadence {
        use super::*;

        #[test]
        fn far_off_lesson_caps_at_fifteen_minutes() {
            let lessons = vec![lesson(at(13, 0), at(13, 45))];
            assert_eq!(next_refresh_delay(&lessons, at(8, 0)), MAX_INTERVAL);
        }

        #[test]
        fn near_lesson_refreshes_two_minutes_before_start() {
            let lessons = vec![lesson(at(8, 10), at(8, 55))];
            assert_eq!(
                next_refresh_delay(&lessons, at(8, 0)),
                Duration::from_secs(8 * 60)
            );
        }

        #[test]
        fn imminent_lesson_floors_at_ten_seconds() {
            let lessons = vec![lesson(at(8, 1), at(8, 45))];
            assert_eq!(next_refresh_delay(&lessons, at(8, 0)), MIN_INTERVAL);
        }

        #[test]
        fn finished_day_relaxes_to_half_an_hour() {
            let lessons = vec![lesson(at(8, 10), at(8, 55))];
            assert_eq!(next_refresh_delay(&lessons, at(14, 0)), IDLE_INTERVAL);
        }

        #[test]
        fn empty_day_relaxes_to_half_an_hour() {
            assert_eq!(next_refresh_delay(&[], at(8, 0)), IDLE_INTERVAL);
        }

        #[test]
        fn earliest_upcoming_lesson_sets_the_pace() {
            let lessons = vec![
                lesson(at(13, 0), at(13, 45)),
                lesson(at(8, 10), at(8, 55)),
            ];
            assert_eq!(
                next_refresh_delay(&lessons, at(8, 0)),
                Duration::from_secs(8 * 60)
            );
        }
    }

    mod tomorrow_rule {
        use super::*;

        #[test]
        fn switches_after_six_pm_when_day_is_done() {
            let lessons = vec![lesson(at(8, 10), at(8, 55))];
            assert!(should_show_tomorrow(&lessons, at(18, 0)));
        }

        #[test]
        fn stays_on_today_before_six_pm() {
            let lessons = vec![lesson(at(8, 10), at(8, 55))];
            assert!(!should_show_tomorrow(&lessons, at(17, 59)));
        }

        #[test]
        fn stays_on_today_while_a_lesson_remains() {
            let lessons = vec![lesson(at(19, 0), at(20, 0))];
            assert!(!should_show_tomorrow(&lessons, at(18, 30)));
        }

        #[test]
        fn empty_day_never_switches() {
            assert!(!should_show_tomorrow(&[], at(20, 0)));
        }
    }

    mod end_of_day {
        use super::*;

        #[test]
        fn reaches_just_past_the_last_lesson_end() {
            let lessons = vec![
                lesson(at(8, 10), at(8, 55)),
                lesson(at(13, 0), at(13, 45)),
            ];
            assert_eq!(
                end_of_day_delay(&lessons, at(13, 30)),
                Some(Duration::from_secs(15 * 60 + 1))
            );
        }

        #[test]
        fn finished_day_has_no_end_of_day_wake() {
            let lessons = vec![lesson(at(8, 10), at(8, 55))];
            assert_eq!(end_of_day_delay(&lessons, at(9, 0)), None);
        }

        #[test]
        fn empty_day_has_no_end_of_day_wake() {
            assert_eq!(end_of_day_delay(&[], at(9, 0)), None);
        }
    }

    mod midnight {
        use super::*;

        #[test]
        fn delay_reaches_just_past_midnight() {
            let delay = midnight_delay(at(23, 30));
            assert_eq!(delay, Duration::from_secs(30 * 60 + 2));
        }
    }
}
