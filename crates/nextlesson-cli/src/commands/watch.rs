//! `watch`: keep the day on screen, refresh on a lesson-aware cadence,
//! and fire desktop toasts.
//!
//! Each pass takes a reload token before fetching and publishes only if
//! it is still the newest pass, so a slow fetch that straggles in after
//! the midnight rollover (or any later refresh) is dropped. Wake-ups run
//! through the timer table under three keys: the cadence refresh, the
//! end of the day's last lesson, and the midnight rollover. Re-arming a
//! key replaces its timer, so each pass leaves at most one of each. After
//! 18:00 on a finished day the display moves on to tomorrow;
//! notifications only ever cover today.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::Notify;
use tracing::{debug, info};

use nextlesson_providers::Timetable;
use nextlesson_server::{
    NotifyConfig, NotifyEngine, ReloadGuard, TimerKey, TimerTable, end_of_day_delay,
    midnight_delay, next_refresh_delay, should_show_tomorrow,
};

use crate::error::CliResult;
use crate::render;

pub async fn run(
    service: &Timetable,
    name: &str,
    lead_minutes: u32,
    notifications: bool,
) -> CliResult<()> {
    let today = Local::now().date_naive();
    let element = service.resolve(name, today).await?;
    info!(label = %element.label, "watching");

    let engine = NotifyEngine::new(
        NotifyConfig::default()
            .with_lead_minutes(lead_minutes)
            .with_enabled(notifications),
    );
    let guard = ReloadGuard::new();
    let timers = TimerTable::new();
    let wake = Arc::new(Notify::new());

    loop {
        let now = Local::now().naive_local();
        let today = now.date();
        let token = guard.begin();

        let lessons = service.today(&element, today).await;

        let mut display = lessons.clone();
        let mut showing_tomorrow = false;
        let mut heading = format!("{} - {}", element.label, today.format("%A %Y-%m-%d"));
        if should_show_tomorrow(&lessons, now)
            && let Some(tomorrow) = today.succ_opt()
        {
            display = service.for_date(&element, tomorrow).await;
            showing_tomorrow = true;
            heading = format!("{} - tomorrow, {}", element.label, tomorrow.format("%A %Y-%m-%d"));
        }

        if guard.is_current(token) {
            println!("{heading}");
            println!("{}", render::render_lessons(&display));
            println!();

            if showing_tomorrow {
                // Tomorrow on screen means today is over; nothing to warn about.
                engine.clear();
            } else {
                engine.schedule(&lessons, now);
            }
        } else {
            debug!("stale refresh dropped");
        }

        // The cadence follows today's lessons even while tomorrow is shown.
        arm(&timers, &wake, TimerKey::Refresh, next_refresh_delay(&lessons, now));
        arm(&timers, &wake, TimerKey::Midnight, midnight_delay(now));
        match end_of_day_delay(&lessons, now) {
            Some(delay) => arm(&timers, &wake, TimerKey::EndOfDay, delay),
            None => {
                timers.cancel(&TimerKey::EndOfDay);
            }
        }
        wake.notified().await;
    }
}

fn arm(timers: &TimerTable, wake: &Arc<Notify>, key: TimerKey, delay: Duration) {
    let wake = Arc::clone(wake);
    timers.schedule(key, delay, async move {
        wake.notify_one();
    });
}
