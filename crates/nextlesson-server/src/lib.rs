//! Watch-mode engine: refresh cadence, timers, desktop notifications.
//!
//! This crate drives the long-running `watch` mode:
//! - a keyed timer table whose entries replace rather than stack
//! - a pure trigger planner plus the engine that fires desktop toasts
//! - the lesson-aware refresh cadence and day-boundary rules
//! - a reload guard so only the newest in-flight refresh may publish

mod notify;
mod refresh;
mod reload;
mod timers;

pub use notify::{NotifyConfig, NotifyEngine, PlannedTrigger, TriggerKind, plan_triggers};
pub use refresh::{
    RefreshPlan, end_of_day_delay, midnight_delay, next_refresh_delay, plan_refresh,
    should_show_tomorrow,
};
pub use reload::{ReloadGuard, ReloadToken};
pub use timers::{TimerKey, TimerTable};
