//! Timetable data sources and the resolution/normalization engine.
//!
//! Two upstream sources feed this crate:
//!
//! - the authenticated JSON-RPC API (session-scoped: login, query, logout),
//!   used for class/teacher lists and today's timetable;
//! - the unauthenticated public weekly API (stateless, school-scoped),
//!   used as fallback for any date and to enrich the teacher directory.
//!
//! Raw source records are normalized into [`nextlesson_core::Lesson`]
//! values by [`map::map_period`]; free-text names are resolved to
//! [`nextlesson_core::ElementRef`]s by [`resolve`]; day fetching with
//! source and format-variant fallback lives in [`fetch`]. [`Timetable`] is
//! the facade the presentation layer talks to.

pub mod config;
pub mod error;
pub mod fetch;
pub mod lookup;
pub mod map;
pub mod public;
pub mod raw;
pub mod resolve;
pub mod rpc;
pub mod service;

pub use config::UntisConfig;
pub use error::{SourceError, SourceResult};
pub use lookup::ElementLookup;
pub use map::{dedup_sorted, map_period};
pub use resolve::resolve_name;
pub use public::PublicClient;
pub use rpc::{RpcClient, RpcSession};
pub use service::{ElementDirectory, Timetable};
