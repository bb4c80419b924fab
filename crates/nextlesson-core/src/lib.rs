//! Core types: lessons, element references, label normalization, Untis time decoding

pub mod label;
pub mod lesson;
pub mod time;
pub mod tracing;

pub use label::{fold_diacritics, fold_key, initials_key, is_generic_subject, to_initials};
pub use lesson::{ElementRef, ElementType, Lesson, PLACEHOLDER};
pub use time::{date_number, decode_date, decode_time, iso_date};
pub use tracing::{TracingConfig, TracingError, TracingFormat, init_tracing};
