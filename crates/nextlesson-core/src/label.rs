//! Label normalization for school entities.
//!
//! Upstream labels arrive in several spellings: full teacher names
//! ("Niels á Váli"), already-compacted initials ("NV"), and subject names
//! that are sometimes just a localized word for "lesson". These helpers
//! fold everything into comparable forms:
//!
//! - [`fold_diacritics`] / [`fold_key`] for locale-insensitive equality
//! - [`to_initials`] for the canonical teacher label form
//! - [`is_generic_subject`] to recognize placeholder subject names

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// A compact initials token: 1-5 uppercase letters from the extended Latin
/// set used by the upstream locale. Such labels are kept verbatim.
static COMPACT_INITIALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-ZÁÐÍÓÚÝÆØÅ]{1,5}$").expect("valid regex"));

/// Separators between name components.
static NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s.\-_/]+").expect("valid regex"));

/// Localized words meaning "lesson"/"class" that carry no real subject
/// information. Stored pre-folded (see [`fold_key`]).
const GENERIC_SUBJECTS: &[&str] = &["undirvising", "undervisning", "lektion", "lesson", "class"];

/// Unicode-normalizes (NFKD) and strips combining marks, so that "Í" and
/// "I" compare equal.
pub fn fold_diacritics(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Folded, lower-cased, trimmed comparison key.
pub fn fold_key(s: &str) -> String {
    fold_diacritics(s).to_lowercase().trim().to_string()
}

/// Comparison key for initials matching: like [`fold_key`] but also
/// insensitive to spaces and periods ("W. P." matches "wp").
pub fn initials_key(s: &str) -> String {
    fold_key(s).replace([' ', '.'], "")
}

/// Reduces a name to initials form.
///
/// A label that already looks like a compact initials token is returned
/// unchanged (after folding). Otherwise the name is split on whitespace,
/// `.`, `-`, `_` and `/`, and the first letter of each component is
/// uppercased and concatenated, capped at five letters.
///
/// Idempotent: `to_initials(to_initials(x)) == to_initials(x)`.
pub fn to_initials(s: &str) -> String {
    let clean = fold_diacritics(s);
    let trimmed = clean.trim();
    if COMPACT_INITIALS.is_match(trimmed) {
        return trimmed.to_string();
    }
    NAME_SEPARATORS
        .split(trimmed)
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.chars().find(|c| c.is_alphabetic()))
        .flat_map(|c| c.to_uppercase())
        .take(5)
        .collect()
}

/// True if the label is a generic "lesson" placeholder rather than a real
/// subject name.
pub fn is_generic_subject(label: &str) -> bool {
    let key = fold_key(label);
    GENERIC_SUBJECTS.contains(&key.as_str())
}
