//! Slug generation and the linear probe used to keep event slugs unique.
//!
//! The probe itself is pure: callers feed each candidate to their own
//! "is this taken?" check and stop at the first free one.

use crate::error::CoreError;

/// Fallback base used when a title contains no ASCII alphanumerics.
pub const FALLBACK_SLUG: &str = "event";

/// Path segments mounted as static routes under `/events/`.
///
/// An event carrying one of these slugs would be shadowed by the static
/// route, so the probe treats them as already taken.
pub const RESERVED_SLUGS: &[&str] = &[
    "new",
    "my-events",
    "my-favorites",
    "attending",
    "category",
    "tag",
];

/// Generate a URL-safe slug from a title.
///
/// Non-ASCII letters are transliterated first ("Zürich" becomes "zurich").
/// Then the title is lowercased, every run of other characters becomes one
/// hyphen, and leading/trailing hyphens are trimmed.
pub fn generate_slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = false;

    for c in transliterate(title).to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    result.trim_matches('-').to_string()
}

/// ASCII rendering of the letters in `title`. Symbols with no letter
/// reading (emoji, dingbats) are dropped to a space.
fn transliterate(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if c.is_alphanumeric() {
            out.push_str(deunicode::deunicode_char(c).unwrap_or(" "));
        } else {
            out.push(' ');
        }
    }
    out
}

/// Base slug for an event title, falling back to [`FALLBACK_SLUG`] when the
/// title slugifies to nothing (e.g. a title made only of emoji).
pub fn event_slug_base(title: &str) -> String {
    let slug = generate_slug(title);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Whether a slug collides with a static route segment.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// The `n`-th probe candidate for `base`: `base`, `base-1`, `base-2`, ...
pub fn candidate(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{base}-{n}")
    }
}

/// Infinite iterator over probe candidates for `base`, in probe order.
pub fn probe(base: &str) -> impl Iterator<Item = String> + '_ {
    (0u32..).map(move |n| candidate(base, n))
}

/// Validate a caller-supplied slug for a taxonomy entry
/// (non-empty, only lowercase alphanumerics and hyphens, at most 50 chars).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > 50 {
        return Err(CoreError::Validation(
            "Slug must be at most 50 characters".into(),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}
