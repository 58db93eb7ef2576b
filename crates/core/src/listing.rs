//! Listing filter vocabulary.
//!
//! Filters are optional and compose conjunctively; blank values are treated
//! as absent so an empty search box does not narrow the list.

use serde::Deserialize;

/// Temporal bucket for the `date` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBucket {
    /// `end_date >= now`
    Upcoming,
    /// `end_date < now`
    Past,
}

impl DateBucket {
    /// Parse the raw parameter. Unknown values are ignored, not rejected.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            Some("upcoming") => Some(Self::Upcoming),
            Some("past") => Some(Self::Past),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }
}

/// Raw `?search=&category=&tag=&date=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub date: Option<String>,
}

/// Normalized filter handed to the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// `ILIKE` pattern (already wrapped in `%` and escaped).
    pub search_pattern: Option<String>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
    pub date: Option<DateBucket>,
}

impl EventFilter {
    pub fn from_params(params: &EventListParams) -> Self {
        Self {
            search_pattern: non_blank(params.search.as_deref()).map(contains_pattern),
            category_slug: non_blank(params.category.as_deref()).map(str::to_string),
            tag_slug: non_blank(params.tag.as_deref()).map(str::to_string),
            date: DateBucket::parse(params.date.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build a substring `ILIKE` pattern, escaping the LIKE metacharacters so
/// user input matches literally. Pair with `ESCAPE '\'` in SQL.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_bucket_ignores_unknown_values() {
        assert_eq!(DateBucket::parse(Some("upcoming")), Some(DateBucket::Upcoming));
        assert_eq!(DateBucket::parse(Some("past")), Some(DateBucket::Past));
        assert_eq!(DateBucket::parse(Some("tomorrow")), None);
        assert_eq!(DateBucket::parse(None), None);
    }

    #[test]
    fn blank_params_produce_empty_filter() {
        let params = EventListParams {
            search: Some("   ".into()),
            category: Some(String::new()),
            tag: None,
            date: Some("whenever".into()),
        };
        assert_eq!(EventFilter::from_params(&params), EventFilter::default());
    }

    #[test]
    fn search_is_wrapped_and_escaped() {
        assert_eq!(contains_pattern("jazz"), "%jazz%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn filters_are_trimmed() {
        let params = EventListParams {
            search: Some(" rust ".into()),
            category: Some(" music ".into()),
            tag: Some("outdoor".into()),
            date: Some("past".into()),
        };
        let filter = EventFilter::from_params(&params);
        assert_eq!(filter.search_pattern.as_deref(), Some("%rust%"));
        assert_eq!(filter.category_slug.as_deref(), Some("music"));
        assert_eq!(filter.tag_slug.as_deref(), Some("outdoor"));
        assert_eq!(filter.date, Some(DateBucket::Past));
    }
}
