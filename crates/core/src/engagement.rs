//! Comment and review content rules.

use crate::error::CoreError;

/// Minimum comment length, counted after trimming surrounding whitespace.
pub const COMMENT_MIN_CHARS: usize = 10;

/// Minimum review length, counted after trimming surrounding whitespace.
pub const REVIEW_MIN_CHARS: usize = 20;

pub const RATING_MIN: i16 = 1;
pub const RATING_MAX: i16 = 5;

pub fn validate_comment(content: &str) -> Result<(), CoreError> {
    if content.trim().chars().count() < COMMENT_MIN_CHARS {
        return Err(CoreError::Validation(format!(
            "Comment must be at least {COMMENT_MIN_CHARS} characters long."
        )));
    }
    Ok(())
}

/// Validate a review. Both the rating bound and the length rule are checked
/// and reported together.
pub fn validate_review(rating: i16, content: &str) -> Result<(), CoreError> {
    let mut errors = Vec::new();
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        errors.push(format!(
            "Rating must be between {RATING_MIN} and {RATING_MAX}."
        ));
    }
    if content.trim().chars().count() < REVIEW_MIN_CHARS {
        errors.push(format!(
            "Review must be at least {REVIEW_MIN_CHARS} characters long."
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors.join(" ")))
    }
}

/// First 100 characters of `content`, with an ellipsis when truncated.
pub fn preview(content: &str) -> String {
    const PREVIEW_CHARS: usize = 100;
    if content.chars().count() > PREVIEW_CHARS {
        let head: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}
