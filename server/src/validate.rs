use crate::error::ApiError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEARCH_TEXT: Regex = Regex::new(r"^[A-Za-z0-9\s\-_,.]+$").expect("valid regex");
    static ref SPELL_WORD: Regex = Regex::new(r"^[A-Za-z0-9\s\-]+$").expect("valid regex");
}

/// Reject missing or blank parameters.
pub fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!("{name} is required"))),
    }
}

/// Required, and limited to letters, digits, spaces and `-_,.`.
pub fn search_text<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    let v = required(name, value)?;
    if !SEARCH_TEXT.is_match(v) {
        return Err(ApiError::BadRequest(format!("{name} must contain valid characters")));
    }
    Ok(v)
}

/// Required, and limited to letters, digits, spaces and dashes.
pub fn spell_word<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    let v = required(name, value)?;
    if !SPELL_WORD.is_match(v) {
        return Err(ApiError::BadRequest(format!("{name} must contain valid characters")));
    }
    Ok(v)
}

/// Optional positive count. Blank means unset.
pub fn limit(name: &str, value: Option<&str>) -> Result<Option<usize>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{name} must be a non-negative integer"))),
    }
}
