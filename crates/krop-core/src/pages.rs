//! Page-range expressions.
//!
//! An expression is a comma-separated list of intervals, each of the form
//! `a`, `a-b` or `a-` (open-ended, up to the last page). The resolved list
//! keeps the order the user wrote and is never sorted or deduplicated, so
//! `"3,1-2,3"` yields `[3, 1, 2, 3]`.

use crate::error::CropError;

const FIELD: &str = "page range";

/// Resolve a page-range expression into 1-based page numbers.
///
/// An empty expression selects every page `1..=last_page`.
///
/// An interval with more than one dash uses its first and last token, so
/// `"2-5-7"` is read as `"2-7"`. An empty end token means `last_page`.
///
/// # Errors
///
/// Returns [`CropError::Parse`] naming the offending token if any endpoint
/// is not a positive integer.
pub fn resolve_pages(expression: &str, last_page: u32) -> Result<Vec<u32>, CropError> {
    if expression.trim().is_empty() {
        return Ok((1..=last_page).collect());
    }

    let mut pages = Vec::new();
    for interval in expression.split(',') {
        let mut tokens = interval.split('-').map(str::trim);
        let first = tokens.next().unwrap_or_default();
        let last = tokens.last().unwrap_or(first);

        let start = parse_page(first)?;
        let end = if last.is_empty() {
            last_page
        } else {
            parse_page(last)?
        };
        pages.extend(start..=end);
    }

    tracing::trace!(expression, last_page, count = pages.len(), "resolved page range");
    Ok(pages)
}

fn parse_page(token: &str) -> Result<u32, CropError> {
    match token.parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(CropError::parse(FIELD, token)),
    }
}
