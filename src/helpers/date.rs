//! Date helper functions

use chrono::NaiveDate;

/// Format a publish date as `LLL d, y`
///
/// # Examples
/// ```ignore
/// format_publish_date(&date) // -> "Jan 1, 2021"
/// ```
pub fn format_publish_date(date: &NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Format a date in ISO 8601 form (`2021-01-01`)
pub fn date_iso(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
