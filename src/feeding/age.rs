//! Age from birth date
//!
//! Whole calendar days between a birth date and today, for callers that
//! track a puppy's birthday instead of typing its age.

use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` birth date
pub fn parse_birth_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid birth date '{}': {}", s, e))
}

/// Whole days from `birth` to `today`, negative when `birth` is in the future
pub fn diff_in_days(birth: NaiveDate, today: NaiveDate) -> i64 {
    today.signed_duration_since(birth).num_days()
}

/// Age in days as of the local calendar date
pub fn age_in_days_today(birth: NaiveDate) -> i64 {
    diff_in_days(birth, chrono::Local::now().date_naive())
}
