//! Database utility functions.

use chrono::{DateTime, Months, SubsecRound, Utc};

use crate::db::{DbError, DbResult};

/// Current time truncated to microseconds, the precision both backends keep.
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Completion date given to a task saved without one: one calendar month after `now`.
pub fn default_completion(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Resolve a requested completion date against the task's creation date.
///
/// Missing dates default to one month after `now`; dates earlier than
/// `created` are rejected.
pub fn resolve_completion(
    requested: Option<DateTime<Utc>>,
    created: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DbResult<DateTime<Utc>> {
    let completion = requested.unwrap_or_else(|| default_completion(now));
    if completion < created {
        return Err(DbError::Validation {
            message: format!(
                "completion date {} precedes creation date {}",
                completion.to_rfc3339(),
                created.to_rfc3339()
            ),
        });
    }
    Ok(completion)
}

/// Build a `LIKE`/`ILIKE` pattern matching `term` as a literal substring.
///
/// Wildcards in the term are escaped with `\`, so queries must declare
/// `ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_completion_is_one_calendar_month_later() {
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        // Clamped to the last day of February in a leap year
        assert_eq!(
            default_completion(now),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn resolve_completion_defaults_when_missing() {
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        let resolved = resolve_completion(None, now, now).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn resolve_completion_rejects_dates_before_creation() {
        let created = Utc.with_ymd_and_hms(2024, 9, 10, 0, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 9, 9, 23, 59, 59).unwrap();
        let result = resolve_completion(Some(early), created, created);
        assert!(matches!(result, Err(DbError::Validation { .. })));
    }

    #[test]
    fn resolve_completion_accepts_past_dates_after_creation() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let completion = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            resolve_completion(Some(completion), created, now).unwrap(),
            completion
        );
    }

    #[test]
    fn resolve_completion_accepts_equal_dates() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            resolve_completion(Some(created), created, created).unwrap(),
            created
        );
    }

    #[test]
    fn like_pattern_wraps_term() {
        assert_eq!(like_pattern("alice"), "%alice%");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
