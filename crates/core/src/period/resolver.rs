//! Reporting period resolution.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use ledgertree_shared::ReportConfig;

use crate::trial_balance::error::ReportError;

/// Inclusive reporting bounds in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First second of the period.
    pub start: i64,
    /// Last second of the period.
    pub end: i64,
}

impl ReportPeriod {
    /// Creates a period from explicit bounds.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Returns true if `posted_at` falls between the bounds.
    #[must_use]
    pub const fn contains(&self, posted_at: i64) -> bool {
        posted_at >= self.start && posted_at <= self.end
    }
}

/// Caller-supplied bounds; any missing bound comes from the default filing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodRequest {
    /// Start, epoch seconds.
    pub start_date: Option<i64>,
    /// End, epoch seconds.
    pub end_date: Option<i64>,
}

impl PeriodRequest {
    /// Explicit bounds.
    #[must_use]
    pub const fn between(start_date: i64, end_date: i64) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }
}

/// Computes effective reporting bounds.
///
/// The default period is the filing window containing "now": the calendar
/// year split into blocks of `window_months` months (Jan-Feb, Mar-Apr, ... for
/// the usual two-month window), evaluated in the book's time zone.
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    tz: Tz,
    window_months: u32,
}

impl PeriodResolver {
    /// Creates a resolver.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidConfig` unless `window_months` divides 12.
    pub fn new(tz: Tz, window_months: u32) -> Result<Self, ReportError> {
        if window_months == 0 || 12 % window_months != 0 {
            return Err(ReportError::InvalidConfig(format!(
                "filing window of {window_months} months does not divide the year"
            )));
        }
        Ok(Self { tz, window_months })
    }

    /// Creates a resolver from report configuration.
    pub fn from_config(config: &ReportConfig) -> Result<Self, ReportError> {
        let tz: Tz = config.timezone.parse().map_err(|_| {
            ReportError::InvalidConfig(format!("unknown time zone '{}'", config.timezone))
        })?;
        Self::new(tz, config.filing_window_months)
    }

    /// The filing window containing `now`.
    #[must_use]
    pub fn filing_window(&self, now: DateTime<Utc>) -> ReportPeriod {
        let local = now.with_timezone(&self.tz);
        let first_month0 = local.month0() / self.window_months * self.window_months;

        let (next_year, next_month0) = if first_month0 + self.window_months >= 12 {
            (local.year() + 1, first_month0 + self.window_months - 12)
        } else {
            (local.year(), first_month0 + self.window_months)
        };

        let fallback = now.timestamp();
        let start = self
            .month_start(local.year(), first_month0 + 1)
            .unwrap_or(fallback);
        let end = self
            .month_start(next_year, next_month0 + 1)
            .map_or(fallback, |next| next - 1);

        ReportPeriod { start, end }
    }

    /// Resolves a request against the clock `now`.
    ///
    /// # Errors
    ///
    /// Returns a range error for unrepresentable timestamps or `start > end`.
    pub fn resolve(
        &self,
        request: &PeriodRequest,
        now: DateTime<Utc>,
    ) -> Result<ReportPeriod, ReportError> {
        for ts in [request.start_date, request.end_date].into_iter().flatten() {
            if DateTime::<Utc>::from_timestamp(ts, 0).is_none() {
                return Err(ReportError::InvalidTimestamp(ts));
            }
        }

        let period = match (request.start_date, request.end_date) {
            (Some(start), Some(end)) => ReportPeriod { start, end },
            (start, end) => {
                let window = self.filing_window(now);
                ReportPeriod {
                    start: start.unwrap_or(window.start),
                    end: end.unwrap_or(window.end),
                }
            }
        };

        if period.start > period.end {
            return Err(ReportError::InvalidDateRange {
                start: period.start,
                end: period.end,
            });
        }
        Ok(period)
    }

    /// Resolves a request against the current time.
    pub fn resolve_now(&self, request: &PeriodRequest) -> Result<ReportPeriod, ReportError> {
        self.resolve(request, Utc::now())
    }

    /// Local midnight on the first of the month, as epoch seconds.
    fn month_start(&self, year: i32, month: u32) -> Option<i64> {
        let naive = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
        let local = self
            .tz
            .from_local_datetime(&naive)
            .earliest()
            // Midnight skipped by a DST jump: read the wall clock as UTC.
            .unwrap_or_else(|| self.tz.from_utc_datetime(&naive));
        Some(local.timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        utc(y, m, d, h, min, s).timestamp()
    }

    fn bimonthly_utc() -> PeriodResolver {
        PeriodResolver::new(chrono_tz::UTC, 2).unwrap()
    }

    #[rstest]
    #[case(utc(2026, 10, 16, 9, 30, 0), ts(2026, 9, 1, 0, 0, 0), ts(2026, 10, 31, 23, 59, 59))]
    #[case(utc(2026, 1, 1, 0, 0, 0), ts(2026, 1, 1, 0, 0, 0), ts(2026, 2, 28, 23, 59, 59))]
    #[case(utc(2028, 2, 29, 12, 0, 0), ts(2028, 1, 1, 0, 0, 0), ts(2028, 2, 29, 23, 59, 59))]
    #[case(utc(2026, 12, 31, 23, 59, 59), ts(2026, 11, 1, 0, 0, 0), ts(2026, 12, 31, 23, 59, 59))]
    fn test_bimonthly_window(#[case] now: DateTime<Utc>, #[case] start: i64, #[case] end: i64) {
        assert_eq!(
            bimonthly_utc().filing_window(now),
            ReportPeriod::new(start, end)
        );
    }

    #[test]
    fn test_window_uses_book_time_zone() {
        // 04:00 on March 1st in Shanghai, still February in UTC.
        let resolver = PeriodResolver::new(chrono_tz::Asia::Shanghai, 2).unwrap();
        let window = resolver.filing_window(utc(2026, 2, 28, 20, 0, 0));
        assert_eq!(window.start, ts(2026, 2, 28, 16, 0, 0));
        assert_eq!(window.end, ts(2026, 4, 30, 15, 59, 59));
    }

    #[test]
    fn test_quarterly_window() {
        let resolver = PeriodResolver::new(chrono_tz::UTC, 3).unwrap();
        let window = resolver.filing_window(utc(2026, 8, 3, 0, 0, 0));
        assert_eq!(window, ReportPeriod::new(ts(2026, 7, 1, 0, 0, 0), ts(2026, 9, 30, 23, 59, 59)));
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(7)]
    fn test_window_must_divide_year(#[case] months: u32) {
        assert!(matches!(
            PeriodResolver::new(chrono_tz::UTC, months),
            Err(ReportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_config_rejects_unknown_zone() {
        let config = ReportConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..ReportConfig::default()
        };
        assert!(matches!(
            PeriodResolver::from_config(&config),
            Err(ReportError::InvalidConfig(_))
        ));
        assert!(PeriodResolver::from_config(&ReportConfig::default()).is_ok());
    }

    #[test]
    fn test_resolve_explicit_bounds() {
        let period = bimonthly_utc()
            .resolve(&PeriodRequest::between(100, 200), utc(2026, 10, 16, 0, 0, 0))
            .unwrap();
        assert_eq!(period, ReportPeriod::new(100, 200));
    }

    #[test]
    fn test_resolve_equal_bounds_is_allowed() {
        let period = bimonthly_utc()
            .resolve(&PeriodRequest::between(500, 500), utc(2026, 10, 16, 0, 0, 0))
            .unwrap();
        assert!(period.contains(500));
        assert!(!period.contains(499));
    }

    #[test]
    fn test_resolve_defaults_and_partial_bounds() {
        let now = utc(2026, 10, 16, 0, 0, 0);
        let resolver = bimonthly_utc();

        let full = resolver.resolve(&PeriodRequest::default(), now).unwrap();
        assert_eq!(full, resolver.filing_window(now));

        let partial = PeriodRequest {
            start_date: Some(ts(2026, 1, 1, 0, 0, 0)),
            end_date: None,
        };
        let period = resolver.resolve(&partial, now).unwrap();
        assert_eq!(period.start, ts(2026, 1, 1, 0, 0, 0));
        assert_eq!(period.end, ts(2026, 10, 31, 23, 59, 59));
    }

    #[test]
    fn test_resolve_rejects_reversed_range() {
        let err = bimonthly_utc()
            .resolve(&PeriodRequest::between(200, 100), utc(2026, 10, 16, 0, 0, 0))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidDateRange { start: 200, end: 100 }));
        assert!(err.is_range_error());
    }

    #[test]
    fn test_resolve_rejects_unrepresentable_timestamp() {
        let err = bimonthly_utc()
            .resolve(&PeriodRequest::between(0, i64::MAX), utc(2026, 10, 16, 0, 0, 0))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidTimestamp(i64::MAX)));
    }
}
