use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

pub const DAYS_PER_YEAR: i64 = 365;
pub const DAYS_PER_MONTH: i64 = 30;
pub const MONTHS_PER_YEAR: i64 = 12;

/// A declared contribution period. Dates are kept as entered (`DD/MM/YYYY`)
/// and only parsed when a calculation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: String,
    #[serde(alias = "start_date")]
    pub start_date: String,
    #[serde(alias = "end_date")]
    pub end_date: String,
}

impl Period {
    pub fn new(id: impl Into<String>, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// Elapsed time expressed in fixed 365-day years and 30-day months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub years: i64,
    pub months: i64,
    pub days: i64,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        years: 0,
        months: 0,
        days: 0,
    };

    pub fn new(years: i64, months: i64, days: i64) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// Buckets a day count into 365-day years, then 30-day months, then days.
    ///
    /// This is deliberately not calendar aware: 400 days is always
    /// 1 year, 1 month and 5 days. Negative counts floor toward negative
    /// infinity, so the month and day parts stay non-negative.
    pub fn from_days(total_days: i64) -> Self {
        let years = total_days.div_euclid(DAYS_PER_YEAR);
        let remaining = total_days.rem_euclid(DAYS_PER_YEAR);

        Self {
            years,
            months: remaining.div_euclid(DAYS_PER_MONTH),
            days: remaining.rem_euclid(DAYS_PER_MONTH),
        }
    }

    /// Approximate day count using the same fixed buckets as [`Duration::from_days`].
    pub fn total_days(&self) -> i64 {
        self.years * DAYS_PER_YEAR + self.months * DAYS_PER_MONTH + self.days
    }

    /// Carries 30 or more days into months and 12 or more months into years.
    ///
    /// Used for totals typed in by hand, where someone may enter "0 years,
    /// 14 months, 45 days".
    pub fn normalize(self) -> Self {
        let Duration {
            mut years,
            mut months,
            mut days,
        } = self;

        if days >= DAYS_PER_MONTH {
            months += days / DAYS_PER_MONTH;
            days %= DAYS_PER_MONTH;
        }

        if months >= MONTHS_PER_YEAR {
            years += months / MONTHS_PER_YEAR;
            months %= MONTHS_PER_YEAR;
        }

        Self {
            years,
            months,
            days,
        }
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration {
            years: self.years + rhs.years,
            months: self.months + rhs.months,
            days: self.days + rhs.days,
        }
        .normalize()
    }
}

/// Portuguese rendering used in the intake summary, e.g. `1 ano, 2 meses, 5 dias`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);

        if self.years > 0 {
            parts.push(format!("{} {}", self.years, if self.years == 1 { "ano" } else { "anos" }));
        }
        if self.months > 0 {
            parts.push(format!("{} {}", self.months, if self.months == 1 { "mês" } else { "meses" }));
        }
        if self.days > 0 {
            parts.push(format!("{} {}", self.days, if self.days == 1 { "dia" } else { "dias" }));
        }

        if parts.is_empty() {
            f.write_str("0 dias")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Two periods that share at least one calendar day. `first` precedes
/// `second` in start-date order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapRecord {
    pub first: Period,
    pub second: Period,
    pub overlapping_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapResult {
    pub total: Duration,
    pub sorted_periods: Vec<Period>,
    pub overlaps: Vec<OverlapRecord>,
    pub non_overlapping_days: i64,
}

impl OverlapResult {
    pub fn empty() -> Self {
        Self {
            total: Duration::ZERO,
            sorted_periods: Vec::new(),
            overlaps: Vec::new(),
            non_overlapping_days: 0,
        }
    }

    pub fn total_overlapping_days(&self) -> i64 {
        self.overlaps.iter().map(|o| o.overlapping_days).sum()
    }
}

/// Everything the batch pipeline produces for one input file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport {
    pub result: OverlapResult,
    pub formatted_total: String,
    /// Ids of periods that had a date the engine could not read.
    pub skipped_period_ids: Vec<String>,
    #[serde(skip)]
    pub overlaps_csv: String,
}
