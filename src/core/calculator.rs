//! Contribution-time calculation over possibly overlapping periods.
//!
//! Periods are sorted by start date, their inclusive day counts are summed,
//! and every pair that shares calendar days is reported so the shared days
//! are not counted twice.

use crate::core::dates::{inclusive_day_count, parse_date_br, start_sort_key};
use crate::domain::model::{Duration, OverlapRecord, OverlapResult, Period};
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::validate_date_br;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// How period dates are checked before the calculation runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Unreadable dates contribute nothing and reversed ranges are kept.
    #[default]
    Lenient,
    /// Every date must be a real `DD/MM/YYYY` day and every range must run
    /// forwards, otherwise the calculation fails.
    Strict,
}

/// How shared days are removed from the raw total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapStrategy {
    /// Subtract each pair's shared days. Days covered by three or more
    /// periods are subtracted once per pair and so end up under-counted.
    #[default]
    Pairwise,
    /// Count the union of all forward ranges, so every covered day counts
    /// exactly once.
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorOptions {
    pub mode: ParseMode,
    pub overlap_strategy: OverlapStrategy,
    /// Latest year accepted in strict mode.
    pub max_year: i32,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            overlap_strategy: OverlapStrategy::default(),
            max_year: chrono::Local::now().year(),
        }
    }
}

/// A period with its dates read once.
struct Span<'a> {
    period: &'a Period,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    sort_key: (NaiveDate, bool),
}

impl<'a> Span<'a> {
    fn new(period: &'a Period) -> Self {
        Self {
            period,
            start: parse_date_br(&period.start_date),
            end: parse_date_br(&period.end_date),
            sort_key: start_sort_key(&period.start_date),
        }
    }

    fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start?, self.end?))
    }

    fn day_count(&self) -> i64 {
        self.bounds()
            .map(|(start, end)| inclusive_day_count(start, end))
            .unwrap_or(0)
    }

    /// Shared calendar days with `other`, or zero if either side has an
    /// unreadable date.
    fn overlap_days(&self, other: &Span<'_>) -> i64 {
        let (Some((start_a, end_a)), Some((start_b, end_b))) = (self.bounds(), other.bounds()) else {
            return 0;
        };

        let start = start_a.max(start_b);
        let end = end_a.min(end_b);

        if end >= start {
            inclusive_day_count(start, end)
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContributionCalculator {
    options: CalculatorOptions,
}

impl ContributionCalculator {
    pub fn new(options: CalculatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CalculatorOptions {
        &self.options
    }

    pub fn compute(&self, periods: &[Period]) -> Result<OverlapResult> {
        if self.options.mode == ParseMode::Strict {
            for period in periods {
                self.check_period(period)?;
            }
        }

        Ok(self.run(periods))
    }

    fn check_period(&self, period: &Period) -> Result<()> {
        let read = |field: &str, value: &str| {
            validate_date_br(value, self.options.max_year).map_err(|reason| CalcError::InvalidDateError {
                period_id: period.id.clone(),
                field: field.to_string(),
                value: value.to_string(),
                reason,
            })
        };

        let start = read("start_date", &period.start_date)?;
        let end = read("end_date", &period.end_date)?;

        if end < start {
            return Err(CalcError::ReversedPeriodError {
                period_id: period.id.clone(),
                start_date: period.start_date.clone(),
                end_date: period.end_date.clone(),
            });
        }

        Ok(())
    }

    fn run(&self, periods: &[Period]) -> OverlapResult {
        if periods.is_empty() {
            return OverlapResult::empty();
        }

        let mut spans: Vec<Span<'_>> = periods.iter().map(Span::new).collect();
        // Stable, so equal start dates keep their input order.
        spans.sort_by_key(|span| span.sort_key);

        let raw_total_days: i64 = spans.iter().map(Span::day_count).sum();

        let mut overlaps = Vec::new();
        let mut total_overlap_days = 0;

        for (i, first) in spans.iter().enumerate() {
            for second in &spans[i + 1..] {
                let shared = first.overlap_days(second);
                if shared > 0 {
                    overlaps.push(OverlapRecord {
                        first: first.period.clone(),
                        second: second.period.clone(),
                        overlapping_days: shared,
                    });
                    total_overlap_days += shared;
                }
            }
        }

        let non_overlapping_days = match self.options.overlap_strategy {
            OverlapStrategy::Pairwise => raw_total_days - total_overlap_days,
            OverlapStrategy::Union => union_day_count(&spans),
        };

        tracing::debug!(
            periods = spans.len(),
            raw_total_days,
            total_overlap_days,
            non_overlapping_days,
            "contribution time computed"
        );

        OverlapResult {
            total: Duration::from_days(non_overlapping_days),
            sorted_periods: spans.iter().map(|span| span.period.clone()).collect(),
            overlaps,
            non_overlapping_days,
        }
    }
}

/// Days covered by at least one forward range, each day counted once.
fn union_day_count(spans: &[Span<'_>]) -> i64 {
    let mut ranges: Vec<(NaiveDate, NaiveDate)> = spans
        .iter()
        .filter_map(Span::bounds)
        .filter(|(start, end)| start <= end)
        .collect();
    ranges.sort_unstable();

    let mut total = 0;
    let mut current: Option<(NaiveDate, NaiveDate)> = None;

    for (start, end) in ranges {
        current = match current {
            Some((open_start, open_end)) if start <= open_end => Some((open_start, open_end.max(end))),
            Some((open_start, open_end)) => {
                total += inclusive_day_count(open_start, open_end);
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }

    if let Some((start, end)) = current {
        total += inclusive_day_count(start, end);
    }

    total
}

/// Lenient, pairwise calculation. Never fails: periods with unreadable
/// dates simply contribute nothing.
pub fn compute_contribution_time(periods: &[Period]) -> OverlapResult {
    ContributionCalculator::default().run(periods)
}

/// Ids of periods with at least one date that [`parse_date_br`] cannot read.
pub fn unreadable_period_ids(periods: &[Period]) -> Vec<String> {
    periods
        .iter()
        .filter(|p| parse_date_br(&p.start_date).is_none() || parse_date_br(&p.end_date).is_none())
        .map(|p| p.id.clone())
        .collect()
}
