use crate::core::Pipeline;
use crate::domain::model::Duration;
use crate::utils::error::Result;
use std::time::Instant;

/// What a finished run reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub total: Duration,
    pub non_overlapping_days: i64,
    pub overlap_count: usize,
    pub skipped_periods: usize,
}

pub struct CalculationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> CalculationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!("Starting contribution time calculation");

        let periods = self.pipeline.extract().await?;
        let report = self.pipeline.transform(periods).await?;

        let total = report.result.total;
        let non_overlapping_days = report.result.non_overlapping_days;
        let overlap_count = report.result.overlaps.len();
        let skipped_periods = report.skipped_period_ids.len();
        tracing::info!(
            "Total {} ({} days, {} overlapping pairs)",
            total,
            non_overlapping_days,
            overlap_count
        );

        let output_path = self.pipeline.load(report).await?;
        tracing::debug!("Calculation finished in {:?}", started.elapsed());

        Ok(RunSummary {
            output_path,
            total,
            non_overlapping_days,
            overlap_count,
            skipped_periods,
        })
    }
}
