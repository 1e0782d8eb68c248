use crate::core::calculator::{unreadable_period_ids, ContributionCalculator};
use crate::core::{CalculationReport, ConfigProvider, Period, Pipeline, Storage};
use crate::domain::model::OverlapRecord;
use crate::utils::error::{CalcError, Result};
use serde::Serialize;
use std::path::Path;

pub const REPORT_JSON: &str = "report.json";
pub const OVERLAPS_CSV: &str = "overlaps.csv";

/// Input layouts the pipeline can read, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            _ => Err(CalcError::ConfigError {
                message: format!("Cannot tell the input format of '{}' (expected .csv or .json)", path),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct OverlapRow<'a> {
    first_id: &'a str,
    first_start_date: &'a str,
    first_end_date: &'a str,
    second_id: &'a str,
    second_start_date: &'a str,
    second_end_date: &'a str,
    overlapping_days: i64,
}

impl<'a> From<&'a OverlapRecord> for OverlapRow<'a> {
    fn from(record: &'a OverlapRecord) -> Self {
        Self {
            first_id: &record.first.id,
            first_start_date: &record.first.start_date,
            first_end_date: &record.first.end_date,
            second_id: &record.second.id,
            second_start_date: &record.second.start_date,
            second_end_date: &record.second.end_date,
            overlapping_days: record.overlapping_days,
        }
    }
}

pub fn parse_periods(format: InputFormat, data: &[u8]) -> Result<Vec<Period>> {
    match format {
        InputFormat::Json => Ok(serde_json::from_slice(data)?),
        InputFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(data);
            let mut periods = Vec::new();
            for row in reader.deserialize() {
                periods.push(row?);
            }
            Ok(periods)
        }
    }
}

pub fn render_overlaps_csv(overlaps: &[OverlapRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if overlaps.is_empty() {
        writer.write_record([
            "first_id",
            "first_start_date",
            "first_end_date",
            "second_id",
            "second_start_date",
            "second_end_date",
            "overlapping_days",
        ])?;
    }
    for record in overlaps {
        writer.serialize(OverlapRow::from(record))?;
    }

    let bytes = writer.into_inner().map_err(|e| CalcError::ProcessingError {
        message: format!("Failed to flush overlaps CSV: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| CalcError::ProcessingError {
        message: format!("Overlaps CSV is not valid UTF-8: {}", e),
    })
}

/// Reads a periods file, runs the calculator and writes the report files.
pub struct CalculationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    calculator: ContributionCalculator,
}

impl<S: Storage, C: ConfigProvider> CalculationPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let calculator = ContributionCalculator::new(config.calculator_options());
        Self {
            storage,
            config,
            calculator,
        }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CalculationPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Period>> {
        let input_path = self.config.input_path();
        let format = InputFormat::from_path(input_path)?;

        tracing::debug!("Reading {:?} periods from: {}", format, input_path);
        let data = self.storage.read_file(input_path).await?;
        let periods = parse_periods(format, &data)?;

        tracing::info!("📊 Extracted {} periods", periods.len());
        Ok(periods)
    }

    async fn transform(&self, periods: Vec<Period>) -> Result<CalculationReport> {
        tracing::info!(
            "🔧 Computing contribution time ({:?} mode, {:?} overlaps)",
            self.calculator.options().mode,
            self.calculator.options().overlap_strategy
        );

        let skipped_period_ids = unreadable_period_ids(&periods);
        for id in &skipped_period_ids {
            tracing::warn!("Period '{}' has an unreadable date and contributes no time", id);
        }

        let result = self.calculator.compute(&periods)?;

        for overlap in &result.overlaps {
            tracing::info!(
                "⚠️ Periods '{}' and '{}' share {} days",
                overlap.first.id,
                overlap.second.id,
                overlap.overlapping_days
            );
        }

        let overlaps_csv = render_overlaps_csv(&result.overlaps)?;

        Ok(CalculationReport {
            formatted_total: result.total.to_string(),
            skipped_period_ids,
            overlaps_csv,
            result,
        })
    }

    async fn load(&self, report: CalculationReport) -> Result<String> {
        let mut written = 0;

        for format in self.config.output_formats() {
            match format.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&report)?;
                    let path = self.output_file(REPORT_JSON);
                    self.storage.write_file(&path, json.as_bytes()).await?;
                    tracing::debug!("Wrote {} ({} bytes)", path, json.len());
                }
                "csv" => {
                    let path = self.output_file(OVERLAPS_CSV);
                    self.storage
                        .write_file(&path, report.overlaps_csv.as_bytes())
                        .await?;
                    tracing::debug!("Wrote {}", path);
                }
                other => {
                    return Err(CalcError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format. Valid formats: json, csv".to_string(),
                    })
                }
            }
            written += 1;
        }

        tracing::info!("💾 Wrote {} report file(s) to {}", written, self.config.output_path());
        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::{CalculatorOptions, OverlapStrategy, ParseMode};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                CalcError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        input: String,
        formats: Vec<String>,
        options: CalculatorOptions,
    }

    impl TestConfig {
        fn new(input: &str, mode: ParseMode) -> Self {
            Self {
                input: input.to_string(),
                formats: vec!["json".to_string(), "csv".to_string()],
                options: CalculatorOptions {
                    mode,
                    overlap_strategy: OverlapStrategy::Pairwise,
                    max_year: 2030,
                },
            }
        }
    }

    impl ConfigProvider for TestConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn calculator_options(&self) -> CalculatorOptions {
            self.options
        }
    }

    const CSV_INPUT: &str = "id,start_date,end_date\n\
                             a, 01/01/2020 ,30/06/2020\n\
                             b,01/06/2020,31/12/2020\n";

    #[test]
    fn test_input_format_from_path() {
        assert_eq!(InputFormat::from_path("p.csv").unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path("dir/p.JSON").unwrap(), InputFormat::Json);
        assert!(InputFormat::from_path("p.xlsx").is_err());
    }

    #[test]
    fn test_parse_csv_trims_fields() {
        let periods = parse_periods(InputFormat::Csv, CSV_INPUT.as_bytes()).unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0], Period::new("a", "01/01/2020", "30/06/2020"));
    }

    #[test]
    fn test_render_overlaps_csv_empty_has_header() {
        let csv = render_overlaps_csv(&[]).unwrap();
        assert!(csv.starts_with("first_id,first_start_date"));
        assert_eq!(csv.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_pipeline_round_trip() {
        let storage = MockStorage::with_file("periods.csv", CSV_INPUT);
        let pipeline = CalculationPipeline::new(
            storage.clone(),
            TestConfig::new("periods.csv", ParseMode::Lenient),
        );

        let periods = pipeline.extract().await.unwrap();
        let report = pipeline.transform(periods).await.unwrap();
        assert_eq!(report.result.non_overlapping_days, 182 + 214 - 30);
        assert_eq!(report.result.overlaps.len(), 1);
        assert!(report.skipped_period_ids.is_empty());

        let location = pipeline.load(report).await.unwrap();
        assert_eq!(location, "out");

        let json = storage.get_file("out/report.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["result"]["nonOverlappingDays"], 366);
        assert_eq!(value["formattedTotal"], "1 ano, 1 dia");

        let csv = String::from_utf8(storage.get_file("out/overlaps.csv").await.unwrap()).unwrap();
        assert!(csv.contains("a,01/01/2020,30/06/2020,b,01/06/2020,31/12/2020,30"));
    }

    #[tokio::test]
    async fn test_pipeline_strict_mode_fails_on_bad_date() {
        let storage = MockStorage::with_file(
            "periods.json",
            r#"[{"id":"x","startDate":"30/02/2020","endDate":"01/03/2020"}]"#,
        );
        let pipeline = CalculationPipeline::new(storage, TestConfig::new("periods.json", ParseMode::Strict));

        let periods = pipeline.extract().await.unwrap();
        let err = pipeline.transform(periods).await.unwrap_err();
        assert!(matches!(err, CalcError::InvalidDateError { .. }));
    }

    #[tokio::test]
    async fn test_pipeline_missing_input() {
        let storage = MockStorage::with_file("other.csv", "");
        let pipeline = CalculationPipeline::new(storage, TestConfig::new("periods.csv", ParseMode::Lenient));
        assert!(matches!(pipeline.extract().await, Err(CalcError::IoError(_))));
    }
}
