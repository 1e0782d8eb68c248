use anyhow::Result;
use contribution_time::{CalcError, CalculationEngine, CalculationPipeline, CliConfig, LocalStorage, TomlConfig};
use tempfile::TempDir;

const PERIODS_CSV: &str = "id,start_date,end_date\n\
                           prefeitura,01/02/2005,31/01/2010\n\
                           escola,01/01/2008,31/12/2012\n\
                           estado,01/06/2011,31/05/2020\n";

fn cli_config(input: &str, output: &str) -> CliConfig {
    CliConfig {
        input: input.to_string(),
        output_path: output.to_string(),
        formats: vec!["json".to_string(), "csv".to_string()],
        strict: false,
        union: false,
        max_year: None,
        json_logs: false,
        verbose: false,
    }
}

#[tokio::test]
async fn test_end_to_end_csv_to_reports() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("periods.csv");
    std::fs::write(&input, PERIODS_CSV)?;
    let output = temp_dir.path().join("out");

    let config = cli_config(input.to_str().unwrap(), output.to_str().unwrap());
    let engine = CalculationEngine::new(CalculationPipeline::new(LocalStorage::default(), config));

    let summary = engine.run().await?;

    assert_eq!(summary.overlap_count, 2);
    assert_eq!(summary.skipped_periods, 0);
    assert_eq!(summary.output_path, output.to_str().unwrap());

    let report: serde_json::Value = serde_json::from_slice(&std::fs::read(output.join("report.json"))?)?;
    let sorted: Vec<&str> = report["result"]["sortedPeriods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(sorted, vec!["prefeitura", "escola", "estado"]);
    assert_eq!(
        report["result"]["nonOverlappingDays"].as_i64().unwrap(),
        summary.non_overlapping_days
    );

    let overlaps_csv = std::fs::read_to_string(output.join("overlaps.csv"))?;
    assert_eq!(overlaps_csv.lines().count(), 3);
    assert!(overlaps_csv.contains("prefeitura,01/02/2005,31/01/2010,escola"));

    Ok(())
}

#[tokio::test]
async fn test_union_and_pairwise_differ_on_triple_overlap() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("periods.json");
    std::fs::write(
        &input,
        r#"[
            {"id": "a", "startDate": "01/01/2020", "endDate": "31/01/2020"},
            {"id": "b", "startDate": "01/01/2020", "endDate": "31/01/2020"},
            {"id": "c", "startDate": "01/01/2020", "endDate": "31/01/2020"}
        ]"#,
    )?;
    let output = temp_dir.path().join("out");

    let pairwise = cli_config(input.to_str().unwrap(), output.to_str().unwrap());
    let mut union = pairwise.clone();
    union.union = true;

    let pairwise_summary = CalculationEngine::new(CalculationPipeline::new(LocalStorage::default(), pairwise))
        .run()
        .await?;
    let union_summary = CalculationEngine::new(CalculationPipeline::new(LocalStorage::default(), union))
        .run()
        .await?;

    assert_eq!(pairwise_summary.non_overlapping_days, 0);
    assert_eq!(union_summary.non_overlapping_days, 31);
    assert_eq!(union_summary.overlap_count, 3);

    Ok(())
}

#[tokio::test]
async fn test_lenient_run_reports_skipped_periods() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("periods.csv");
    std::fs::write(
        &input,
        "id,start_date,end_date\nok,01/01/2020,31/01/2020\nbroken,01/01/2020,\n",
    )?;
    let output = temp_dir.path().join("out");

    let mut config = cli_config(input.to_str().unwrap(), output.to_str().unwrap());
    config.formats = vec!["json".to_string()];

    let summary = CalculationEngine::new(CalculationPipeline::new(LocalStorage::default(), config))
        .run()
        .await?;

    assert_eq!(summary.non_overlapping_days, 31);
    assert_eq!(summary.skipped_periods, 1);
    assert!(output.join("report.json").exists());
    assert!(!output.join("overlaps.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_strict_run_fails_on_reversed_period() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("periods.csv");
    std::fs::write(&input, "id,start_date,end_date\nrev,31/12/2020,01/01/2020\n")?;
    let output = temp_dir.path().join("out");

    let mut config = cli_config(input.to_str().unwrap(), output.to_str().unwrap());
    config.strict = true;
    config.max_year = Some(2030);

    let result = CalculationEngine::new(CalculationPipeline::new(LocalStorage::default(), config))
        .run()
        .await;

    assert!(matches!(result, Err(CalcError::ReversedPeriodError { .. })));
    assert!(!output.exists());

    Ok(())
}

#[tokio::test]
async fn test_toml_configured_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("periods.csv");
    std::fs::write(&input, PERIODS_CSV)?;
    let output = temp_dir.path().join("toml-out");

    let toml_content = format!(
        r#"
[calculation]
name = "integration"
overlap_strategy = "union"

[input]
path = "{}"

[output]
path = "{}"
formats = ["csv"]
"#,
        input.display(),
        output.display()
    );
    let config = TomlConfig::from_toml_str(&toml_content)?;

    let summary = CalculationEngine::new(CalculationPipeline::new(LocalStorage::default(), config))
        .run()
        .await?;

    // 01/02/2005 through 31/05/2020 is one continuous stretch.
    let expected = contribution_time::inclusive_day_count(
        contribution_time::parse_date_br("01/02/2005").unwrap(),
        contribution_time::parse_date_br("31/05/2020").unwrap(),
    );
    assert_eq!(summary.non_overlapping_days, expected);
    assert!(output.join("overlaps.csv").exists());
    assert!(!output.join("report.json").exists());

    Ok(())
}
