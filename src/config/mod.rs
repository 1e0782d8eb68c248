pub mod local_storage;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::calculator::{CalculatorOptions, OverlapStrategy, ParseMode};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::{CalcError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const SUPPORTED_INPUT_EXTENSIONS: [&str; 2] = ["csv", "json"];
pub const SUPPORTED_OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "contribution-time")]
#[command(about = "Computes non-overlapping contribution time from a list of periods")]
pub struct CliConfig {
    /// Periods file (.csv with id,start_date,end_date or .json array)
    #[arg(long, short)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json,csv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Reject malformed dates and reversed periods")]
    pub strict: bool,

    #[arg(long, help = "Count each covered day once instead of subtracting pairwise overlaps")]
    pub union: bool,

    /// Latest year accepted in strict mode (defaults to the current year)
    #[arg(long)]
    pub max_year: Option<i32>,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn calculator_options(&self) -> CalculatorOptions {
        let defaults = CalculatorOptions::default();
        CalculatorOptions {
            mode: if self.strict {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            },
            overlap_strategy: if self.union {
                OverlapStrategy::Union
            } else {
                OverlapStrategy::Pairwise
            },
            max_year: self.max_year.unwrap_or(defaults.max_year),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &SUPPORTED_INPUT_EXTENSIONS)?;
        validation::validate_path("output_path", &self.output_path)?;

        if self.formats.is_empty() {
            return Err(CalcError::MissingConfigError {
                field: "formats".to_string(),
            });
        }
        for format in &self.formats {
            if !SUPPORTED_OUTPUT_FORMATS.contains(&format.as_str()) {
                return Err(CalcError::InvalidConfigValueError {
                    field: "formats".to_string(),
                    value: format.clone(),
                    reason: format!("Valid formats: {}", SUPPORTED_OUTPUT_FORMATS.join(", ")),
                });
            }
        }

        if let Some(max_year) = self.max_year {
            validation::validate_range("max_year", max_year, validation::MIN_YEAR, 9999)?;
        }

        Ok(())
    }
}
