pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{local_storage::LocalStorage, toml_config::TomlConfig};

pub use core::calculator::{
    compute_contribution_time, CalculatorOptions, ContributionCalculator, OverlapStrategy, ParseMode,
};
pub use core::dates::{inclusive_day_count, parse_date_br};
pub use core::{engine::CalculationEngine, pipeline::CalculationPipeline};
pub use domain::model::{CalculationReport, Duration, OverlapRecord, OverlapResult, Period};
pub use utils::error::{CalcError, Result};
