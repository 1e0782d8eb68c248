pub mod calculator;
pub mod dates;
pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{CalculationReport, Duration, OverlapRecord, OverlapResult, Period};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
