use crate::core::calculator::CalculatorOptions;
use crate::domain::model::{CalculationReport, Period};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn calculator_options(&self) -> CalculatorOptions;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Period>>;
    async fn transform(&self, periods: Vec<Period>) -> Result<CalculationReport>;
    async fn load(&self, report: CalculationReport) -> Result<String>;
}
