use crate::config::{SUPPORTED_INPUT_EXTENSIONS, SUPPORTED_OUTPUT_FORMATS};
use crate::core::calculator::{CalculatorOptions, OverlapStrategy, ParseMode};
use crate::core::ConfigProvider;
use crate::utils::error::{CalcError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub calculation: CalculationConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub mode: ParseMode,
    #[serde(default)]
    pub overlap_strategy: OverlapStrategy,
    pub max_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_output_formats")]
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_output_formats() -> Vec<String> {
    SUPPORTED_OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PERIODS_FILE})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension("input.path", &self.input.path, &SUPPORTED_INPUT_EXTENSIONS)?;
        validation::validate_path("output.path", &self.output.path)?;

        if let Some(name) = &self.calculation.name {
            validation::validate_non_empty_string("calculation.name", name)?;
        }

        if let Some(max_year) = self.calculation.max_year {
            validation::validate_range("calculation.max_year", max_year, validation::MIN_YEAR, 9999)?;
        }

        if self.output.formats.is_empty() {
            return Err(CalcError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        for format in &self.output.formats {
            if !SUPPORTED_OUTPUT_FORMATS.contains(&format.as_str()) {
                return Err(CalcError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        SUPPORTED_OUTPUT_FORMATS.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        self.calculation.name.as_deref().unwrap_or("contribution-time")
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().map(|l| l.verbose).unwrap_or(false)
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.as_ref().map(|l| l.format).unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn calculator_options(&self) -> CalculatorOptions {
        let defaults = CalculatorOptions::default();
        CalculatorOptions {
            mode: self.calculation.mode,
            overlap_strategy: self.calculation.overlap_strategy,
            max_year: self.calculation.max_year.unwrap_or(defaults.max_year),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
