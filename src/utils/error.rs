use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid date '{value}' in period '{period_id}' ({field}): {reason}")]
    InvalidDateError {
        period_id: String,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Period '{period_id}' ends before it starts ({start_date} > {end_date})")]
    ReversedPeriodError {
        period_id: String,
        start_date: String,
        end_date: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Format,
    Configuration,
    Input,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CalcError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::IoError(_) => ErrorCategory::Io,
            CalcError::CsvError(_) | CalcError::SerializationError(_) => ErrorCategory::Format,
            CalcError::ConfigError { .. }
            | CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CalcError::InvalidDateError { .. }
            | CalcError::ReversedPeriodError { .. } => ErrorCategory::Input,
            CalcError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Format | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Processing => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalcError::IoError(_) => "Check that the input file exists and the output path is writable",
            CalcError::CsvError(_) => "Make sure the CSV has an 'id,start_date,end_date' header",
            CalcError::SerializationError(_) => {
                "Make sure the JSON input is an array of {id, start_date, end_date} objects"
            }
            CalcError::ConfigError { .. }
            | CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => "Review the configuration file or command line arguments",
            CalcError::InvalidDateError { .. } => "Dates must use the DD/MM/YYYY format",
            CalcError::ReversedPeriodError { .. } => "Swap the start and end dates of the period",
            CalcError::ProcessingError { .. } => "Run again with --verbose for more details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::IoError(e) => format!("Could not access a file: {}", e),
            CalcError::InvalidDateError {
                period_id, value, ..
            } => format!("Period '{}' has an invalid date: '{}'", period_id, value),
            CalcError::ReversedPeriodError { period_id, .. } => {
                format!("Period '{}' ends before it starts", period_id)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
