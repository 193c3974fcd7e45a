use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("file name {file} does not include .csv extension")]
    InvalidExtension { file: String },

    #[error("{file} could not be found")]
    FileNotFound { file: String },

    #[error("{value} in {file} at line {line} is not an integer value")]
    InvalidInteger {
        file: String,
        line: usize,
        value: String,
    },

    #[error("{value} in {file} at line {line} is larger than the maximum of {max}")]
    IntegerOverflow {
        file: String,
        line: usize,
        value: String,
        max: u32,
    },

    #[error("missing field '{field}' in {file} at line {line}")]
    MissingField {
        file: String,
        line: usize,
        field: String,
    },

    #[error("duplicate {kind} name: {name}")]
    DuplicateKey { kind: String, name: String },

    #[error("invalid rank {rank} for female {name}: ranks start at 1")]
    InvalidRank { name: String, rank: u32 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Draw state error: {message}")]
    StateError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Config,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DrawError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DrawError::CsvError(_)
            | DrawError::InvalidExtension { .. }
            | DrawError::FileNotFound { .. }
            | DrawError::InvalidInteger { .. }
            | DrawError::IntegerOverflow { .. }
            | DrawError::MissingField { .. }
            | DrawError::DuplicateKey { .. }
            | DrawError::InvalidRank { .. } => ErrorCategory::Input,
            DrawError::ConfigError { .. }
            | DrawError::MissingConfigError { .. }
            | DrawError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            DrawError::IoError(_) | DrawError::SerializationError(_) => ErrorCategory::Io,
            DrawError::StateError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DrawError::IoError(e) => format!("Could not read or write a file: {}", e),
            DrawError::CsvError(e) => format!("Could not parse CSV input: {}", e),
            other => format!("Bad Input: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DrawError::InvalidExtension { .. } => "Save the list as a .csv file and pass its path",
            DrawError::FileNotFound { .. } => "Check the file name and the working directory",
            DrawError::InvalidInteger { .. } => {
                "Straws and ranks must be whole numbers starting at 1 (straws may also be 'unlimited')"
            }
            DrawError::IntegerOverflow { .. } => {
                "Use a smaller number, or 'unlimited' for a bull with no straw limit"
            }
            DrawError::MissingField { .. } => {
                "Every row needs name, owner, email and a straw count or rank"
            }
            DrawError::DuplicateKey { .. } => "Give each bull a unique name in the bull list",
            DrawError::InvalidRank { .. } => "Ranks start at 1",
            DrawError::ConfigError { .. }
            | DrawError::MissingConfigError { .. }
            | DrawError::InvalidConfigValueError { .. } => "Review the configuration file and CLI flags",
            DrawError::IoError(_) | DrawError::SerializationError(_) => {
                "Make sure the output directory exists and is writable"
            }
            DrawError::CsvError(_) => "Make sure the file is plain comma separated text",
            DrawError::StateError { .. } => "This is a bug, please report it with the input files",
        }
    }
}

pub type Result<T> = std::result::Result<T, DrawError>;
