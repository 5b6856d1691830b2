use thiserror::Error;

pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// Categorical token outside its accepted vocabulary. Aborts the load.
    #[error("Line {line}, column {column}: string value '{value}' is not a recognized {kind} token")]
    Decode {
        line: u64,
        column: usize,
        kind: &'static str,
        value: String,
    },

    #[error("Line {line}, column {column}: '{value}' is not a number")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },

    /// No window offsets remain; call `reset` to start a new epoch.
    #[error("No training windows remain in the current epoch")]
    Exhausted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO operation failed")]
    Io(#[from] std::io::Error),

    #[error("CSV read failed")]
    Csv(#[from] csv::Error),
}

impl DatasetError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, DatasetError::Exhausted)
    }
}
