use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Schedule not found: {0}")]
    NotFound(String),

    #[error("Execution already recorded for tx {0}")]
    DuplicateExecution(String),

    #[error("{0}")]
    Internal(String),
}

impl ScheduleError {
    /// Machine-readable kind string used in wire error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::MissingField(_) => "MissingField",
            ScheduleError::InvalidAddress(_) => "InvalidAddress",
            ScheduleError::InvalidAmount(_) => "InvalidAmount",
            ScheduleError::InvalidInterval(_) => "InvalidInterval",
            ScheduleError::NotFound(_) => "NotFound",
            ScheduleError::DuplicateExecution(_) => "DuplicateExecution",
            ScheduleError::Internal(_) => "InternalError",
        }
    }
}
