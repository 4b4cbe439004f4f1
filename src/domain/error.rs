//! Domain error types.

/// Top-level error type for levhold.
#[derive(Debug, thiserror::Error)]
pub enum LevholdError {
    #[error("invalid simulation config {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("price series is empty")]
    EmptySeries,

    #[error("signal series has {signals} periods, price series has {periods}")]
    SignalLengthMismatch { signals: usize, periods: usize },

    #[error("price series has {bars} bars, simulation covers {periods} periods")]
    SeriesLengthMismatch { bars: usize, periods: usize },

    #[error("invalid data at period {index}: {reason}")]
    InvalidPeriod { index: usize, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&LevholdError> for std::process::ExitCode {
    fn from(err: &LevholdError) -> Self {
        let code: u8 = match err {
            LevholdError::Io(_) | LevholdError::Report { .. } => 1,
            LevholdError::ConfigParse { .. }
            | LevholdError::ConfigMissing { .. }
            | LevholdError::ConfigInvalid { .. } => 2,
            LevholdError::Data { .. } => 3,
            LevholdError::InvalidConfig { .. }
            | LevholdError::EmptySeries
            | LevholdError::SignalLengthMismatch { .. }
            | LevholdError::SeriesLengthMismatch { .. }
            | LevholdError::InvalidPeriod { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
