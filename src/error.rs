use rust_decimal::Decimal;
use thiserror::Error;

/// Recoverable problems with a user supplied amount.
///
/// The `Display` output of each variant is the message shown next to the
/// amount field, so only the first failing check is ever reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Enter a valid amount.")]
    Unparseable,

    #[error("The amount must be greater than 0.")]
    NonPositive,

    #[error("The minimum amount is {minimum}.")]
    BelowMinimum { minimum: String },

    #[error("The maximum amount is {maximum}.")]
    AboveMaximum { maximum: String },
}

/// Configuration mismatches and broken preconditions.
///
/// These indicate a problem in the calling layer (for example offering a term
/// without a rate) rather than bad user input.
#[derive(Debug, Error)]
pub enum LoanError {
    #[error("No rate configured for a term of {0} periods")]
    UnmappedTerm(u32),

    #[error("Period count must be greater than zero")]
    ZeroPeriods,

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Schedule left a residual balance of {0}")]
    ResidualBalance(Decimal),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("Configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LoanError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
