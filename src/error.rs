use thiserror::Error;

/// Every rejected input surfaces to the user as the same message; the
/// payload names the reason so it can be logged and asserted on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanError {
    #[error("Incorrect parameters")]
    InvalidParameters(&'static str),
}

impl LoanError {
    pub fn reason(&self) -> &'static str {
        match self {
            LoanError::InvalidParameters(reason) => reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
