//! SMS parsing error types.

use thiserror::Error;

use hawala_shared::EngineError;

/// Errors from rule compilation and parsed-message validation.
///
/// A message that matches no rule is NOT an error - it becomes a
/// [`ParseFailure`](super::ParseFailure) awaiting manual resolution.
#[derive(Debug, Error)]
pub enum SmsError {
    /// A configured rule pattern does not compile.
    #[error("Rule '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        /// The rule name.
        name: String,
        /// The regex compilation failure.
        #[source]
        source: regex::Error,
    },

    /// A parsed amount must be strictly positive.
    #[error("Parsed amount must be positive")]
    NonPositiveAmount,

    /// The sender/recipient field is empty.
    #[error("Parsed person is empty")]
    EmptyPerson,
}

impl From<SmsError> for EngineError {
    fn from(err: SmsError) -> Self {
        Self::Validation(err.to_string())
    }
}
