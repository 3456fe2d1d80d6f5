use thiserror::Error;

/// Why a duration string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("duration is empty")]
    Empty,
    #[error("'{0}' is not a bar count, a named duration or T<ticks>")]
    Unrecognized(String),
    #[error("duration must be greater than zero")]
    NotPositive,
    #[error("{0} bars does not land on a whole tick")]
    FractionalTicks(String),
    #[error("duration is too long")]
    TooLong,
}

/// Fatal progression parse failure; names the offending token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    #[error("progression is empty")]
    Empty,

    #[error("malformed token '{token}': {reason}")]
    MalformedToken { token: String, reason: String },

    #[error("invalid duration in token '{token}': {reason}")]
    InvalidDuration { token: String, reason: String },

    #[error("rest '{token}' needs an explicit duration, e.g. R:1")]
    RestWithoutDuration { token: String },

    #[error("invalid default chord duration '{duration}': {reason}")]
    InvalidDefaultDuration { duration: String, reason: String },
}

impl ParseError {
    pub(crate) fn malformed(token: &str, reason: impl Into<String>) -> Self {
        ParseError::MalformedToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn duration(token: &str, err: DurationError) -> Self {
        ParseError::InvalidDuration {
            token: token.to_string(),
            reason: err.to_string(),
        }
    }

    /// The token that caused the failure, when there is one
    pub fn token(&self) -> Option<&str> {
        match self {
            ParseError::MalformedToken { token, .. }
            | ParseError::InvalidDuration { token, .. }
            | ParseError::RestWithoutDuration { token } => Some(token),
            ParseError::Empty | ParseError::InvalidDefaultDuration { .. } => None,
        }
    }
}
