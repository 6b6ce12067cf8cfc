/// Convenience result type used across scenevary.
pub type VaryResult<T> = Result<T, VaryError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Brand-policy violations are never errors; they are reported as data in
/// [`crate::ConstraintResult`].
#[derive(thiserror::Error, Debug)]
pub enum VaryError {
    /// Invalid user-provided parameters, operator options or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// An operator name that is not registered with the engine.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// Errors when converting scenes or configuration to and from JSON.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VaryError {
    /// Build a [`VaryError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VaryError::UnknownOperator`] value.
    pub fn unknown_operator(name: impl Into<String>) -> Self {
        Self::UnknownOperator(name.into())
    }

    /// Build a [`VaryError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for VaryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
