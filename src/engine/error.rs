//! Label pipeline errors

use thiserror::Error;

use crate::carrier::CarrierError;
use super::builder::BuildError;
use super::overlay::RenderError;

/// Everything that can stop a label from being produced
#[derive(Debug, Error)]
pub enum LabelError {
    /// Caller input is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Server-side account settings are missing
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Carrier(#[from] CarrierError),

    #[error("Label rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl From<BuildError> for LabelError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::MissingAccount => LabelError::Config(err.to_string()),
            BuildError::MissingRecipient | BuildError::MissingField(_) => {
                LabelError::Validation(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_errors_split_by_blame() {
        assert!(matches!(LabelError::from(BuildError::MissingRecipient), LabelError::Validation(_)));
        assert!(matches!(LabelError::from(BuildError::MissingField("zip")), LabelError::Validation(_)));
        assert!(matches!(LabelError::from(BuildError::MissingAccount), LabelError::Config(_)));
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = LabelError::from(BuildError::MissingRecipient);
        assert_eq!(err.to_string(), "Missing 'to' address");
    }
}
