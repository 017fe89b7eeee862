use std::fmt;

/// Errors surfaced by a conversion or by configuration.
///
/// Malformed Markdown is never an error: every input converts to some HTML.
/// Only configuration defects end up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// A name in the pass order has no registered implementation.
    PassNotRegistered(String),
    /// `Config::set_option` was given a key it does not recognize.
    UnknownOption(String),
    /// A recognized option was given a value it cannot parse.
    InvalidOptionValue { key: String, value: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::PassNotRegistered(name) => {
                write!(f, "pass '{}' is not registered", name)
            }
            ConvertError::UnknownOption(key) => write!(f, "unknown option '{}'", key),
            ConvertError::InvalidOptionValue { key, value } => {
                write!(f, "invalid value '{}' for option '{}'", value, key)
            }
        }
    }
}

impl std::error::Error for ConvertError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_not_registered_message() {
        let err = ConvertError::PassNotRegistered("blockGamut".to_string());
        assert_eq!(err.to_string(), "pass 'blockGamut' is not registered");
    }

    #[test]
    fn test_invalid_option_value_message() {
        let err = ConvertError::InvalidOptionValue {
            key: "omitExtraWLInCodeBlocks".to_string(),
            value: "maybe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'maybe' for option 'omitExtraWLInCodeBlocks'"
        );
    }
}
