// crates/tf_config/src/error.rs

//! Configuration errors

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax or type error in the file
    #[error("parse error: {0}")]
    Parse(String),

    /// Value out of range
    #[error("invalid value '{key}': {value} - {reason}")]
    InvalidValue {
        /// Dotted key
        key: String,
        /// Offending value
        value: String,
        /// Reason
        reason: String,
    },

    /// Required setting absent
    #[error("missing setting: {0}")]
    Missing(String),
}

impl ConfigError {
    /// Out-of-range helper
    pub fn invalid(key: &str, value: impl ToString, reason: &str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("numerics.cfl", -1.0, "must be in (0, 1]");
        let text = err.to_string();
        assert!(text.contains("numerics.cfl"));
        assert!(text.contains("-1"));
    }
}
