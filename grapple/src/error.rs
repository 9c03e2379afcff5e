use std::fmt;
use std::io;

/// Failures surfaced at initialization. Steady-state grapple edge cases
/// (double fire, rope overstretch, missed raycasts) are handled by the state
/// machine and never produce one of these.
#[derive(Debug)]
pub enum GrappleError {
    /// A configuration value is unusable
    Config { field: String, reason: String },

    /// Reading configuration or script files failed
    Io { operation: String, source: io::Error },

    /// A configuration or script document could not be decoded
    Parse {
        what: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for GrappleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrappleError::Config { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            GrappleError::Io { operation, source } => {
                write!(f, "I/O error during '{}': {}", operation, source)
            }
            GrappleError::Parse { what, source } => {
                write!(f, "Unable to parse {}: {}", what, source)
            }
        }
    }
}

impl std::error::Error for GrappleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrappleError::Io { source, .. } => Some(source),
            GrappleError::Parse { source, .. } => Some(source),
            GrappleError::Config { .. } => None,
        }
    }
}

impl GrappleError {
    pub fn config(field: &str, reason: impl Into<String>) -> Self {
        GrappleError::Config {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        GrappleError::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn parse(what: impl Into<String>, source: serde_json::Error) -> Self {
        GrappleError::Parse {
            what: what.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = GrappleError::config("pull_speed", "must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'pull_speed': must be positive, got -1"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = GrappleError::io(
            "read grapple.json",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("read grapple.json"));
        assert!(err.source().is_some());
    }
}
