//! CLI error type.

use std::fmt;

use tilestitch::ComposeError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded or holds invalid values.
    Config(String),

    /// The compositing run failed.
    Compose(ComposeError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Compose(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Compose(e) => Some(e),
        }
    }
}

impl From<ComposeError> for CliError {
    fn from(e: ComposeError) -> Self {
        match e {
            ComposeError::Config(msg) => CliError::Config(msg),
            other => CliError::Compose(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_unwrapped() {
        let err: CliError = ComposeError::Config("bad zoom".to_string()).into();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: bad zoom");
    }

    #[test]
    fn test_compose_errors_keep_source() {
        use std::error::Error;

        let err: CliError = ComposeError::CanvasTooLarge("too wide".to_string()).into();
        assert!(matches!(err, CliError::Compose(_)));
        assert!(err.source().is_some());
    }
}
