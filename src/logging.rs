use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::LoggingError;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// configured level.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError::Filter(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => return Err(LoggingError::Format(other.to_string())),
    };
    installed.map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_format() {
        let config = LoggingConfig {
            level: "debug".into(),
            format: "xml".into(),
        };
        assert!(matches!(init(&config), Err(LoggingError::Format(f)) if f == "xml"));
    }

    #[test]
    fn second_install_fails() {
        let config = LoggingConfig {
            level: "info".into(),
            format: "pretty".into(),
        };
        // another test may have won the race for the global subscriber
        let _ = init(&config);
        assert!(matches!(
            init(&config),
            Err(LoggingError::AlreadyInstalled(_))
        ));
    }
}
