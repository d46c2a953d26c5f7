//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Unrecognized level name in configuration
    #[error("invalid log level: {0:?}")]
    InvalidLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A required output destination could not be opened
    #[error("can't init logger sink {name:?}: {source}")]
    SinkOpen {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// An element of an array field was rejected by the encoder
    #[error("can't encode array item {index}: {source}")]
    ArrayItem {
        index: usize,
        #[source]
        source: Box<LoggerError>,
    },

    /// A reflected value could not be turned into structured data
    #[error("can't reflect value: {0}")]
    Reflect(#[source] serde_json::Error),

    /// Sink already flushed and closed
    #[error("Logger already stopped")]
    LoggerStopped,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLevel(level.into())
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink open error
    pub fn sink_open(name: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SinkOpen {
            name: name.into(),
            source,
        }
    }

    /// Wrap an element failure with its position in the array
    pub fn array_item(index: usize, source: LoggerError) -> Self {
        LoggerError::ArrayItem {
            index,
            source: Box::new(source),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Render the error followed by every cause in its source chain
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            // thiserror variants already embed their direct cause in Display
            if !message.ends_with(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

/// Text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_level("loud");
        assert!(matches!(err, LoggerError::InvalidLevel(_)));

        let err = LoggerError::config("Options", "bad format");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = LoggerError::sink_open("/var/log/app.log", io_err);
        assert!(matches!(err, LoggerError::SinkOpen { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_level("loud");
        assert_eq!(err.to_string(), "invalid log level: \"loud\"");

        let err = LoggerError::array_item(2, LoggerError::other("rejected"));
        assert_eq!(err.to_string(), "can't encode array item 2: rejected");
    }

    #[test]
    fn test_nested_array_item_keeps_chain() {
        let inner = LoggerError::array_item(0, LoggerError::other("bad map key"));
        let outer = LoggerError::array_item(3, inner);

        assert_eq!(
            outer.to_string(),
            "can't encode array item 3: can't encode array item 0: bad map key"
        );

        let source = outer.source().expect("outer error has a cause");
        assert_eq!(source.to_string(), "can't encode array item 0: bad map key");
        assert_eq!(
            outer.chain_message(),
            "can't encode array item 3: can't encode array item 0: bad map key"
        );
    }

    #[test]
    fn test_sink_open_error_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::sink_open("stdout", io_err);

        assert!(err.to_string().contains("stdout"));
        assert!(err.source().is_some());
    }
}
