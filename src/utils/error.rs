use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForwarderError {
    #[error("Failed to load application `{application}`: {message}")]
    ApplicationLoad {
        application: String,
        message: String,
    },

    #[error("Application error: {message}")]
    InvocationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ForwarderError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            ForwarderError::ApplicationLoad { application, .. } => {
                format!("Application `{}` could not be loaded", application)
            }
            ForwarderError::InvocationError { message } => {
                format!("The application failed to handle the request: {}", message)
            }
            ForwarderError::IoError(e) => format!("Could not read input: {}", e),
            ForwarderError::SerializationError(e) => format!("Malformed JSON: {}", e),
            ForwarderError::TomlError(e) => format!("Malformed configuration file: {}", e),
            ForwarderError::ConfigError { message } => message.clone(),
            ForwarderError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting `{}` is invalid: {}", field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ForwarderError>;
