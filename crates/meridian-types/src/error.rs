use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Malformed VRF output: need at least {required} bytes, got {actual}")]
    MalformedVrfOutput { required: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SelectionError>;
