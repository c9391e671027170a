use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid training queue '{unit_type}' in city '{city}': {reason}")]
    InvalidQueueConfig {
        city:      String,
        unit_type: String,
        reason:    String,
    },

    #[error("Malformed snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    #[error("Invalid tick config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSnapshot { reason: reason.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;
