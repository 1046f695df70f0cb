//! Event pipeline configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Event pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Maximum events fetched from the outbox per publish pass
    #[serde(default = "default_send_batch_size")]
    pub send_batch_size: usize,
}

impl EventsConfig {
    /// Validate event pipeline configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.send_batch_size == 0 {
            return Err(ValidationError::InvalidSendBatchSize);
        }
        Ok(())
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            send_batch_size: default_send_batch_size(),
        }
    }
}

fn default_send_batch_size() -> usize {
    50
}
