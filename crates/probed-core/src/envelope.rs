// ABOUTME: The JSON envelope returned by every probed endpoint, success or failure.
// ABOUTME: Carries a message and, for the environment dump only, a name/value mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Uniform response body. `environment` is omitted from the JSON when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl Envelope {
    /// Build an envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            environment: BTreeMap::new(),
        }
    }

    /// Build an envelope carrying a message and an environment mapping.
    pub fn with_environment(
        message: impl Into<String>,
        environment: BTreeMap<String, String>,
    ) -> Self {
        Self {
            message: message.into(),
            environment,
        }
    }
}
