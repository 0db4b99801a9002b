use serde::{Deserialize, Serialize};

/// Descriptive information about a ticker, used for display only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMetadata {
    /// Human-readable company or instrument name (e.g. "Apple Inc.").
    pub display_name: String,

    /// Quote currency reported by the provider, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl TickerMetadata {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            currency: None,
        }
    }
}
