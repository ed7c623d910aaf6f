use serde::{Deserialize, Serialize};

/// Default refusal text. Deliberately avoids product names so that a
/// refused reply never re-enters scope on a second pass.
pub const DEFAULT_REFUSAL_MESSAGE: &str =
    "I can only help with questions about supported OPSWAT products. \
     Please ask about a specific product.";

fn default_true() -> bool {
    true
}

fn default_refusal() -> String {
    DEFAULT_REFUSAL_MESSAGE.to_string()
}

/// Settings for the reply post-processing pipeline. Each step can be
/// toggled independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailSettings {
    #[serde(default = "default_true")]
    pub format_enabled: bool,
    #[serde(default = "default_true")]
    pub scope_enabled: bool,
    #[serde(default = "default_refusal")]
    pub refusal_message: String,
}

impl Default for GuardrailSettings {
    fn default() -> Self {
        Self {
            format_enabled: true,
            scope_enabled: true,
            refusal_message: default_refusal(),
        }
    }
}

/// Result of post-processing one reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardVerdict {
    pub reply: String,
    pub scope_flag: bool,
}
