pub mod guards;
pub mod types;

#[cfg(test)]
mod tests;

use assistant_core::prompt::ProductCatalog;

use crate::guards::format::normalize_reply;
use crate::guards::scope::reply_in_scope;
use crate::types::{GuardVerdict, GuardrailSettings};

/// Ordered, individually toggleable post-processing of raw assistant
/// replies. Pure given its settings and catalog; no network or storage.
pub struct GuardrailPipeline {
    settings: GuardrailSettings,
    catalog: ProductCatalog,
}

impl GuardrailPipeline {
    pub fn new(settings: GuardrailSettings, catalog: ProductCatalog) -> Self {
        Self { settings, catalog }
    }

    pub fn apply(&self, question: &str, raw_reply: &str) -> GuardVerdict {
        let mut reply = raw_reply.to_string();

        if self.settings.format_enabled {
            reply = normalize_reply(&reply);
        }

        if self.settings.scope_enabled {
            // An already-refused reply stays refused: the flag must not
            // flip when the pipeline re-runs over its own output.
            if reply == self.settings.refusal_message {
                return GuardVerdict {
                    reply,
                    scope_flag: true,
                };
            }

            if !reply_in_scope(&self.catalog, question, &reply) {
                tracing::debug!("reply out of product scope, substituting refusal");
                return GuardVerdict {
                    reply: self.settings.refusal_message.clone(),
                    scope_flag: true,
                };
            }
        }

        GuardVerdict {
            reply,
            scope_flag: false,
        }
    }
}
