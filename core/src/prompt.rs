use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::ChatRequest;

/// Standing instructions sent with every assistant run.
pub const SYSTEM_INSTRUCTION: &str = r#"You are the OPSWAT Knowledge Assistant.

Non-negotiables:
1) Do NOT guess. If the knowledge base context does not explicitly contain the needed fact (exact path/endpoint/flag/value), say:
   "Not found in the provided knowledge base." Then ask for version/OS/product and suggest where to look in the product UI/docs.
2) Stay product-scoped. Only talk about the product(s) mentioned in the user's question (Core vs Kiosk vs ICAP vs Cloud, etc).
   If retrieved context mentions a different product, ignore it.
3) Output MUST be clean Markdown and structured:

## Answer
(1-2 sentences, direct)

## Steps / Example
- Use numbered steps or bullets.
- Put endpoints/paths/JSON/commands in code fences.

## Notes (optional)
- Version/OS-specific notes.

## Sources
- List doc names / sections used. If no sources were used, say so.

Intent handling:
- KNOWLEDGE: Provide a direct factual answer grounded in KB. Prefer exact strings for paths/endpoints/flags/ports.
- CODE: Provide a minimal working template/example immediately (with placeholders), THEN ask up to 2 clarifying questions.
- PRIVATE/SECURITY-BYPASS: Refuse briefly and offer safe alternatives (official docs/support/IT process).
- CONTEXT: Answer using only chat history; if insufficient, provide a generic example without inventing product facts.

Style:
- No repeating the user's question.
- No filler.
- Keep it clear and step-by-step.
"#;

const CODE_HINTS: &[&str] = &[
    "code",
    "snippet",
    "example",
    "sample",
    "implement",
    "implementation",
    "sdk",
    "curl",
    "http",
    "endpoint",
    "api",
    "json",
    "yaml",
    "values.yaml",
    "dockerfile",
    "python",
    "c#",
    "csharp",
    "java",
    "javascript",
    "node",
    "dotnet",
    "powershell",
];

const PRIVATE_HINTS: &[&str] = &[
    "bypass",
    "exploit",
    "crack",
    "pirate",
    "steal",
    "leak",
    "private key",
    "api key",
    "password",
    "credential",
    "disable security",
    "evade",
    "backdoor",
];

const CONTEXT_HINTS: &[&str] = &[
    "based on our chat",
    "as we discussed",
    "earlier you said",
    "in this conversation",
    "previous message",
    "last time",
];

const EXACT_FACT_HINTS: &[&str] = &[
    "exact",
    "full path",
    "path",
    "endpoint",
    "url",
    "health",
    "status api",
    "port",
    "flag",
    "parameter name",
    "config file location",
    "values.yaml",
];

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn contains_any(text: &str, hints: &[&str]) -> bool {
    hints.iter().any(|hint| text.contains(hint))
}

/// Coarse classification of a user message, used to pick the run
/// temperature and to add guardrail lines to the wrapped prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Knowledge,
    Code,
    Private,
    Context,
}

pub fn categorize_intent(message: &str, language_hint: Option<&str>) -> Intent {
    let text = normalize(message);

    if contains_any(&text, PRIVATE_HINTS) {
        return Intent::Private;
    }
    if contains_any(&text, CONTEXT_HINTS) {
        return Intent::Context;
    }
    if language_hint.is_some_and(|l| !l.trim().is_empty()) {
        return Intent::Code;
    }
    if contains_any(&text, CODE_HINTS) {
        return Intent::Code;
    }
    Intent::Knowledge
}

pub fn needs_exact_fact(message: &str) -> bool {
    contains_any(&normalize(message), EXACT_FACT_HINTS)
}

/// A product name plus the aliases that identify it in free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub aliases: Vec<String>,
}

/// Allow-listed product names with their detection aliases. Matching is
/// case-insensitive substring containment; the first alias hit settles a
/// product, the first product hit settles `mentions_any`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<ProductEntry>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        let entry = |name: &str, aliases: &[&str]| ProductEntry {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        };

        Self {
            products: vec![
                // Family entry so that a bare "MetaDefender" question is in
                // scope even before the caller names a specific product.
                entry("MetaDefender", &["metadefender"]),
                entry(
                    "MetaDefender Core",
                    &["metadefender core", "md core", "core"],
                ),
                entry("MetaDefender Kiosk", &["metadefender kiosk", "kiosk"]),
                entry("MetaDefender ICAP", &["metadefender icap", "icap"]),
                entry(
                    "MetaDefender Cloud",
                    &["metadefender cloud", "md cloud", "cloud"],
                ),
                entry(
                    "OESIS",
                    &[
                        "oesis",
                        "endpoint security",
                        "opswat endpoint",
                        "device security",
                    ],
                ),
            ],
        }
    }
}

impl ProductCatalog {
    /// Product names referenced by the text, in stable (sorted) order.
    pub fn detect(&self, text: &str) -> BTreeSet<String> {
        let text = normalize(text);
        self.products
            .iter()
            .filter(|entry| {
                entry
                    .aliases
                    .iter()
                    .any(|alias| text.contains(alias.to_lowercase().as_str()))
            })
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn mentions_any(&self, text: &str) -> bool {
        let text = normalize(text);
        self.products.iter().any(|entry| {
            entry
                .aliases
                .iter()
                .any(|alias| text.contains(alias.to_lowercase().as_str()))
        })
    }
}

/// Wrap the user message with scope, intent and format lines before it is
/// submitted to the assistant. Pure string assembly.
pub fn build_wrapped_user_message(request: &ChatRequest, catalog: &ProductCatalog) -> String {
    let mut scoped_products = catalog.detect(&request.message);
    if let Some(product) = request.product.as_deref() {
        let product = product.trim();
        if !product.is_empty() {
            scoped_products.insert(product.to_string());
        }
    }

    let scope_line = if scoped_products.is_empty() {
        String::new()
    } else {
        let names = scoped_products.iter().cloned().collect::<Vec<_>>();
        format!(
            "Scope: {}. Do not mention other OPSWAT products.",
            names.join(", ")
        )
    };

    let intent = categorize_intent(&request.message, request.language.as_deref());

    let exact_line = if needs_exact_fact(&request.message) {
        "This question requires exact values (endpoints/paths/flags/ports). \
         Do NOT invent. If not present in the KB context, reply with: \
         \"Not found in the provided knowledge base.\""
            .to_string()
    } else {
        String::new()
    };

    let code_line = if intent == Intent::Code {
        let mut hints = Vec::new();
        if let Some(product) = request.product.as_deref() {
            hints.push(format!("- Product: {product}"));
        }
        if let Some(language) = request.language.as_deref() {
            hints.push(format!("- Language: {language}"));
        }
        if let Some(task) = request.task.as_deref() {
            hints.push(format!("- Task: {task}"));
        }
        let hint_block = if hints.is_empty() {
            "- (no extra hints provided)".to_string()
        } else {
            hints.join("\n")
        };
        format!(
            "This is a CODE request.\n\
             Provide a minimal working template immediately (with placeholders), then ask at most 2 clarifying questions.\n\
             Known hints:\n{hint_block}"
        )
    } else {
        String::new()
    };

    let format_line = "Output format (strict):\n## Answer\n## Steps / Example\n## Notes (optional)\n## Sources\n";

    let parts = [
        "You are responding to an end-user question.".to_string(),
        scope_line,
        exact_line,
        code_line,
        format_line.to_string(),
        format!("User question:\n{}", request.message.trim()),
    ];

    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n\n")
}
