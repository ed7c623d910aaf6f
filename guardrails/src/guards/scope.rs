use assistant_core::prompt::ProductCatalog;

/// A reply is in scope when it, or the question that produced it,
/// references an allow-listed product. Matching is case-insensitive
/// substring containment; the first hit settles the answer.
pub fn reply_in_scope(catalog: &ProductCatalog, question: &str, reply: &str) -> bool {
    catalog.mentions_any(reply) || catalog.mentions_any(question)
}
