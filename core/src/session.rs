use dashmap::DashMap;
use uuid::Uuid;

/// Mapping from local session ids to provider thread ids. Injected into the
/// assistant service so the backing can be swapped (in-memory for tests and
/// single-node deployments, an external key-value store elsewhere).
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Provider thread id for a known session, `None` otherwise.
    async fn resolve(&self, session_id: &str) -> Option<String>;

    async fn insert(&self, session_id: String, thread_id: String);

    /// Drop the local mapping. Returns whether the session was known.
    /// Provider-side data is left untouched.
    async fn remove(&self, session_id: &str) -> bool;
}

pub fn mint_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, String>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn resolve(&self, session_id: &str) -> Option<String> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
    }

    async fn insert(&self, session_id: String, thread_id: String) {
        self.sessions.insert(session_id, thread_id);
    }

    async fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_resolve() {
        let store = InMemorySessionStore::new();
        store
            .insert("session-1".to_string(), "thread_abc".to_string())
            .await;

        assert_eq!(
            store.resolve("session-1").await.as_deref(),
            Some("thread_abc")
        );
        assert_eq!(store.resolve("session-2").await, None);
    }

    #[tokio::test]
    async fn remove_reports_whether_session_was_known() {
        let store = InMemorySessionStore::new();
        store
            .insert("session-1".to_string(), "thread_abc".to_string())
            .await;

        assert!(store.remove("session-1").await);
        assert!(!store.remove("session-1").await);
        assert_eq!(store.resolve("session-1").await, None);
    }

    #[test]
    fn minted_ids_are_unique() {
        assert_ne!(mint_session_id(), mint_session_id());
    }
}
