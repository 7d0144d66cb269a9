//! Concurrent connection-id → session-token map
//!
//! Read once per outgoing request, written once per successful response that
//! carries a session header. Entries live as long as the store; there is no
//! expiry.

use std::sync::Arc;

use dashmap::DashMap;
use querylink_domain::{ConnectionId, SessionToken};
use tracing::trace;

/// Shared, injectable session-affinity store.
///
/// Cloning is cheap and every clone sees the same entries. At most one token
/// is held per connection; the last writer wins.
#[derive(Debug, Clone, Default)]
pub struct SessionAffinityStore {
    entries: Arc<DashMap<ConnectionId, SessionToken>>,
}

impl SessionAffinityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session token last recorded for `connection_id`.
    #[must_use]
    pub fn get(&self, connection_id: &ConnectionId) -> Option<SessionToken> {
        self.entries.get(connection_id).map(|entry| entry.value().clone())
    }

    /// Record `session_token` for `connection_id`, returning the token it
    /// replaced.
    pub fn put(
        &self,
        connection_id: ConnectionId,
        session_token: SessionToken,
    ) -> Option<SessionToken> {
        trace!(connection_id = %connection_id, "Recording session affinity");
        self.entries.insert(connection_id, session_token)
    }

    /// Forget the entry for `connection_id`.
    pub fn remove(&self, connection_id: &ConnectionId) -> Option<SessionToken> {
        self.entries.remove(connection_id).map(|(_, token)| token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn unknown_connection_has_no_token() {
        let store = SessionAffinityStore::new();
        assert_eq!(store.get(&ConnectionId::from("c-1")), None);
        assert!(store.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let store = SessionAffinityStore::new();
        let conn = ConnectionId::from("c-1");

        assert_eq!(store.put(conn.clone(), SessionToken::from("s-1")), None);
        let replaced = store.put(conn.clone(), SessionToken::from("s-2"));
        assert_eq!(replaced, Some(SessionToken::from("s-1")));

        assert_eq!(store.get(&conn), Some(SessionToken::from("s-2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let store = SessionAffinityStore::new();
        let view = store.clone();

        store.put(ConnectionId::from("c-1"), SessionToken::from("s-1"));

        assert_eq!(view.get(&ConnectionId::from("c-1")), Some(SessionToken::from("s-1")));
        view.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn remove_drops_entry() {
        let store = SessionAffinityStore::new();
        let conn = ConnectionId::from("c-1");
        store.put(conn.clone(), SessionToken::from("s-1"));

        assert_eq!(store.remove(&conn), Some(SessionToken::from("s-1")));
        assert_eq!(store.get(&conn), None);
    }

    #[test]
    fn concurrent_writers_on_distinct_connections_do_not_lose_updates() {
        let store = SessionAffinityStore::new();

        let handles: Vec<_> = (0..16)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || {
                    for round in 0..100 {
                        let conn = ConnectionId::new(format!("conn-{worker}"));
                        store.put(conn, SessionToken::new(format!("session-{worker}-{round}")));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 16);
        for worker in 0..16 {
            let token = store.get(&ConnectionId::new(format!("conn-{worker}"))).unwrap();
            assert_eq!(token.as_str(), format!("session-{worker}-99"));
        }
    }
}
