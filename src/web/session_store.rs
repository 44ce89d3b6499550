// src/web/session_store.rs
//! Per-browser sessions, kept in memory until they sit idle past the TTL

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::controller::Session;

struct Entry {
    session: Session,
    last_access: Instant,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn evict_idle(sessions: &mut HashMap<Uuid, Entry>, ttl: Duration) {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_access.elapsed() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle sessions", evicted);
        }
    }

    /// Run `f` against the session, creating it on first use.
    ///
    /// The lock is released when `f` returns; never call the service inside `f`.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.sessions.lock().await;
        Self::evict_idle(&mut sessions, self.ttl);

        let entry = sessions.entry(id).or_insert_with(|| Entry {
            session: Session::default(),
            last_access: Instant::now(),
        });
        entry.last_access = Instant::now();
        f(&mut entry.session)
    }

    /// Run `f` against an existing live session, or a blank one that is not stored
    pub async fn view<R>(&self, id: Option<Uuid>, f: impl FnOnce(&Session) -> R) -> R {
        let mut sessions = self.sessions.lock().await;
        Self::evict_idle(&mut sessions, self.ttl);

        let entry = match id {
            Some(id) => sessions.get_mut(&id),
            None => None,
        };
        match entry {
            Some(entry) => {
                entry.last_access = Instant::now();
                f(&entry.session)
            }
            None => f(&Session::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
