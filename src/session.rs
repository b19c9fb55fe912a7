use crate::gateway::SessionStore;
use crate::models::{Notice, ReminderRecord};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "reminder_sid";

#[derive(Debug, Default)]
pub struct SessionData {
    reminders: Vec<ReminderRecord>,
    flash: Option<Notice>,
}

impl SessionData {
    pub fn set_flash(&mut self, notice: Notice) {
        self.flash = Some(notice);
    }

    pub fn take_flash(&mut self) -> Option<Notice> {
        self.flash.take()
    }
}

impl SessionStore for SessionData {
    fn reminders(&self) -> &[ReminderRecord] {
        &self.reminders
    }

    fn set_reminders(&mut self, reminders: Vec<ReminderRecord>) {
        self.reminders = reminders;
    }
}

#[derive(Debug)]
struct SessionEntry {
    data: SessionData,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, SessionEntry>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Like [`SessionRegistry::open`] but never creates a session.
    pub fn get(&mut self, id: Option<Uuid>, now: Instant) -> Option<&mut SessionData> {
        self.prune(now);
        let entry = self.sessions.get_mut(&id?)?;
        entry.last_seen = now;
        Some(&mut entry.data)
    }

    /// Returns the live session for `id`, starting a fresh one when the id is
    /// absent, unknown or has been idle past the TTL.
    pub fn open(&mut self, id: Option<Uuid>, now: Instant) -> (Uuid, &mut SessionData) {
        self.prune(now);

        let id = match id {
            Some(id) if self.sessions.contains_key(&id) => id,
            _ => {
                if self.sessions.len() >= self.max_sessions {
                    self.evict_oldest();
                }
                let id = Uuid::new_v4();
                debug!(session = %id, "starting session");
                id
            }
        };

        let entry = self.sessions.entry(id).or_insert_with(|| SessionEntry {
            data: SessionData::default(),
            last_seen: now,
        });
        entry.last_seen = now;
        (id, &mut entry.data)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, entry)| entry.last_seen)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            self.sessions.remove(&id);
            warn!(session = %id, "session limit reached, evicted least recently used");
        }
    }

    fn prune(&mut self, now: Instant) {
        let ttl = self.idle_ttl;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) < ttl);
        let dropped = before - self.sessions.len();
        if dropped > 0 {
            debug!(dropped, "expired idle sessions");
        }
    }
}

pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

// No expiry: the browser drops it when the session ends.
pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
