use crate::models::ReminderRecord;
use crate::storage::{decode_reminders, encode_reminders};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

pub const REMINDERS_COOKIE: &str = "reminders";
pub const COOKIE_LIFETIME_DAYS: i64 = 30;

/// Browsers commonly drop cookies above this size.
const MAX_COOKIE_BYTES: usize = 4096;

pub trait SessionStore {
    fn reminders(&self) -> &[ReminderRecord];
    fn set_reminders(&mut self, reminders: Vec<ReminderRecord>);
}

pub trait CookieStore {
    /// `None` when the client sent no reminders cookie.
    fn read(&self) -> Option<Vec<ReminderRecord>>;
    fn write(&mut self, reminders: &[ReminderRecord]) -> Result<(), serde_json::Error>;
    fn expire(&mut self);

    fn has_reminders(&self) -> bool {
        self.read().is_some_and(|reminders| !reminders.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct JarCookies {
    jar: CookieJar,
}

impl JarCookies {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl CookieStore for JarCookies {
    fn read(&self) -> Option<Vec<ReminderRecord>> {
        self.jar
            .get(REMINDERS_COOKIE)
            .filter(|cookie| !cookie.value().is_empty())
            .map(|cookie| decode_reminders(cookie.value()))
    }

    fn write(&mut self, reminders: &[ReminderRecord]) -> Result<(), serde_json::Error> {
        let value = encode_reminders(reminders)?;
        if value.len() > MAX_COOKIE_BYTES {
            warn!(
                bytes = value.len(),
                count = reminders.len(),
                "reminders cookie exceeds common browser limit"
            );
        }

        let lifetime = Duration::days(COOKIE_LIFETIME_DAYS);
        let cookie = Cookie::build((REMINDERS_COOKIE, value))
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(lifetime)
            .expires(OffsetDateTime::now_utc() + lifetime);
        self.jar = self.jar.clone().add(cookie);
        debug!(count = reminders.len(), "reminders cookie written");
        Ok(())
    }

    fn expire(&mut self) {
        let mut cookie = Cookie::build((REMINDERS_COOKIE, "")).path("/").build();
        cookie.make_removal();
        self.jar = self.jar.clone().add(cookie);
        debug!("reminders cookie expired");
    }
}
