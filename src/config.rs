use std::{
    env,
    fmt::Display,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub session_idle: Duration,
    pub max_sessions: usize,
}

// A week; anything longer is treated as a typo.
const MAX_IDLE_MINUTES: u64 = 7 * 24 * 60;

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            session_idle: Duration::from_secs(24 * 60),
            max_sessions: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let default_idle = defaults.session_idle.as_secs() / 60;
        let mut idle_minutes = try_load(&lookup, "SESSION_IDLE_MINUTES", default_idle);
        if idle_minutes > MAX_IDLE_MINUTES {
            warn!(
                "SESSION_IDLE_MINUTES {idle_minutes} exceeds {MAX_IDLE_MINUTES}, using default: {default_idle}"
            );
            idle_minutes = default_idle;
        }

        let config = Self {
            bind_addr: try_load(&lookup, "BIND_ADDR", defaults.bind_addr),
            port: try_load(&lookup, "PORT", defaults.port),
            session_idle: Duration::from_secs(idle_minutes.max(1) * 60),
            max_sessions: try_load(&lookup, "MAX_SESSIONS", defaults.max_sessions).max(1),
        };
        info!(
            bind = %config.bind_addr,
            port = config.port,
            session_idle_minutes = config.session_idle.as_secs() / 60,
            max_sessions = config.max_sessions,
            "configuration loaded"
        );
        config
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("invalid {key} value {raw:?} ({err}), using default: {default}");
            default
        }),
        None => default,
    }
}
