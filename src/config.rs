// config.rs
use std::env;

pub const BASE_URL: &str = "https://zalgiris.lt";

pub const DEFAULT_TEAM_PATH: &str = "/schedule";
pub const DEFAULT_POLL_INTERVAL: u64 = 600; // seconds (10 min)
pub const DEFAULT_LIVE_POLL_INTERVAL: u64 = 20; // seconds
pub const DEFAULT_RETENTION_DAYS: i64 = 60;

pub const POLL_INTERVAL_BOUNDS: (u64, u64) = (60, 3600);
pub const LIVE_POLL_INTERVAL_BOUNDS: (u64, u64) = (5, 120);
pub const RETENTION_DAYS_BOUNDS: (i64, i64) = (1, 365);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub team_path: String,
    pub poll_interval_secs: u64,
    pub live_poll_interval_secs: u64,
    pub retention_days: i64,
    pub state_path: Option<String>,
}

impl AppConfig {
    /// Read configuration from the environment. Options can change between poll
    /// cycles, so this is re-read at the start of every iteration.
    pub fn from_env() -> Self {
        let team_path = env::var("MATCHTRACKER_TEAM_PATH")
            .unwrap_or_else(|_| DEFAULT_TEAM_PATH.to_string());

        let poll_interval_secs = parse_env_u64("MATCHTRACKER_POLL_INTERVAL", DEFAULT_POLL_INTERVAL);
        let live_poll_interval_secs =
            parse_env_u64("MATCHTRACKER_LIVE_POLL_INTERVAL", DEFAULT_LIVE_POLL_INTERVAL);
        let retention_days = env::var("MATCHTRACKER_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_RETENTION_DAYS);

        AppConfig {
            team_path: normalize_team_path(&team_path),
            poll_interval_secs: poll_interval_secs
                .clamp(POLL_INTERVAL_BOUNDS.0, POLL_INTERVAL_BOUNDS.1),
            live_poll_interval_secs: live_poll_interval_secs
                .clamp(LIVE_POLL_INTERVAL_BOUNDS.0, LIVE_POLL_INTERVAL_BOUNDS.1),
            retention_days: retention_days.clamp(RETENTION_DAYS_BOUNDS.0, RETENTION_DAYS_BOUNDS.1),
            state_path: env::var("MATCHTRACKER_STATE_PATH").ok(),
        }
    }

    pub fn schedule_url(&self) -> String {
        format!("{}{}", BASE_URL, self.team_path)
    }
}

fn parse_env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn normalize_team_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return DEFAULT_TEAM_PATH.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_path_gets_leading_slash() {
        assert_eq!(normalize_team_path("schedule"), "/schedule");
        assert_eq!(normalize_team_path("/schedule"), "/schedule");
        assert_eq!(normalize_team_path("  "), DEFAULT_TEAM_PATH);
    }

    #[test]
    fn schedule_url_joins_base_and_path() {
        let config = AppConfig {
            team_path: "/schedule".to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL,
            live_poll_interval_secs: DEFAULT_LIVE_POLL_INTERVAL,
            retention_days: DEFAULT_RETENTION_DAYS,
            state_path: None,
        };
        assert_eq!(config.schedule_url(), "https://zalgiris.lt/schedule");
    }
}
