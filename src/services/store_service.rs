// services/store_service.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::match_record::MatchRecord;

pub const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = "matchtracker";
const STATE_FILE: &str = "state.json";

#[derive(Debug, Serialize)]
struct StoredState<'a> {
    version: u32,
    saved_at: String,
    games: &'a HashMap<String, MatchRecord>,
}

// Loaded leniently: whatever is wrong with the document must not take the
// process down, at worst we start with an empty cache.
#[derive(Debug, Deserialize, Default)]
struct RawStoredState {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    games: HashMap<String, serde_json::Value>,
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<HashMap<String, MatchRecord>>;
    async fn save(&self, now: DateTime<Utc>, games: &HashMap<String, MatchRecord>) -> Result<()>;
}

/// JSON file store, written atomically via a temp file swap.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Explicit override from config, otherwise the user cache directory.
pub fn resolve_state_path(config: &AppConfig) -> Option<PathBuf> {
    if let Some(path) = &config.state_path {
        return Some(PathBuf::from(path));
    }
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(STATE_DIR).join(STATE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(STATE_DIR)
            .join(STATE_FILE),
    )
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self) -> Result<HashMap<String, MatchRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(AppError::storage_load(e.to_string())),
        };

        let parsed: RawStoredState =
            serde_json::from_str(&raw).map_err(|e| AppError::storage_load(e.to_string()))?;
        if parsed.version != STATE_VERSION {
            warn!(
                "state file has version {}, expected {}; starting fresh",
                parsed.version, STATE_VERSION
            );
            return Ok(HashMap::new());
        }

        let mut games = HashMap::new();
        for (game_id, value) in parsed.games {
            match serde_json::from_value::<MatchRecord>(value) {
                Ok(record) => {
                    games.insert(game_id, record);
                }
                Err(e) => warn!("skipping malformed stored match {}: {}", game_id, e),
            }
        }
        Ok(games)
    }

    async fn save(&self, now: DateTime<Utc>, games: &HashMap<String, MatchRecord>) -> Result<()> {
        let doc = StoredState {
            version: STATE_VERSION,
            saved_at: now.to_rfc3339(),
            games,
        };
        let json = serde_json::to_string(&doc).map_err(|e| AppError::storage_save(e.to_string()))?;

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| AppError::storage_save(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| AppError::storage_save(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::storage_save(e.to_string()))?;
        Ok(())
    }
}
