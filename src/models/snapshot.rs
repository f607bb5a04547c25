use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::match_record::MatchRecord;

/// Parse-quality diagnostics for one schedule fetch. Mostly useful when the site
/// changes markup and matches stop appearing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleDebug {
    pub parse_mode: &'static str,
    pub links_found: usize,
    pub matches_found: usize,
    pub has_schedule_marker: bool,
    pub has_uuid: bool,
    pub html_head: String,
}

/// The derived view emitted by one update cycle. Recomputed every cycle, never
/// persisted on its own.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub team_path: String,
    pub source_url: String,
    pub fetched_at: DateTime<Utc>,
    pub live: Option<MatchRecord>,
    pub upcoming: Vec<MatchRecord>,
    pub finished: Vec<MatchRecord>,
    pub last_finished_with_score: Option<MatchRecord>,
    pub debug: ScheduleDebug,
}
