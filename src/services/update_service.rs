// services/update_service.rs
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::match_record::MatchRecord;
use crate::models::snapshot::{ScheduleDebug, Snapshot};
use crate::parsers::{self, schedule, window};
use crate::services::fetch_service::FetchService;
use crate::services::store_service::StateStore;
use crate::state::{Classification, MatchCache};

// Detail pages keep everything of interest near the top.
const DETAIL_WINDOW_SIZE: usize = 12_000;

// A finished match only warrants a detail fetch while its result may still
// show up; the pool and cap bound the fan-out per cycle regardless of cache
// size.
const DETAIL_RECENT_HOURS: i64 = 24;
const FINISHED_DETAIL_POOL: usize = 3;
const MAX_DETAIL_TARGETS: usize = 2;

/// Runs one full update cycle: schedule fetch, per-match parse and merge,
/// classification, optional detail fetches, persistence, snapshot.
pub struct UpdateService {
    fetch: FetchService,
    store: Box<dyn StateStore>,
    cache: MatchCache,
}

impl UpdateService {
    pub fn new(store: Box<dyn StateStore>) -> Self {
        UpdateService {
            fetch: FetchService::new(),
            store,
            cache: MatchCache::new(),
        }
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// Populate the cache from storage. Any load failure means an empty cache,
    /// never a startup abort.
    pub async fn load_state(&mut self) {
        match self.store.load().await {
            Ok(games) => {
                info!("loaded {} cached matches from storage", games.len());
                self.cache = MatchCache::from_games(games);
            }
            Err(e) => {
                warn!("state load failed, starting with an empty cache: {}", e);
                self.cache = MatchCache::new();
            }
        }
    }

    /// One update cycle. Only the schedule fetch itself can fail the cycle;
    /// detail fetches and persistence degrade to log lines.
    pub async fn run_cycle(&mut self, config: &AppConfig) -> Result<Snapshot> {
        let now = Utc::now();
        let schedule_url = config.schedule_url();

        let html = self.fetch.fetch_text(&schedule_url).await?;
        let sched_debug = ingest_schedule(&mut self.cache, &html, now);
        debug!(
            matches = sched_debug.matches_found,
            cached = self.cache.len(),
            "schedule parsed"
        );

        let classified = self.cache.classify(now);
        let targets = select_detail_targets(&classified, now);
        if !targets.is_empty() {
            self.fetch_details(&targets, now).await;
        }

        let classified = self.cache.classify(now);
        let snapshot = build_snapshot(config, &schedule_url, now, classified, sched_debug);

        let removed = self.cache.prune(now, config.retention_days);
        if removed > 0 {
            debug!("pruned {} aged-out matches", removed);
        }
        if let Err(e) = self.store.save(now, self.cache.games()).await {
            warn!("state save failed: {}", e);
        }

        Ok(snapshot)
    }

    /// Fetch and merge the detail pages for the selected matches concurrently.
    /// Failures are isolated per match; one bad page never cancels the rest.
    async fn fetch_details(&mut self, targets: &[MatchRecord], now: DateTime<Utc>) {
        let fetch = &self.fetch;
        let tasks: Vec<_> = targets
            .iter()
            .map(|target| {
                let url = target.info_url.clone();
                let game_id = target.game_id.clone();
                async move {
                    let html = fetch.fetch_text(&url).await?;
                    let detail = window::head(&html, DETAIL_WINDOW_SIZE);
                    Ok::<MatchRecord, AppError>(parsers::parse_match(&game_id, detail, now))
                }
            })
            .collect();

        let results = join_all(tasks).await;
        for (target, result) in targets.iter().zip(results) {
            match result {
                Ok(parsed) => self.cache.merge_detail(parsed),
                Err(e) => debug!(game_id = %target.game_id, "detail fetch failed: {}", e),
            }
        }
    }
}

/// Parse every match on the schedule page into the cache.
pub fn ingest_schedule(cache: &mut MatchCache, html: &str, now: DateTime<Utc>) -> ScheduleDebug {
    let (game_ids, debug) = schedule::parse_schedule(html);
    for game_id in &game_ids {
        let match_window = window::extract_window(html, game_id);
        let parsed = parsers::parse_match(game_id, match_window, now);
        cache.merge(parsed);
    }
    debug
}

/// A live match is always worth a closer look, and it alone. Otherwise pick
/// recently finished matches whose result has not shown up yet.
pub fn select_detail_targets(classified: &Classification, now: DateTime<Utc>) -> Vec<MatchRecord> {
    if let Some(live) = &classified.live {
        return vec![live.clone()];
    }

    classified
        .finished
        .iter()
        .take(FINISHED_DETAIL_POOL)
        .filter(|g| {
            g.start
                .map_or(false, |s| s > now - Duration::hours(DETAIL_RECENT_HOURS))
        })
        .filter(|g| !g.has_full_score())
        .take(MAX_DETAIL_TARGETS)
        .cloned()
        .collect()
}

pub fn build_snapshot(
    config: &AppConfig,
    source_url: &str,
    fetched_at: DateTime<Utc>,
    classified: Classification,
    debug: ScheduleDebug,
) -> Snapshot {
    let last_finished_with_score = classified.last_finished_with_score().cloned();
    Snapshot {
        team_path: config.team_path.clone(),
        source_url: source_url.to_string(),
        fetched_at,
        live: classified.live,
        upcoming: classified.upcoming,
        finished: classified.finished,
        last_finished_with_score,
        debug,
    }
}

/// The poll cadence for the next cycle: tight while a match is live, back to
/// normal as soon as none is.
pub fn next_interval(config: &AppConfig, snapshot: &Snapshot) -> std::time::Duration {
    if snapshot.live.is_some() {
        std::time::Duration::from_secs(config.live_poll_interval_secs)
    } else {
        std::time::Duration::from_secs(config.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(game_id: &str, start: Option<DateTime<Utc>>) -> MatchRecord {
        let mut r = MatchRecord::new(
            game_id,
            format!("https://zalgiris.lt/schedule-item/{}", game_id),
        );
        r.start = start;
        r
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn live_match_is_the_only_detail_target() {
        let mut live = record("live", Some(now() - Duration::hours(1)));
        live.is_live = true;
        let classified = Classification {
            live: Some(live),
            upcoming: vec![],
            finished: vec![record("unscored", Some(now() - Duration::hours(2)))],
        };

        let targets = select_detail_targets(&classified, now());
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].game_id, "live");
    }

    #[test]
    fn recent_unscored_finished_matches_capped_at_two() {
        let mut scored = record("scored", Some(now() - Duration::hours(3)));
        scored.score_home = Some(88);
        scored.score_away = Some(80);

        let classified = Classification {
            live: None,
            upcoming: vec![],
            finished: vec![
                record("a", Some(now() - Duration::hours(2))),
                scored,
                record("b", Some(now() - Duration::hours(5))),
                // fourth recent-unscored entry is outside the pool
                record("c", Some(now() - Duration::hours(6))),
            ],
        };

        let targets = select_detail_targets(&classified, now());
        let ids: Vec<_> = targets.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn old_unscored_matches_are_not_targeted() {
        let classified = Classification {
            live: None,
            upcoming: vec![],
            finished: vec![record("old", Some(now() - Duration::hours(30)))],
        };
        assert!(select_detail_targets(&classified, now()).is_empty());
    }

    #[test]
    fn interval_tightens_while_live() {
        let config = AppConfig {
            team_path: "/schedule".to_string(),
            poll_interval_secs: 600,
            live_poll_interval_secs: 20,
            retention_days: 60,
            state_path: None,
        };
        let debug = ScheduleDebug {
            parse_mode: "href",
            links_found: 0,
            matches_found: 0,
            has_schedule_marker: false,
            has_uuid: false,
            html_head: String::new(),
        };

        let classified = Classification::default();
        let snapshot = build_snapshot(&config, "https://zalgiris.lt/schedule", now(), classified, debug.clone());
        assert_eq!(next_interval(&config, &snapshot), std::time::Duration::from_secs(600));

        let mut live = record("live", Some(now()));
        live.is_live = true;
        let classified = Classification {
            live: Some(live),
            upcoming: vec![],
            finished: vec![],
        };
        let snapshot = build_snapshot(&config, "https://zalgiris.lt/schedule", now(), classified, debug);
        assert_eq!(next_interval(&config, &snapshot), std::time::Duration::from_secs(20));
    }
}
