// src/state.rs
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::match_record::MatchRecord;

// A finished match without a score stays visible this long so a just-ended game
// does not vanish before the site publishes the result.
const FINISHED_GRACE_HOURS: i64 = 6;

/// Everything we currently know about every match, keyed by game id. Owned by
/// the update cycle; mutated only through merge and prune.
#[derive(Debug, Default)]
pub struct MatchCache {
    games: HashMap<String, MatchRecord>,
}

/// Time buckets for one instant. `live` wins over the time-based buckets.
#[derive(Debug, Default)]
pub struct Classification {
    pub live: Option<MatchRecord>,
    pub upcoming: Vec<MatchRecord>,
    pub finished: Vec<MatchRecord>,
}

impl Classification {
    pub fn last_finished_with_score(&self) -> Option<&MatchRecord> {
        self.finished.iter().find(|g| g.has_full_score())
    }
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_games(games: HashMap<String, MatchRecord>) -> Self {
        MatchCache { games }
    }

    pub fn games(&self) -> &HashMap<String, MatchRecord> {
        &self.games
    }

    pub fn get(&self, game_id: &str) -> Option<&MatchRecord> {
        self.games.get(game_id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Merge one parsed record into the cache, field-preservation rules applied.
    pub fn merge(&mut self, parsed: MatchRecord) {
        match self.games.get_mut(&parsed.game_id) {
            Some(existing) => existing.merge_from(&parsed),
            None => {
                self.games.insert(parsed.game_id.clone(), parsed);
            }
        }
    }

    /// Merge a detail-page parse. Same rules as the schedule merge, except a
    /// detail page may raise the live flag but never clear one the schedule set.
    pub fn merge_detail(&mut self, mut parsed: MatchRecord) {
        if let Some(existing) = self.games.get(&parsed.game_id) {
            parsed.is_live = parsed.is_live || existing.is_live;
        }
        self.merge(parsed);
    }

    /// Drop records older than the retention horizon. A record whose start never
    /// parsed cannot be judged stale and is kept.
    pub fn prune(&mut self, now: DateTime<Utc>, retention_days: i64) -> usize {
        let cutoff = now - Duration::days(retention_days);
        let before = self.games.len();
        self.games.retain(|_, g| match g.start {
            Some(start) => start >= cutoff,
            None => true,
        });
        before - self.games.len()
    }

    /// Bucket every record with a known start. Unstarted-in-the-future records
    /// go to `upcoming` (soonest first); past records stay in `finished` (most
    /// recent first) while they carry a score or only just ended. Records with
    /// no parsed start cannot be placed anywhere.
    pub fn classify(&self, now: DateTime<Utc>) -> Classification {
        let mut live: Option<MatchRecord> = None;
        let mut upcoming: Vec<MatchRecord> = Vec::new();
        let mut finished: Vec<MatchRecord> = Vec::new();

        for g in self.games.values() {
            let Some(start) = g.start else { continue };

            if g.is_live {
                // at most one is expected; keep the most recently started
                if live.as_ref().map_or(true, |l| l.start < g.start) {
                    live = Some(g.clone());
                }
                continue;
            }

            if start > now {
                upcoming.push(g.clone());
            } else if g.has_full_score() || start > now - Duration::hours(FINISHED_GRACE_HOURS) {
                finished.push(g.clone());
            }
        }

        upcoming.sort_by_key(|g| g.start);
        finished.sort_by_key(|g| std::cmp::Reverse(g.start));
        Classification {
            live,
            upcoming,
            finished,
        }
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
    fn merge_creates_then_updates() {
        let mut cache = MatchCache::new();
        let mut first = record("a", Some(now()));
        first.score_home = Some(80);
        first.score_away = Some(75);
        cache.merge(first);
        assert_eq!(cache.len(), 1);

        // second sighting with no score must not clobber the known one
        cache.merge(record("a", Some(now())));
        let merged = cache.get("a").unwrap();
        assert_eq!(merged.score_home, Some(80));
        assert_eq!(merged.score_away, Some(75));
    }

    #[test]
    fn detail_merge_keeps_live_flag_raised() {
        let mut cache = MatchCache::new();
        let mut live = record("a", Some(now()));
        live.is_live = true;
        cache.merge(live);

        // detail page without a live badge must not clear the flag
        cache.merge_detail(record("a", Some(now())));
        assert!(cache.get("a").unwrap().is_live);

        // the schedule pass, however, may clear it
        cache.merge(record("a", Some(now())));
        assert!(!cache.get("a").unwrap().is_live);
    }

    #[test]
    fn prune_boundary_is_strict() {
        let retention = 60;
        let cutoff = now() - Duration::days(retention);

        let mut cache = MatchCache::new();
        cache.merge(record("exactly", Some(cutoff)));
        cache.merge(record("just-inside", Some(cutoff + Duration::seconds(5))));
        cache.merge(record("just-outside", Some(cutoff - Duration::seconds(5))));
        cache.merge(record("undated", None));

        let removed = cache.prune(now(), retention);
        assert_eq!(removed, 1);
        assert!(cache.get("exactly").is_some());
        assert!(cache.get("just-inside").is_some());
        assert!(cache.get("just-outside").is_none());
        assert!(cache.get("undated").is_some());
    }

    #[test]
    fn classify_buckets_by_time_and_score() {
        let mut cache = MatchCache::new();
        cache.merge(record("soon", Some(now() + Duration::hours(2))));
        cache.merge(record("later", Some(now() + Duration::days(3))));

        let mut scored = record("scored", Some(now() - Duration::days(2)));
        scored.score_home = Some(90);
        scored.score_away = Some(84);
        cache.merge(scored);

        // ended an hour ago, no score yet: still shown
        cache.merge(record("just-ended", Some(now() - Duration::hours(1))));
        // eight hours old without a score: in limbo, shown nowhere
        cache.merge(record("stale", Some(now() - Duration::hours(8))));
        // never parsed a start: shown nowhere
        cache.merge(record("undated", None));

        let classified = cache.classify(now());
        let upcoming: Vec<_> = classified.upcoming.iter().map(|g| g.game_id.as_str()).collect();
        let finished: Vec<_> = classified.finished.iter().map(|g| g.game_id.as_str()).collect();

        assert_eq!(upcoming, vec!["soon", "later"]);
        assert_eq!(finished, vec!["just-ended", "scored"]);
        assert!(classified.live.is_none());
    }

    #[test]
    fn live_record_is_pulled_out_of_the_time_buckets() {
        let mut cache = MatchCache::new();
        let mut live = record("live", Some(now() - Duration::hours(1)));
        live.is_live = true;
        cache.merge(live);
        cache.merge(record("soon", Some(now() + Duration::hours(2))));

        let classified = cache.classify(now());
        assert_eq!(classified.live.as_ref().map(|g| g.game_id.as_str()), Some("live"));
        assert!(classified.finished.is_empty());
        assert_eq!(classified.upcoming.len(), 1);
    }

    #[test]
    fn last_finished_with_score_skips_unscored() {
        let mut cache = MatchCache::new();
        cache.merge(record("just-ended", Some(now() - Duration::hours(1))));
        let mut scored = record("scored", Some(now() - Duration::days(1)));
        scored.score_home = Some(77);
        scored.score_away = Some(70);
        cache.merge(scored);

        let classified = cache.classify(now());
        assert_eq!(
            classified.last_finished_with_score().map(|g| g.game_id.as_str()),
            Some("scored")
        );
    }
}
