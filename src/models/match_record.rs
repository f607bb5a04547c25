use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One match as reconstructed from the schedule page, keyed by the UUID the site
/// embeds in its schedule-item links. Everything except the id and the detail URL
/// is optional: the markup is unstable and individual fields routinely fail to
/// parse, in which case the previously cached value survives the merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    pub game_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_logo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_logo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arena: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_home: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_away: Option<u32>,

    pub info_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets_url: Option<String>,

    #[serde(default)]
    pub is_live: bool,
}

impl MatchRecord {
    pub fn new(game_id: impl Into<String>, info_url: impl Into<String>) -> Self {
        MatchRecord {
            game_id: game_id.into(),
            start: None,
            league: None,
            home: None,
            away: None,
            home_logo: None,
            away_logo: None,
            tv: None,
            arena: None,
            score_home: None,
            score_away: None,
            info_url: info_url.into(),
            tickets_url: None,
            is_live: false,
        }
    }

    pub fn has_full_score(&self) -> bool {
        self.score_home.is_some() && self.score_away.is_some()
    }

    /// Merge freshly parsed fields into this record. A parsed `Some` overwrites,
    /// a parsed `None` preserves the existing value. Scores and arena never fall
    /// back from known to unknown; a parsed score always wins so an in-progress
    /// match keeps updating. `is_live` is taken from the parse, so a stale live
    /// flag clears on the next schedule pass.
    pub fn merge_from(&mut self, parsed: &MatchRecord) {
        merge_field(&mut self.start, &parsed.start);
        merge_field(&mut self.league, &parsed.league);
        merge_field(&mut self.home, &parsed.home);
        merge_field(&mut self.away, &parsed.away);
        merge_field(&mut self.home_logo, &parsed.home_logo);
        merge_field(&mut self.away_logo, &parsed.away_logo);
        merge_field(&mut self.tv, &parsed.tv);

        // Arena is rarely present on the schedule page; once known, keep it.
        merge_field(&mut self.arena, &parsed.arena);

        if parsed.score_home.is_some() {
            self.score_home = parsed.score_home;
        }
        if parsed.score_away.is_some() {
            self.score_away = parsed.score_away;
        }

        if !parsed.info_url.is_empty() {
            self.info_url = parsed.info_url.clone();
        }
        merge_field(&mut self.tickets_url, &parsed.tickets_url);

        self.is_live = parsed.is_live;
    }
}

fn merge_field<T: Clone>(existing: &mut Option<T>, parsed: &Option<T>) {
    if parsed.is_some() {
        *existing = parsed.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(game_id: &str) -> MatchRecord {
        MatchRecord::new(game_id, format!("https://zalgiris.lt/schedule-item/{}", game_id))
    }

    #[test]
    fn merge_overwrites_with_parsed_values() {
        let mut existing = record("a");
        existing.home = Some("Žalgiris".to_string());

        let mut parsed = record("a");
        parsed.home = Some("Žalgiris Kaunas".to_string());
        parsed.away = Some("Rytas".to_string());

        existing.merge_from(&parsed);
        assert_eq!(existing.home.as_deref(), Some("Žalgiris Kaunas"));
        assert_eq!(existing.away.as_deref(), Some("Rytas"));
    }

    #[test]
    fn merge_preserves_existing_on_null_parse() {
        let mut existing = record("a");
        existing.tv = Some("TV3".to_string());
        existing.start = Utc.with_ymd_and_hms(2025, 10, 4, 18, 0, 0).single();

        let parsed = record("a");
        existing.merge_from(&parsed);

        assert_eq!(existing.tv.as_deref(), Some("TV3"));
        assert!(existing.start.is_some());
    }

    #[test]
    fn scores_never_revert_to_unknown() {
        let mut existing = record("a");
        existing.score_home = Some(87);
        existing.score_away = Some(80);

        let parsed = record("a");
        existing.merge_from(&parsed);
        assert_eq!(existing.score_home, Some(87));
        assert_eq!(existing.score_away, Some(80));
    }

    #[test]
    fn parsed_scores_always_refresh() {
        let mut existing = record("a");
        existing.score_home = Some(40);
        existing.score_away = Some(38);

        let mut parsed = record("a");
        parsed.score_home = Some(55);
        parsed.score_away = Some(51);

        existing.merge_from(&parsed);
        assert_eq!(existing.score_home, Some(55));
        assert_eq!(existing.score_away, Some(51));
    }

    #[test]
    fn arena_survives_null_parse() {
        let mut existing = record("a");
        existing.arena = Some("Žalgirio arena".to_string());

        let parsed = record("a");
        existing.merge_from(&parsed);
        assert_eq!(existing.arena.as_deref(), Some("Žalgirio arena"));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut once = record("a");
        once.score_home = Some(70);

        let mut parsed = record("a");
        parsed.home = Some("Žalgiris".to_string());
        parsed.score_away = Some(66);

        let mut twice = once.clone();
        once.merge_from(&parsed);
        twice.merge_from(&parsed);
        twice.merge_from(&parsed);
        assert_eq!(once, twice);
    }

    #[test]
    fn record_round_trips_through_json() {
        let mut original = record("5f0f8c5e-1b2a-4c3d-9e8f-aabbccddeeff");
        original.start = Utc.with_ymd_and_hms(2026, 1, 30, 19, 30, 0).single();
        original.league = Some("Eurolyga".to_string());
        original.home = Some("Žalgiris".to_string());
        original.away = Some("Barcelona".to_string());
        original.score_home = Some(82);
        original.score_away = Some(79);
        original.tickets_url = Some("https://zalgiris.koobin.com/index.php?x=1".to_string());
        original.is_live = true;

        let json = serde_json::to_string(&original).unwrap();
        let restored: MatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
