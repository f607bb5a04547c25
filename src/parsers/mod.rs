pub mod fields;
pub mod patterns;
pub mod schedule;
pub mod window;

use chrono::{DateTime, Local, Utc};

use crate::models::match_record::MatchRecord;

/// Run every field parser over one match window. Fields that fail to parse stay
/// None and are resolved against the cache during the merge.
pub fn parse_match(game_id: &str, window: &str, now: DateTime<Utc>) -> MatchRecord {
    let now_local: DateTime<Local> = now.with_timezone(&Local);
    let (home, away, home_logo, away_logo) = fields::parse_teams_and_logos(window);
    let (score_home, score_away) = fields::parse_scores(window);

    MatchRecord {
        game_id: game_id.to_string(),
        start: fields::parse_start(window, now_local),
        league: fields::parse_league(window),
        home,
        away,
        home_logo,
        away_logo,
        tv: fields::parse_tv(window),
        // not on the schedule page; back-filled from the detail page
        arena: None,
        score_home,
        score_away,
        info_url: fields::parse_info_url(game_id, window),
        tickets_url: fields::parse_tickets_url(window),
        is_live: fields::parse_live_flag(window),
    }
}
