// src/parsers/schedule.rs
use uuid::Uuid;

use crate::models::snapshot::ScheduleDebug;
use crate::parsers::patterns::SCHEDULE_ITEM_RE;

/// All match ids on the schedule page in first-seen order, plus parse-quality
/// diagnostics. Ids are kept exactly as printed so later window lookups can
/// find them again.
pub fn parse_schedule(html: &str) -> (Vec<String>, ScheduleDebug) {
    let mut links_found = 0;
    let mut game_ids: Vec<String> = Vec::new();
    for caps in SCHEDULE_ITEM_RE.captures_iter(html) {
        links_found += 1;
        let gid = caps[1].to_string();
        if Uuid::parse_str(&gid).is_err() {
            continue;
        }
        if !game_ids.contains(&gid) {
            game_ids.push(gid);
        }
    }

    let debug = ScheduleDebug {
        parse_mode: "href",
        links_found,
        matches_found: game_ids.len(),
        has_schedule_marker: html.contains("/schedule-item"),
        has_uuid: !game_ids.is_empty(),
        html_head: html.chars().take(160).collect::<String>().replace('\n', " "),
    };
    (game_ids, debug)
}
