// src/parsers/fields.rs
//
// One parser per semantic field. Every parser takes a match window, tries its
// pattern strategies in order and returns None when nothing structurally valid
// matches; malformed markup degrades the field, never the cycle.
use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, TimeZone, Utc};
use regex::Regex;

use crate::config::BASE_URL;
use crate::parsers::patterns::{
    detail_href_patterns, ALT_ESC_RE, ALT_HTML_RE, IMG_ALT_SRC_RE, IMG_ESC_RE, IMG_SRC_ALT_RE,
    KNOWN_LEAGUES, LEAGUE_FALLBACK_RE, LIVE_MARKERS, PLACEHOLDER_TEAM_ALTS, SCORE_ESC_RE,
    SCORE_RE, START_BARE_RE, START_RE, TICKETS_RE, TV_ESC_RE, TV_HTML_RE,
};

/// Unescape the HTML entities the site uses inside attribute values.
pub fn unescape(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
}

fn first_capture(patterns: &[&Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| unescape(m.as_str().trim()))
    })
}

/// Resolve a month/day/hour/minute token into a full local timestamp. The page
/// never prints a year, and the season crosses the calendar boundary: a date
/// more than 180 days in the past belongs to next year, a date more than 330
/// days ahead with a month before the current one belongs to last year.
pub fn guess_start(
    now: DateTime<Local>,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Local>> {
    let mut dt = local_datetime(now.year(), month, day, hour, minute)?;
    if dt < now - Duration::days(180) {
        dt = local_datetime(now.year() + 1, month, day, hour, minute)?;
    }
    if dt > now + Duration::days(330) && month < now.month() {
        dt = local_datetime(now.year() - 1, month, day, hour, minute)?;
    }
    Some(dt)
}

fn local_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Local>> {
    match Local.with_ymd_and_hms(year, month, day, hour, minute, 0) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

pub fn parse_start(window: &str, now: DateTime<Local>) -> Option<DateTime<Utc>> {
    let caps = START_RE
        .captures(window)
        .map(|c| (c[2].to_string(), c[3].to_string(), c[4].to_string(), c[5].to_string()))
        .or_else(|| {
            START_BARE_RE
                .captures(window)
                .map(|c| (c[1].to_string(), c[2].to_string(), c[3].to_string(), c[4].to_string()))
        })?;

    let month: u32 = caps.0.parse().ok()?;
    let day: u32 = caps.1.parse().ok()?;
    let hour: u32 = caps.2.parse().ok()?;
    let minute: u32 = caps.3.parse().ok()?;

    guess_start(now, month, day, hour, minute).map(|dt| dt.with_timezone(&Utc))
}

/// Team names come from img alt attributes in document order; logos from the
/// src/alt pairs of the same scan. The first distinct name is the home side,
/// the first later name that differs is the away side.
pub fn parse_teams_and_logos(
    window: &str,
) -> (Option<String>, Option<String>, Option<String>, Option<String>) {
    let mut logos: HashMap<String, String> = HashMap::new();
    for caps in IMG_SRC_ALT_RE.captures_iter(window) {
        let alt = unescape(caps[2].trim());
        logos.entry(alt).or_insert_with(|| unescape(caps[1].trim()));
    }
    for caps in IMG_ALT_SRC_RE.captures_iter(window) {
        let alt = unescape(caps[1].trim());
        logos.entry(alt).or_insert_with(|| unescape(caps[2].trim()));
    }
    for caps in IMG_ESC_RE.captures_iter(window) {
        let alt = unescape(caps[2].trim());
        logos.entry(alt).or_insert_with(|| unescape(caps[1].trim()));
    }

    let mut teams: Vec<String> = Vec::new();
    for caps in ALT_HTML_RE.captures_iter(window) {
        push_team(&mut teams, &caps[1]);
        if teams.len() >= 4 {
            break;
        }
    }
    if teams.len() < 2 {
        for caps in ALT_ESC_RE.captures_iter(window) {
            push_team(&mut teams, &caps[1]);
            if teams.len() >= 4 {
                break;
            }
        }
    }

    let home = teams.first().cloned();
    let away = teams.get(1).cloned();
    let home_logo = home.as_ref().and_then(|t| logos.get(t)).cloned();
    let away_logo = away.as_ref().and_then(|t| logos.get(t)).cloned();
    (home, away, home_logo, away_logo)
}

fn push_team(teams: &mut Vec<String>, alt: &str) {
    let name = unescape(alt.trim());
    if name.is_empty() || teams.contains(&name) {
        return;
    }
    let lowered = name.to_lowercase();
    if PLACEHOLDER_TEAM_ALTS.contains(&lowered.as_str()) {
        return;
    }
    teams.push(name);
}

/// Scores show up repeated across the card markup; dedupe before counting and
/// require two clean numbers, otherwise report no score at all.
pub fn parse_scores(window: &str) -> (Option<u32>, Option<u32>) {
    let mut raw: Vec<String> = Vec::new();
    for caps in SCORE_RE.captures_iter(window) {
        raw.push(caps[1].trim().to_string());
    }
    for caps in SCORE_ESC_RE.captures_iter(window) {
        raw.push(caps[1].trim().to_string());
    }

    let mut cleaned: Vec<String> = Vec::new();
    for r in raw {
        if !cleaned.contains(&r) {
            cleaned.push(r);
        }
    }

    let mut nums: Vec<u32> = Vec::new();
    for r in &cleaned {
        let r = r.replace('\u{a0}', " ");
        let r = r.trim();
        if !r.is_empty() && r.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = r.parse() {
                nums.push(n);
            }
        }
        if nums.len() >= 2 {
            break;
        }
    }

    if nums.len() >= 2 {
        (Some(nums[0]), Some(nums[1]))
    } else {
        (None, None)
    }
}

pub fn parse_league(window: &str) -> Option<String> {
    let lowered = window.to_lowercase();
    for (canonical, variants) in KNOWN_LEAGUES {
        if variants.iter().any(|v| lowered.contains(v)) {
            return Some((*canonical).to_string());
        }
    }
    // Fallback: the small header line above the card. The escaped-JSON variant
    // of this one matches too much unrelated text, so it stays out.
    LEAGUE_FALLBACK_RE
        .captures(window)
        .map(|c| unescape(c[1].trim()))
}

pub fn parse_tv(window: &str) -> Option<String> {
    first_capture(&[&TV_HTML_RE, &TV_ESC_RE], window)
}

/// Detail-page link for this match. A link carrying query parameters (the media
/// tab) beats a bare one; with no anchor at all the canonical URL is synthesized.
pub fn parse_info_url(game_id: &str, window: &str) -> String {
    let mut candidates: Vec<String> = Vec::new();
    for re in detail_href_patterns(game_id) {
        for caps in re.captures_iter(window) {
            candidates.push(unescape(caps[1].trim()));
        }
    }

    let chosen = candidates
        .iter()
        .find(|href| href.contains('?'))
        .or_else(|| candidates.first());

    match chosen {
        Some(href) => join_base(href),
        None => format!("{}/schedule-item/{}", BASE_URL, game_id),
    }
}

fn join_base(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match reqwest::Url::parse(BASE_URL).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", BASE_URL, href),
    }
}

pub fn parse_tickets_url(window: &str) -> Option<String> {
    TICKETS_RE.find(window).map(|m| unescape(m.as_str()))
}

/// Best-effort: the live badge wording varies, so any indicator word counts.
/// Promotional text can mis-flag this; it is a hint, not a guarantee.
pub fn parse_live_flag(window: &str) -> bool {
    let lowered = window.to_lowercase();
    LIVE_MARKERS.iter().any(|w| lowered.contains(w))
}
