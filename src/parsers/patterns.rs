// src/parsers/patterns.rs
//
// Every pattern exists in up to two dialects: the plain HTML the site serves on
// first load, and the escaped-JSON payload embedded in the same page by the
// frontend framework. Parsers try the HTML form first and fall back to the
// escaped form; a later pattern is never preferred over an earlier hit.
use once_cell::sync::Lazy;
use regex::Regex;

/// Schedule-item links carry the match UUID; this is the primary anchor for both
/// the schedule parser and the window extractor.
pub static SCHEDULE_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)/schedule-item/([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})",
    )
    .expect("schedule-item pattern")
});

// e.g. "PN, 01-30, 21:30" (Lithuanian weekday abbreviations, month-day order)
pub static START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-ZŠŽĮŪ]{1,3})\s*,\s*(\d{2})-(\d{2})\s*,\s*(\d{2}):(\d{2})")
        .expect("start time pattern")
});

// Bare month-day form; the weekday is sometimes glued to an odd whitespace char.
pub static START_BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2})-(\d{2})\s*,\s*(\d{2}):(\d{2})\b").expect("bare start pattern"));

pub static TICKETS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://zalgiris\.koobin\.com[^\s"<>]+"#).expect("tickets pattern")
});

// img tags in either attribute order, plus the escaped-JSON form
pub static IMG_SRC_ALT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img[^>]+src="([^"]+)"[^>]+alt="([^"]+)""#).expect("img src/alt pattern")
});

pub static IMG_ALT_SRC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img[^>]+alt="([^"]+)"[^>]+src="([^"]+)""#).expect("img alt/src pattern")
});

pub static IMG_ESC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\\"src\\":\\"([^\\"]+)\\"[^}]+?\\"alt\\":\\"([^\\"]+)\\""#)
        .expect("escaped img pattern")
});

pub static ALT_HTML_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"alt="([^"]{2,50})""#).expect("alt pattern"));

pub static ALT_ESC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\\"alt\\":\\"([^\\"]{2,50})\\""#).expect("escaped alt pattern"));

// Scores sit in tabular-nums styled paragraphs.
pub static SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)tabular-nums[^>]*>\s*([^<]{1,3})\s*</p>"#).expect("score pattern")
});

pub static SCORE_ESC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)tabular-nums\\",\\"children\\":\\"([^\\"]{1,3})"#)
        .expect("escaped score pattern")
});

// Broadcaster name directly follows the section heading.
pub static TV_HTML_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:Broadcasts|Transliacijos)\s*</p>\s*<p[^>]*>([^<]{1,60})</p>"#)
        .expect("tv pattern")
});

pub static TV_ESC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:Broadcasts|Transliacijos)\\",\\"children\\":\\"([^\\"]{1,60})"#)
        .expect("escaped tv pattern")
});

// Small-header fallback when no known league name is present in the window.
pub static LEAGUE_FALLBACK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"text-white/60 text-2xs truncate[^>]*>([^<]{3,60})</p>"#)
        .expect("league fallback pattern")
});

/// Known leagues with the display variants the page has shipped over time
/// (diacritics stripped by some encodings, abbreviations on narrow layouts).
/// Variants are matched case-insensitively and normalized to the canonical name.
pub const KNOWN_LEAGUES: &[(&str, &[&str])] = &[
    ("Eurolyga", &["eurolyga", "euroleague"]),
    (
        "Lietuvos Krepšinio Lyga",
        &["lietuvos krepšinio lyga", "lietuvos krepsinio lyga", "lkl"],
    ),
    (
        "Karaliaus Mindaugo Taurė",
        &["karaliaus mindaugo taurė", "karaliaus mindaugo taure", "kmt"],
    ),
];

/// Live badges vary between releases of the site; any of these words counts.
pub const LIVE_MARKERS: &[&str] = &["live", "gyvai", "tiesiogiai"];

/// The club's own generic badge shows up with this alt text on every card and
/// must not be mistaken for a team name.
pub const PLACEHOLDER_TEAM_ALTS: &[&str] = &["žalgiris team"];

/// Per-match detail link patterns, compiled on demand because they embed the id.
pub fn detail_href_patterns(game_id: &str) -> Vec<Regex> {
    let id = regex::escape(game_id);
    [
        format!(r#"href="([^"]*/schedule-item/{id}[^"]*)""#),
        format!(r#"\\"href\\":\\"([^\\"]*/schedule-item/{id}[^\\"]*)\\""#),
    ]
    .into_iter()
    .filter_map(|p| Regex::new(&p).ok())
    .collect()
}
