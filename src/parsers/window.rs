// src/parsers/window.rs
//
// A "window" is the smallest substring of the page we trust to describe exactly
// one match. The page is never parsed into a DOM; the extractor anchors on the
// match's schedule-item link and cuts around it.
use crate::parsers::patterns::SCHEDULE_ITEM_RE;

pub const WINDOW_SIZE: usize = 6000;

// Sanity range for a card-bounded span; outside it the fixed window is safer.
const CARD_SPAN_MIN: usize = 800;
const CARD_SPAN_MAX: usize = 50_000;

// How far back an enclosing anchor tag may plausibly open.
const TAG_LOOKBEHIND: usize = 300;

/// Cut the window for one match out of the full page.
pub fn extract_window<'a>(html: &'a str, game_id: &str) -> &'a str {
    extract_window_sized(html, game_id, WINDOW_SIZE)
}

pub fn extract_window_sized<'a>(html: &'a str, game_id: &str, size: usize) -> &'a str {
    let anchor = find_anchor(html, game_id).unwrap_or(0);

    // Card-bounded span beats the fixed window when its size is sane; adjacent
    // matches otherwise bleed into each other and poison the team/score parse.
    if let Some((start, end)) = card_span(html, anchor, game_id) {
        return &html[start..end];
    }

    let half = size / 2;
    let start = floor_char_boundary(html, anchor.saturating_sub(half));
    let end = floor_char_boundary(html, (anchor + half).min(html.len()));
    &html[start..end]
}

/// First `max_bytes` of the page, clipped to a char boundary. Detail pages keep
/// all the interesting fields in the header, so a head slice is enough there.
pub fn head(html: &str, max_bytes: usize) -> &str {
    &html[..floor_char_boundary(html, max_bytes.min(html.len()))]
}

/// Most reliable occurrence of the id: a schedule-item link that also carries a
/// query-tab parameter, then any schedule-item link, then a quoted occurrence,
/// then a bare substring.
fn find_anchor(html: &str, game_id: &str) -> Option<usize> {
    let path = format!("/schedule-item/{}", game_id);
    let mut plain: Option<usize> = None;
    for (idx, _) in html.match_indices(&path) {
        if has_tab_param(&html[idx + path.len()..]) {
            return Some(idx);
        }
        if plain.is_none() {
            plain = Some(idx);
        }
    }
    if plain.is_some() {
        return plain;
    }

    let quoted = format!("\"{}\"", game_id);
    if let Some(idx) = html.find(&quoted) {
        return Some(idx + 1);
    }
    html.find(game_id)
}

// True when the href continues with a tab query parameter before the closing
// quote (plain or escaped).
fn has_tab_param(tail: &str) -> bool {
    tail.chars()
        .take_while(|c| *c != '"' && *c != '\\')
        .collect::<String>()
        .contains("tab=")
}

/// Card boundaries: the card for a match opens at the anchor tag wrapping its
/// schedule-item link and runs until the next match's anchor. Only trusted when
/// the enclosing tag is actually nearby and the resulting span has a plausible
/// size; the escaped-JSON dialect has no tags and keeps the fixed window.
fn card_span(html: &str, anchor: usize, game_id: &str) -> Option<(usize, usize)> {
    let anchor = floor_char_boundary(html, anchor);

    let start = html[..anchor]
        .rfind("<a")
        .filter(|idx| anchor - idx <= TAG_LOOKBEHIND)?;

    let mut end = html.len();
    for caps in SCHEDULE_ITEM_RE.captures_iter(html) {
        let whole = caps.get(0)?;
        if whole.start() <= anchor {
            continue;
        }
        if !caps[1].eq_ignore_ascii_case(game_id) {
            end = whole.start();
            break;
        }
    }

    let span = end.checked_sub(start)?;
    if (CARD_SPAN_MIN..=CARD_SPAN_MAX).contains(&span) {
        Some((floor_char_boundary(html, start), floor_char_boundary(html, end)))
    } else {
        None
    }
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
