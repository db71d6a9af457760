use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::models::{CanonicalEvent, ItemType, RawRecord};

// Candidate key names per logical field, one per export schema generation.
// Order is priority: the first present, non-empty candidate wins.
const TIMESTAMP_FIELDS: &[&str] = &["ts", "endTime", "timestamp", "played_at"];
const DURATION_FIELDS: &[&str] = &["ms_played", "msPlayed", "play_duration_ms"];
const TRACK_FIELDS: &[&str] = &[
    "master_metadata_track_name",
    "trackName",
    "track",
    "track_name",
    "name",
];
const ARTIST_FIELDS: &[&str] = &[
    "master_metadata_album_artist_name",
    "artistName",
    "artist",
    "artist_name",
    "master_metadata_artist_name",
];
const EPISODE_FIELDS: &[&str] = &["episode_name"];
const SHOW_FIELDS: &[&str] = &["episode_show_name"];
const AUDIOBOOK_FIELDS: &[&str] = &["audiobook_title"];
const CHAPTER_FIELDS: &[&str] = &["audiobook_chapter_title"];

/// Literal formats tried after RFC 3339, against the value with any trailing
/// UTC `Z` marker stripped.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Return the first candidate field present with a usable value. Missing
/// keys, JSON nulls, empty strings, and the literal string "null" all count
/// as absent.
fn probe<'a>(record: &'a RawRecord, candidates: &[&str]) -> Option<&'a Value> {
    for key in candidates {
        match record.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.is_empty() || s == "null" => continue,
            Some(value) => return Some(value),
        }
    }
    None
}

/// Probe and render the value as a string; non-string scalars (a numeric
/// title, say) are stringified rather than dropped.
fn probe_str(record: &RawRecord, candidates: &[&str]) -> Option<String> {
    probe(record, candidates).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Coerce a play-duration value to milliseconds. Integer and float numbers
/// (truncated) and numeric strings are accepted; anything else is 0.
fn coerce_ms(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Parse an event timestamp, trying each strategy in order: RFC 3339 (which
/// handles `Z` and numeric offsets itself), then the literal fallback
/// formats with any trailing `Z` stripped, then a bare date at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    let bare = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(bare, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(bare, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Map a raw export record to a canonical event, or `None` if the record is
/// unusable: no parsable timestamp, no positive play duration, or no
/// resolvable identity. Podcast and audiobook identities are only
/// considered when `include_podcasts` is set.
pub fn normalize_record(record: &RawRecord, include_podcasts: bool) -> Option<CanonicalEvent> {
    let raw_ts = probe_str(record, TIMESTAMP_FIELDS)?;
    let when = parse_timestamp(&raw_ts)?;

    let ms = probe(record, DURATION_FIELDS).map(coerce_ms).unwrap_or(0);
    if ms <= 0 {
        return None;
    }
    let duration_ms = ms as u64;
    let year = when.year();

    let track = probe_str(record, TRACK_FIELDS);
    let artist = probe_str(record, ARTIST_FIELDS);
    if let (Some(track), Some(artist)) = (track, artist) {
        return Some(CanonicalEvent {
            year,
            item_type: ItemType::Song,
            group_key: artist.trim().to_string(),
            item_key: format!("{} - {}", artist, track).trim().to_string(),
            duration_ms,
        });
    }

    if include_podcasts {
        let episode = probe_str(record, EPISODE_FIELDS);
        let show = probe_str(record, SHOW_FIELDS);
        if let (Some(episode), Some(show)) = (episode, show) {
            return Some(CanonicalEvent {
                year,
                item_type: ItemType::Podcast,
                group_key: show.trim().to_string(),
                item_key: format!("{} - {}", show, episode).trim().to_string(),
                duration_ms,
            });
        }

        let book = probe_str(record, AUDIOBOOK_FIELDS);
        let chapter = probe_str(record, CHAPTER_FIELDS);
        if let (Some(book), Some(chapter)) = (book, chapter) {
            return Some(CanonicalEvent {
                year,
                item_type: ItemType::Audiobook,
                group_key: book.trim().to_string(),
                item_key: format!("{} - {}", book, chapter).trim().to_string(),
                duration_ms,
            });
        }
    }

    None
}
