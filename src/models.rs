use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One decoded JSON object from an export file. No fixed schema; key names
/// vary between export formats and are resolved by candidate-field probing.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Song,
    Podcast,
    Audiobook,
}

/// A normalized, validated listening record ready for aggregation.
/// `duration_ms` is always positive; records that cannot satisfy that are
/// never constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEvent {
    pub year: i32,
    pub item_type: ItemType,
    /// Artist, show, or audiobook title.
    pub group_key: String,
    /// Composite "group - item" label.
    pub item_key: String,
    pub duration_ms: u64,
}

/// Pipeline configuration, built from the CLI in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub top_n: usize,
    pub write_csv: bool,
    pub out_dir: PathBuf,
    pub include_podcasts: bool,
}

/// One ranked artist or song entry in the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub ms_listened: u64,
    pub hours: f64,
}

/// One year's recap in the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearRecap {
    pub year: i32,
    pub total_ms: u64,
    pub total_hours: f64,
    pub streams: u64,
    pub top_artists: Vec<RankedEntry>,
    pub top_songs: Vec<RankedEntry>,
}
