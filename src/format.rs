use std::collections::BTreeMap;

use crate::aggregate::YearStats;
use crate::models::{RankedEntry, YearRecap};

const BANNER: &str = "===== Yearly Listening Recap =====";

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Convert milliseconds to decimal hours.
pub fn ms_to_hours(ms: u64) -> f64 {
    ms as f64 / MS_PER_HOUR
}

/// Render the per-year recap as a console report: banner, then per year a
/// divider, totals, and the top-N artist and song blocks.
pub fn render_report(years: &BTreeMap<i32, YearStats>, top_n: usize) -> String {
    let mut output = String::new();
    output.push_str(BANNER);
    output.push_str("\n\n");

    for (year, stats) in years {
        output.push_str(&format!("--- {} ---\n", year));
        output.push_str(&format!(
            "Total listening: {:.2} hours\n",
            ms_to_hours(stats.total_ms)
        ));
        output.push_str(&format!("Total streams:   {}\n", stats.streams));

        output.push_str(&format!("\nTop {} Artists:\n", top_n));
        for (name, ms) in stats.artist_ms.ranked().into_iter().take(top_n) {
            output.push_str(&format!("  {:<40} {:>6.2} hrs\n", name, ms_to_hours(ms)));
        }

        output.push_str(&format!("\nTop {} Songs:\n", top_n));
        for (name, ms) in stats.track_ms.ranked().into_iter().take(top_n) {
            output.push_str(&format!("  {:<60} {:>6.2} hrs\n", name, ms_to_hours(ms)));
        }

        output.push('\n');
    }

    output
}

fn ranked_entries(ranked: Vec<(&str, u64)>, top_n: usize) -> Vec<RankedEntry> {
    ranked
        .into_iter()
        .take(top_n)
        .map(|(name, ms)| RankedEntry {
            name: name.to_string(),
            ms_listened: ms,
            hours: ms_to_hours(ms),
        })
        .collect()
}

/// Build the serializable view of the recap, truncated to the top-N ranks.
pub fn build_recap(years: &BTreeMap<i32, YearStats>, top_n: usize) -> Vec<YearRecap> {
    years
        .iter()
        .map(|(&year, stats)| YearRecap {
            year,
            total_ms: stats.total_ms,
            total_hours: ms_to_hours(stats.total_ms),
            streams: stats.streams,
            top_artists: ranked_entries(stats.artist_ms.ranked(), top_n),
            top_songs: ranked_entries(stats.track_ms.ranked(), top_n),
        })
        .collect()
}

/// Format the recap as pretty-printed JSON.
pub fn format_json(recap: &[YearRecap]) -> String {
    serde_json::to_string_pretty(recap).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::{CanonicalEvent, ItemType};

    fn song(year: i32, artist: &str, track: &str, ms: u64) -> CanonicalEvent {
        CanonicalEvent {
            year,
            item_type: ItemType::Song,
            group_key: artist.to_string(),
            item_key: format!("{artist} - {track}"),
            duration_ms: ms,
        }
    }

    #[test]
    fn test_ms_to_hours_exact() {
        assert_eq!(ms_to_hours(3_600_000), 1.0);
        assert_eq!(ms_to_hours(0), 0.0);
        assert_eq!(ms_to_hours(1_800_000), 0.5);
    }

    #[test]
    fn test_render_report_sections() {
        let years = aggregate([
            song(2023, "Artist X", "A", 100_000),
            song(2023, "Artist X", "B", 200_000),
            song(2023, "Artist X", "C", 300_000),
        ]);
        let report = render_report(&years, 10);

        assert!(report.contains("===== Yearly Listening Recap ====="));
        assert!(report.contains("--- 2023 ---"));
        // 600000 ms is 0.1666... hours
        assert!(report.contains("Total listening: 0.17 hours"));
        assert!(report.contains("Total streams:   3"));
        assert!(report.contains("Top 10 Artists:"));
        assert!(report.contains("Top 10 Songs:"));
        assert!(report.contains("Artist X"));
        assert!(report.contains("0.17 hrs"));
    }

    #[test]
    fn test_render_report_respects_top_n() {
        let years = aggregate([
            song(2023, "A", "t1", 300_000),
            song(2023, "B", "t2", 200_000),
            song(2023, "C", "t3", 100_000),
        ]);
        let report = render_report(&years, 2);
        assert!(report.contains("Top 2 Artists:"));
        assert!(report.contains("A "));
        assert!(report.contains("B "));
        assert!(!report.contains("  C "));
    }

    #[test]
    fn test_render_report_years_ascending() {
        let years = aggregate([song(2023, "A", "t", 1000), song(2019, "A", "t", 1000)]);
        let report = render_report(&years, 10);
        let pos_2019 = report.find("--- 2019 ---").unwrap();
        let pos_2023 = report.find("--- 2023 ---").unwrap();
        assert!(pos_2019 < pos_2023);
    }

    #[test]
    fn test_build_recap_truncates_and_ranks() {
        let years = aggregate([
            song(2023, "A", "t1", 100_000),
            song(2023, "B", "t2", 300_000),
            song(2023, "C", "t3", 200_000),
        ]);
        let recap = build_recap(&years, 2);
        assert_eq!(recap.len(), 1);
        assert_eq!(recap[0].year, 2023);
        assert_eq!(recap[0].total_ms, 600_000);
        assert_eq!(recap[0].streams, 3);
        assert_eq!(recap[0].top_artists.len(), 2);
        assert_eq!(recap[0].top_artists[0].name, "B");
        assert_eq!(recap[0].top_artists[1].name, "C");
    }

    #[test]
    fn test_format_json_round_trip() {
        let years = aggregate([song(2023, "Artist X", "Song A", 180_000)]);
        let json = format_json(&build_recap(&years, 10));
        let parsed: Vec<YearRecap> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].year, 2023);
        assert_eq!(parsed[0].top_songs[0].name, "Artist X - Song A");
        assert_eq!(parsed[0].top_songs[0].ms_listened, 180_000);
    }
}
