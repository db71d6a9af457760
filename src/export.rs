use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::aggregate::YearStats;
use crate::format::ms_to_hours;

const TOTALS_FILENAME: &str = "year_totals.csv";

/// Build one ranking CSV: a header row, then the full ranking (not just the
/// top-N shown on the console), key quoted, milliseconds raw.
fn ranking_csv(label: &str, ranked: &[(&str, u64)]) -> String {
    let mut output = format!("{},ms_listened\n", label);
    for (name, ms) in ranked {
        output.push_str(&format!("\"{}\",{}\n", name, ms));
    }
    output
}

/// Build the cross-year summary CSV, hours to 4 decimal places.
fn totals_csv(years: &BTreeMap<i32, YearStats>) -> String {
    let mut output = String::from("year,total_ms,total_hours,total_streams\n");
    for (year, stats) in years {
        output.push_str(&format!(
            "{},{},{:.4},{}\n",
            year,
            stats.total_ms,
            ms_to_hours(stats.total_ms),
            stats.streams,
        ));
    }
    output
}

/// Write the per-year artist and song ranking CSVs plus the year totals
/// summary into `out_dir`, creating it if absent. Existing files are
/// overwritten so re-runs reproduce the same output.
pub fn write_reports(out_dir: &Path, years: &BTreeMap<i32, YearStats>) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    for (year, stats) in years {
        let artists_path = out_dir.join(format!("{}_top_artists.csv", year));
        std::fs::write(&artists_path, ranking_csv("artist", &stats.artist_ms.ranked()))
            .with_context(|| format!("Failed to write {}", artists_path.display()))?;

        let songs_path = out_dir.join(format!("{}_top_songs.csv", year));
        std::fs::write(&songs_path, ranking_csv("song", &stats.track_ms.ranked()))
            .with_context(|| format!("Failed to write {}", songs_path.display()))?;
    }

    let totals_path = out_dir.join(TOTALS_FILENAME);
    std::fs::write(&totals_path, totals_csv(years))
        .with_context(|| format!("Failed to write {}", totals_path.display()))?;

    Ok(())
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
    fn test_ranking_csv_rows() {
        let ranked = vec![("Artist X", 600_000u64), ("Artist Y", 300_000u64)];
        let csv = ranking_csv("artist", &ranked);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "artist,ms_listened");
        assert_eq!(lines[1], "\"Artist X\",600000");
        assert_eq!(lines[2], "\"Artist Y\",300000");
    }

    #[test]
    fn test_totals_csv_rows() {
        let years = aggregate([
            song(2023, "A", "t", 600_000),
            song(2023, "A", "t", 600_000),
            song(2022, "B", "u", 3_600_000),
        ]);
        let csv = totals_csv(&years);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "year,total_ms,total_hours,total_streams");
        assert_eq!(lines[1], "2022,3600000,1.0000,1");
        assert_eq!(lines[2], "2023,1200000,0.3333,2");
    }
}
