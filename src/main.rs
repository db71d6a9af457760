use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use replay::aggregate;
use replay::export;
use replay::format;
use replay::loader;
use replay::models::Config;
use replay::normalize;

#[derive(Parser)]
#[command(name = "replay", about = "Yearly listening recap for streaming history exports")]
struct Cli {
    /// Directory containing exported history JSON files
    path: Option<String>,

    /// Number of entries in each ranking
    #[arg(short = 'n', long, default_value_t = 10)]
    top: usize,

    /// Output as JSON instead of a console report
    #[arg(long)]
    json: bool,

    /// Write per-year ranking CSVs and a year totals summary
    #[arg(long)]
    csv: bool,

    /// Directory for CSV output
    #[arg(long, default_value = "out")]
    out_dir: String,

    /// Count podcast episodes and audiobook chapters as well as songs
    #[arg(long)]
    include_podcasts: bool,
}

fn print_summary(records: usize, usable: usize, elapsed: std::time::Duration) {
    eprintln!(
        "Processed {} records ({} usable) in {:.2}s",
        records,
        usable,
        elapsed.as_secs_f64(),
    );
}

fn run(config: &Config, as_json: bool) -> Result<()> {
    let start = Instant::now();

    let records = loader::load_records(&config.data_dir)?;

    let events: Vec<_> = records
        .iter()
        .filter_map(|record| normalize::normalize_record(record, config.include_podcasts))
        .collect();
    let usable = events.len();
    let years = aggregate::aggregate(events);

    if years.is_empty() {
        println!("No usable streaming records found.");
        print_summary(records.len(), usable, start.elapsed());
        return Ok(());
    }

    if as_json {
        println!("{}", format::format_json(&format::build_recap(&years, config.top_n)));
    } else {
        println!("{}", format::render_report(&years, config.top_n));
    }

    if config.write_csv {
        export::write_reports(&config.out_dir, &years)?;
        println!("Saved CSVs in {}", config.out_dir.display());
    }

    print_summary(records.len(), usable, start.elapsed());

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        data_dir: PathBuf::from(cli.path.as_deref().unwrap_or("spotify_data")),
        top_n: cli.top,
        write_csv: cli.csv,
        out_dir: PathBuf::from(cli.out_dir),
        include_podcasts: cli.include_podcasts,
    };

    run(&config, cli.json)
}
