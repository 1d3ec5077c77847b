use std::path::PathBuf;

use anyhow::Result;

use offcourt_stats::fetch::{FixedDelay, fetch_season_averages};
use offcourt_stats::provider::NbaStats;
use offcourt_stats::table::{STAT_COLUMNS, write_season_averages};

const DEFAULT_OUT: &str = "data/baseline_average_player_stats.csv";

// Demo fetch set: two seasons either side of 2020-21 for a handful of
// well-known names, enough to feed the comparator end to end.
const FETCH_SET: &[(&str, &[&str])] = &[
    ("LeBron James", &["2018-19", "2019-20", "2021-22", "2022-23"]),
    ("Kevin Durant", &["2018-19", "2019-20", "2021-22", "2022-23"]),
    ("Stephen Curry", &["2018-19", "2019-20", "2021-22", "2022-23"]),
];

fn main() -> Result<()> {
    let out_path = parse_path_arg("--out").unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));

    let players_seasons = FETCH_SET
        .iter()
        .map(|(name, seasons)| {
            (
                name.to_string(),
                seasons.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect::<Vec<(String, Vec<String>)>>();
    let target_stats = STAT_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();

    let provider = NbaStats::new();
    let pacer = FixedDelay::default();
    let report = fetch_season_averages(&provider, &pacer, &players_seasons, &target_stats)?;

    if let Some(dir) = out_path.parent() {
        std::fs::create_dir_all(dir).ok();
    }
    write_season_averages(&out_path, &report.averages, &target_stats)?;

    println!("Fetched {} player-season averages", report.averages.len());
    if !report.skipped.is_empty() {
        println!("Skipped {} player-season pairs", report.skipped.len());
    }
    println!("written: {}", out_path.display());

    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}
