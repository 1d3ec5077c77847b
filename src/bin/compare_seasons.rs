use std::path::PathBuf;

use anyhow::Result;

use offcourt_stats::compare::compare_windows;
use offcourt_stats::table::{read_player_season_table, write_average_table};

const DEFAULT_BASELINE: &str = "data/baseline_average_player_stats.csv";
const DEFAULT_TARGET: &str = "data/target_average_player_stats.csv";
const BEFORE_FILE: &str = "before_averages.csv";
const AFTER_FILE: &str = "after_averages.csv";

fn main() -> Result<()> {
    let baseline_path =
        parse_path_arg("--baseline").unwrap_or_else(|| PathBuf::from(DEFAULT_BASELINE));
    let target_path = parse_path_arg("--target").unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET));
    let out_dir = parse_path_arg("--out-dir").unwrap_or_else(|| PathBuf::from("data"));

    let baseline = read_player_season_table(&baseline_path)?;
    let target = read_player_season_table(&target_path)?;

    let (before, after) = compare_windows(&baseline, &target)?;

    std::fs::create_dir_all(&out_dir).ok();
    let before_path = out_dir.join(BEFORE_FILE);
    let after_path = out_dir.join(AFTER_FILE);
    write_average_table(&before_path, &before)?;
    write_average_table(&after_path, &after)?;

    println!("Season comparison complete");
    println!("Baseline rows: {}", baseline.len());
    println!("Target players: {}", after.len());
    println!("before: {}", before_path.display());
    println!("after: {}", after_path.display());

    for (player, stats) in before.entries().iter().take(5) {
        let after_pts = after.get(player).map(|s| s.pts).unwrap_or(f64::NAN);
        println!("{player}: before PTS {:.1} / after PTS {after_pts:.1}", stats.pts);
    }

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
