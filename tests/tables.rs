use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use offcourt_stats::compare::compare_windows;
use offcourt_stats::fetch::SeasonAverage;
use offcourt_stats::table::{
    read_player_season_table, write_average_table, write_season_averages,
};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("offcourt_stats_test_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir.join(name)
}

#[test]
fn reads_pandas_style_table_with_unnamed_label_column() {
    let rows = read_player_season_table(&fixture_path("baseline_average_player_stats.csv"))
        .expect("fixture should parse");
    assert_eq!(rows.len(), 6);

    let first = &rows[0];
    assert_eq!(first.player, "LeBron James");
    assert_eq!(first.season.as_deref(), Some("2018-19"));
    assert_eq!(first.stats.pts, 20.0);
    assert_eq!(first.stats.fg_pct, 0.48);
}

#[test]
fn csv_pipeline_matches_worked_example() {
    let baseline = read_player_season_table(&fixture_path("baseline_average_player_stats.csv"))
        .expect("baseline should parse");
    let target = read_player_season_table(&fixture_path("target_average_player_stats.csv"))
        .expect("target should parse");

    let (before, after) = compare_windows(&baseline, &target).expect("comparison should succeed");

    let lebron_before = before.get("LeBron James").unwrap();
    let lebron_after = after.get("LeBron James").unwrap();
    assert_eq!(lebron_before.pts, 21.0);
    assert_eq!(lebron_after.pts, 31.0);
    assert_eq!(lebron_before.ast, 5.5);
    assert_eq!(lebron_after.reb, 8.0);

    // Durant has one baseline season on each side of the target.
    assert_eq!(before.get("Kevin Durant").unwrap().pts, 26.0);
    assert_eq!(after.get("Kevin Durant").unwrap().pts, 29.9);

    // Westbrook appears only in the target table.
    assert!(before.get("Russell Westbrook").unwrap().is_undefined());
    assert!(after.get("Russell Westbrook").unwrap().is_undefined());

    // Output order follows the target table.
    let players: Vec<&str> = before
        .entries()
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(players, ["LeBron James", "Kevin Durant", "Russell Westbrook"]);
}

#[test]
fn written_average_table_has_empty_cells_for_undefined_stats() {
    let baseline = read_player_season_table(&fixture_path("baseline_average_player_stats.csv"))
        .expect("baseline should parse");
    let target = read_player_season_table(&fixture_path("target_average_player_stats.csv"))
        .expect("target should parse");
    let (before, _) = compare_windows(&baseline, &target).expect("comparison should succeed");

    let out = scratch_path("before_averages.csv");
    write_average_table(&out, &before).expect("write should succeed");

    let raw = fs::read_to_string(&out).expect("written file should be readable");
    let mut lines = raw.lines();
    assert_eq!(lines.next(), Some("Player,PTS,AST,REB,FG_PCT"));
    assert_eq!(lines.next(), Some("LeBron James,21,5.5,6.5,0.49"));
    // Undefined window serializes as empty cells, not NaN text.
    assert_eq!(lines.nth(1), Some("Russell Westbrook,,,,"));
}

#[test]
fn fetcher_output_round_trips_through_the_baseline_shape() {
    let target_stats: Vec<String> = ["PTS", "AST", "REB", "FG_PCT"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let averages = vec![
        SeasonAverage {
            key: "LeBron James_2019-20".to_string(),
            stats: HashMap::from([
                ("PTS".to_string(), 25.0),
                ("AST".to_string(), 8.0),
                ("REB".to_string(), 8.0),
                ("FG_PCT".to_string(), 0.5),
            ]),
        },
        SeasonAverage {
            key: "Kevin Durant_2019-20".to_string(),
            stats: HashMap::from([
                ("PTS".to_string(), 27.0),
                ("AST".to_string(), 6.0),
                ("REB".to_string(), 7.0),
                ("FG_PCT".to_string(), 0.52)
            ]),
        },
    ];

    let out = scratch_path("fetched_baseline.csv");
    write_season_averages(&out, &averages, &target_stats).expect("write should succeed");

    let rows = read_player_season_table(&out).expect("written table should read back");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].player, "LeBron James");
    assert_eq!(rows[0].season.as_deref(), Some("2019-20"));
    assert_eq!(rows[0].stats.pts, 25.0);
    assert_eq!(rows[1].player, "Kevin Durant");
    assert_eq!(rows[1].stats.fg_pct, 0.52);
}

#[test]
fn missing_stat_column_fails_at_the_parsing_boundary() {
    let path = scratch_path("missing_column.csv");
    fs::write(&path, ",PTS,AST,REB\nPlayer_2019-20,20,5,6\n").expect("scratch write");
    assert!(read_player_season_table(&path).is_err());
}

#[test]
fn non_numeric_stat_cell_fails_at_the_parsing_boundary() {
    let path = scratch_path("bad_cell.csv");
    fs::write(
        &path,
        ",PTS,AST,REB,FG_PCT\nPlayer_2019-20,lots,5,6,0.5\n",
    )
    .expect("scratch write");
    assert!(read_player_season_table(&path).is_err());
}
