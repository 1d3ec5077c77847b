use std::fs;
use std::path::PathBuf;

use offcourt_stats::provider::{parse_game_log_json, parse_player_index_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_player_index_fixture() {
    let raw = read_fixture("common_all_players.json");
    let index = parse_player_index_json(&raw).expect("fixture should parse");
    assert_eq!(index.len(), 3);

    let lebron = index
        .iter()
        .find(|p| p.full_name == "LeBron James")
        .expect("LeBron should be in the index");
    assert_eq!(lebron.id, 2544);

    let kobe = index
        .iter()
        .find(|p| p.full_name == "Kobe Bryant")
        .expect("Kobe should be in the index");
    assert_eq!(kobe.id, 977);
}

#[test]
fn parses_game_log_fixture() {
    let raw = read_fixture("player_game_log.json");
    let log = parse_game_log_json(&raw).expect("fixture should parse");
    assert_eq!(log.rows.len(), 3);

    let pts = log.column_index("PTS").expect("PTS column should exist");
    assert_eq!(log.rows[0][pts].as_f64(), Some(25.0));
    assert_eq!(log.rows[1][pts].as_f64(), Some(30.0));
    assert!(log.column_index("FG_PCT").is_some());
    assert!(log.column_index("NOT_A_STAT").is_none());
}

#[test]
fn sparse_game_log_keeps_null_cells() {
    let raw = read_fixture("player_game_log_sparse.json");
    let log = parse_game_log_json(&raw).expect("fixture should parse");
    let reb = log.column_index("REB").expect("REB column should exist");
    assert!(log.rows[1][reb].is_null());
}

#[test]
fn empty_game_log_parses_as_empty() {
    let raw = read_fixture("player_game_log_empty.json");
    let log = parse_game_log_json(&raw).expect("fixture should parse");
    assert!(log.is_empty());
    // Headers survive even with no games played.
    assert!(log.column_index("PTS").is_some());
}

#[test]
fn garbage_payload_is_an_error() {
    assert!(parse_game_log_json("<html>rate limited</html>").is_err());
    assert!(parse_player_index_json("{}").is_err());
}
