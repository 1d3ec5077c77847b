use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::http_client;

const STATS_BASE_URL: &str = "https://stats.nba.com/stats";

// Season parameter for the all-players index. The endpoint wants *some*
// season label even with IsOnlyCurrentSeason=0 (which returns every player
// in league history regardless).
const PLAYER_INDEX_SEASON: &str = "2025-26";

/// One name-resolution match from the player index.
#[derive(Debug, Clone)]
pub struct PlayerMatch {
    pub id: u32,
    pub full_name: String,
}

/// A season's per-game log: one row per game, cells kept as raw JSON values
/// so callers can tell a missing (null) cell from a non-numeric one.
#[derive(Debug, Clone)]
pub struct GameLog {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl GameLog {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The external stats provider: name resolution plus per-season game logs.
/// `NbaStats` is the real thing; tests substitute in-memory impls.
pub trait StatsProvider {
    /// Exact full-name lookup, case-insensitive. Zero or more matches.
    fn find_players_by_full_name(&self, name: &str) -> Result<Vec<PlayerMatch>>;

    fn player_game_log(&self, player_id: u32, season: &str) -> Result<GameLog>;
}

pub struct NbaStats {
    player_index: OnceCell<Vec<PlayerMatch>>,
}

impl NbaStats {
    pub fn new() -> Self {
        Self {
            player_index: OnceCell::new(),
        }
    }

    // The index covers all players in league history; fetch it once and
    // resolve every lookup against the memoized copy.
    fn player_index(&self) -> Result<&[PlayerMatch]> {
        let index = self.player_index.get_or_try_init(|| {
            let client = http_client()?;
            let url = format!(
                "{STATS_BASE_URL}/commonallplayers?IsOnlyCurrentSeason=0&LeagueID=00&Season={PLAYER_INDEX_SEASON}"
            );
            let body = fetch_json(client, &url).context("player index fetch failed")?;
            parse_player_index_json(&body)
        })?;
        Ok(index)
    }
}

impl Default for NbaStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsProvider for NbaStats {
    fn find_players_by_full_name(&self, name: &str) -> Result<Vec<PlayerMatch>> {
        let wanted = name.trim();
        Ok(self
            .player_index()?
            .iter()
            .filter(|p| p.full_name.eq_ignore_ascii_case(wanted))
            .cloned()
            .collect())
    }

    fn player_game_log(&self, player_id: u32, season: &str) -> Result<GameLog> {
        let client = http_client()?;
        let url = format!(
            "{STATS_BASE_URL}/playergamelog?PlayerID={player_id}&Season={season}&SeasonType=Regular%20Season"
        );
        let body = fetch_json(client, &url)
            .with_context(|| format!("game log fetch failed (player {player_id}, season {season})"))?;
        parse_game_log_json(&body)
    }
}

fn fetch_json(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}

// Every stats endpoint answers with the same envelope: a list of named
// tabular result sets whose rows are heterogeneous JSON arrays.
#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<RawResultSet>,
}

#[derive(Debug, Deserialize)]
struct RawResultSet {
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    row_set: Vec<Vec<Value>>,
}

pub fn parse_game_log_json(raw: &str) -> Result<GameLog> {
    let set = take_result_set(raw, "PlayerGameLog")?;
    Ok(GameLog {
        headers: set.headers,
        rows: set.row_set,
    })
}

pub fn parse_player_index_json(raw: &str) -> Result<Vec<PlayerMatch>> {
    let set = take_result_set(raw, "CommonAllPlayers")?;
    let id_col = set
        .headers
        .iter()
        .position(|h| h == "PERSON_ID")
        .ok_or_else(|| anyhow!("player index has no PERSON_ID column"))?;
    let name_col = set
        .headers
        .iter()
        .position(|h| h == "DISPLAY_FIRST_LAST")
        .ok_or_else(|| anyhow!("player index has no DISPLAY_FIRST_LAST column"))?;

    Ok(set
        .row_set
        .iter()
        .filter_map(|row| parse_index_row(row, id_col, name_col))
        .collect())
}

fn parse_index_row(row: &[Value], id_col: usize, name_col: usize) -> Option<PlayerMatch> {
    let id = as_u32_any(row.get(id_col)?)?;
    let full_name = row.get(name_col)?.as_str()?.trim().to_string();
    if full_name.is_empty() {
        return None;
    }
    Some(PlayerMatch { id, full_name })
}

fn take_result_set(raw: &str, name: &str) -> Result<RawResultSet> {
    let response = serde_json::from_str::<StatsResponse>(raw.trim())
        .with_context(|| format!("invalid {name} json"))?;
    let mut sets = response.result_sets;
    if let Some(pos) = sets.iter().position(|s| s.name == name) {
        return Ok(sets.swap_remove(pos));
    }
    // Older payloads sometimes carry a single unnamed set; take the first.
    if sets.is_empty() {
        return Err(anyhow!("no result sets in {name} response"));
    }
    Ok(sets.swap_remove(0))
}

fn as_u32_any(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok();
    }
    v.as_str()?.trim().parse::<u32>().ok()
}
