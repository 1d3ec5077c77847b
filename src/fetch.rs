use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::provider::{GameLog, StatsProvider};

pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Pause between successive provider requests. The real pacer is a fixed
/// sleep; tests plug in a no-op so they run without real delays.
pub trait Pacer {
    fn pause(&self);
}

pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY)
    }
}

impl Pacer for FixedDelay {
    fn pause(&self) {
        thread::sleep(self.delay);
    }
}

/// One validated (player, season) result: the combined key plus the mean of
/// each requested stat over that season's games.
#[derive(Debug, Clone)]
pub struct SeasonAverage {
    pub key: String,
    pub stats: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub averages: Vec<SeasonAverage>,
    pub skipped: Vec<String>,
}

enum LogOutcome {
    Averages(HashMap<String, f64>),
    Skipped(String),
}

/// Fetch per-season stat averages for the given players.
///
/// Players whose name resolves to nothing are skipped silently. Seasons whose
/// game log fails validation are skipped with a diagnostic on stderr (also
/// collected in the report). Transport errors propagate and abort the run.
pub fn fetch_season_averages(
    provider: &dyn StatsProvider,
    pacer: &dyn Pacer,
    players_seasons: &[(String, Vec<String>)],
    target_stats: &[String],
) -> Result<FetchReport> {
    let mut report = FetchReport::default();

    for (name, seasons) in players_seasons {
        let matches = provider.find_players_by_full_name(name)?;
        let Some(player) = matches.first() else {
            continue;
        };
        for season in seasons {
            pacer.pause();
            let log = provider.player_game_log(player.id, season)?;
            match validate_and_average(&log, player.id, season, target_stats)? {
                LogOutcome::Averages(stats) => report.averages.push(SeasonAverage {
                    key: format!("{name}_{season}"),
                    stats,
                }),
                LogOutcome::Skipped(message) => {
                    eprintln!("{message}");
                    report.skipped.push(message);
                }
            }
        }
    }

    Ok(report)
}

// Validation order matters: empty log, then missing values, then types.
// A requested stat absent from the headers entirely is a hard error.
fn validate_and_average(
    log: &GameLog,
    player_id: u32,
    season: &str,
    target_stats: &[String],
) -> Result<LogOutcome> {
    if log.is_empty() {
        return Ok(LogOutcome::Skipped(format!(
            "No data available for player ID {player_id} in the {season} season."
        )));
    }

    let mut columns = Vec::with_capacity(target_stats.len());
    for stat in target_stats {
        let idx = log
            .column_index(stat)
            .ok_or_else(|| anyhow!("game log has no {stat} column"))?;
        columns.push((stat.as_str(), idx));
    }

    for (_, idx) in &columns {
        if log
            .rows
            .iter()
            .any(|row| row.get(*idx).is_none_or(Value::is_null))
        {
            return Ok(LogOutcome::Skipped(format!(
                "Missing data for player ID {player_id} in the {season} season."
            )));
        }
    }

    for (_, idx) in &columns {
        if !log.rows.iter().all(|row| row[*idx].is_number()) {
            return Ok(LogOutcome::Skipped(format!(
                "Incorrect data types for player ID {player_id} in the {season} season."
            )));
        }
    }

    let games = log.rows.len() as f64;
    let mut stats = HashMap::with_capacity(columns.len());
    for (stat, idx) in columns {
        let total: f64 = log.rows.iter().filter_map(|row| row[idx].as_f64()).sum();
        stats.insert(stat.to_string(), total / games);
    }
    Ok(LogOutcome::Averages(stats))
}
