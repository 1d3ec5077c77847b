use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::compare::AverageTable;
use crate::fetch::SeasonAverage;

pub const STAT_COLUMNS: [&str; 4] = ["PTS", "AST", "REB", "FG_PCT"];

/// The four tracked per-game stats. NaN encodes "undefined" (the mean of an
/// empty window); it never appears in parsed input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatLine {
    pub pts: f64,
    pub ast: f64,
    pub reb: f64,
    pub fg_pct: f64,
}

impl StatLine {
    pub fn undefined() -> Self {
        Self {
            pts: f64::NAN,
            ast: f64::NAN,
            reb: f64::NAN,
            fg_pct: f64::NAN,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.pts.is_nan() && self.ast.is_nan() && self.reb.is_nan() && self.fg_pct.is_nan()
    }
}

/// One baseline/target row after the combined label has been split.
/// `season` is None when the label carried no delimiter at all; the
/// comparator rejects such rows only if it actually has to inspect them.
#[derive(Debug, Clone)]
pub struct PlayerSeasonRow {
    pub player: String,
    pub season: Option<String>,
    pub stats: StatLine,
}

/// Split a combined `"<Player>_<Season>"` label on the LAST underscore only;
/// player names may contain the delimiter, season labels never do.
pub fn split_label(label: &str) -> (String, Option<String>) {
    match label.rsplit_once('_') {
        Some((player, season)) => (player.to_string(), Some(season.to_string())),
        None => (label.to_string(), None),
    }
}

/// Read a baseline/target CSV: leading combined-label column (any header
/// name), stat columns located by name. Stat cells must parse as numbers;
/// bad shapes fail here rather than somewhere downstream.
pub fn read_player_season_table(path: &Path) -> Result<Vec<PlayerSeasonRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open table {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .clone();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("{} has no {name} column", path.display()))
    };
    let pts = column("PTS")?;
    let ast = column("AST")?;
    let reb = column("REB")?;
    let fg_pct = column("FG_PCT")?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read row {} of {}", i + 1, path.display()))?;
        let label = record.get(0).unwrap_or_default();
        let (player, season) = split_label(label);

        let cell = |idx: usize| -> Result<f64> {
            let raw = record.get(idx).unwrap_or_default().trim();
            raw.parse::<f64>().with_context(|| {
                format!(
                    "non-numeric stat value `{raw}` for `{label}` in {}",
                    path.display()
                )
            })
        };

        rows.push(PlayerSeasonRow {
            player,
            season,
            stats: StatLine {
                pts: cell(pts)?,
                ast: cell(ast)?,
                reb: cell(reb)?,
                fg_pct: cell(fg_pct)?,
            },
        });
    }
    Ok(rows)
}

/// Write a before/after average table, one row per player in table order.
/// Undefined stats serialize as empty cells.
pub fn write_average_table(path: &Path, table: &AverageTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create table {}", path.display()))?;
    let mut header = vec!["Player"];
    header.extend(STAT_COLUMNS);
    writer.write_record(&header).context("write header")?;
    for (player, stats) in table.entries() {
        let row = [
            player.clone(),
            format_stat(stats.pts),
            format_stat(stats.ast),
            format_stat(stats.reb),
            format_stat(stats.fg_pct),
        ];
        writer
            .write_record(&row)
            .with_context(|| format!("write row for {player}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// Write fetcher output in the baseline shape the comparator reads back:
/// combined label column plus the requested stats in request order.
pub fn write_season_averages(
    path: &Path,
    averages: &[SeasonAverage],
    target_stats: &[String],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create table {}", path.display()))?;

    let mut header = vec!["Player_Season".to_string()];
    header.extend(target_stats.iter().cloned());
    writer.write_record(&header).context("write header")?;

    for entry in averages {
        let mut row = vec![entry.key.clone()];
        for stat in target_stats {
            row.push(match entry.stats.get(stat) {
                Some(value) => format_stat(*value),
                None => String::new(),
            });
        }
        writer
            .write_record(&row)
            .with_context(|| format!("write row for {}", entry.key))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{format_stat, split_label};

    #[test]
    fn split_label_takes_last_delimiter() {
        assert_eq!(
            split_label("LeBron James_2019-20"),
            ("LeBron James".to_string(), Some("2019-20".to_string()))
        );
        // Player names may themselves contain the delimiter.
        assert_eq!(
            split_label("Smith_Jones Jr_2021-22"),
            ("Smith_Jones Jr".to_string(), Some("2021-22".to_string()))
        );
    }

    #[test]
    fn split_label_without_delimiter_has_no_season() {
        assert_eq!(split_label("LeBron James"), ("LeBron James".to_string(), None));
    }

    #[test]
    fn split_and_rejoin_round_trips() {
        for label in ["A_2019", "First Last_2019-20", "a_b_c_2022-23"] {
            let (player, season) = split_label(label);
            assert_eq!(format!("{player}_{}", season.unwrap()), label);
        }
    }

    #[test]
    fn undefined_stat_serializes_empty() {
        assert_eq!(format_stat(f64::NAN), "");
        assert_eq!(format_stat(21.0), "21");
    }
}
