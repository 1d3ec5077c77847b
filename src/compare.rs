use anyhow::{Context, Result, anyhow};

use crate::table::{PlayerSeasonRow, StatLine};

// Window width on each side of the target season, in seasons.
const WINDOW_SEASONS: i32 = 2;

/// Per-player window averages in target-table order. Re-inserting a player
/// keeps the first-seen position but overwrites the value (last write wins).
#[derive(Debug, Clone, Default)]
pub struct AverageTable {
    entries: Vec<(String, StatLine)>,
}

impl AverageTable {
    fn upsert(&mut self, player: &str, stats: StatLine) {
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| name == player) {
            slot.1 = stats;
        } else {
            self.entries.push((player.to_string(), stats));
        }
    }

    pub fn entries(&self) -> &[(String, StatLine)] {
        &self.entries
    }

    pub fn get(&self, player: &str) -> Option<&StatLine> {
        self.entries
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, stats)| stats)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Start year of a season label: the token before the first `-`, so both
/// `"2019-20"` and a bare `"2019"` resolve to 2019. Anything else is an
/// error that aborts the comparison.
pub fn season_start_year(season: &str) -> Result<i32> {
    let token = season.split('-').next().unwrap_or(season);
    token
        .trim()
        .parse::<i32>()
        .with_context(|| format!("invalid season label `{season}`"))
}

/// For each target row compute the mean of that player's baseline stats in
/// the two seasons before and the two after the target season. An empty
/// window yields undefined (NaN) stats for that side, not an error.
pub fn compare_windows(
    baseline: &[PlayerSeasonRow],
    target: &[PlayerSeasonRow],
) -> Result<(AverageTable, AverageTable)> {
    let mut before = AverageTable::default();
    let mut after = AverageTable::default();

    for row in target {
        let season = row
            .season
            .as_deref()
            .ok_or_else(|| anyhow!("target row for `{}` has no season", row.player))?;
        let target_year = season_start_year(season)?;

        let mut before_window = Vec::new();
        let mut after_window = Vec::new();
        for base in baseline.iter().filter(|base| base.player == row.player) {
            let base_season = base
                .season
                .as_deref()
                .ok_or_else(|| anyhow!("baseline row for `{}` has no season", base.player))?;
            let year = season_start_year(base_season)?;
            if year >= target_year - WINDOW_SEASONS && year < target_year {
                before_window.push(base.stats);
            } else if year > target_year && year <= target_year + WINDOW_SEASONS {
                after_window.push(base.stats);
            }
        }

        before.upsert(&row.player, mean_stats(&before_window));
        after.upsert(&row.player, mean_stats(&after_window));
    }

    Ok((before, after))
}

fn mean_stats(window: &[StatLine]) -> StatLine {
    if window.is_empty() {
        return StatLine::undefined();
    }
    let n = window.len() as f64;
    StatLine {
        pts: window.iter().map(|s| s.pts).sum::<f64>() / n,
        ast: window.iter().map(|s| s.ast).sum::<f64>() / n,
        reb: window.iter().map(|s| s.reb).sum::<f64>() / n,
        fg_pct: window.iter().map(|s| s.fg_pct).sum::<f64>() / n,
    }
}
