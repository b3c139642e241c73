use super::history::{kda, NormalizedMatchRecord};
use super::stats::round_to;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_TOP_CHAMPIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionStats {
    pub name: String,
    pub games: usize,
    pub wins: usize,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

impl ChampionStats {
    pub fn new(name: String) -> Self {
        ChampionStats {
            name,
            games: 0,
            wins: 0,
            kills: 0,
            deaths: 0,
            assists: 0,
        }
    }

    /// Whole percent.
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            (self.wins as f64 / self.games as f64 * 100.0).round()
        }
    }

    /// One decimal, zero-death convention.
    pub fn kda(&self) -> f64 {
        if self.deaths == 0 {
            kda(self.kills, self.deaths, self.assists)
        } else {
            round_to(kda(self.kills, self.deaths, self.assists), 1)
        }
    }
}

/// Per-champion totals, remembering the order champions were first seen.
#[derive(Debug, Default)]
pub struct ChampionStatsTracker {
    index: HashMap<String, usize>,
    stats: Vec<ChampionStats>,
}

impl ChampionStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[NormalizedMatchRecord]) -> Self {
        let mut tracker = Self::new();
        for record in records {
            tracker.add_match(record);
        }
        tracker
    }

    pub fn add_match(&mut self, record: &NormalizedMatchRecord) {
        let slot = match self.index.get(&record.champion) {
            Some(&slot) => slot,
            None => {
                self.stats.push(ChampionStats::new(record.champion.clone()));
                self.index.insert(record.champion.clone(), self.stats.len() - 1);
                self.stats.len() - 1
            }
        };

        let entry = &mut self.stats[slot];
        entry.games += 1;
        if record.is_victory() {
            entry.wins += 1;
        }
        entry.kills += record.kills;
        entry.deaths += record.deaths;
        entry.assists += record.assists;
    }

    pub fn get_champion(&self, name: &str) -> Option<&ChampionStats> {
        self.index.get(name).map(|&slot| &self.stats[slot])
    }

    /// The `n` most played champions. Equal game counts keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<ChampionStats> {
        let mut sorted = self.stats.clone();
        sorted.sort_by(|a, b| b.games.cmp(&a.games));
        sorted.truncate(n);
        sorted
    }
}
