//! Aggregate statistics over a normalized match history.
//!
//! Every function here is pure and accepts an empty slice, which means
//! "no games played" and yields zeros or empty series.

use super::history::{kda, NormalizedMatchRecord};
use chrono::DateTime;
use serde::Serialize;

pub const DEFAULT_TREND_LENGTH: usize = 10;
pub const DEFAULT_PROGRESSION_LENGTH: usize = 7;

/// Illustrative rank averages for the comparison chart. These are fixed
/// reference points, not derived from population data.
pub const BASELINE_KDA: f64 = 3.2;
pub const BASELINE_CS_PER_MIN: f64 = 6.5;
pub const BASELINE_VISION_PER_MIN: f64 = 0.6;
pub const BASELINE_DAMAGE_PER_MIN: f64 = 720.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteChampion {
    pub name: String,
    pub games: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// 1-based game label, oldest game lowest.
    pub game: usize,
    pub kda: f64,
    pub cs: u32,
    /// Damage to champions, in thousands.
    pub damage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinRatePoint {
    /// `month/day` of the game's end, empty when the timestamp is unreadable.
    pub date: String,
    /// Whole percent.
    pub win_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetric {
    pub name: &'static str,
    pub value: f64,
    pub baseline: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub stat: &'static str,
    pub value: u32,
    pub full_mark: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub average_kda: f64,
    pub average_kills: f64,
    pub average_deaths: f64,
    pub average_assists: f64,
    /// Empty when there are no games.
    pub favorite_champion: String,
    pub favorite_champion_games: usize,
    pub favorite_champion_win_rate: f64,
    pub cs_per_minute: f64,
    pub vision_per_minute: f64,
    pub damage_per_minute: f64,
    pub trend: Vec<TrendPoint>,
    pub win_rate_progression: Vec<WinRatePoint>,
}

impl AggregateStats {
    pub fn from_records(records: &[NormalizedMatchRecord], trend_length: usize) -> Self {
        let wins = victories(records);
        let favorite = favorite_champion(records);

        AggregateStats {
            total_games: records.len(),
            wins,
            losses: records.len() - wins,
            win_rate: win_rate(records),
            average_kda: average_kda(records),
            average_kills: average_per_game(records, |r| f64::from(r.kills)),
            average_deaths: average_per_game(records, |r| f64::from(r.deaths)),
            average_assists: average_per_game(records, |r| f64::from(r.assists)),
            favorite_champion: favorite.as_ref().map(|f| f.name.clone()).unwrap_or_default(),
            favorite_champion_games: favorite.as_ref().map_or(0, |f| f.games),
            favorite_champion_win_rate: favorite.as_ref().map_or(0.0, |f| f.win_rate),
            cs_per_minute: cs_per_minute(records),
            vision_per_minute: vision_per_minute(records),
            damage_per_minute: damage_per_minute(records),
            trend: trend(records, trend_length),
            win_rate_progression: win_rate_progression(records, DEFAULT_PROGRESSION_LENGTH),
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn victories(records: &[NormalizedMatchRecord]) -> usize {
    records.iter().filter(|r| r.is_victory()).count()
}

/// Percentage of victories, one decimal.
pub fn win_rate(records: &[NormalizedMatchRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    round_to(victories(records) as f64 / records.len() as f64 * 100.0, 1)
}

/// KDA over summed kills, deaths and assists, two decimals. With zero total
/// deaths this is the raw takedown count.
pub fn average_kda(records: &[NormalizedMatchRecord]) -> f64 {
    let (kills, deaths, assists) = records.iter().fold((0, 0, 0), |(k, d, a), r| {
        (k + r.kills, d + r.deaths, a + r.assists)
    });
    if deaths == 0 {
        kda(kills, deaths, assists)
    } else {
        round_to(kda(kills, deaths, assists), 2)
    }
}

/// Per-game mean of `metric`, one decimal.
pub fn average_per_game<F>(records: &[NormalizedMatchRecord], metric: F) -> f64
where
    F: Fn(&NormalizedMatchRecord) -> f64,
{
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(metric).sum();
    round_to(total / records.len() as f64, 1)
}

/// Parses `m:ss` into fractional minutes.
pub fn parse_duration_minutes(duration: &str) -> Option<f64> {
    let (minutes, seconds) = duration.split_once(':')?;
    let minutes: f64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    Some(minutes + seconds / 60.0)
}

/// Mean of the per-match `metric / minutes` ratios. This is an average of
/// ratios, so a short stomp weighs as much as a long game. Matches with a
/// zero or unreadable duration are left out.
pub fn per_minute_rate<F>(records: &[NormalizedMatchRecord], metric: F) -> f64
where
    F: Fn(&NormalizedMatchRecord) -> f64,
{
    let ratios: Vec<f64> = records
        .iter()
        .filter_map(|r| {
            let minutes = parse_duration_minutes(&r.duration).filter(|m| *m > 0.0)?;
            Some(metric(r) / minutes)
        })
        .collect();

    if ratios.is_empty() {
        0.0
    } else {
        ratios.iter().sum::<f64>() / ratios.len() as f64
    }
}

pub fn cs_per_minute(records: &[NormalizedMatchRecord]) -> f64 {
    per_minute_rate(records, |r| f64::from(r.cs))
}

pub fn vision_per_minute(records: &[NormalizedMatchRecord]) -> f64 {
    per_minute_rate(records, |r| f64::from(r.vision))
}

pub fn damage_per_minute(records: &[NormalizedMatchRecord]) -> f64 {
    per_minute_rate(records, |r| r.damage as f64)
}

/// Most played champion. Ties go to the champion seen first, which for a
/// most-recent-first history is the one played most recently.
pub fn favorite_champion(records: &[NormalizedMatchRecord]) -> Option<FavoriteChampion> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(name, _)| *name == record.champion) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.champion.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts {
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((name, count));
        }
    }

    let (name, games) = best?;
    let wins = records
        .iter()
        .filter(|r| r.champion == name && r.is_victory())
        .count();

    Some(FavoriteChampion {
        name: name.to_string(),
        games,
        win_rate: round_to(wins as f64 / games as f64 * 100.0, 1),
    })
}

/// The `length` most recent games in chronological order, for charting.
pub fn trend(records: &[NormalizedMatchRecord], length: usize) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = records
        .iter()
        .take(length)
        .enumerate()
        .map(|(index, r)| TrendPoint {
            game: records.len() - index,
            kda: r.kda,
            cs: r.cs,
            damage: r.damage as f64 / 1000.0,
        })
        .collect();
    points.reverse();
    points
}

/// The player's averages next to the illustrative baselines.
/// Win rate as of each of the `length` most recent games, oldest first. The
/// point for a game counts that game and every older one in the history.
pub fn win_rate_progression(records: &[NormalizedMatchRecord], length: usize) -> Vec<WinRatePoint> {
    let mut points: Vec<WinRatePoint> = records
        .iter()
        .take(length)
        .enumerate()
        .map(|(index, r)| {
            let played = &records[index..];
            WinRatePoint {
                date: short_date(&r.timestamp),
                win_rate: (victories(played) as f64 / played.len() as f64 * 100.0).round() as u32,
            }
        })
        .collect();
    points.reverse();
    points
}

fn short_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.format("%-m/%-d").to_string())
        .unwrap_or_default()
}

pub fn comparison(records: &[NormalizedMatchRecord]) -> Vec<ComparisonMetric> {
    if records.is_empty() {
        return Vec::new();
    }

    vec![
        ComparisonMetric {
            name: "KDA",
            value: average_kda(records),
            baseline: BASELINE_KDA,
        },
        ComparisonMetric {
            name: "CS/min",
            value: round_to(cs_per_minute(records), 1),
            baseline: BASELINE_CS_PER_MIN,
        },
        ComparisonMetric {
            name: "Vision/min",
            value: round_to(vision_per_minute(records), 1),
            baseline: BASELINE_VISION_PER_MIN,
        },
        ComparisonMetric {
            name: "DMG/min",
            value: round_to(damage_per_minute(records), 0),
            baseline: BASELINE_DAMAGE_PER_MIN,
        },
    ]
}

/// Play-style radar. The scores are placeholders until a population
/// baseline exists; only their presence depends on the input.
pub fn radar(records: &[NormalizedMatchRecord]) -> Vec<RadarPoint> {
    if records.is_empty() {
        return Vec::new();
    }

    [
        ("KDA", 75),
        ("CS", 82),
        ("Damage", 90),
        ("Gold", 70),
        ("Vision", 60),
        ("Objective", 85),
    ]
    .into_iter()
    .map(|(stat, value)| RadarPoint {
        stat,
        value,
        full_mark: 100,
    })
    .collect()
}
