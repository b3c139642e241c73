use super::stats::round_to;
use crate::api::models::LeagueEntryDto;
use serde::Serialize;

pub const MAX_LADDER_ROWS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderRow {
    pub rank: usize,
    pub summoner_name: String,
    pub tier: String,
    pub division: String,
    pub league_points: i32,
    pub win_rate: f64,
    pub games: u32,
    pub hot_streak: bool,
}

/// Win percentage of a ranked entry, one decimal.
pub fn entry_win_rate(entry: &LeagueEntryDto) -> f64 {
    let games = entry.games();
    if games == 0 {
        0.0
    } else {
        round_to(f64::from(entry.wins) / f64::from(games) * 100.0, 1)
    }
}

/// Rows for a tier/division listing, in upstream order, filtered by a
/// case-insensitive name search and capped at [`MAX_LADDER_ROWS`].
pub fn ladder(entries: &[LeagueEntryDto], search: &str) -> Vec<LadderRow> {
    let needle = search.trim().to_lowercase();

    entries
        .iter()
        .filter(|e| needle.is_empty() || e.summoner_name.to_lowercase().contains(&needle))
        .take(MAX_LADDER_ROWS)
        .enumerate()
        .map(|(index, e)| LadderRow {
            rank: index + 1,
            summoner_name: e.summoner_name.clone(),
            tier: e.tier.clone(),
            division: e.rank.clone(),
            league_points: e.league_points,
            win_rate: entry_win_rate(e),
            games: e.games(),
            hot_streak: e.hot_streak,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, wins: u32, losses: u32) -> LeagueEntryDto {
        LeagueEntryDto {
            league_id: String::new(),
            summoner_id: format!("id-{}", name),
            summoner_name: name.to_string(),
            queue_type: "RANKED_SOLO_5x5".to_string(),
            tier: "DIAMOND".to_string(),
            rank: "I".to_string(),
            league_points: 50,
            wins,
            losses,
            veteran: false,
            inactive: false,
            fresh_blood: false,
            hot_streak: false,
        }
    }

    #[test]
    fn test_entry_win_rate() {
        assert_eq!(entry_win_rate(&entry("a", 2, 1)), 66.7);
        assert_eq!(entry_win_rate(&entry("a", 0, 0)), 0.0);
    }

    #[test]
    fn test_search_is_case_insensitive_and_reranks() {
        let entries = vec![entry("Alpha", 10, 10), entry("bravo", 5, 5), entry("ALPHAWOLF", 1, 0)];
        let rows = ladder(&entries, " alpha ");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].summoner_name, "ALPHAWOLF");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].win_rate, 100.0);
    }

    #[test]
    fn test_capped_at_max_rows() {
        let entries: Vec<_> = (0..250).map(|i| entry(&format!("p{}", i), 1, 1)).collect();
        let rows = ladder(&entries, "");
        assert_eq!(rows.len(), MAX_LADDER_ROWS);
        assert_eq!(rows.last().unwrap().rank, MAX_LADDER_ROWS);
    }
}
