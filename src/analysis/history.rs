//! Match-history aggregation.
//!
//! Turns a player's recent match ids into one [`NormalizedMatchRecord`] per
//! match, seen from that player's side. Only the match-id lookup can fail the
//! whole aggregation. Individual matches that cannot be fetched or do not
//! contain the player are dropped and reported in [`MatchHistory::failures`].

use crate::api::models::{MatchSummary, ParticipantDto};
use crate::api::MatchSource;
use crate::config::{DEFAULT_DETAIL_LIMIT, DEFAULT_MATCH_COUNT};
use crate::error::AppError;
use crate::region::Region;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Victory,
    Defeat,
}

/// One player's view of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMatchRecord {
    pub id: String,
    pub champion: String,
    pub result: MatchOutcome,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kda: f64,
    pub cs: u32,
    pub gold: u32,
    pub damage: u64,
    pub vision: u32,
    /// `m:ss`
    pub duration: String,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
    pub role: String,
}

impl NormalizedMatchRecord {
    pub fn is_victory(&self) -> bool {
        self.result == MatchOutcome::Victory
    }
}

#[derive(Debug)]
pub struct MatchFailure {
    pub match_id: String,
    pub error: AppError,
}

#[derive(Debug, Default)]
pub struct MatchHistory {
    /// Most recent first.
    pub records: Vec<NormalizedMatchRecord>,
    pub failures: Vec<MatchFailure>,
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryOptions {
    /// How many match ids to ask for.
    pub count: usize,
    /// How many of those ids get their details fetched. Keeps a single
    /// lookup under the upstream burst limit.
    pub detail_limit: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        HistoryOptions {
            count: DEFAULT_MATCH_COUNT,
            detail_limit: DEFAULT_DETAIL_LIMIT,
        }
    }
}

pub struct MatchHistoryAggregator<S> {
    source: S,
    options: HistoryOptions,
}

impl<S: MatchSource> MatchHistoryAggregator<S> {
    pub fn new(source: S, options: HistoryOptions) -> Self {
        MatchHistoryAggregator { source, options }
    }

    pub fn fetch(&self, puuid: &str, region: &Region) -> Result<MatchHistory, AppError> {
        self.fetch_with_progress(puuid, region, |_| {})
    }

    /// Like [`fetch`](Self::fetch), calling `on_attempt` after each detail
    /// fetch, successful or not.
    pub fn fetch_with_progress<F>(
        &self,
        puuid: &str,
        region: &Region,
        mut on_attempt: F,
    ) -> Result<MatchHistory, AppError>
    where
        F: FnMut(&str),
    {
        let ids = self.source.match_ids(puuid, region, self.options.count)?;
        let mut history = MatchHistory::default();

        // One at a time on purpose: parallel fetches trip the burst limit.
        for match_id in ids.iter().take(self.options.detail_limit) {
            let outcome = self
                .source
                .match_by_id(match_id, region)
                .and_then(|summary| normalize_match(&summary, puuid));
            on_attempt(match_id);

            match outcome {
                Ok(record) => history.records.push(record),
                Err(error) => {
                    warn!("Skipping match {}: {}", match_id, error);
                    history.failures.push(MatchFailure {
                        match_id: match_id.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            "Aggregated {} of {} matches ({} skipped)",
            history.records.len(),
            ids.len().min(self.options.detail_limit),
            history.failures.len()
        );
        Ok(history)
    }
}

/// Projects `summary` onto the participant whose puuid is `puuid`.
pub fn normalize_match(summary: &MatchSummary, puuid: &str) -> Result<NormalizedMatchRecord, AppError> {
    let metadata = summary
        .metadata
        .as_ref()
        .ok_or_else(|| AppError::MalformedMatch("missing metadata".to_string()))?;
    let info = summary
        .info
        .as_ref()
        .ok_or_else(|| AppError::MalformedMatch(format!("{}: missing info", metadata.match_id)))?;
    let participant = info
        .participants
        .iter()
        .find(|p| p.puuid == puuid)
        .ok_or_else(|| {
            AppError::MalformedMatch(format!("{}: player not among participants", metadata.match_id))
        })?;

    Ok(NormalizedMatchRecord {
        id: metadata.match_id.clone(),
        champion: non_empty_or(&participant.champion_name, "Unknown"),
        result: if participant.win {
            MatchOutcome::Victory
        } else {
            MatchOutcome::Defeat
        },
        kills: participant.kills,
        deaths: participant.deaths,
        assists: participant.assists,
        kda: participant_kda(participant),
        cs: participant.total_minions_killed,
        gold: participant.gold_earned,
        damage: participant.total_damage_dealt_to_champions,
        vision: participant.vision_score,
        duration: format_duration(info.game_duration),
        timestamp: format_timestamp(info.game_end_timestamp),
        role: non_empty_or(&participant.lane, "UNKNOWN"),
    })
}

/// (kills + assists) / deaths, or kills + assists when the player never died.
pub fn kda(kills: u32, deaths: u32, assists: u32) -> f64 {
    let takedowns = f64::from(kills + assists);
    if deaths == 0 {
        takedowns
    } else {
        takedowns / f64::from(deaths)
    }
}

fn participant_kda(p: &ParticipantDto) -> f64 {
    kda(p.kills, p.deaths, p.assists)
}

pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn format_timestamp(end_millis: Option<i64>) -> String {
    end_millis
        .filter(|ms| *ms > 0)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{MatchInfo, MatchMetadata};
    use std::cell::RefCell;
    use std::collections::HashMap;

    const PUUID: &str = "me";

    fn summary(match_id: &str, champion: &str, win: bool, k: u32, d: u32, a: u32) -> MatchSummary {
        MatchSummary {
            metadata: Some(MatchMetadata {
                match_id: match_id.to_string(),
                participants: vec![PUUID.to_string(), "other".to_string()],
                data_version: "2".to_string(),
            }),
            info: Some(MatchInfo {
                game_duration: 1805,
                game_end_timestamp: Some(1_700_000_000_000),
                participants: vec![
                    ParticipantDto {
                        puuid: "other".to_string(),
                        champion_name: "Zed".to_string(),
                        ..Default::default()
                    },
                    ParticipantDto {
                        puuid: PUUID.to_string(),
                        champion_name: champion.to_string(),
                        kills: k,
                        deaths: d,
                        assists: a,
                        total_minions_killed: 180,
                        gold_earned: 11_000,
                        total_damage_dealt_to_champions: 21_500,
                        vision_score: 25,
                        lane: "MIDDLE".to_string(),
                        win,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }),
        }
    }

    struct FakeSource {
        ids: Result<Vec<String>, ()>,
        matches: HashMap<String, MatchSummary>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(ids: &[&str]) -> Self {
            FakeSource {
                ids: Ok(ids.iter().map(|s| s.to_string()).collect()),
                matches: HashMap::new(),
                requested: RefCell::new(Vec::new()),
            }
        }

        fn with(mut self, summary: MatchSummary) -> Self {
            let id = summary.metadata.as_ref().unwrap().match_id.clone();
            self.matches.insert(id, summary);
            self
        }
    }

    impl MatchSource for FakeSource {
        fn match_ids(&self, _: &str, _: &Region, count: usize) -> Result<Vec<String>, AppError> {
            match &self.ids {
                Ok(ids) => Ok(ids.iter().take(count).cloned().collect()),
                Err(()) => Err(AppError::Unauthorized),
            }
        }

        fn match_by_id(&self, match_id: &str, _: &Region) -> Result<MatchSummary, AppError> {
            self.requested.borrow_mut().push(match_id.to_string());
            self.matches
                .get(match_id)
                .cloned()
                .ok_or_else(|| AppError::NoResponse("timed out".to_string()))
        }
    }

    #[test]
    fn test_kda_convention() {
        assert_eq!(kda(3, 0, 2), 5.0);
        assert_eq!(kda(3, 2, 2), 2.5);
        assert_eq!(kda(0, 0, 0), 0.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(1805), "30:05");
        assert_eq!(format_duration(600), "10:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(-3), "0:00");
    }

    #[test]
    fn test_normalize_match() {
        let record = normalize_match(&summary("EUW1_1", "Ahri", true, 3, 2, 2), PUUID).unwrap();
        assert_eq!(record.id, "EUW1_1");
        assert_eq!(record.champion, "Ahri");
        assert_eq!(record.result, MatchOutcome::Victory);
        assert_eq!(record.kda, 2.5);
        assert_eq!(record.cs, 180);
        assert_eq!(record.gold, 11_000);
        assert_eq!(record.damage, 21_500);
        assert_eq!(record.vision, 25);
        assert_eq!(record.duration, "30:05");
        assert_eq!(record.timestamp, "2023-11-14T22:13:20.000Z");
        assert_eq!(record.role, "MIDDLE");
    }

    #[test]
    fn test_normalize_fills_blanks() {
        let mut s = summary("EUW1_1", "", false, 0, 0, 0);
        s.info.as_mut().unwrap().participants[1].lane.clear();
        let record = normalize_match(&s, PUUID).unwrap();
        assert_eq!(record.champion, "Unknown");
        assert_eq!(record.role, "UNKNOWN");
        assert_eq!(record.result, MatchOutcome::Defeat);
    }

    #[test]
    fn test_malformed_matches_are_rejected() {
        let no_info = MatchSummary {
            info: None,
            ..summary("EUW1_1", "Ahri", true, 1, 1, 1)
        };
        assert!(matches!(normalize_match(&no_info, PUUID), Err(AppError::MalformedMatch(_))));

        let no_meta = MatchSummary {
            metadata: None,
            ..summary("EUW1_1", "Ahri", true, 1, 1, 1)
        };
        assert!(matches!(normalize_match(&no_meta, PUUID), Err(AppError::MalformedMatch(_))));

        let stranger = summary("EUW1_1", "Ahri", true, 1, 1, 1);
        assert!(matches!(normalize_match(&stranger, "nobody"), Err(AppError::MalformedMatch(_))));
    }

    #[test]
    fn test_one_failed_fetch_is_omitted() {
        let source = FakeSource::new(&["M3", "M2", "M1"])
            .with(summary("M3", "Ahri", true, 5, 1, 5))
            .with(summary("M1", "Lux", false, 1, 5, 3));

        let history = MatchHistoryAggregator::new(&source, HistoryOptions::default())
            .fetch(PUUID, &Region::new("euw1"))
            .unwrap();

        let ids: Vec<_> = history.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["M3", "M1"]);
        assert_eq!(history.failures.len(), 1);
        assert_eq!(history.failures[0].match_id, "M2");
        assert!(matches!(history.failures[0].error, AppError::NoResponse(_)));
    }

    #[test]
    fn test_detail_fetches_are_capped() {
        let ids: Vec<String> = (0..20).map(|i| format!("M{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut source = FakeSource::new(&id_refs);
        for id in &ids {
            source = source.with(summary(id, "Ahri", true, 1, 1, 1));
        }

        let mut attempts = 0;
        let history = MatchHistoryAggregator::new(&source, HistoryOptions::default())
            .fetch_with_progress(PUUID, &Region::new("euw1"), |_| attempts += 1)
            .unwrap();

        assert_eq!(history.records.len(), 5);
        assert_eq!(attempts, 5);
        assert_eq!(*source.requested.borrow(), vec!["M0", "M1", "M2", "M3", "M4"]);
    }

    #[test]
    fn test_player_missing_from_match_is_skipped() {
        let mut foreign = summary("M2", "Ahri", true, 1, 1, 1);
        foreign.info.as_mut().unwrap().participants.retain(|p| p.puuid != PUUID);
        let source = FakeSource::new(&["M1", "M2"])
            .with(summary("M1", "Lux", true, 2, 2, 2))
            .with(foreign);

        let history = MatchHistoryAggregator::new(&source, HistoryOptions::default())
            .fetch(PUUID, &Region::new("euw1"))
            .unwrap();
        assert_eq!(history.records.len(), 1);
        assert!(matches!(history.failures[0].error, AppError::MalformedMatch(_)));
    }

    #[test]
    fn test_match_id_failure_propagates() {
        let source = FakeSource {
            ids: Err(()),
            matches: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        };
        let err = MatchHistoryAggregator::new(&source, HistoryOptions::default())
            .fetch(PUUID, &Region::new("euw1"))
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
