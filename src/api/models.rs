use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Account V1 response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

// Summoner V4 response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub account_id: String,
    pub puuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_icon_id: i32,
    pub summoner_level: i64,
    #[serde(default)]
    pub revision_date: i64,
}

// League V4 response, one entry per ranked queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    #[serde(default)]
    pub league_id: String,
    #[serde(default)]
    pub summoner_id: String,
    #[serde(default)]
    pub summoner_name: String,
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i32,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub veteran: bool,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub fresh_blood: bool,
    #[serde(default)]
    pub hot_streak: bool,
}

impl LeagueEntryDto {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }
}

// Match V5 response. Both sections are optional so that a partial record
// can be skipped by the aggregator instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSummary {
    #[serde(default)]
    pub metadata: Option<MatchMetadata>,
    #[serde(default)]
    pub info: Option<MatchInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchMetadata {
    pub match_id: String,
    pub participants: Vec<String>,
    pub data_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchInfo {
    pub game_creation: i64,
    /// Seconds.
    pub game_duration: i64,
    pub game_end_timestamp: Option<i64>,
    pub game_start_timestamp: Option<i64>,
    pub game_id: i64,
    pub game_mode: String,
    pub game_type: String,
    pub game_version: String,
    pub map_id: i32,
    pub participants: Vec<ParticipantDto>,
    pub platform_id: String,
    pub queue_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantDto {
    pub puuid: String,
    pub participant_id: i32,
    pub summoner_id: String,
    pub summoner_name: String,
    pub team_id: i32,
    pub champion_id: i32,
    pub champion_name: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub lane: String,  // TOP, JUNGLE, MIDDLE, BOTTOM, NONE
    pub role: String,  // SOLO, CARRY, SUPPORT, NONE
    pub total_minions_killed: u32,
    pub gold_earned: u32,
    pub total_damage_dealt_to_champions: u64,
    pub vision_score: u32,
    pub win: bool,
}

// Data Dragon champion.json response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataDragonChampions {
    pub data: BTreeMap<String, ChampionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionDto {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<ChampionImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionImage {
    pub full: String,
    pub sprite: String,
    pub group: String,
}
