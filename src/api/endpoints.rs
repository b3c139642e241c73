// Upstream URL builders. User-supplied path segments are percent-encoded here
// so the service layer never formats raw names into a URL.

use crate::region::{Continent, Region};
use urlencoding::encode;

pub const DATA_DRAGON_BASE: &str = "https://ddragon.leagueoflegends.com";

/// Rate-limit bucket names, one per upstream method.
pub mod bucket {
    pub const SUMMONER_BY_NAME: &str = "summoner-by-name";
    pub const SUMMONER_BY_PUUID: &str = "summoner-by-puuid";
    pub const ACCOUNT_BY_RIOT_ID: &str = "account-by-riot-id";
    pub const LEAGUE_ENTRIES: &str = "league-entries";
    pub const LEAGUE_TIER_DIVISION: &str = "league-tier-division";
    pub const MATCH_IDS: &str = "match-ids";
    pub const MATCH_BY_ID: &str = "match-by-id";
}

pub fn summoner_by_name(region: &Region, name: &str) -> String {
    format!(
        "https://{}/lol/summoner/v4/summoners/by-name/{}",
        region.platform_host(),
        encode(name)
    )
}

pub fn summoner_by_puuid(region: &Region, puuid: &str) -> String {
    format!(
        "https://{}/lol/summoner/v4/summoners/by-puuid/{}",
        region.platform_host(),
        encode(puuid)
    )
}

pub fn account_by_riot_id(continent: Continent, game_name: &str, tag_line: &str) -> String {
    format!(
        "https://{}/riot/account/v1/accounts/by-riot-id/{}/{}",
        continent.host(),
        encode(game_name),
        encode(tag_line)
    )
}

pub fn league_entries_by_summoner(region: &Region, summoner_id: &str) -> String {
    format!(
        "https://{}/lol/league/v4/entries/by-summoner/{}",
        region.platform_host(),
        encode(summoner_id)
    )
}

pub fn league_entries_by_tier(region: &Region, queue: &str, tier: &str, division: &str) -> String {
    format!(
        "https://{}/lol/league/v4/entries/{}/{}/{}",
        region.platform_host(),
        encode(queue),
        encode(tier),
        encode(division)
    )
}

pub fn match_ids_by_puuid(continent: Continent, puuid: &str, start: usize, count: usize) -> String {
    format!(
        "https://{}/lol/match/v5/matches/by-puuid/{}/ids?start={}&count={}",
        continent.host(),
        encode(puuid),
        start,
        count
    )
}

pub fn match_by_id(continent: Continent, match_id: &str) -> String {
    format!(
        "https://{}/lol/match/v5/matches/{}",
        continent.host(),
        encode(match_id)
    )
}

pub fn champion_rotations(region: &Region) -> String {
    format!(
        "https://{}/lol/platform/v3/champion-rotations",
        region.platform_host()
    )
}

pub fn versions() -> String {
    format!("{}/api/versions.json", DATA_DRAGON_BASE)
}

pub fn champion_catalog(version: &str, locale: &str) -> String {
    format!(
        "{}/cdn/{}/data/{}/champion.json",
        DATA_DRAGON_BASE,
        encode(version),
        encode(locale)
    )
}
