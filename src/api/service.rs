use crate::config::Config;
use crate::error::AppError;
use crate::region::{Continent, Region, SUPPORTED_REGIONS};
use crate::resolved::Resolved;
use std::collections::BTreeMap;
use tracing::{error, warn};

use super::client::RiotHttpClient;
use super::endpoints::{self, bucket};
use super::models::*;
use super::MatchSource;

/// Served when the live version list cannot be fetched.
pub const FALLBACK_VERSION: &str = "15.5.1";

/// Splits `Name#TAG`. `Ok(None)` means the input has no tag and should be
/// looked up as a plain summoner name.
pub fn parse_riot_id(input: &str) -> Result<Option<(&str, &str)>, AppError> {
    match input.trim().split_once('#') {
        None => Ok(None),
        Some((name, tag)) => {
            let (name, tag) = (name.trim(), tag.trim());
            if name.is_empty() || tag.is_empty() || tag.contains('#') {
                Err(AppError::InvalidRiotId)
            } else {
                Ok(Some((name, tag)))
            }
        }
    }
}

/// Typed access to the game-data API.
pub struct RiotService {
    client: RiotHttpClient,
    locale: String,
}

impl RiotService {
    pub fn new(config: &Config) -> Self {
        Self::with_client(RiotHttpClient::new(config), &config.locale)
    }

    pub fn with_client(client: RiotHttpClient, locale: &str) -> Self {
        RiotService {
            client,
            locale: locale.to_string(),
        }
    }

    pub fn get_summoner_by_name(&self, name: &str, region: &Region) -> Result<SummonerDto, AppError> {
        let url = endpoints::summoner_by_name(region, name);
        self.client.get_json(&url, bucket::SUMMONER_BY_NAME)
    }

    pub fn get_summoner_by_puuid(&self, puuid: &str, region: &Region) -> Result<SummonerDto, AppError> {
        let url = endpoints::summoner_by_puuid(region, puuid);
        self.client.get_json(&url, bucket::SUMMONER_BY_PUUID)
    }

    pub fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &Region,
    ) -> Result<AccountDto, AppError> {
        let url = endpoints::account_by_riot_id(self.route(region), game_name, tag_line);
        self.client.get_json(&url, bucket::ACCOUNT_BY_RIOT_ID)
    }

    pub fn get_league_entries(
        &self,
        summoner_id: &str,
        region: &Region,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = endpoints::league_entries_by_summoner(region, summoner_id);
        self.client.get_json(&url, bucket::LEAGUE_ENTRIES)
    }

    pub fn get_league_by_tier_division(
        &self,
        queue: &str,
        tier: &str,
        division: &str,
        region: &Region,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = endpoints::league_entries_by_tier(region, queue, tier, division);
        self.client.get_json(&url, bucket::LEAGUE_TIER_DIVISION)
    }

    pub fn get_match_ids_by_puuid(
        &self,
        puuid: &str,
        region: &Region,
        count: usize,
    ) -> Result<Vec<String>, AppError> {
        let url = endpoints::match_ids_by_puuid(self.route(region), puuid, 0, count);
        self.client.get_json(&url, bucket::MATCH_IDS)
    }

    pub fn get_match_by_id(&self, match_id: &str, region: &Region) -> Result<MatchSummary, AppError> {
        let url = endpoints::match_by_id(self.route(region), match_id);
        self.client.get_json(&url, bucket::MATCH_BY_ID)
    }

    /// Latest game version. Never fails: when the version list is unreachable
    /// or empty, [`FALLBACK_VERSION`] is returned as a fallback, which may be
    /// several patches behind.
    pub fn get_current_version(&self) -> Resolved<String> {
        let result = self
            .client
            .get_static_json::<Vec<String>>(&endpoints::versions())
            .and_then(|versions| {
                versions
                    .into_iter()
                    .next()
                    .ok_or_else(|| AppError::Json("empty version list".to_string()))
            });

        match result {
            Ok(version) => Resolved::Exact(version),
            Err(e) => {
                error!("Error getting game version: {}", e);
                Resolved::fallback(FALLBACK_VERSION.to_string(), e.to_string())
            }
        }
    }

    /// Full champion catalog for `version`, keyed by champion id.
    pub fn get_all_champions(&self, version: &str) -> Result<BTreeMap<String, ChampionDto>, AppError> {
        let url = endpoints::champion_catalog(version, &self.locale);
        match self.client.get_static_json::<DataDragonChampions>(&url) {
            Ok(catalog) => Ok(catalog.data),
            Err(e) => {
                error!("Error getting champions: {}", e);
                Err(e)
            }
        }
    }

    /// True iff a cheap authenticated endpoint accepts the credential.
    pub fn is_api_key_valid(&self) -> bool {
        let region = Region::new(SUPPORTED_REGIONS[0].0);
        match self.client.probe(&endpoints::champion_rotations(&region)) {
            Ok(valid) => valid,
            Err(e) => {
                error!("Error validating API key: {}", e);
                false
            }
        }
    }

    fn route(&self, region: &Region) -> Continent {
        let route = region.continental_route();
        if let Some(reason) = route.reason() {
            warn!("{}", reason);
        }
        route.into_value()
    }
}

impl MatchSource for RiotService {
    fn match_ids(&self, puuid: &str, region: &Region, count: usize) -> Result<Vec<String>, AppError> {
        self.get_match_ids_by_puuid(puuid, region, count)
    }

    fn match_by_id(&self, match_id: &str, region: &Region) -> Result<MatchSummary, AppError> {
        self.get_match_by_id(match_id, region)
    }
}
