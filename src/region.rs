//! Platform region routing.
//!
//! Summoner and league endpoints live on a platform host (`euw1`, `na1`, ...),
//! while match and account endpoints live on one of four continental hosts.

use crate::resolved::Resolved;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Continental routing value used by the match and account APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Continent {
    Americas,
    Europe,
    Asia,
    Sea,
}

/// Where unknown platforms are routed.
pub const DEFAULT_CONTINENT: Continent = Continent::Europe;

impl Continent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::Americas => "americas",
            Continent::Europe => "europe",
            Continent::Asia => "asia",
            Continent::Sea => "sea",
        }
    }

    pub fn host(&self) -> String {
        format!("{}.api.riotgames.com", self.as_str())
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported platforms, in the order they are offered to users.
pub const SUPPORTED_REGIONS: &[(&str, &str, Continent)] = &[
    ("euw1", "Europe West", Continent::Europe),
    ("eun1", "Europe Nordic & East", Continent::Europe),
    ("na1", "North America", Continent::Americas),
    ("kr", "Korea", Continent::Asia),
    ("br1", "Brazil", Continent::Americas),
    ("la1", "Latin America North", Continent::Americas),
    ("la2", "Latin America South", Continent::Americas),
    ("oc1", "Oceania", Continent::Sea),
    ("tr1", "Turkey", Continent::Europe),
    ("ru", "Russia", Continent::Europe),
    ("jp1", "Japan", Continent::Asia),
    ("ph2", "Philippines", Continent::Sea),
    ("sg2", "Singapore", Continent::Sea),
    ("th2", "Thailand", Continent::Sea),
    ("tw2", "Taiwan", Continent::Sea),
    ("vn2", "Vietnam", Continent::Sea),
];

/// A platform identifier. Kept opaque: unknown values are carried through
/// and only the continental lookup reports that it had to guess.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region(String);

impl Region {
    pub fn new(id: &str) -> Self {
        Region(id.trim().to_lowercase())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_REGIONS.iter().any(|(id, _, _)| *id == self.0)
    }

    pub fn display_name(&self) -> Option<&'static str> {
        SUPPORTED_REGIONS
            .iter()
            .find(|(id, _, _)| *id == self.0)
            .map(|(_, name, _)| *name)
    }

    pub fn platform_host(&self) -> String {
        format!("{}.api.riotgames.com", self.0)
    }

    pub fn continental_route(&self) -> Resolved<Continent> {
        continental_route(&self.0)
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::new(SUPPORTED_REGIONS[0].0)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a platform to its continental routing value. Never fails: an unknown
/// platform is routed to [`DEFAULT_CONTINENT`] and flagged as a fallback.
pub fn continental_route(region: &str) -> Resolved<Continent> {
    let normalized = region.trim().to_lowercase();
    match SUPPORTED_REGIONS.iter().find(|(id, _, _)| *id == normalized) {
        Some((_, _, continent)) => Resolved::Exact(*continent),
        None => Resolved::fallback(
            DEFAULT_CONTINENT,
            format!("unknown region '{}', routing to {}", region, DEFAULT_CONTINENT),
        ),
    }
}
