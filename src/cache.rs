use crate::api::models::MatchSummary;
use crate::api::MatchSource;
use crate::error::AppError;
use crate::region::Region;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Cached upstream operations and how long their results stay fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Account,
    Summoner,
    LeagueEntries,
    Ladder,
    MatchIds,
    Match,
    Version,
    Champions,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Account => "account",
            Operation::Summoner => "summoner",
            Operation::LeagueEntries => "league-entries",
            Operation::Ladder => "ladder",
            Operation::MatchIds => "match-ids",
            Operation::Match => "match",
            Operation::Version => "version",
            Operation::Champions => "champions",
        }
    }

    /// `None` never goes stale: finished matches do not change.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Operation::Match => None,
            Operation::Version | Operation::Champions => Some(Duration::hours(24)),
            _ => Some(Duration::minutes(5)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    cached_at: DateTime<Utc>,
    value: T,
}

/// JSON-file cache keyed by operation and parameters.
#[derive(Debug, Clone)]
pub struct QueryCache {
    dir: PathBuf,
    skip_reads: bool,
}

impl QueryCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        QueryCache {
            dir: dir.into(),
            skip_reads: false,
        }
    }

    /// Ignore existing entries but keep writing fresh ones.
    pub fn refreshing(mut self, refresh: bool) -> Self {
        self.skip_reads = refresh;
        self
    }

    pub fn entry_path(&self, op: Operation, params: &[&str]) -> PathBuf {
        let key = params
            .iter()
            .map(|p| urlencoding::encode(p).into_owned())
            .collect::<Vec<_>>()
            .join("+");
        self.dir.join(op.name()).join(format!("{}.json", key))
    }

    pub fn get<T: DeserializeOwned>(&self, op: Operation, params: &[&str]) -> Option<T> {
        if self.skip_reads {
            return None;
        }

        let path = self.entry_path(op, params);
        let content = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry<T> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        if let Some(ttl) = op.ttl() {
            if Utc::now().signed_duration_since(entry.cached_at) > ttl {
                debug!("Cache expired for {}", path.display());
                return None;
            }
        }

        debug!("Serving {} from cache", path.display());
        Some(entry.value)
    }

    pub fn put<T: Serialize>(&self, op: Operation, params: &[&str], value: &T) -> Result<(), AppError> {
        self.store(op, params, value, Utc::now())
    }

    fn store<T: Serialize>(
        &self,
        op: Operation,
        params: &[&str],
        value: &T,
        cached_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let path = self.entry_path(op, params);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Cache(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string(&CacheEntry { cached_at, value })
            .map_err(|e| AppError::Cache(format!("Failed to serialize cache entry: {}", e)))?;
        fs::write(&path, json)
            .map_err(|e| AppError::Cache(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Serves a fresh entry or runs `fetch` and stores its result. A failed
    /// write is logged, never returned.
    pub fn get_or_fetch<T, F>(&self, op: Operation, params: &[&str], fetch: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, AppError>,
    {
        if let Some(hit) = self.get(op, params) {
            return Ok(hit);
        }

        let value = fetch()?;
        if let Err(e) = self.put(op, params, &value) {
            warn!("{}", e);
        }
        Ok(value)
    }
}

/// A [`MatchSource`] that consults the cache before the inner source.
pub struct CachedMatchSource<'a, S> {
    inner: S,
    cache: &'a QueryCache,
}

impl<'a, S: MatchSource> CachedMatchSource<'a, S> {
    pub fn new(inner: S, cache: &'a QueryCache) -> Self {
        CachedMatchSource { inner, cache }
    }
}

impl<S: MatchSource> MatchSource for CachedMatchSource<'_, S> {
    fn match_ids(&self, puuid: &str, region: &Region, count: usize) -> Result<Vec<String>, AppError> {
        let count_param = count.to_string();
        self.cache.get_or_fetch(
            Operation::MatchIds,
            &[region.id(), puuid, count_param.as_str()],
            || self.inner.match_ids(puuid, region, count),
        )
    }

    fn match_by_id(&self, match_id: &str, region: &Region) -> Result<MatchSummary, AppError> {
        // match ids embed the platform, so the region is not part of the key
        self.cache
            .get_or_fetch(Operation::Match, &[match_id], || self.inner.match_by_id(match_id, region))
    }
}
