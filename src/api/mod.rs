pub mod client;
pub mod endpoints;
pub mod http;
pub mod models;
pub mod service;

use crate::error::AppError;
use crate::region::Region;
use models::MatchSummary;

/// The two upstream calls the match-history aggregator depends on.
pub trait MatchSource {
    fn match_ids(&self, puuid: &str, region: &Region, count: usize) -> Result<Vec<String>, AppError>;

    fn match_by_id(&self, match_id: &str, region: &Region) -> Result<MatchSummary, AppError>;
}

impl<S: MatchSource + ?Sized> MatchSource for &S {
    fn match_ids(&self, puuid: &str, region: &Region, count: usize) -> Result<Vec<String>, AppError> {
        (**self).match_ids(puuid, region, count)
    }

    fn match_by_id(&self, match_id: &str, region: &Region) -> Result<MatchSummary, AppError> {
        (**self).match_by_id(match_id, region)
    }
}
