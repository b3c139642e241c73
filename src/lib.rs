//! Player lookup and match analytics over the League of Legends web API.
//!
//! The crate is split the way data flows through it: [`region`] picks hosts,
//! [`api`] talks to the upstream under its rate limits, and [`analysis`]
//! turns raw matches into per-player records and aggregate statistics.
//! [`cache`] and [`prefs`] are consumer-side conveniences.

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod prefs;
pub mod rate_limit;
pub mod region;
pub mod resolved;
