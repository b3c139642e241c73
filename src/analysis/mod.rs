pub mod champion_stats;
pub mod history;
pub mod ladder;
pub mod stats;
