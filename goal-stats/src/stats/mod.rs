// Goal statistics engine: CSV parsing, league matching, averaging.

pub mod aggregate;
pub mod matcher;
pub mod model;
pub mod parser;

pub use model::{GoalLines, GoalStatsData, LeagueAverageData, Metrics, StatRecord, TeamStats};
