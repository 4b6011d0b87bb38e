use crate::constants::DEFAULT_INJURY_BATCH_DELAY_MS;
use crate::error::{Result, ScraperError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Player roles tracked by the scraper. Rankings entries outside this set
/// (kickers, defenses) are dropped before the roster is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
}

impl FromStr for Position {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            other => Err(ScraperError::UnknownPosition(other.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
        };
        f.write_str(s)
    }
}

/// One entry of the ranked roster fetched from the rankings endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    pub team: String,
    pub rank: u32,
}

/// Why a season lookup produced no statistics. A data-state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// No table on the page carried the aggregate marker row.
    NoDataStart,
    /// The marker row was found but no cell parsed to a number.
    NoValidStats,
    /// A page matched but neither it nor the caller knew the position.
    UnknownCategory,
    /// No candidate locator produced a validated page.
    PageNotFound,
}

/// One player's statistics for one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub season: i32,
    pub stats: BTreeMap<String, f64>,
    pub locator: String,
    pub captured_at: DateTime<Utc>,
}

/// Outcome of resolving one (player, season) pair against a stat source.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonLookup {
    Found(SeasonRecord),
    Empty(EmptyReason),
}

/// A player's resolved season history, walked newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(serialize_with = "ser_seasons_desc")]
    pub seasons: BTreeMap<i32, SeasonRecord>,
    pub likely_rookie: bool,
    pub total_seasons: usize,
}

fn ser_seasons_desc<S>(
    seasons: &BTreeMap<i32, SeasonRecord>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    // Emit newest season first, matching the walk order.
    serializer.collect_map(seasons.iter().rev())
}

/// Roster entry plus its resolved timeline, as emitted in the run result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerHistory {
    pub player: Player,
    pub timeline: Timeline,
}

/// Aggregate of one orchestrator run. Written once, never mutated.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub resolved: usize,
    pub failed: usize,
    pub no_match: usize,
    pub players: Vec<PlayerHistory>,
}

/// Core trait every stat-page source must implement.
#[async_trait::async_trait]
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source/pipeline
    fn source_name(&self) -> &'static str;

    /// Pause inserted between roster batches when driven by this source.
    fn batch_delay(&self) -> Duration {
        Duration::from_millis(DEFAULT_INJURY_BATCH_DELAY_MS)
    }

    /// Resolve one season of statistics for a named player.
    async fn season_lookup(
        &self,
        name: &str,
        position: Option<Position>,
        season: i32,
    ) -> Result<SeasonLookup>;
}
