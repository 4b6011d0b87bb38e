use crate::config::Config;
use crate::error::{Result, ScraperError};
use crate::fetch::{PageFetcher, Pacer};
use crate::types::{Player, Position};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[derive(Debug, Deserialize)]
struct RankingsResponse {
    players: Vec<RankedEntry>,
}

#[derive(Debug, Deserialize)]
struct RankedEntry {
    player_name: String,
    player_position_id: String,
    #[serde(default)]
    player_team_id: String,
    rank_ecr: u32,
}

/// Client for the upstream consensus-rankings endpoint. The response shape
/// is a hard contract: any deviation aborts the run with a schema error.
pub struct RankingsClient {
    fetcher: PageFetcher,
    url: String,
}

impl RankingsClient {
    pub fn new(config: &Config, pacer: Arc<dyn Pacer>) -> Result<Self> {
        let fetcher = PageFetcher::new(
            Duration::from_millis(config.rankings_timeout_ms),
            Duration::from_millis(config.request_delay_ms),
            pacer,
        )?;
        Ok(Self { fetcher, url: config.rankings_url.clone() })
    }

    #[instrument(skip(self))]
    pub async fn fetch_roster(&self, limit: Option<usize>) -> Result<Vec<Player>> {
        let body = self.fetcher.fetch(&self.url).await.map_err(|e| ScraperError::Fetch {
            url: self.url.clone(),
            message: e.to_string(),
        })?;
        let roster = parse_roster(&body, limit)?;
        info!(players = roster.len(), "fetched ranked roster");
        Ok(roster)
    }
}

/// Parses the rankings payload into the roster, ordered by rank. Entries
/// outside the tracked positions (kickers, defenses) are dropped.
pub fn parse_roster(body: &str, limit: Option<usize>) -> Result<Vec<Player>> {
    let response: RankingsResponse =
        serde_json::from_str(body).map_err(|e| ScraperError::Schema(e.to_string()))?;

    let mut players = Vec::with_capacity(response.players.len());
    for entry in response.players {
        match entry.player_position_id.parse::<Position>() {
            Ok(position) => players.push(Player {
                name: entry.player_name,
                position,
                team: entry.player_team_id,
                rank: entry.rank_ecr,
            }),
            Err(_) => {
                debug!(player = %entry.player_name, position = %entry.player_position_id,
                    "skipping untracked position");
            }
        }
    }
    if players.is_empty() {
        return Err(ScraperError::Schema("rankings contained no usable players".into()));
    }
    players.sort_by_key(|player| player.rank);
    if let Some(limit) = limit {
        players.truncate(limit);
    }
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "players": [
            {"player_name": "Ja'Marr Chase", "player_position_id": "WR", "player_team_id": "CIN", "rank_ecr": 2},
            {"player_name": "Bijan Robinson", "player_position_id": "RB", "player_team_id": "ATL", "rank_ecr": 1},
            {"player_name": "Justin Tucker", "player_position_id": "K", "player_team_id": "BAL", "rank_ecr": 3}
        ]
    }"#;

    #[test]
    fn roster_is_rank_ordered_and_filtered() {
        let roster = parse_roster(FIXTURE, None).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "Bijan Robinson");
        assert_eq!(roster[0].position, Position::RB);
        assert_eq!(roster[1].rank, 2);
    }

    #[test]
    fn limit_truncates_after_ordering() {
        let roster = parse_roster(FIXTURE, Some(1)).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Bijan Robinson");
    }

    #[test]
    fn shape_deviation_is_a_schema_error() {
        let err = parse_roster(r#"{"items": []}"#, None).unwrap_err();
        assert!(matches!(err, ScraperError::Schema(_)));

        let err = parse_roster(r#"{"players": [{"player_name": "No Rank"}]}"#, None).unwrap_err();
        assert!(matches!(err, ScraperError::Schema(_)));
    }

    #[test]
    fn all_untracked_positions_is_a_schema_error() {
        let body = r#"{"players": [
            {"player_name": "Justin Tucker", "player_position_id": "K", "rank_ecr": 1}
        ]}"#;
        assert!(matches!(parse_roster(body, None).unwrap_err(), ScraperError::Schema(_)));
    }
}
