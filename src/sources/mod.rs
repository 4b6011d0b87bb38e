use crate::candidates::CandidateGrammar;
use crate::config::Config;
use crate::constants::{GAME_LOG_SOURCE, INJURY_SOURCE};
use crate::error::{Result, ScraperError};
use crate::extract::{extract_totals, TableExtract};
use crate::fetch::{FetchError, PageFetcher, Pacer};
use crate::types::{EmptyReason, Position, SeasonLookup, SeasonRecord, StatSource};
use crate::validate::{check_page, PageCheck};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod game_log;
pub mod injury_report;

pub use game_log::GameLogSource;
pub use injury_report::InjuryReportSource;

/// Instantiate a stat source by its CLI name.
pub fn create_source(
    name: &str,
    config: &Config,
    pacer: Arc<dyn Pacer>,
) -> Result<Option<Arc<dyn StatSource>>> {
    match name {
        INJURY_SOURCE => Ok(Some(Arc::new(InjuryReportSource::new(config, pacer)?))),
        GAME_LOG_SOURCE => Ok(Some(Arc::new(GameLogSource::new(config, pacer)?))),
        _ => Ok(None),
    }
}

pub fn supported_sources() -> Vec<&'static str> {
    vec![INJURY_SOURCE, GAME_LOG_SOURCE]
}

/// A candidate page that validated (or was tolerated) for a player.
pub struct CandidateMatch {
    pub locator: String,
    pub body: String,
    pub position: Option<Position>,
    pub mismatched: bool,
}

/// Walks an ordered candidate list and returns the first page that
/// validates. Greedy and non-backtracking: the first acceptance wins. A
/// position-mismatched page is remembered and tolerated only when no exact
/// match exists among the remaining candidates.
pub struct CandidateEvaluator {
    fetcher: PageFetcher,
}

impl CandidateEvaluator {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn first_match(
        &self,
        urls: &[String],
        expected: Option<Position>,
    ) -> Result<Option<CandidateMatch>> {
        let mut tolerated: Option<CandidateMatch> = None;
        for url in urls {
            match self.fetcher.fetch(url).await {
                Ok(body) => match check_page(&body, expected) {
                    PageCheck::Accepted(detected) => {
                        return Ok(Some(CandidateMatch {
                            locator: url.clone(),
                            body,
                            position: detected.or(expected),
                            mismatched: false,
                        }));
                    }
                    PageCheck::RejectedWrongEntity(detected) => {
                        debug!(url, detected = %detected, "candidate reports a different position");
                        if tolerated.is_none() {
                            tolerated = Some(CandidateMatch {
                                locator: url.clone(),
                                body,
                                position: Some(detected),
                                mismatched: true,
                            });
                        }
                    }
                    PageCheck::RejectedNotFound => {
                        debug!(url, "candidate rejected");
                    }
                },
                Err(FetchError::NotFound) => {
                    debug!(url, "candidate not found");
                }
                Err(e) => {
                    return Err(ScraperError::Fetch {
                        url: url.clone(),
                        message: e.to_string(),
                    })
                }
            }
        }
        if let Some(m) = &tolerated {
            warn!(locator = %m.locator, "no exact position match; tolerating mismatched candidate");
        }
        Ok(tolerated)
    }
}

/// Shared (player, season) resolution used by both pipelines: generate
/// candidates, take the first validated page, extract its aggregate row.
pub(crate) async fn lookup_season(
    evaluator: &CandidateEvaluator,
    grammar: &dyn CandidateGrammar,
    name: &str,
    position: Option<Position>,
    season: i32,
) -> Result<SeasonLookup> {
    let urls = grammar.page_urls(name, position, season);
    let Some(candidate) = evaluator.first_match(&urls, position).await? else {
        return Ok(SeasonLookup::Empty(EmptyReason::PageNotFound));
    };
    let Some(resolved_position) = candidate.position else {
        return Ok(SeasonLookup::Empty(EmptyReason::UnknownCategory));
    };
    match extract_totals(&candidate.body, Some(resolved_position)) {
        TableExtract::Found(stats) => Ok(SeasonLookup::Found(SeasonRecord {
            season,
            stats,
            locator: candidate.locator,
            captured_at: Utc::now(),
        })),
        TableExtract::Empty(reason) => Ok(SeasonLookup::Empty(reason)),
    }
}
