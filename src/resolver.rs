use crate::constants::{CONSECUTIVE_EMPTY_LIMIT, MAX_LOOKBACK_YEARS, SEASON_ROLLOVER_MONTH};
use crate::error::Result;
use crate::types::{EmptyReason, Position, SeasonLookup, SeasonRecord, StatSource, Timeline};
use chrono::{Datelike, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// The season year operative on a given date.
pub fn current_season(today: NaiveDate) -> i32 {
    if today.month() >= SEASON_ROLLOVER_MONTH {
        today.year()
    } else {
        today.year() - 1
    }
}

/// Outcome of the descending-year walk, before the recency gate.
struct WalkOutcome {
    seasons: BTreeMap<i32, SeasonRecord>,
    likely_rookie: bool,
    /// Whether any probed year produced a validated page at all (found, or
    /// empty for a reason other than page-not-found).
    ever_validated: bool,
}

/// Walks a player's seasons newest-first against a stat source, deciding
/// when the history is exhausted (retirement) or has not begun (rookie).
pub struct HistoryResolver<'a> {
    source: &'a dyn StatSource,
}

impl<'a> HistoryResolver<'a> {
    pub fn new(source: &'a dyn StatSource) -> Self {
        Self { source }
    }

    /// Resolves a player's timeline starting from the current season.
    pub async fn resolve(&self, name: &str, position: Option<Position>) -> Result<Option<Timeline>> {
        let start_year = current_season(Utc::now().date_naive());
        self.resolve_from(name, position, start_year).await
    }

    #[instrument(skip(self), fields(source = self.source.source_name()))]
    pub async fn resolve_from(
        &self,
        name: &str,
        position: Option<Position>,
        start_year: i32,
    ) -> Result<Option<Timeline>> {
        let walk = self.walk(name, position, start_year).await?;
        Ok(Self::apply_recency_gate(walk, name, start_year))
    }

    async fn walk(
        &self,
        name: &str,
        position: Option<Position>,
        start_year: i32,
    ) -> Result<WalkOutcome> {
        // The confirmation probe may land on the floor itself; the main walk
        // stops one year short of it.
        let floor = start_year - MAX_LOOKBACK_YEARS;
        let mut seasons = BTreeMap::new();
        let mut consecutive_empty = 0u32;
        let mut found_any = false;
        let mut likely_rookie = false;
        let mut ever_validated = false;
        let mut year = start_year;

        while year > floor {
            match self.source.season_lookup(name, position, year).await? {
                SeasonLookup::Found(record) => {
                    debug!(player = name, year, "season resolved");
                    ever_validated = true;
                    seasons.insert(year, record);
                    consecutive_empty = 0;
                    found_any = true;
                }
                SeasonLookup::Empty(reason) => {
                    debug!(player = name, year, ?reason, "empty season");
                    if reason != EmptyReason::PageNotFound {
                        ever_validated = true;
                    }
                    consecutive_empty += 1;
                    if consecutive_empty >= CONSECUTIVE_EMPTY_LIMIT {
                        if found_any {
                            // History exhausted behind the last active year.
                            break;
                        }
                        // Nothing found yet; probe exactly one more year to
                        // distinguish a debut from an early gap.
                        let probe_year = year - 1;
                        match self.source.season_lookup(name, position, probe_year).await? {
                            SeasonLookup::Found(record) => {
                                debug!(player = name, probe_year, "gap confirmed as early gap");
                                ever_validated = true;
                                seasons.insert(probe_year, record);
                                consecutive_empty = 0;
                                found_any = true;
                                year = probe_year;
                            }
                            SeasonLookup::Empty(probe_reason) => {
                                if probe_reason != EmptyReason::PageNotFound {
                                    ever_validated = true;
                                }
                                likely_rookie = true;
                                break;
                            }
                        }
                    }
                }
            }
            year -= 1;
        }

        Ok(WalkOutcome { seasons, likely_rookie, ever_validated })
    }

    /// A timeline with nothing in the start year or the one before it has no
    /// verifiable current activity: data found further back means the player
    /// is gone from the source's present, and yields nothing. A confirmed
    /// rookie is the exception and keeps its (empty) timeline with the flag
    /// set.
    fn apply_recency_gate(walk: WalkOutcome, name: &str, start_year: i32) -> Option<Timeline> {
        let WalkOutcome { seasons, likely_rookie, ever_validated } = walk;
        let recent = seasons.contains_key(&start_year) || seasons.contains_key(&(start_year - 1));
        if !recent {
            if !seasons.is_empty() {
                info!(player = name, "seasons found but none recent; dropping");
                return None;
            }
            if likely_rookie && ever_validated {
                return Some(Timeline { seasons, likely_rookie: true, total_seasons: 0 });
            }
            return None;
        }
        let total_seasons = seasons.len();
        Some(Timeline { seasons, likely_rookie, total_seasons })
    }
}
