use crate::candidates::InjuryReportGrammar;
use crate::config::Config;
use crate::constants::INJURY_SOURCE;
use crate::error::Result;
use crate::fetch::{PageFetcher, Pacer};
use crate::sources::{lookup_season, CandidateEvaluator};
use crate::types::{Position, SeasonLookup, StatSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Resolves seasons from the site's injury-report pages.
pub struct InjuryReportSource {
    evaluator: CandidateEvaluator,
    grammar: InjuryReportGrammar,
    batch_delay: Duration,
}

impl InjuryReportSource {
    pub fn new(config: &Config, pacer: Arc<dyn Pacer>) -> Result<Self> {
        let fetcher = PageFetcher::new(
            Duration::from_millis(config.fetch_timeout_ms),
            Duration::from_millis(config.request_delay_ms),
            pacer,
        )?;
        Ok(Self {
            evaluator: CandidateEvaluator::new(fetcher),
            grammar: InjuryReportGrammar { base: config.stat_site_base.clone() },
            batch_delay: Duration::from_millis(config.injury_batch_delay_ms),
        })
    }
}

#[async_trait::async_trait]
impl StatSource for InjuryReportSource {
    fn source_name(&self) -> &'static str {
        INJURY_SOURCE
    }

    fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    #[instrument(skip(self), fields(source = INJURY_SOURCE))]
    async fn season_lookup(
        &self,
        name: &str,
        position: Option<Position>,
        season: i32,
    ) -> Result<SeasonLookup> {
        lookup_season(&self.evaluator, &self.grammar, name, position, season).await
    }
}
