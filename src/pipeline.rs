use crate::config::Config;
use crate::error::Result;
use crate::fetch::Pacer;
use crate::resolver::HistoryResolver;
use crate::types::{Player, PlayerHistory, RunResult, StatSource};
use chrono::Utc;
use metrics::{counter, histogram};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Fans the history resolver out across the roster in fixed-size batches.
///
/// Within a batch every player resolves concurrently and the batch settles
/// only when all of them have; a pause between batches smooths the aggregate
/// request rate. One player failing never aborts the run — failures are
/// caught at the task boundary and counted.
pub struct BatchOrchestrator {
    source: Arc<dyn StatSource>,
    pacer: Arc<dyn Pacer>,
    batch_size: usize,
}

impl BatchOrchestrator {
    pub fn new(source: Arc<dyn StatSource>, pacer: Arc<dyn Pacer>, config: &Config) -> Self {
        Self { source, pacer, batch_size: config.batch_size.max(1) }
    }

    #[instrument(skip(self, roster), fields(source = self.source.source_name()))]
    pub async fn run(&self, roster: Vec<Player>) -> RunResult {
        let source_name = self.source.source_name().to_string();
        counter!("gridiron_runs_total", "source" => source_name.clone()).increment(1);
        let t_run = std::time::Instant::now();

        let total = roster.len();
        info!(players = total, batch_size = self.batch_size, "starting run");

        let mut histories: Vec<PlayerHistory> = Vec::new();
        let mut resolved = 0usize;
        let mut failed = 0usize;
        let mut no_match = 0usize;

        for (batch_idx, batch) in roster.chunks(self.batch_size).enumerate() {
            if batch_idx > 0 {
                self.pacer.pause(self.source.batch_delay()).await;
            }
            info!(batch = batch_idx + 1, size = batch.len(), "resolving batch");

            let mut tasks = tokio::task::JoinSet::new();
            for player in batch {
                let source = Arc::clone(&self.source);
                let player = player.clone();
                tasks.spawn(async move {
                    let resolver = HistoryResolver::new(source.as_ref());
                    let outcome = resolver.resolve(&player.name, Some(player.position)).await;
                    (player, outcome)
                });
            }

            // join-all: the batch is done only when every member settled
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((player, Ok(Some(timeline)))) => {
                        resolved += 1;
                        info!(player = %player.name, seasons = timeline.total_seasons, "resolved");
                        histories.push(PlayerHistory { player, timeline });
                    }
                    Ok((player, Ok(None))) => {
                        no_match += 1;
                        info!(player = %player.name, "no history resolved");
                    }
                    Ok((player, Err(e))) => {
                        failed += 1;
                        warn!(player = %player.name, error = %e, "resolution failed");
                    }
                    Err(join_error) => {
                        failed += 1;
                        error!(error = %join_error, "resolution task panicked");
                    }
                }
            }
        }

        // completion order varies between runs; emit in roster rank order
        histories.sort_by_key(|history| history.player.rank);

        counter!("gridiron_players_resolved_total", "source" => source_name.clone())
            .increment(resolved as u64);
        counter!("gridiron_players_failed_total", "source" => source_name.clone())
            .increment(failed as u64);
        counter!("gridiron_players_no_match_total", "source" => source_name.clone())
            .increment(no_match as u64);
        histogram!("gridiron_run_duration_seconds", "source" => source_name.clone())
            .record(t_run.elapsed().as_secs_f64());

        info!(resolved, failed, no_match, "run complete");

        RunResult {
            run_id: Uuid::new_v4(),
            source: source_name,
            generated_at: Utc::now(),
            resolved,
            failed,
            no_match,
            players: histories,
        }
    }
}

/// Persist a run result as pretty-printed JSON at the configured path.
pub fn persist_run_result(result: &RunResult, path: &str) -> Result<String> {
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    Ok(path.to_string_lossy().to_string())
}
