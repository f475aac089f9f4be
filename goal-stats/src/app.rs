// Application orchestration.
//
// Owns the data source and configuration, runs loads in background tasks,
// and forwards results to the TUI as `UiUpdate` messages. Commands from the
// TUI arrive on a separate channel.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::fetch::{self, CsvSource, LoadError, RetryPolicy};
use crate::protocol::{LoadedData, UiUpdate, UserCommand};
use crate::stats::GoalStatsData;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn CsvSource>,
    pub policy: RetryPolicy,
    /// Incremented each time a load starts. Results carrying an older
    /// generation are discarded in `handle_load_outcome`.
    pub load_generation: u64,
    pub load_task: Option<JoinHandle<()>>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn CsvSource>) -> Self {
        let policy = RetryPolicy::from(&config.fetch);
        AppState {
            config,
            source,
            policy,
            load_generation: 0,
            load_task: None,
        }
    }
}

/// Result of one background load.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub result: Result<GoalStatsData, LoadError>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Start a new background load and tell the UI it is in progress.
pub async fn start_load(
    state: &mut AppState,
    load_tx: &mpsc::Sender<LoadOutcome>,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    state.load_generation += 1;
    let generation = state.load_generation;
    let source = Arc::clone(&state.source);
    let sources = state.config.sources.clone();
    let policy = state.policy;
    let tx = load_tx.clone();

    info!(generation, "starting goal statistics load");
    let _ = ui_tx.send(UiUpdate::Loading).await;

    state.load_task = Some(tokio::spawn(async move {
        let result = fetch::load_all(source.as_ref(), &sources, &policy).await;
        let _ = tx.send(LoadOutcome { generation, result }).await;
    }));
}

/// Forward a finished load to the UI, unless a newer load has started since.
pub async fn handle_load_outcome(
    state: &mut AppState,
    outcome: LoadOutcome,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    if outcome.generation != state.load_generation {
        debug!(
            stale = outcome.generation,
            current = state.load_generation,
            "discarding stale load result"
        );
        return;
    }
    state.load_task = None;

    let update = match outcome.result {
        Ok(data) => {
            info!(
                home = data.home.len(),
                away = data.away.len(),
                "load complete"
            );
            UiUpdate::Loaded(Box::new(LoadedData {
                data,
                loaded_at: Local::now(),
            }))
        }
        Err(e) => {
            error!("load failed: {}", e);
            UiUpdate::LoadFailed(e.to_string())
        }
    };
    let _ = ui_tx.send(update).await;
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until the TUI asks to quit or drops its sender.
///
/// A load starts immediately; `UserCommand::Reload` starts another.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let (load_tx, mut load_rx) = mpsc::channel::<LoadOutcome>(4);
    start_load(&mut state, &load_tx, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Reload) => {
                        info!("Reload requested");
                        start_load(&mut state, &load_tx, &ui_tx).await;
                    }
                    Some(UserCommand::Quit) => {
                        info!("Quit requested");
                        break;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            Some(outcome) = load_rx.recv() => {
                handle_load_outcome(&mut state, outcome, &ui_tx).await;
            }
        }
    }

    if let Some(task) = state.load_task.take() {
        task.abort();
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
