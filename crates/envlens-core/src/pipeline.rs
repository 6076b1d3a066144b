use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::EnvlensConfig;
use crate::enrich::enrich_readings;
use crate::error::{PipelineError, Result};
use crate::profiles::LocationProfile;
use crate::report::{build_report, LocationReport};
use crate::source::DataSource;

/// Consumer of finished location reports (chart renderer, file writer, ...).
pub trait RenderSink: Send + Sync {
    fn render(&self, report: &LocationReport) -> Result<()>;
}

/// Per-location lifecycle. Only `NotLoaded` can start a run.
#[derive(Debug, Clone)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded(Arc<LocationReport>),
    /// The run failed; the message is kept and the location is not retried.
    Unavailable(String),
}

impl LoadState {
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::NotLoaded => "not_loaded",
            LoadState::Loading => "loading",
            LoadState::Loaded(_) => "loaded",
            LoadState::Unavailable(_) => "unavailable",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ShowOutcome {
    /// This call ran the pipeline.
    Rendered(Arc<LocationReport>),
    /// An earlier call already triggered the location; nothing was done.
    AlreadyTriggered(LoadState),
}

impl ShowOutcome {
    pub fn report(&self) -> Option<&Arc<LocationReport>> {
        match self {
            ShowOutcome::Rendered(report) | ShowOutcome::AlreadyTriggered(LoadState::Loaded(report)) => {
                Some(report)
            }
            ShowOutcome::AlreadyTriggered(_) => None,
        }
    }
}

/// Drives fetch, enrichment and aggregation for each location at most once.
pub struct Orchestrator {
    config: EnvlensConfig,
    source: Arc<dyn DataSource>,
    sink: Arc<dyn RenderSink>,
    states: Arc<Mutex<HashMap<String, LoadState>>>,
}

impl Orchestrator {
    pub fn new(config: EnvlensConfig, source: Arc<dyn DataSource>, sink: Arc<dyn RenderSink>) -> Self {
        let states = config
            .profiles
            .ids()
            .map(|id| (id.to_string(), LoadState::NotLoaded))
            .collect();

        Self {
            config,
            source,
            sink,
            states: Arc::new(Mutex::new(states)),
        }
    }

    pub fn config(&self) -> &EnvlensConfig {
        &self.config
    }

    pub async fn state(&self, location: &str) -> Option<LoadState> {
        self.states.lock().await.get(location).cloned()
    }

    /// Triggers the pipeline for `location`. Only the first call for a location
    /// does any work; every later call returns [`ShowOutcome::AlreadyTriggered`].
    ///
    /// Dropping the returned future before it completes marks the location
    /// `Unavailable("cancelled")`.
    pub async fn show(&self, location: &str) -> Result<ShowOutcome> {
        let profile = self
            .config
            .profiles
            .get(location)
            .ok_or_else(|| PipelineError::UnknownLocation(location.to_string()))?;

        {
            let mut states = self.states.lock().await;
            let state = states
                .entry(location.to_string())
                .or_insert(LoadState::NotLoaded);
            if !matches!(state, LoadState::NotLoaded) {
                debug!(location, state = state.label(), "location already triggered");
                return Ok(ShowOutcome::AlreadyTriggered(state.clone()));
            }
            *state = LoadState::Loading;
        }
        let mut guard = LoadingGuard::new(Arc::clone(&self.states), location);

        let result = self.run(profile).await;

        let mut states = self.states.lock().await;
        let outcome = match result {
            Ok(report) => {
                states.insert(location.to_string(), LoadState::Loaded(Arc::clone(&report)));
                Ok(ShowOutcome::Rendered(report))
            }
            Err(err) => {
                error!(location, error = %err, "location run failed");
                states.insert(location.to_string(), LoadState::Unavailable(err.to_string()));
                Err(err)
            }
        };
        guard.disarm();
        outcome
    }

    async fn run(&self, profile: &LocationProfile) -> Result<Arc<LocationReport>> {
        info!(location = %profile.id, source = %profile.source, "starting location run");

        let raw = self.source.fetch(profile).await?;
        let enriched = enrich_readings(&raw, &profile.variables, &self.config.timestamp_parser);
        drop(raw);

        let report = build_report(profile, &enriched, &self.config.trend_resolutions);
        if report.unparseable_records > 0 {
            warn!(
                location = %profile.id,
                dropped = report.unparseable_records,
                "records with unparseable timestamps excluded from yearly aggregates"
            );
        }

        self.sink.render(&report)?;

        info!(
            location = %profile.id,
            records = report.total_records,
            years = ?report.years,
            "location run finished"
        );
        Ok(Arc::new(report))
    }
}

/// Moves a location out of `Loading` if its run is abandoned midway.
struct LoadingGuard {
    states: Arc<Mutex<HashMap<String, LoadState>>>,
    location: String,
    armed: bool,
}

impl LoadingGuard {
    fn new(states: Arc<Mutex<HashMap<String, LoadState>>>, location: &str) -> Self {
        Self {
            states,
            location: location.to_string(),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(location = %self.location, "location run cancelled");

        let cancelled = LoadState::Unavailable("cancelled".to_string());
        let location = std::mem::take(&mut self.location);
        match self.states.try_lock() {
            Ok(mut states) => {
                states.insert(location, cancelled);
            }
            Err(_) => {
                // lock is held elsewhere; finish the transition once it is released
                let states = Arc::clone(&self.states);
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move {
                        states.lock().await.insert(location, cancelled);
                    });
                }
            }
        }
    }
}
