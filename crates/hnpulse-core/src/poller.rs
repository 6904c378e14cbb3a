//! Poll driver.
//!
//! Runs one tick at startup and then one per interval. Everything happens on
//! the task that awaits [`PollDriver::run`]: timer ticks, manual refreshes and
//! settings changes are all handled in turn, so a tick always runs to
//! completion before the next one starts.
//!
//! Manual refreshes go through a queue of depth one. Asking for a refresh
//! while one is already pending is a no-op. Timer ticks missed during a slow
//! fetch are skipped, not replayed.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::classify::Notifier;
use crate::error::CoreError;
use crate::filter::FilterSet;
use crate::hn::StorySource;
use crate::ranking::RenderModel;
use crate::session::{Session, TickReport};
use crate::storage::{DisplayCount, StateStore};

/// Ten minutes between automatic ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Displays tick results.
pub trait Renderer {
    /// Called once before the first tick.
    fn render_loading(&mut self) {}

    fn render(&mut self, model: &RenderModel);

    /// The tick was abandoned. The seen-set is untouched.
    fn render_error(&mut self, error: &CoreError);
}

/// User action delivered to a running driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    Refresh,
    SetMaxDisplayCount(DisplayCount),
    SetFilters(FilterSet),
    Quit,
}

/// Cloneable handle for sending actions to a [`PollDriver`].
#[derive(Debug, Clone)]
pub struct DriverHandle {
    refresh: mpsc::Sender<()>,
    commands: mpsc::UnboundedSender<DriverCommand>,
}

impl DriverHandle {
    /// Request an immediate tick. Returns `false` if one is already queued
    /// or the driver has stopped.
    pub fn refresh(&self) -> bool {
        self.refresh.try_send(()).is_ok()
    }

    /// Returns `false` if the driver has stopped.
    pub fn send(&self, command: DriverCommand) -> bool {
        match command {
            DriverCommand::Refresh => self.refresh(),
            other => self.commands.send(other).is_ok(),
        }
    }

    pub fn set_max_display_count(&self, count: DisplayCount) -> bool {
        self.send(DriverCommand::SetMaxDisplayCount(count))
    }

    pub fn set_filters(&self, filters: FilterSet) -> bool {
        self.send(DriverCommand::SetFilters(filters))
    }

    pub fn quit(&self) -> bool {
        self.send(DriverCommand::Quit)
    }
}

pub struct PollDriver<S, St, N, R>
where
    St: StateStore,
{
    source: S,
    session: Session<St>,
    notifier: N,
    renderer: R,
    interval: Duration,
    refresh_rx: mpsc::Receiver<()>,
    command_rx: mpsc::UnboundedReceiver<DriverCommand>,
    ticks: u64,
}

impl<S, St, N, R> PollDriver<S, St, N, R>
where
    S: StorySource,
    St: StateStore,
    N: Notifier,
    R: Renderer,
{
    pub fn new(source: S, session: Session<St>, notifier: N, renderer: R) -> (Self, DriverHandle) {
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let driver = Self {
            source,
            session,
            notifier,
            renderer,
            interval: DEFAULT_INTERVAL,
            refresh_rx,
            command_rx,
            ticks: 0,
        };
        let handle = DriverHandle {
            refresh: refresh_tx,
            commands: command_tx,
        };
        (driver, handle)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn session(&self) -> &Session<St> {
        &self.session
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Ticks attempted so far, failed ones included.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Fetch, classify and render once.
    ///
    /// Returns `None` if the fetch failed; the renderer has been told.
    pub async fn tick(&mut self) -> Option<TickReport> {
        self.ticks += 1;
        let limit = self.session.config().fetch_limit();
        tracing::debug!(tick = self.ticks, limit, "tick started");

        match self.source.fetch_batch(limit).await {
            Ok(batch) => {
                let report = self.session.run_tick(&batch, &mut self.notifier);
                self.renderer.render(&report.model);
                Some(report)
            }
            Err(e) => {
                tracing::warn!(tick = self.ticks, "tick abandoned: {e}");
                self.renderer.render_error(&CoreError::from(e));
                None
            }
        }
    }

    /// Apply one action. Returns `false` when the driver should stop.
    async fn apply(&mut self, command: DriverCommand) -> bool {
        match command {
            DriverCommand::Refresh => {
                self.tick().await;
            }
            DriverCommand::SetMaxDisplayCount(count) => {
                tracing::info!(%count, "display count changed");
                self.session.set_max_display_count(count);
                self.tick().await;
            }
            DriverCommand::SetFilters(filters) => {
                tracing::info!(%filters, "filters changed");
                self.session.set_filters(filters);
                self.tick().await;
            }
            DriverCommand::Quit => return false,
        }
        true
    }

    /// Run until a [`DriverCommand::Quit`] arrives. Returns the driver so the
    /// caller can inspect the final state.
    pub async fn run(mut self) -> Self {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(interval_secs = self.interval.as_secs(), "poll driver started");
        self.renderer.render_loading();

        loop {
            tokio::select! {
                biased;

                _ = ticker.tick() => {
                    self.tick().await;
                }
                Some(()) = self.refresh_rx.recv() => {
                    self.tick().await;
                }
                Some(command) = self.command_rx.recv() => {
                    if !self.apply(command).await {
                        break;
                    }
                }
            }
        }

        tracing::info!(ticks = self.ticks, "poll driver stopped");
        self
    }
}
