//! Tick context.
//!
//! A [`Session`] owns the seen-set and the config for the lifetime of the
//! process and runs one tick at a time over an injected [`StateStore`]. Ticks
//! and settings changes both take `&mut self`, so they can never interleave.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{classify, Notification, Notifier};
use crate::error::Result;
use crate::filter::FilterSet;
use crate::item::Item;
use crate::ranking::{select, RenderModel};
use crate::storage::{Config, DisplayCount, SeenSet, StateStore};

/// Outcome of one tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub model: RenderModel,
    pub notifications: Vec<Notification>,
    /// True when this tick established the first-run baseline.
    pub baseline: bool,
    /// Ids added to the seen-set by this tick.
    pub newly_seen: usize,
    /// Whether the seen-set reached the store.
    pub saved: bool,
    pub at: DateTime<Utc>,
}

pub struct Session<St: StateStore> {
    store: St,
    seen: SeenSet,
    config: Config,
    first_run: bool,
}

impl<St: StateStore> Session<St> {
    /// Load seen-set and config from `store`.
    pub fn open(store: St) -> Self {
        let seen = store.load_seen();
        let first_run = store.is_first_run();
        let config = store.load_config();
        tracing::debug!(seen = seen.len(), first_run, "session opened");
        Self {
            store,
            seen,
            config,
            first_run,
        }
    }

    /// Session with explicit state, ignoring what the store holds.
    pub fn with_state(store: St, seen: SeenSet, config: Config, first_run: bool) -> Self {
        Self {
            store,
            seen,
            config,
            first_run,
        }
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Classify `batch`, persist the seen-set and build the menu model.
    ///
    /// On a first run the batch only seeds the seen-set: nothing is notified
    /// and nothing in the menu counts as new.
    pub fn run_tick(&mut self, batch: &[Item], notifier: &mut dyn Notifier) -> TickReport {
        let before = self.seen.len();
        let baseline = self.first_run;

        if baseline {
            let seeded = self.seen.seed_from_batch(batch.iter().map(|item| item.id));
            tracing::info!(seeded, "first run: baseline established, no notifications");
        }

        // Built before classification so "new" means new as of tick start.
        let model = select(batch, &self.seen, &self.config);

        let notifications = if baseline {
            Vec::new()
        } else {
            classify(batch, &mut self.seen, &self.config.filter_set, notifier)
        };

        let saved = self.persist_seen();
        self.first_run = self.seen.is_empty();

        let report = TickReport {
            model,
            notifications,
            baseline,
            newly_seen: self.seen.len() - before,
            saved,
            at: Utc::now(),
        };
        tracing::info!(
            fetched = report.model.fetched,
            shown = report.model.rows.len(),
            badge = report.model.badge_count,
            notified = report.notifications.len(),
            newly_seen = report.newly_seen,
            "tick complete"
        );
        report
    }

    pub fn set_max_display_count(&mut self, count: DisplayCount) {
        if self.config.max_display_count == count {
            return;
        }
        self.config.max_display_count = count;
        self.persist_config();
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        if self.config.filter_set == filters {
            return;
        }
        self.config.filter_set = filters;
        self.persist_config();
    }

    /// Forget every seen id. The next tick re-establishes a baseline.
    ///
    /// # Errors
    /// Returns an error if the emptied set cannot be saved; the in-memory set
    /// is left untouched in that case.
    pub fn reset_seen(&mut self) -> Result<()> {
        self.store.save_seen(&SeenSet::new())?;
        self.seen.clear();
        self.first_run = true;
        Ok(())
    }

    fn persist_seen(&mut self) -> bool {
        match self.store.save_seen(&self.seen) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to save seen stories: {e}");
                false
            }
        }
    }

    fn persist_config(&mut self) {
        if let Err(e) = self.store.save_config(&self.config) {
            tracing::warn!("failed to save config: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::NotificationKind;
    use crate::item::PopularityTier;
    use crate::storage::MemoryStore;

    fn hot(id: u64) -> Item {
        Item::new(id, format!("Hot {id}")).with_score(400).with_comments(120)
    }

    #[test]
    fn first_run_seeds_without_notifying() {
        let mut session = Session::open(MemoryStore::new());
        assert!(session.is_first_run());

        let mut sink: Vec<Notification> = Vec::new();
        let batch: Vec<Item> = (1..=4).map(hot).collect();
        let report = session.run_tick(&batch, &mut sink);

        assert!(report.baseline);
        assert!(sink.is_empty());
        assert!(report.notifications.is_empty());
        assert_eq!(report.model.badge_count, 0);
        assert!(report.model.rows.iter().all(|r| !r.is_new));
        assert!((1..=4).all(|id| session.seen().is_seen(id)));
        assert!(!session.is_first_run());
        assert_eq!(session.store().seen_saves, 1);
    }

    #[test]
    fn empty_first_batch_keeps_first_run() {
        let mut session = Session::open(MemoryStore::new());
        let report = session.run_tick(&[], &mut Vec::new());
        assert!(report.baseline);
        assert!(session.is_first_run());
    }

    #[test]
    fn later_ticks_notify_new_trending_stories() {
        let mut session = Session::open(MemoryStore::with_seen([1]));
        assert!(!session.is_first_run());

        let mut sink: Vec<Notification> = Vec::new();
        let report = session.run_tick(&[hot(1), hot(2)], &mut sink);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].story_id, 2);
        assert_eq!(report.model.badge_count, 1);
        assert!(!report.model.rows[0].is_new);
        assert!(report.model.rows[1].is_new);
        assert_eq!(report.newly_seen, 1);
        assert_eq!(
            session.store().seen.as_ref().map(SeenSet::len),
            Some(2)
        );
    }

    #[test]
    fn single_story_scenario() {
        let store = MemoryStore::new();
        let mut session = Session::with_state(store, SeenSet::new(), Config::default(), false);
        let batch = [Item::new(1, "AI breakthrough").with_score(400).with_comments(120)];

        let mut sink: Vec<Notification> = Vec::new();
        let report = session.run_tick(&batch, &mut sink);

        assert_eq!(session.seen().iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, NotificationKind::Trending);
        assert_eq!(report.model.rows.len(), 1);
        assert_eq!(report.model.rows[0].rank, 1);
        assert_eq!(report.model.rows[0].tier, PopularityTier::VeryHot);
        assert!(report.model.rows[0].is_new);
        assert_eq!(report.model.badge_count, 1);
    }

    #[test]
    fn failed_save_is_reported_not_fatal() {
        let mut store = MemoryStore::with_seen([1]);
        store.fail_writes = true;
        let mut session = Session::open(store);

        let mut sink: Vec<Notification> = Vec::new();
        let report = session.run_tick(&[hot(2)], &mut sink);

        assert!(!report.saved);
        assert_eq!(sink.len(), 1);
        assert!(session.seen().is_seen(2));
    }

    #[test]
    fn settings_changes_are_persisted_once() {
        let mut session = Session::open(MemoryStore::new());
        session.set_max_display_count(DisplayCount::new(5).unwrap());
        session.set_max_display_count(DisplayCount::new(5).unwrap());
        session.set_filters(FilterSet::parse("rust"));

        assert_eq!(session.store().config_saves, 2);
        let stored = session.store().config.clone().unwrap();
        assert_eq!(stored.max_display_count.get(), 5);
        assert_eq!(stored.filter_set.keywords(), &["rust".to_string()]);
    }

    #[test]
    fn reset_seen_restores_first_run() {
        let mut session = Session::open(MemoryStore::with_seen([1, 2, 3]));
        session.reset_seen().unwrap();
        assert!(session.is_first_run());
        assert!(session.seen().is_empty());

        let report = session.run_tick(&[hot(9)], &mut Vec::new());
        assert!(report.baseline);
        assert!(report.notifications.is_empty());
    }

    #[test]
    fn reset_seen_reports_failed_save() {
        let mut store = MemoryStore::with_seen([1, 2, 3]);
        store.fail_writes = true;
        let mut session = Session::open(store);

        assert!(session.reset_seen().is_err());
        assert_eq!(session.seen().len(), 3);
        assert!(!session.is_first_run());
        assert_eq!(session.store().seen.as_ref().map(SeenSet::len), Some(3));
    }
}
