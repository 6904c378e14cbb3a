//! New-story classification.
//!
//! Walks a fetched batch in rank order, marks every unseen story as seen and
//! decides whether it deserves a notification. Filters replace the trending
//! heuristic: with keywords configured only matching stories notify, without
//! keywords only trending ones do.

use serde::{Deserialize, Serialize};

use crate::filter::{matches, FilterSet};
use crate::item::Item;
use crate::storage::SeenSet;

/// Trending requires strictly more points than this...
pub const TRENDING_MIN_SCORE: u64 = 150;
/// ...and strictly more comments than this.
pub const TRENDING_MIN_COMMENTS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FilterMatch,
    Trending,
}

impl NotificationKind {
    pub fn heading(self) -> &'static str {
        match self {
            NotificationKind::FilterMatch => "🔍 New story matching your filters",
            NotificationKind::Trending => "🔥 Trending on Hacker News",
        }
    }
}

/// Notification event handed to the [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub story_id: u64,
    pub title: String,
    /// Opened when the notification is clicked.
    pub url: String,
}

impl Notification {
    pub fn for_item(kind: NotificationKind, item: &Item) -> Self {
        Self {
            kind,
            story_id: item.id,
            title: item.title.clone(),
            url: item.link(),
        }
    }
}

/// Displays notification events. Implementations must not block for long;
/// they run inline with the tick.
pub trait Notifier {
    fn notify(&mut self, notification: &Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}

pub fn is_trending(item: &Item) -> bool {
    item.score > TRENDING_MIN_SCORE && item.descendants > TRENDING_MIN_COMMENTS
}

/// Which notification an unseen story earns, if any.
///
/// Shared by classification and the badge count so both agree.
pub fn notify_kind(item: &Item, filters: &FilterSet) -> Option<NotificationKind> {
    if filters.is_active() {
        matches(item, filters).then_some(NotificationKind::FilterMatch)
    } else {
        is_trending(item).then_some(NotificationKind::Trending)
    }
}

/// Classify `batch` against `seen`, emitting one event per notifiable new
/// story in rank order. Returns the emitted events.
///
/// Each story is marked seen before its event is emitted.
pub fn classify(
    batch: &[Item],
    seen: &mut SeenSet,
    filters: &FilterSet,
    notifier: &mut dyn Notifier,
) -> Vec<Notification> {
    let mut emitted = Vec::new();

    for item in batch {
        if !seen.mark_seen(item.id) {
            continue;
        }
        let Some(kind) = notify_kind(item, filters) else {
            continue;
        };
        let notification = Notification::for_item(kind, item);
        tracing::info!(id = item.id, ?kind, "notify: {}", item.title);
        notifier.notify(&notification);
        emitted.push(notification);
    }

    emitted
}
