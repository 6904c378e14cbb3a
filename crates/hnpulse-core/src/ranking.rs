//! Menu model for one tick.
//!
//! Stories keep the API's popularity order. "New" is judged against the
//! seen-set as it was when the tick started, since classification has already
//! marked everything in the batch by the time the menu is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::notify_kind;
use crate::filter::matches;
use crate::item::{Item, PopularityTier};
use crate::storage::{Config, SeenSet};

/// Longest title shown in the menu, in characters.
pub const TITLE_DISPLAY_LIMIT: usize = 32;

/// Badge text tops out here.
pub const BADGE_MAX: usize = 99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRow {
    /// 1-based position among the filtered stories.
    pub rank: usize,
    pub story_id: u64,
    pub title: String,
    pub score: u64,
    pub comments: u64,
    pub is_new: bool,
    pub tier: PopularityTier,
    pub url: String,
}

impl MenuRow {
    /// `"01. Title⚡ ✨"`
    pub fn label(&self) -> String {
        let new_marker = if self.is_new { " ✨" } else { "" };
        format!(
            "{:02}. {}{}{}",
            self.rank,
            self.title,
            self.tier.indicator(),
            new_marker
        )
    }

    /// `"   120 points • 45 comments"`
    pub fn detail(&self) -> String {
        format!("   {} points • {} comments", self.score, self.comments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderModel {
    pub rows: Vec<MenuRow>,
    /// New, notification-worthy stories among all filtered ones.
    pub badge_count: usize,
    /// Stories in the batch before filtering.
    pub fetched: usize,
    /// Stories left after filtering, before truncation.
    pub matched: usize,
    pub filters: Vec<String>,
    pub max_display_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl RenderModel {
    pub fn badge_label(&self) -> Option<String> {
        badge_label(self.badge_count)
    }

    pub fn is_filtered(&self) -> bool {
        !self.filters.is_empty()
    }
}

/// Badge text: nothing for zero, the count up to 99, then `"99+"`.
pub fn badge_label(count: usize) -> Option<String> {
    match count {
        0 => None,
        n if n > BADGE_MAX => Some(format!("{BADGE_MAX}+")),
        n => Some(n.to_string()),
    }
}

/// Cut to [`TITLE_DISPLAY_LIMIT`] characters, ending in `...` when shortened.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= TITLE_DISPLAY_LIMIT {
        return title.to_string();
    }
    let kept: String = title.chars().take(TITLE_DISPLAY_LIMIT - 3).collect();
    format!("{kept}...")
}

/// Build the menu model.
///
/// `seen_before` must be the seen-set snapshot from the start of the tick.
pub fn select(batch: &[Item], seen_before: &SeenSet, config: &Config) -> RenderModel {
    let filters = &config.filter_set;
    let filtered: Vec<&Item> = batch.iter().filter(|item| matches(item, filters)).collect();

    let badge_count = filtered
        .iter()
        .filter(|item| !seen_before.is_seen(item.id) && notify_kind(item, filters).is_some())
        .count();

    let rows = filtered
        .iter()
        .take(config.max_display_count.get())
        .enumerate()
        .map(|(index, item)| MenuRow {
            rank: index + 1,
            story_id: item.id,
            title: truncate_title(&item.title),
            score: item.score,
            comments: item.descendants,
            is_new: !seen_before.is_seen(item.id),
            tier: item.tier(),
            url: item.link(),
        })
        .collect();

    RenderModel {
        rows,
        badge_count,
        fetched: batch.len(),
        matched: filtered.len(),
        filters: filters.keywords().to_vec(),
        max_display_count: config.max_display_count.get(),
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSet;
    use crate::storage::DisplayCount;

    fn story(id: u64, score: u64, comments: u64) -> Item {
        Item::new(id, format!("Story {id}"))
            .with_score(score)
            .with_comments(comments)
    }

    fn config(max: u32, filters: &[&str]) -> Config {
        Config {
            max_display_count: DisplayCount::new(max).unwrap(),
            filter_set: FilterSet::new(filters.iter().copied()),
        }
    }

    #[test]
    fn badge_excludes_already_seen() {
        let seen: SeenSet = [1, 2].into_iter().collect();
        let batch = [story(1, 500, 500), story(2, 500, 500), story(3, 200, 60)];
        let model = select(&batch, &seen, &config(15, &[]));
        assert_eq!(model.badge_count, 1);
        assert_eq!(model.rows.len(), 3);
        assert!(!model.rows[0].is_new);
        assert!(model.rows[2].is_new);
    }

    #[test]
    fn truncation_keeps_order_but_badge_counts_everything() {
        let batch: Vec<Item> = (1..=12).map(|id| story(id, 400, 100)).collect();
        let model = select(&batch, &SeenSet::new(), &config(5, &[]));
        let ids: Vec<u64> = model.rows.iter().map(|r| r.story_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let ranks: Vec<usize> = model.rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert_eq!(model.badge_count, 12);
        assert_eq!(model.matched, 12);
    }

    #[test]
    fn filtering_preserves_fetch_order() {
        let batch = [
            Item::new(7, "rust one").with_score(1),
            Item::new(3, "go"),
            Item::new(9, "RUST two").with_score(999),
        ];
        let model = select(&batch, &SeenSet::new(), &config(15, &["rust"]));
        let ids: Vec<u64> = model.rows.iter().map(|r| r.story_id).collect();
        assert_eq!(ids, vec![7, 9]);
        assert_eq!(model.fetched, 3);
        assert_eq!(model.matched, 2);
        assert!(model.is_filtered());
    }

    #[test]
    fn filtered_badge_ignores_trending_heuristic() {
        let batch = [
            Item::new(1, "rust, quietly").with_score(1),
            Item::new(2, "huge go news").with_score(999).with_comments(999),
        ];
        let model = select(&batch, &SeenSet::new(), &config(15, &["rust"]));
        assert_eq!(model.badge_count, 1);
    }

    #[test]
    fn unfiltered_badge_requires_trending() {
        let batch = [story(1, 151, 51), story(2, 150, 51), story(3, 151, 50)];
        let model = select(&batch, &SeenSet::new(), &config(15, &[]));
        assert_eq!(model.badge_count, 1);
        assert!(model.rows.iter().all(|r| r.is_new));
    }

    #[test]
    fn tiers_follow_score() {
        let batch = [story(1, 400, 0), story(2, 250, 0), story(3, 150, 0), story(4, 10, 0)];
        let model = select(&batch, &SeenSet::new(), &config(15, &[]));
        let tiers: Vec<PopularityTier> = model.rows.iter().map(|r| r.tier).collect();
        assert_eq!(
            tiers,
            vec![
                PopularityTier::VeryHot,
                PopularityTier::Hot,
                PopularityTier::Popular,
                PopularityTier::None
            ]
        );
    }

    #[test]
    fn long_titles_are_shortened_by_chars() {
        assert_eq!(truncate_title("short"), "short");
        let exact = "a".repeat(32);
        assert_eq!(truncate_title(&exact), exact);

        let long = "é".repeat(40);
        let cut = truncate_title(&long);
        assert_eq!(cut.chars().count(), 32);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn labels_carry_markers() {
        let model = select(&[story(1, 350, 10)], &SeenSet::new(), &config(15, &[]));
        let row = &model.rows[0];
        assert_eq!(row.label(), "01. Story 1🔥 ✨");
        assert_eq!(row.detail(), "   350 points • 10 comments");
    }

    #[test]
    fn badge_label_caps_at_99() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(7).as_deref(), Some("7"));
        assert_eq!(badge_label(99).as_deref(), Some("99"));
        assert_eq!(badge_label(100).as_deref(), Some("99+"));
    }

    #[test]
    fn empty_batch_yields_empty_model() {
        let model = select(&[], &SeenSet::new(), &config(15, &["rust"]));
        assert!(model.rows.is_empty());
        assert_eq!(model.badge_count, 0);
        assert_eq!(model.badge_label(), None);
    }
}
