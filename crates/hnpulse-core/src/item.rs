//! Story model.
//!
//! The Firebase API returns loosely-typed records: deleted or dead items come
//! back without a title, job posts have no `descendants`, Ask HN posts have no
//! `url`. [`RawItem`] mirrors that shape; [`Item`] is the validated value the
//! rest of the crate works with.

use serde::{Deserialize, Serialize};

use crate::hn::story_page_url;

/// Record as returned by `/item/{id}.json`. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: Option<u64>,
    #[serde(default)]
    pub descendants: Option<u64>,
}

/// A story snapshot taken during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub score: u64,
    /// Total comment count.
    #[serde(default)]
    pub descendants: u64,
}

impl Item {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: None,
            score: 0,
            descendants: 0,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_score(mut self, score: u64) -> Self {
        self.score = score;
        self
    }

    pub fn with_comments(mut self, descendants: u64) -> Self {
        self.descendants = descendants;
        self
    }

    /// Validate a raw record. Returns `None` when the id is missing or the
    /// title is missing or empty.
    pub fn from_raw(raw: RawItem) -> Option<Self> {
        let id = raw.id?;
        let title = raw.title.filter(|t| !t.is_empty())?;
        Some(Self {
            id,
            title,
            url: raw.url.filter(|u| !u.is_empty()),
            score: raw.score.unwrap_or(0),
            descendants: raw.descendants.unwrap_or(0),
        })
    }

    /// Link opened when the story is clicked: the article itself, or the HN
    /// discussion page for text posts.
    pub fn link(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => story_page_url(self.id),
        }
    }

    pub fn tier(&self) -> PopularityTier {
        PopularityTier::from(self.score)
    }
}

/// Score bucket used for menu decoration only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopularityTier {
    None,
    /// score > 100
    Popular,
    /// score > 200
    Hot,
    /// score > 300
    VeryHot,
}

impl From<u64> for PopularityTier {
    fn from(score: u64) -> Self {
        if score > 300 {
            PopularityTier::VeryHot
        } else if score > 200 {
            PopularityTier::Hot
        } else if score > 100 {
            PopularityTier::Popular
        } else {
            PopularityTier::None
        }
    }
}

impl PopularityTier {
    /// Marker appended to the menu title.
    pub fn indicator(self) -> &'static str {
        match self {
            PopularityTier::None => "",
            PopularityTier::Popular => "⚡",
            PopularityTier::Hot => "⭐",
            PopularityTier::VeryHot => "🔥",
        }
    }
}
