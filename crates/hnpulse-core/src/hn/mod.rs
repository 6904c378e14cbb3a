//! Hacker News Firebase API.

mod client;
mod retry;

pub use client::HnClient;
pub use retry::RetryPolicy;

use crate::error::FetchError;
use crate::item::Item;

/// Firebase API root.
pub const API_BASE: &str = "https://hacker-news.firebaseio.com/v0/";

/// Front page of the website.
pub const WEB_HOMEPAGE: &str = "https://news.ycombinator.com/";

/// Discussion page for a story.
pub fn story_page_url(id: u64) -> String {
    format!("{WEB_HOMEPAGE}item?id={id}")
}

/// Source of the ranked story batch for a tick.
///
/// Implementations return stories in popularity order, already validated
/// (records without a title are dropped), and handle their own retrying. An
/// `Err` means the tick must be abandoned.
#[allow(async_fn_in_trait)]
pub trait StorySource {
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<Item>, FetchError>;
}
