//! # HN Pulse Core Library
//!
//! Business logic for the HN Pulse tray reader. The CLI (and any GUI shell) is a
//! thin layer over this crate: it supplies a [`Renderer`] and a [`Notifier`] and
//! lets the [`PollDriver`] run ticks.
//!
//! ## Architecture
//!
//! - **Seen-set**: persisted identifiers of stories already classified
//! - **Filter engine**: case-insensitive keyword matching over titles
//! - **Classification**: decides which new stories deserve a notification
//! - **Ranking**: builds the menu model and badge count for a tick
//! - **Session**: owns seen-set and config, runs one tick at a time
//! - **HN client**: Hacker News Firebase API with bounded retry
//!
//! ## Key Components
//!
//! - [`Session`]: tick context over an injected [`StateStore`]
//! - [`PollDriver`]: fixed-interval scheduler with a depth-1 refresh queue
//! - [`HnClient`]: [`StorySource`] backed by `reqwest`

pub mod classify;
pub mod error;
pub mod filter;
pub mod hn;
pub mod item;
pub mod poller;
pub mod ranking;
pub mod session;
pub mod storage;

pub use classify::{classify, notify_kind, Notification, NotificationKind, Notifier};
pub use error::{ConfigError, CoreError, FetchError};
pub use filter::{matches, FilterSet};
pub use hn::{HnClient, RetryPolicy, StorySource};
pub use item::{Item, PopularityTier, RawItem};
pub use poller::{DriverCommand, DriverHandle, PollDriver, Renderer};
pub use ranking::{badge_label, select, MenuRow, RenderModel};
pub use session::{Session, TickReport};
pub use storage::{Config, DisplayCount, JsonStore, MemoryStore, SeenSet, StateStore};
