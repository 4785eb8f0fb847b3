//! Marginalia Core Library
//!
//! Wiki-link parsing/resolution and spaced-repetition scheduling for the
//! reading notes manager. No IO dependencies, pure logic only; persistence
//! is reached through the collaborator traits in [`store`].
//!

mod config;
pub mod error;
pub mod line_map;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolve;
pub mod schedule;
pub mod service;
pub mod store;
pub mod utils;

pub use config::{LinkingConfig, LoggingConfig, MarginaliaConfig, ReviewConfig};
pub use error::{Error, Result, StoreError};
pub use model::{
    LinkEdge, NoteId, NoteTitle, RelationshipType, Reminder, ReminderId, ReminderStatus, WikiLink,
};
pub use parser::{extract_links, has_links, iter_links};
pub use render::{highlight, replace_links, splice_links, Highlight};
pub use resolve::{find_matching_note, normalize_title, search_by_prefix};
pub use schedule::{IntervalLevel, ReviewOutcome, ReviewScheduler};
pub use service::{LinkSync, LinkSyncReport, Page, ReviewService};
pub use store::MemoryStore;
pub use utils::time::{Clock, ManualClock, SystemClock};
