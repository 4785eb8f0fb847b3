use crate::model::{NoteId, Reminder, ReminderId, ReminderStatus};
use crate::service::LinkSyncReport;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the persistence collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    /// The ordered (source, target) pair already has an edge.
    #[error("link {source_id} -> {target_id} already exists")]
    DuplicateLink { source_id: NoteId, target_id: NoteId },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid status `{value}`: must be one of pending, completed, dismissed")]
    InvalidStatus { value: String },

    #[error(
        "invalid relationship type `{value}`: must be one of relates_to, supports, contradicts, inspired_by"
    )]
    InvalidRelationship { value: String },

    #[error("reminder cannot move from {from} to {to}")]
    InvalidTransition {
        from: ReminderStatus,
        to: ReminderStatus,
    },

    #[error("a note cannot link to itself ({0})")]
    SelfLink(NoteId),

    /// The review was recorded but the follow-up reminder was not stored.
    /// `next` is the unsaved reminder; hand both records to
    /// `ReviewService::retry_fork`.
    #[error("review recorded, next reminder NOT scheduled: {source}")]
    ForkFailed {
        completed: Box<Reminder>,
        next: Box<Reminder>,
        source: StoreError,
    },

    /// `next` is not the follow-up of the completed reminder `parent`.
    #[error("reminder {next} is not the follow-up of completed reminder {parent}")]
    UnrelatedFork { parent: ReminderId, next: ReminderId },

    /// Link synchronisation stopped on a store failure. `report` lists the
    /// edges written before it stopped.
    #[error("link sync for {source_id} interrupted after {} edges: {source}", .report.created.len())]
    SyncInterrupted {
        source_id: NoteId,
        report: Box<LinkSyncReport>,
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl Error {
    /// True when part of the work was persisted before the failure: a
    /// review whose fork is missing, or a link sync that stopped midway.
    pub fn is_partial(&self) -> bool {
        matches!(self, Error::ForkFailed { .. } | Error::SyncInterrupted { .. })
    }
}
