use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::schedule::IntervalLevel;

/// Note identity, owned by the note-storage collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub uuid::Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(pub uuid::Uuid);

impl ReminderId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ReminderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One entry of the title corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTitle {
    pub id: NoteId,
    pub title: String,
}

impl NoteTitle {
    pub fn new(id: NoteId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// A `[[text]]` or `[[text|display]]` occurrence inside note content.
///
/// `start_index..end_index` is the byte range of the whole bracketed span
/// in the parsed source, so `&source[link.span()]` gives back the raw
/// occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiLink {
    pub text: String,
    pub display_text: String,
    pub start_index: usize,
    pub end_index: usize,
}

impl WikiLink {
    pub fn span(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    pub fn has_alias(&self) -> bool {
        self.text != self.display_text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    #[default]
    RelatesTo,
    Supports,
    Contradicts,
    InspiredBy,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::RelatesTo,
        RelationshipType::Supports,
        RelationshipType::Contradicts,
        RelationshipType::InspiredBy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::RelatesTo => "relates_to",
            RelationshipType::Supports => "supports",
            RelationshipType::Contradicts => "contradicts",
            RelationshipType::InspiredBy => "inspired_by",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidRelationship {
                value: s.to_string(),
            })
    }
}

/// Directed graph edge between two notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEdge {
    pub source_note_id: NoteId,
    pub target_note_id: NoteId,
    pub relationship_type: RelationshipType,
    pub created_at: DateTime<Utc>,
}

impl LinkEdge {
    pub fn new(
        source: NoteId,
        target: NoteId,
        relationship_type: RelationshipType,
        created_at: DateTime<Utc>,
    ) -> Result<Self, Error> {
        if source == target {
            return Err(Error::SelfLink(source));
        }
        Ok(Self {
            source_note_id: source,
            target_note_id: target,
            relationship_type,
            created_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Completed,
    Dismissed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Completed => "completed",
            ReminderStatus::Dismissed => "dismissed",
        }
    }

    /// Completed and dismissed reminders never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReminderStatus::Pending)
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReminderStatus::Pending),
            "completed" => Ok(ReminderStatus::Completed),
            "dismissed" => Ok(ReminderStatus::Dismissed),
            other => Err(Error::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// A single review reminder record. A lineage of reminders for one note is
/// formed by forking a new record on every completed review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub note_id: NoteId,
    pub interval_level: IntervalLevel,
    pub scheduled_at: DateTime<Utc>,
    pub status: ReminderStatus,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
