use std::collections::HashMap;

use crate::error::StoreError;
use crate::model::{LinkEdge, NoteId, NoteTitle, Reminder, ReminderId, ReminderStatus};

/// Supplies the title corpus of the acting user.
pub trait NoteCatalog {
    fn note_titles(&self) -> Result<Vec<NoteTitle>, StoreError>;
}

/// Persists graph edges. Implementations must reject a second edge for the
/// same ordered (source, target) pair with `StoreError::DuplicateLink`.
pub trait LinkStore {
    fn insert_link(&mut self, edge: LinkEdge) -> Result<(), StoreError>;
    /// Delete the edge for the ordered pair and return it.
    /// `StoreError::NotFound` when there is none.
    fn remove_link(&mut self, source: &NoteId, target: &NoteId) -> Result<LinkEdge, StoreError>;
    fn links_from(&self, source: &NoteId) -> Result<Vec<LinkEdge>, StoreError>;
    fn links_to(&self, target: &NoteId) -> Result<Vec<LinkEdge>, StoreError>;
}

pub trait ReminderStore {
    fn insert_reminder(&mut self, reminder: Reminder) -> Result<(), StoreError>;
    fn update_reminder(&mut self, reminder: &Reminder) -> Result<(), StoreError>;
    fn get_reminder(&self, id: &ReminderId) -> Result<Reminder, StoreError>;
    fn reminders_with_status(&self, status: ReminderStatus) -> Result<Vec<Reminder>, StoreError>;
}

// In memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Insertion order is kept so the corpus comes back deterministic
    notes: Vec<NoteTitle>,
    links: HashMap<(NoteId, NoteId), LinkEdge>,
    backlinks: HashMap<NoteId, Vec<NoteId>>,
    reminders: HashMap<ReminderId, Reminder>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_note(&mut self, id: NoteId, title: impl Into<String>) {
        let title = title.into();
        match self.notes.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.title = title,
            None => self.notes.push(NoteTitle::new(id, title)),
        }
    }

    /// Remove a note together with every edge touching it.
    pub fn remove_note(&mut self, id: &NoteId) {
        self.notes.retain(|entry| &entry.id != id);
        self.links
            .retain(|(source, target), _| source != id && target != id);
        self.backlinks.remove(id);
        for backlinks in self.backlinks.values_mut() {
            backlinks.retain(|backlink_id| backlink_id != id);
        }
        self.reminders.retain(|_, reminder| &reminder.note_id != id);
    }

    /// Notes linking to `id`, in the order the edges were created
    pub fn backlinks_of(&self, id: &NoteId) -> Vec<NoteId> {
        self.backlinks.get(id).cloned().unwrap_or_default()
    }

    pub fn reminders_for_note(&self, note_id: &NoteId) -> Vec<&Reminder> {
        let mut reminders: Vec<&Reminder> = self
            .reminders
            .values()
            .filter(|reminder| &reminder.note_id == note_id)
            .collect();
        reminders.sort_by_key(|reminder| reminder.created_at);
        reminders
    }
}

impl NoteCatalog for MemoryStore {
    fn note_titles(&self) -> Result<Vec<NoteTitle>, StoreError> {
        Ok(self.notes.clone())
    }
}

impl LinkStore for MemoryStore {
    fn insert_link(&mut self, edge: LinkEdge) -> Result<(), StoreError> {
        let key = (edge.source_note_id, edge.target_note_id);
        if self.links.contains_key(&key) {
            return Err(StoreError::DuplicateLink {
                source_id: key.0,
                target_id: key.1,
            });
        }

        let backlinks = self.backlinks.entry(key.1).or_default();
        if !backlinks.contains(&key.0) {
            backlinks.push(key.0);
        }
        self.links.insert(key, edge);
        Ok(())
    }

    fn remove_link(&mut self, source: &NoteId, target: &NoteId) -> Result<LinkEdge, StoreError> {
        let edge = self
            .links
            .remove(&(*source, *target))
            .ok_or_else(|| StoreError::NotFound(format!("link {} -> {}", source, target)))?;

        if let Some(backlinks) = self.backlinks.get_mut(target) {
            backlinks.retain(|backlink_id| backlink_id != source);
            if backlinks.is_empty() {
                self.backlinks.remove(target);
            }
        }
        Ok(edge)
    }

    fn links_from(&self, source: &NoteId) -> Result<Vec<LinkEdge>, StoreError> {
        let mut edges: Vec<LinkEdge> = self
            .links
            .values()
            .filter(|edge| &edge.source_note_id == source)
            .cloned()
            .collect();
        edges.sort_by_key(|edge| (edge.created_at, edge.target_note_id));
        Ok(edges)
    }

    fn links_to(&self, target: &NoteId) -> Result<Vec<LinkEdge>, StoreError> {
        let mut edges: Vec<LinkEdge> = self
            .links
            .values()
            .filter(|edge| &edge.target_note_id == target)
            .cloned()
            .collect();
        edges.sort_by_key(|edge| (edge.created_at, edge.source_note_id));
        Ok(edges)
    }
}

impl ReminderStore for MemoryStore {
    fn insert_reminder(&mut self, reminder: Reminder) -> Result<(), StoreError> {
        self.reminders.insert(reminder.id, reminder);
        Ok(())
    }

    fn update_reminder(&mut self, reminder: &Reminder) -> Result<(), StoreError> {
        match self.reminders.get_mut(&reminder.id) {
            Some(stored) => {
                *stored = reminder.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("reminder {}", reminder.id))),
        }
    }

    fn get_reminder(&self, id: &ReminderId) -> Result<Reminder, StoreError> {
        self.reminders
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("reminder {}", id)))
    }

    fn reminders_with_status(&self, status: ReminderStatus) -> Result<Vec<Reminder>, StoreError> {
        Ok(self
            .reminders
            .values()
            .filter(|reminder| reminder.status == status)
            .cloned()
            .collect())
    }
}
