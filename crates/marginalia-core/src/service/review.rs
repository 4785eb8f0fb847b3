use log::{debug, warn};

use crate::config::{MarginaliaConfig, ReviewConfig};
use crate::error::{Error, Result};
use crate::model::{NoteId, Reminder, ReminderId, ReminderStatus};
use crate::schedule::{ReviewOutcome, ReviewScheduler};
use crate::store::ReminderStore;
use crate::utils::time::{Clock, SystemClock};

/// Paging request for due reminders. `limit` falls back to the configured
/// page size and is clamped to `1..=max_page_size`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuePage {
    pub reminders: Vec<Reminder>,
    /// Due reminders before paging
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Result of a string-driven status update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Unchanged(Reminder),
    Completed(ReviewOutcome),
    Dismissed(Reminder),
}

/// Drives reminder transitions and persists their outcomes.
pub struct ReviewService<C: Clock = SystemClock> {
    scheduler: ReviewScheduler<C>,
    review: ReviewConfig,
}

impl ReviewService<SystemClock> {
    pub fn new(config: &MarginaliaConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ReviewService<C> {
    pub fn with_clock(config: &MarginaliaConfig, clock: C) -> Self {
        Self {
            scheduler: ReviewScheduler::with_clock(clock),
            review: config.review.clone(),
        }
    }

    pub fn scheduler(&self) -> &ReviewScheduler<C> {
        &self.scheduler
    }

    pub fn create<S: ReminderStore>(&self, store: &mut S, note_id: NoteId, level: i64) -> Result<Reminder> {
        let reminder = self.scheduler.schedule(note_id, level);
        store.insert_reminder(reminder.clone())?;
        debug!(
            "reminder {} for note {} scheduled at {}",
            reminder.id, note_id, reminder.scheduled_at
        );
        Ok(reminder)
    }

    /// Mark a reminder reviewed and schedule the next one.
    ///
    /// The parent is written first, then the fork. If the fork write fails
    /// the review stays recorded and `Error::ForkFailed` carries the unsaved
    /// reminder for [`ReviewService::retry_fork`].
    pub fn complete<S: ReminderStore>(&self, store: &mut S, id: &ReminderId) -> Result<ReviewOutcome> {
        let current = store.get_reminder(id)?;
        let outcome = self.scheduler.complete(&current)?;

        store.update_reminder(&outcome.completed)?;

        if let Err(source) = store.insert_reminder(outcome.next.clone()) {
            warn!(
                "review of {} recorded but next reminder {} was not stored: {}",
                outcome.completed.id, outcome.next.id, source
            );
            return Err(Error::ForkFailed {
                completed: Box::new(outcome.completed),
                next: Box::new(outcome.next),
                source,
            });
        }

        debug!(
            "reminder {} completed, next at level {} on {}",
            outcome.completed.id, outcome.next.interval_level, outcome.next.scheduled_at
        );
        Ok(outcome)
    }

    /// Store the follow-up reminder of a review whose fork failed.
    ///
    /// `completed` and `next` are the two records carried by
    /// `Error::ForkFailed`. The stored parent must be completed and `next`
    /// must be its pending follow-up for the same note at the next level.
    /// Retrying a fork that has already been stored returns it unchanged.
    pub fn retry_fork<S: ReminderStore>(
        &self,
        store: &mut S,
        completed: &Reminder,
        next: Reminder,
    ) -> Result<Reminder> {
        if next.status != ReminderStatus::Pending {
            return Err(Error::InvalidTransition {
                from: next.status,
                to: ReminderStatus::Pending,
            });
        }

        let parent = store.get_reminder(&completed.id)?;
        let is_follow_up = parent.status == ReminderStatus::Completed
            && parent.note_id == next.note_id
            && parent.interval_level.next() == next.interval_level
            && parent.id != next.id;
        if !is_follow_up {
            return Err(Error::UnrelatedFork {
                parent: parent.id,
                next: next.id,
            });
        }

        if let Ok(stored) = store.get_reminder(&next.id) {
            debug!("fork {} of {} already stored", stored.id, parent.id);
            return Ok(stored);
        }

        store.insert_reminder(next.clone())?;
        debug!("fork {} of {} stored on retry", next.id, parent.id);
        Ok(next)
    }

    pub fn dismiss<S: ReminderStore>(&self, store: &mut S, id: &ReminderId) -> Result<Reminder> {
        let current = store.get_reminder(id)?;
        let dismissed = self.scheduler.dismiss(&current)?;
        store.update_reminder(&dismissed)?;
        Ok(dismissed)
    }

    /// Apply a status coming from outside (e.g. a request body).
    ///
    /// The value is validated before the store is touched.
    pub fn update_status<S: ReminderStore>(
        &self,
        store: &mut S,
        id: &ReminderId,
        status: &str,
    ) -> Result<StatusChange> {
        let target: ReminderStatus = status.parse()?;
        match target {
            ReminderStatus::Completed => self.complete(store, id).map(StatusChange::Completed),
            ReminderStatus::Dismissed => self.dismiss(store, id).map(StatusChange::Dismissed),
            ReminderStatus::Pending => {
                let current = store.get_reminder(id)?;
                if current.status.is_terminal() {
                    return Err(Error::InvalidTransition {
                        from: current.status,
                        to: target,
                    });
                }
                Ok(StatusChange::Unchanged(current))
            }
        }
    }

    /// Reminders in `status` whose time has come, oldest first.
    pub fn due<S: ReminderStore>(&self, store: &S, status: ReminderStatus, page: Page) -> Result<DuePage> {
        let limit = page
            .limit
            .unwrap_or(self.review.page_size)
            .clamp(1, self.review.max_page_size.max(1));

        let mut due: Vec<Reminder> = store
            .reminders_with_status(status)?
            .into_iter()
            .filter(|reminder| self.scheduler.is_due(reminder.scheduled_at))
            .collect();
        due.sort_by_key(|reminder| reminder.scheduled_at);

        let total = due.len();
        let reminders = due.into_iter().skip(page.offset).take(limit).collect();

        Ok(DuePage {
            reminders,
            total,
            limit,
            offset: page.offset,
        })
    }
}
