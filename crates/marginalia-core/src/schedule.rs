//! Spaced-repetition scheduling.
//!
//! A reminder lineage walks through four interval levels. Each successful
//! review forks a new pending reminder one level up (saturating at the last
//! level); the reviewed record stays behind as history.
//!
//! | level | due after | label    |
//! |-------|-----------|----------|
//! | 0     | 1 day     | 1일 후   |
//! | 1     | 3 days    | 3일 후   |
//! | 2     | 7 days    | 7일 후   |
//! | 3     | 30 days   | 30일 후  |

use std::fmt;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{NoteId, Reminder, ReminderId, ReminderStatus};
use crate::utils::time::{Clock, SystemClock};

struct IntervalEntry {
    days: i64,
    label: &'static str,
}

const INTERVALS: [IntervalEntry; 4] = [
    IntervalEntry {
        days: 1,
        label: "1일 후",
    },
    IntervalEntry {
        days: 3,
        label: "3일 후",
    },
    IntervalEntry {
        days: 7,
        label: "7일 후",
    },
    IntervalEntry {
        days: 30,
        label: "30일 후",
    },
];

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Index into the interval table. Always within `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct IntervalLevel(u8);

impl IntervalLevel {
    pub const MIN: IntervalLevel = IntervalLevel(0);
    pub const MAX: IntervalLevel = IntervalLevel(3);

    /// Any out-of-range input is clamped into `0..=3`.
    pub fn clamped(raw: i64) -> Self {
        let level = raw.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64);
        if level != raw {
            debug!("interval level {} clamped to {}", raw, level);
        }
        IntervalLevel(level as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Level reached after a successful review.
    pub fn next(self) -> Self {
        IntervalLevel((self.0 + 1).min(Self::MAX.0))
    }

    pub fn days(self) -> i64 {
        INTERVALS[self.0 as usize].days
    }

    pub fn label(self) -> &'static str {
        INTERVALS[self.0 as usize].label
    }
}

impl From<i64> for IntervalLevel {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<IntervalLevel> for u8 {
    fn from(level: IntervalLevel) -> Self {
        level.0
    }
}

impl fmt::Display for IntervalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub fn days_for_level(level: i64) -> i64 {
    IntervalLevel::clamped(level).days()
}

pub fn interval_label(level: i64) -> &'static str {
    IntervalLevel::clamped(level).label()
}

pub fn next_level(level: i64) -> IntervalLevel {
    IntervalLevel::clamped(level).next()
}

/// Position in the level ladder as a percentage.
pub fn progress_percent(level: i64) -> f64 {
    if level <= 0 {
        return 0.0;
    }
    if level >= IntervalLevel::MAX.0 as i64 {
        return 100.0;
    }
    (level as f64 / IntervalLevel::MAX.0 as f64) * 100.0
}

/// Korean long date, e.g. `2024년 3월 5일`, as seen on the calendar of `tz`.
///
/// Pass `&Utc` for the UTC date or a `FixedOffset` for a reader's zone.
pub fn format_review_date<Tz: TimeZone>(date: DateTime<Utc>, tz: &Tz) -> String {
    let local = date.with_timezone(tz);
    format!("{}년 {}월 {}일", local.year(), local.month(), local.day())
}

/// Both records produced by a completed review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// The reviewed reminder, now `completed`
    pub completed: Reminder,
    /// The follow-up reminder, `pending` at the next level
    pub next: Reminder,
}

pub struct ReviewScheduler<C: Clock = SystemClock> {
    clock: C,
}

impl ReviewScheduler<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for ReviewScheduler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ReviewScheduler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn next_review_date(&self, level: IntervalLevel) -> DateTime<Utc> {
        self.now() + Duration::days(level.days())
    }

    /// Due when the scheduled time is now or already past.
    pub fn is_due(&self, scheduled_at: DateTime<Utc>) -> bool {
        scheduled_at <= self.now()
    }

    /// Whole days left until `scheduled_at`, rounded up. Negative when overdue.
    pub fn days_remaining(&self, scheduled_at: DateTime<Utc>) -> i64 {
        let millis = (scheduled_at - self.now()).num_milliseconds();
        millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0)
    }

    /// Fresh pending reminder for `note_id`.
    pub fn schedule(&self, note_id: NoteId, level: i64) -> Reminder {
        let level = IntervalLevel::clamped(level);
        let now = self.now();
        Reminder {
            id: ReminderId::new(),
            note_id,
            interval_level: level,
            scheduled_at: now + Duration::days(level.days()),
            status: ReminderStatus::Pending,
            last_reviewed_at: None,
            created_at: now,
        }
    }

    /// Record a successful review: the reminder becomes `completed` and a
    /// new pending reminder is forked one level up.
    pub fn complete(&self, reminder: &Reminder) -> Result<ReviewOutcome> {
        ensure_pending(reminder, ReminderStatus::Completed)?;

        let now = self.now();
        let next_level = reminder.interval_level.next();

        let completed = Reminder {
            status: ReminderStatus::Completed,
            last_reviewed_at: Some(now),
            ..reminder.clone()
        };
        let next = Reminder {
            id: ReminderId::new(),
            note_id: reminder.note_id,
            interval_level: next_level,
            scheduled_at: now + Duration::days(next_level.days()),
            status: ReminderStatus::Pending,
            last_reviewed_at: None,
            created_at: now,
        };

        Ok(ReviewOutcome { completed, next })
    }

    /// Drop the reminder without scheduling another one.
    pub fn dismiss(&self, reminder: &Reminder) -> Result<Reminder> {
        ensure_pending(reminder, ReminderStatus::Dismissed)?;
        Ok(Reminder {
            status: ReminderStatus::Dismissed,
            ..reminder.clone()
        })
    }
}

fn ensure_pending(reminder: &Reminder, to: ReminderStatus) -> Result<()> {
    if reminder.status.is_terminal() {
        return Err(Error::InvalidTransition {
            from: reminder.status,
            to,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::ManualClock;
    use chrono::FixedOffset;
    use std::sync::Arc;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 30, 8, 0, 0).unwrap()
    }

    fn scheduler() -> (ReviewScheduler<Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        (ReviewScheduler::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_interval_table() {
        let expected = [(0, 1, "1일 후"), (1, 3, "3일 후"), (2, 7, "7일 후"), (3, 30, "30일 후")];
        for (level, days, label) in expected {
            assert_eq!(days_for_level(level), days);
            assert_eq!(interval_label(level), label);
        }
    }

    #[test]
    fn test_out_of_range_levels_are_clamped() {
        assert_eq!(IntervalLevel::clamped(-4), IntervalLevel::MIN);
        assert_eq!(IntervalLevel::clamped(99), IntervalLevel::MAX);
        assert_eq!(days_for_level(-1), 1);
        assert_eq!(days_for_level(7), 30);
        assert_eq!(next_level(3), IntervalLevel::MAX);
        assert_eq!(next_level(0).value(), 1);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0), 0.0);
        assert_eq!(progress_percent(3), 100.0);
        assert!((progress_percent(1) - 33.33).abs() < 0.01);
        assert!((progress_percent(2) - 66.67).abs() < 0.01);
        assert_eq!(progress_percent(-1), 0.0);
        assert_eq!(progress_percent(5), 100.0);
    }

    #[test]
    fn test_is_due_boundary() {
        let (scheduler, _) = scheduler();
        assert!(scheduler.is_due(start()));
        assert!(scheduler.is_due(start() - Duration::days(1)));
        assert!(!scheduler.is_due(start() + Duration::microseconds(1)));
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let (scheduler, _) = scheduler();
        assert_eq!(scheduler.days_remaining(start()), 0);
        assert_eq!(scheduler.days_remaining(start() + Duration::hours(1)), 1);
        assert_eq!(scheduler.days_remaining(start() + Duration::days(3)), 3);
        assert_eq!(scheduler.days_remaining(start() - Duration::hours(1)), 0);
        assert_eq!(scheduler.days_remaining(start() - Duration::hours(25)), -1);
    }

    #[test]
    fn test_schedule_uses_clamped_level() {
        let (scheduler, _) = scheduler();
        let note = NoteId::new();

        let reminder = scheduler.schedule(note, 2);
        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(reminder.scheduled_at, start() + Duration::days(7));

        let reminder = scheduler.schedule(note, 12);
        assert_eq!(reminder.interval_level, IntervalLevel::MAX);
        assert_eq!(reminder.scheduled_at, start() + Duration::days(30));
    }

    #[test]
    fn test_complete_forks_next_reminder() {
        let (scheduler, clock) = scheduler();
        let reminder = scheduler.schedule(NoteId::new(), 0);

        clock.advance(Duration::days(1));
        let outcome = scheduler.complete(&reminder).unwrap();

        assert_eq!(outcome.completed.id, reminder.id);
        assert_eq!(outcome.completed.status, ReminderStatus::Completed);
        assert_eq!(outcome.completed.last_reviewed_at, Some(clock.now()));
        assert_eq!(outcome.completed.interval_level, reminder.interval_level);

        assert_ne!(outcome.next.id, reminder.id);
        assert_eq!(outcome.next.note_id, reminder.note_id);
        assert_eq!(outcome.next.status, ReminderStatus::Pending);
        assert_eq!(outcome.next.interval_level.value(), 1);
        assert_eq!(outcome.next.scheduled_at, clock.now() + Duration::days(3));
    }

    #[test]
    fn test_complete_chain_saturates_at_last_level() {
        let (scheduler, clock) = scheduler();
        let mut reminder = scheduler.schedule(NoteId::new(), 0);
        let mut levels = Vec::new();

        for _ in 0..5 {
            clock.set(reminder.scheduled_at);
            let outcome = scheduler.complete(&reminder).unwrap();
            levels.push(outcome.next.interval_level.value());
            reminder = outcome.next;
        }

        assert_eq!(levels, vec![1, 2, 3, 3, 3]);
        assert_eq!(reminder.scheduled_at, clock.now() + Duration::days(30));
    }

    #[test]
    fn test_terminal_reminders_reject_transitions() {
        let (scheduler, _) = scheduler();
        let reminder = scheduler.schedule(NoteId::new(), 1);

        let dismissed = scheduler.dismiss(&reminder).unwrap();
        assert_eq!(dismissed.status, ReminderStatus::Dismissed);
        assert_eq!(dismissed.interval_level, reminder.interval_level);

        assert!(matches!(
            scheduler.complete(&dismissed),
            Err(Error::InvalidTransition {
                from: ReminderStatus::Dismissed,
                to: ReminderStatus::Completed
            })
        ));

        let completed = scheduler.complete(&reminder).unwrap().completed;
        assert!(scheduler.dismiss(&completed).is_err());
        assert!(scheduler.complete(&completed).is_err());
    }

    #[test]
    fn test_format_review_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 23, 0, 0).unwrap();
        assert_eq!(format_review_date(date, &Utc), "2024년 3월 5일");

        // Already the next day in Seoul
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_review_date(date, &kst), "2024년 3월 6일");

        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(format_review_date(date, &new_york), "2023년 12월 31일");
    }

    #[test]
    fn test_level_deserializes_with_clamping() {
        let level: IntervalLevel = serde_json::from_str("9").unwrap();
        assert_eq!(level, IntervalLevel::MAX);
        assert_eq!(serde_json::to_string(&IntervalLevel::clamped(2)).unwrap(), "2");
    }
}
