// Day navigation state machine and its render model
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;

use crate::day::Day;
use crate::error::AppResult;
use crate::record::ImageRecord;

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> Day;
}

/// Today in the machine's local timezone
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> Day {
        Day::containing(&Local::now())
    }
}

/// A clock stuck on one day
pub struct FixedClock(pub Day);

impl Clock for FixedClock {
    fn today(&self) -> Day {
        self.0
    }
}

/// Handle for one day load. Only the most recently issued ticket may
/// replace the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    pub day: Day,
}

/// Everything the display surface draws for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub day: Day,
    pub image_url: String,
    pub author_name: String,
    pub author_bio: String,
    pub author_location: String,
    pub current_label: String,
    pub previous_label: String,
    pub next_label: String,
    pub next_enabled: bool,
    pub liked: bool,
}

pub struct DayViewer {
    clock: Arc<dyn Clock>,
    current: Day,
    issued: u64,
    view: Option<DayView>,
}

impl DayViewer {
    /// Starts on today.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let current = clock.today();
        Self {
            clock,
            current,
            issued: 0,
            view: None,
        }
    }

    pub fn current(&self) -> Day {
        self.current
    }

    /// Last successful render, if any.
    pub fn view(&self) -> Option<&DayView> {
        self.view.as_ref()
    }

    /// Next is allowed only while the following day is not in the future.
    pub fn next_enabled(&self) -> bool {
        self.current.next() <= self.clock.today()
    }

    /// Issue a load for the current day.
    pub fn reload(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket {
            seq: self.issued,
            day: self.current,
        }
    }

    pub fn previous(&mut self) -> LoadTicket {
        self.current = self.current.previous();
        self.reload()
    }

    /// `None` when the next day would be in the future.
    pub fn next(&mut self) -> Option<LoadTicket> {
        if !self.next_enabled() {
            return None;
        }
        self.current = self.current.next();
        Some(self.reload())
    }

    /// Render a loaded record. Returns `Ok(false)` and leaves the view alone
    /// when a newer load has been issued since `ticket`. A record missing a
    /// displayed field is an error and also leaves the view alone.
    pub fn present(&mut self, ticket: LoadTicket, record: &ImageRecord) -> AppResult<bool> {
        if ticket.seq != self.issued {
            tracing::debug!(
                "Dropping stale load for {} (ticket {}, latest {})",
                ticket.day,
                ticket.seq,
                self.issued
            );
            return Ok(false);
        }

        let view = self.render(ticket.day, record)?;
        self.view = Some(view);
        Ok(true)
    }

    /// Optimistically flip the liked indicator. Returns the day on screen,
    /// which is the one to persist the like for; it can lag `current` while
    /// a load is pending or after one failed. `None` if there is nothing to
    /// like or it is already liked.
    pub fn like(&mut self) -> Option<Day> {
        let view = self.view.as_mut()?;
        if view.liked {
            return None;
        }
        view.liked = true;
        Some(view.day)
    }

    fn render(&self, day: Day, record: &ImageRecord) -> AppResult<DayView> {
        let next = day.next();
        Ok(DayView {
            day,
            image_url: record.display_url()?.to_string(),
            author_name: record.author_name()?.to_string(),
            author_bio: record.author_bio()?.to_string(),
            author_location: record.author_location()?.to_string(),
            current_label: day.label(),
            previous_label: day.previous().label(),
            next_label: next.label(),
            next_enabled: next <= self.clock.today(),
            liked: record.is_liked(),
        })
    }
}

impl std::fmt::Debug for DayViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DayViewer")
            .field("current", &self.current)
            .field("issued", &self.issued)
            .field("view", &self.view)
            .finish()
    }
}
