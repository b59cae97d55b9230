use chrono::NaiveDateTime;

use crate::dates::decode_date;
use crate::section::SectionState;
use crate::sheet_client::SheetClient;
use crate::table::{self, Row};

pub const EVENT_NAME_COLUMN: &str = "Event Name";
pub const TARGET_COLUMN: &str = "Target Date (YYYY-MM-DD HH:mm:ss)";
pub const STARTED_LABEL: &str = "EVENT IN PROGRESS";
pub const PENDING_LABEL: &str = "--:--:--:--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownEvent {
    pub name: String,
    pub target: NaiveDateTime,
}

pub fn build_countdown(rows: &[Row]) -> Vec<CountdownEvent> {
    rows.iter()
        .filter_map(|row| {
            let target = decode_date(row.get(TARGET_COLUMN))?;
            Some(CountdownEvent {
                name: row.text_or(EVENT_NAME_COLUMN, "-"),
                target,
            })
        })
        .collect()
}

pub fn load_countdown(client: &SheetClient) -> SectionState<Vec<CountdownEvent>> {
    SectionState::from_fetch(table::COUNTDOWN, client.fetch(table::COUNTDOWN), build_countdown)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Running {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Started,
}

impl Remaining {
    pub fn label(&self) -> String {
        match self {
            Remaining::Running {
                days,
                hours,
                minutes,
                seconds,
            } => format!("{days}d {hours}h {minutes}m {seconds}s"),
            Remaining::Started => STARTED_LABEL.to_string(),
        }
    }
}

pub fn remaining(target: NaiveDateTime, now: NaiveDateTime) -> Remaining {
    let distance = (target - now).num_milliseconds();
    if distance < 0 {
        return Remaining::Started;
    }
    const SECOND: i64 = 1000;
    const MINUTE: i64 = 60 * SECOND;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    Remaining::Running {
        days: distance / DAY,
        hours: (distance % DAY) / HOUR,
        minutes: (distance % HOUR) / MINUTE,
        seconds: (distance % MINUTE) / SECOND,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    pub event: CountdownEvent,
    pub display: Option<Remaining>,
    pub active: bool,
}

impl CountdownTimer {
    pub fn label(&self) -> String {
        self.display
            .map(|r| r.label())
            .unwrap_or_else(|| PENDING_LABEL.to_string())
    }
}

/// The timers of one rendering pass.
///
/// A timer recomputes on every tick until its target passes, then stops for
/// good. A new pass builds a new board; the old one is dropped with all its
/// timers, so nothing from a previous render keeps ticking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountdownBoard {
    generation: u64,
    timers: Vec<CountdownTimer>,
}

impl CountdownBoard {
    pub fn new(events: Vec<CountdownEvent>, generation: u64) -> Self {
        let timers = events
            .into_iter()
            .map(|event| CountdownTimer {
                event,
                display: None,
                active: true,
            })
            .collect();
        Self { generation, timers }
    }

    /// Advances every active timer to `now`; returns how many are still running.
    pub fn tick(&mut self, now: NaiveDateTime) -> usize {
        for timer in self.timers.iter_mut().filter(|t| t.active) {
            let left = remaining(timer.event.target, now);
            if left == Remaining::Started {
                timer.active = false;
            }
            timer.display = Some(left);
        }
        self.active_count()
    }

    pub fn active_count(&self) -> usize {
        self.timers.iter().filter(|t| t.active).count()
    }

    pub fn timers(&self) -> &[CountdownTimer] {
        &self.timers
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
