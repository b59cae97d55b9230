use chrono::NaiveDateTime;

use crate::dates::decode_date;
use crate::section::SectionState;
use crate::sheet_client::SheetClient;
use crate::table::{self, Row};

pub const DATE_COLUMN: &str = "Date";
pub const STATUS_CANCELLED: &str = "Cancelled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub starts_at: NaiveDateTime,
    pub sport: String,
    pub team_1: String,
    pub team_2: String,
    pub venue: String,
    pub status: String,
    pub cancelled: bool,
}

impl Fixture {
    pub fn date_label(&self) -> String {
        self.starts_at.format("%d %b %Y").to_string()
    }

    pub fn time_label(&self) -> String {
        self.starts_at.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleView {
    pub today: Vec<Fixture>,
    pub upcoming: Vec<Fixture>,
}

/// Splits fixtures into today's and later ones relative to `now`.
/// Rows with an unreadable date are skipped; earlier days are dropped.
pub fn build_schedule(rows: &[Row], now: NaiveDateTime) -> ScheduleView {
    let today = now.date();
    let mut view = ScheduleView::default();
    for row in rows {
        let Some(starts_at) = decode_date(row.get(DATE_COLUMN)) else {
            continue;
        };
        let status = row.text_or("Status", "-");
        let fixture = Fixture {
            starts_at,
            sport: row.text_or("Sport", "-"),
            team_1: row.text_or("Team 1", "-"),
            team_2: row.text_or("Team 2", "-"),
            venue: row.text_or("Venue", "-"),
            cancelled: status == STATUS_CANCELLED,
            status,
        };
        if starts_at.date() == today {
            view.today.push(fixture);
        } else if starts_at >= now {
            view.upcoming.push(fixture);
        }
    }
    view
}

pub fn load_schedule(client: &SheetClient, now: NaiveDateTime) -> SectionState<ScheduleView> {
    SectionState::from_fetch(table::SCHEDULE, client.fetch(table::SCHEDULE), |rows| {
        build_schedule(rows, now)
    })
}
