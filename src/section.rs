use crate::error::SheetError;
use crate::table::{self, Row, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Leaderboard,
    Bracket,
    Schedule,
    Countdown,
    Roster,
    SportsInfo,
    Gallery,
}

pub const ALL_SECTIONS: [SectionKind; 7] = [
    SectionKind::Leaderboard,
    SectionKind::Bracket,
    SectionKind::Schedule,
    SectionKind::Countdown,
    SectionKind::Roster,
    SectionKind::SportsInfo,
    SectionKind::Gallery,
];

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Leaderboard => "Leaderboard",
            SectionKind::Bracket => "Bracket",
            SectionKind::Schedule => "Schedule",
            SectionKind::Countdown => "Countdown",
            SectionKind::Roster => "Roster",
            SectionKind::SportsInfo => "Sports",
            SectionKind::Gallery => "Gallery",
        }
    }

    /// The sheet whose absence the section's placeholder should mention.
    pub fn primary_table(self) -> &'static str {
        match self {
            SectionKind::Leaderboard | SectionKind::Roster => table::TEAMS,
            SectionKind::Bracket | SectionKind::SportsInfo => table::SPORTS,
            SectionKind::Schedule => table::SCHEDULE,
            SectionKind::Countdown => table::COUNTDOWN,
            SectionKind::Gallery => table::GALLERY,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        ALL_SECTIONS.get(idx).copied()
    }

    pub fn index(self) -> usize {
        ALL_SECTIONS.iter().position(|s| *s == self).unwrap_or(0)
    }
}

/// What a section can show: still loading, a view, a legitimately empty
/// sheet, or a sheet that could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    Loading,
    Ready(T),
    Empty { table: String },
    Unavailable { table: String, error: SheetError },
}

impl<T> Default for SectionState<T> {
    fn default() -> Self {
        SectionState::Loading
    }
}

impl<T> SectionState<T> {
    /// Maps a fetch outcome: errors become `Unavailable`, zero rows `Empty`,
    /// otherwise `build` turns the rows into a view.
    pub fn from_fetch(
        table: &str,
        fetched: Result<Table, SheetError>,
        build: impl FnOnce(&[Row]) -> T,
    ) -> Self {
        match fetched {
            Err(error) => SectionState::Unavailable {
                table: table.to_string(),
                error,
            },
            Ok(rows) if rows.is_empty() => SectionState::Empty {
                table: table.to_string(),
            },
            Ok(rows) => SectionState::Ready(build(rows.as_slice())),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            SectionState::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SectionState::Loading)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SectionState<U> {
        match self {
            SectionState::Loading => SectionState::Loading,
            SectionState::Ready(view) => SectionState::Ready(f(view)),
            SectionState::Empty { table } => SectionState::Empty { table },
            SectionState::Unavailable { table, error } => {
                SectionState::Unavailable { table, error }
            }
        }
    }

    /// Placeholder text for every non-ready state; `None` once a view exists.
    pub fn placeholder(&self, section: &str) -> Option<String> {
        match self {
            SectionState::Loading => Some(format!("Loading {section}...")),
            SectionState::Ready(_) => None,
            SectionState::Empty { table } => Some(format!(
                "No {section} data yet. Check the \"{table}\" sheet."
            )),
            SectionState::Unavailable { table, error } => Some(format!(
                "Could not load {section} ({}). Check the \"{table}\" sheet and its sharing settings.",
                error.kind_label()
            )),
        }
    }

    /// Short status for logs.
    pub fn summary(&self) -> String {
        match self {
            SectionState::Loading => "loading".to_string(),
            SectionState::Ready(_) => "ready".to_string(),
            SectionState::Empty { table } => format!("sheet {table} is empty"),
            SectionState::Unavailable { error, .. } => error.to_string(),
        }
    }
}
