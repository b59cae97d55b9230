use std::collections::HashMap;

use crate::error::SheetError;
use crate::section::SectionState;
use crate::sheet_client::SheetClient;
use crate::table::{self, Row, Table};

pub const SPORT_NAME_COLUMN: &str = "Sport Name";
pub const BRACKET_TYPE_COLUMN: &str = "Bracket Type";
pub const SPORT_COLUMN: &str = "Sport";

pub const MATCH_NUMBER_COLUMN: &str = "Match Number";
pub const TEAM_1_COLUMN: &str = "Team 1";
pub const TEAM_2_COLUMN: &str = "Team 2";
pub const SCORE_1_COLUMN: &str = "Score 1";
pub const SCORE_2_COLUMN: &str = "Score 2";
pub const WINNER_COLUMN: &str = "Winner";

pub const RACE_ROUND_COLUMN: &str = "Round";
pub const RACE_TEAM_COLUMN: &str = "Team";
pub const RACE_TIME_COLUMN: &str = "Time (ms)";
pub const RACE_RANK_COLUMN: &str = "Rank";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketStrategy {
    Tree,
    Race,
}

/// Reads the sport's `Bracket Type`; only `Race` switches away from the
/// knockout tree. Unknown sports and blank types fall back to `Tree`.
pub fn select_strategy(sports: &[Row], sport_name: &str) -> BracketStrategy {
    let bracket_type = sports
        .iter()
        .find(|row| row.text_eq(SPORT_NAME_COLUMN, sport_name))
        .and_then(|row| row.text(BRACKET_TYPE_COLUMN));
    match bracket_type {
        Some(kind) if kind.trim().eq_ignore_ascii_case("race") => BracketStrategy::Race,
        _ => BracketStrategy::Tree,
    }
}

pub fn sport_names(sports: &[Row]) -> Vec<String> {
    sports
        .iter()
        .filter_map(|row| row.text(SPORT_NAME_COLUMN))
        .collect()
}

// --- Tree ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    Quarterfinal,
    Semifinal,
    ThirdPlace,
    Final,
}

pub fn round_label(round: Round) -> &'static str {
    match round {
        Round::Quarterfinal => "Quarterfinal",
        Round::Semifinal => "Semifinal",
        Round::ThirdPlace => "3rd Place",
        Round::Final => "Final",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub match_number: u32,
    pub round: Round,
}

pub const FINAL_MATCH_NUMBER: u32 = 8;

pub const KNOCKOUT_SLOTS: [SlotSpec; 8] = [
    SlotSpec { match_number: 1, round: Round::Quarterfinal },
    SlotSpec { match_number: 2, round: Round::Quarterfinal },
    SlotSpec { match_number: 3, round: Round::Quarterfinal },
    SlotSpec { match_number: 4, round: Round::Quarterfinal },
    SlotSpec { match_number: 5, round: Round::Semifinal },
    SlotSpec { match_number: 6, round: Round::Semifinal },
    SlotSpec { match_number: 7, round: Round::ThirdPlace },
    SlotSpec { match_number: FINAL_MATCH_NUMBER, round: Round::Final },
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BracketTeam {
    pub name: Option<String>,
    pub score: Option<String>,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSlot {
    pub match_number: u32,
    pub round: Round,
    pub filled: bool,
    pub top: BracketTeam,
    pub bottom: BracketTeam,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeBracket {
    pub sport: String,
    pub slots: Vec<MatchSlot>,
    pub champion: Option<String>,
}

impl TreeBracket {
    pub fn slot(&self, match_number: u32) -> Option<&MatchSlot> {
        self.slots.iter().find(|s| s.match_number == match_number)
    }
}

fn match_number(row: &Row) -> Option<u32> {
    let n = row.number(MATCH_NUMBER_COLUMN)?;
    if n.fract() != 0.0 || n < 0.0 || n > u32::MAX as f64 {
        return None;
    }
    Some(n as u32)
}

fn bracket_team(name: Option<String>, score: Option<String>, winner: Option<&str>) -> BracketTeam {
    let is_winner = match (&name, winner) {
        (Some(name), Some(winner)) => name == winner,
        _ => false,
    };
    BracketTeam {
        name,
        score,
        is_winner,
    }
}

/// Lays the sport's matches onto `slots`. Returns `None` when the sport has no
/// bracket rows at all. Rows sharing a match number: the last one wins.
pub fn build_tree(brackets: &[Row], sport: &str, slots: &[SlotSpec]) -> Option<TreeBracket> {
    let mut by_number: HashMap<u32, &Row> = HashMap::new();
    let mut any = false;
    for row in brackets.iter().filter(|row| row.text_eq(SPORT_COLUMN, sport)) {
        any = true;
        if let Some(number) = match_number(row) {
            by_number.insert(number, row);
        }
    }
    if !any {
        return None;
    }

    let slots = slots
        .iter()
        .map(|spec| match by_number.get(&spec.match_number) {
            None => MatchSlot {
                match_number: spec.match_number,
                round: spec.round,
                filled: false,
                top: BracketTeam::default(),
                bottom: BracketTeam::default(),
            },
            Some(row) => {
                let winner = row.text(WINNER_COLUMN);
                MatchSlot {
                    match_number: spec.match_number,
                    round: spec.round,
                    filled: true,
                    top: bracket_team(
                        row.text(TEAM_1_COLUMN),
                        row.text(SCORE_1_COLUMN),
                        winner.as_deref(),
                    ),
                    bottom: bracket_team(
                        row.text(TEAM_2_COLUMN),
                        row.text(SCORE_2_COLUMN),
                        winner.as_deref(),
                    ),
                }
            }
        })
        .collect();

    let champion = by_number
        .get(&FINAL_MATCH_NUMBER)
        .and_then(|row| row.text(WINNER_COLUMN));

    Some(TreeBracket {
        sport: sport.to_string(),
        slots,
        champion,
    })
}

// --- Race ---

/// A grade bracket for qualifying heats. Teams belong to the group when their
/// name starts with `prefix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeGroup {
    pub name: &'static str,
    pub prefix: &'static str,
}

pub const DEFAULT_GRADES: [GradeGroup; 3] = [
    GradeGroup { name: "X", prefix: "Kelas X-" },
    GradeGroup { name: "XI", prefix: "Kelas XI-" },
    GradeGroup { name: "XII", prefix: "Kelas XII-" },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceEntry {
    pub team: String,
    pub time_ms: Option<u64>,
    pub is_winner: bool,
}

impl RaceEntry {
    pub fn new(team: impl Into<String>, time_ms: Option<u64>) -> Self {
        Self {
            team: team.into(),
            time_ms: time_ms.filter(|ms| *ms > 0),
            is_winner: false,
        }
    }

    pub fn time_label(&self) -> String {
        format_race_time(self.time_ms)
    }
}

pub fn format_race_time(time_ms: Option<u64>) -> String {
    match time_ms {
        Some(ms) if ms > 0 => format!("{}.{:03}s", ms / 1000, ms % 1000),
        _ => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRanking {
    pub grade: String,
    pub entries: Vec<RaceEntry>,
}

impl GradeRanking {
    pub fn winner(&self) -> Option<&RaceEntry> {
        self.entries.iter().find(|e| e.is_winner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: u32) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Medal::Gold => "GOLD",
            Medal::Silver => "SILVER",
            Medal::Bronze => "BRONZE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalEntry {
    pub team: String,
    pub time_ms: Option<u64>,
    pub rank: Option<u32>,
    pub medal: Option<Medal>,
}

impl FinalEntry {
    pub fn time_label(&self) -> String {
        format_race_time(self.time_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceBracket {
    pub sport: String,
    pub groups: Vec<GradeRanking>,
    pub finals: Vec<FinalEntry>,
}

/// Orders entries fastest first, missing times last, and flags the fastest
/// timed entry. Equal times keep their input order; there is no tie-break.
pub fn rank_group(mut entries: Vec<RaceEntry>) -> Vec<RaceEntry> {
    entries.sort_by_key(|e| (e.time_ms.is_none(), e.time_ms.unwrap_or(0)));
    for entry in entries.iter_mut() {
        entry.is_winner = false;
    }
    if let Some(first) = entries.first_mut()
        && first.time_ms.is_some()
    {
        first.is_winner = true;
    }
    entries
}

/// Orders finalists by their declared rank, unranked last, and hands out medals.
pub fn rank_finals(mut entries: Vec<FinalEntry>) -> Vec<FinalEntry> {
    entries.sort_by_key(|e| (e.rank.is_none(), e.rank.unwrap_or(0)));
    for entry in entries.iter_mut() {
        entry.medal = entry.rank.and_then(Medal::for_rank);
    }
    entries
}

fn race_time(row: &Row) -> Option<u64> {
    row.number(RACE_TIME_COLUMN)
        .filter(|ms| *ms > 0.0)
        .map(|ms| ms.round() as u64)
}

/// Declared final rank; fractional or out-of-range values count as unranked.
fn race_rank(row: &Row) -> Option<u32> {
    let rank = row.number(RACE_RANK_COLUMN)?;
    if rank.fract() != 0.0 || rank < 1.0 || rank > u32::MAX as f64 {
        return None;
    }
    Some(rank as u32)
}

pub fn build_race(results: &[Row], sport: &str, grades: &[GradeGroup]) -> Option<RaceBracket> {
    let rows = results
        .iter()
        .filter(|row| row.text_eq(SPORT_COLUMN, sport))
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return None;
    }

    let qualifying = rows
        .iter()
        .filter(|row| row.count(RACE_ROUND_COLUMN) == 1)
        .collect::<Vec<_>>();

    let groups = grades
        .iter()
        .map(|grade| {
            let entries = qualifying
                .iter()
                .filter_map(|row| {
                    let team = row.text(RACE_TEAM_COLUMN)?;
                    team.starts_with(grade.prefix)
                        .then(|| RaceEntry::new(team, race_time(row)))
                })
                .collect::<Vec<_>>();
            GradeRanking {
                grade: grade.name.to_string(),
                entries: rank_group(entries),
            }
        })
        .collect();

    let finals = rows
        .iter()
        .filter(|row| row.count(RACE_ROUND_COLUMN) == 2)
        .map(|row| FinalEntry {
            team: row.text_or(RACE_TEAM_COLUMN, "-"),
            time_ms: race_time(row),
            rank: race_rank(row),
            medal: None,
        })
        .collect::<Vec<_>>();

    Some(RaceBracket {
        sport: sport.to_string(),
        groups,
        finals: rank_finals(finals),
    })
}

// --- Dispatch ---

pub fn race_unavailable_message(sport: &str, error: &SheetError) -> String {
    format!(
        "Could not load race results for {sport} ({}). Check the \"{}\" sheet and its sharing settings.",
        error.kind_label(),
        error.table()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketView {
    /// No sport picked yet.
    Prompt,
    NoData { sport: String },
    /// A race sport whose results sheet could not be read.
    Unavailable { sport: String, error: SheetError },
    Tree(TreeBracket),
    Race(RaceBracket),
}

/// Tables the bracket screen works from; views are derived per selected sport.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketData {
    pub sports: Table,
    pub brackets: Table,
    /// Optional sheet: a failure here only affects race sports.
    pub races: Result<Table, SheetError>,
}

impl BracketData {
    pub fn sport_names(&self) -> Vec<String> {
        sport_names(&self.sports)
    }

    pub fn view_for(&self, sport: &str) -> BracketView {
        let races: &[Row] = match &self.races {
            Ok(rows) => rows.as_slice(),
            Err(error) => {
                if !sport.trim().is_empty()
                    && select_strategy(&self.sports, sport) == BracketStrategy::Race
                {
                    return BracketView::Unavailable {
                        sport: sport.to_string(),
                        error: error.clone(),
                    };
                }
                &[]
            }
        };
        render_bracket(&self.sports, &self.brackets, races, sport)
    }
}

pub fn render_bracket(sports: &[Row], brackets: &[Row], races: &[Row], sport: &str) -> BracketView {
    render_bracket_with(sports, brackets, races, sport, &KNOCKOUT_SLOTS, &DEFAULT_GRADES)
}

pub fn render_bracket_with(
    sports: &[Row],
    brackets: &[Row],
    races: &[Row],
    sport: &str,
    slots: &[SlotSpec],
    grades: &[GradeGroup],
) -> BracketView {
    if sport.trim().is_empty() {
        return BracketView::Prompt;
    }
    let view = match select_strategy(sports, sport) {
        BracketStrategy::Tree => build_tree(brackets, sport, slots).map(BracketView::Tree),
        BracketStrategy::Race => build_race(races, sport, grades).map(BracketView::Race),
    };
    view.unwrap_or_else(|| BracketView::NoData {
        sport: sport.to_string(),
    })
}

/// Fetches Sports, then Brackets, then RaceResults.
///
/// Sports and Brackets are required. A missing RaceResults sheet is kept as
/// its error so race views can say so, and is reported through `warnings`.
pub fn load_bracket_data(
    client: &SheetClient,
    warnings: &mut Vec<String>,
) -> SectionState<BracketData> {
    let sports = match client.fetch(table::SPORTS) {
        Ok(rows) => rows,
        Err(error) => {
            return SectionState::Unavailable {
                table: table::SPORTS.to_string(),
                error,
            };
        }
    };
    if sports.is_empty() {
        return SectionState::Empty {
            table: table::SPORTS.to_string(),
        };
    }
    let brackets = match client.fetch(table::BRACKETS) {
        Ok(rows) => rows,
        Err(error) => {
            return SectionState::Unavailable {
                table: table::BRACKETS.to_string(),
                error,
            };
        }
    };
    let races = client.fetch(table::RACE_RESULTS).inspect_err(|err| {
        warnings.push(format!("[WARN] Race results unavailable: {err}"));
    });
    SectionState::Ready(BracketData {
        sports,
        brackets,
        races,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn race_time_label_has_millis() {
        assert_eq!(format_race_time(Some(9000)), "9.000s");
        assert_eq!(format_race_time(Some(12345)), "12.345s");
        assert_eq!(format_race_time(Some(0)), "N/A");
        assert_eq!(format_race_time(None), "N/A");
    }

    #[test]
    fn equal_times_keep_input_order() {
        let ranked = rank_group(vec![
            RaceEntry::new("Kelas X-C", None),
            RaceEntry::new("Kelas X-A", Some(9000)),
            RaceEntry::new("Kelas X-B", Some(9000)),
        ]);
        let teams: Vec<&str> = ranked.iter().map(|e| e.team.as_str()).collect();
        assert_eq!(teams, ["Kelas X-A", "Kelas X-B", "Kelas X-C"]);
        assert!(ranked[0].is_winner);
        assert!(!ranked[1].is_winner);
    }

    #[test]
    fn group_without_times_has_no_winner() {
        let ranked = rank_group(vec![
            RaceEntry::new("Kelas XI-A", Some(0)),
            RaceEntry::new("Kelas XI-B", None),
        ]);
        assert!(ranked.iter().all(|e| !e.is_winner));
        assert_eq!(ranked[0].time_label(), "N/A");
    }

    #[test]
    fn fractional_rank_is_unranked() {
        let mut row = Row::from_pairs([("Sport", "Estafet"), ("Team", "Kelas X-A")]);
        row.insert(RACE_ROUND_COLUMN, 2i64);
        row.insert(RACE_RANK_COLUMN, 1.9);
        let mut second = Row::from_pairs([("Sport", "Estafet"), ("Team", "Kelas X-B")]);
        second.insert(RACE_ROUND_COLUMN, 2i64);
        second.insert(RACE_RANK_COLUMN, 2.0);

        let race = build_race(&[row, second], "Estafet", &DEFAULT_GRADES).expect("race rows");
        assert_eq!(race.finals[0].team, "Kelas X-B");
        assert_eq!(race.finals[0].medal, Some(Medal::Silver));
        assert_eq!(race.finals[1].rank, None);
        assert_eq!(race.finals[1].medal, None);
    }

    #[test]
    fn unreadable_race_sheet_is_not_empty_data() {
        let sports = vec![
            Row::from_pairs([("Sport Name", "Lari"), ("Bracket Type", "Race")]),
            Row::from_pairs([("Sport Name", "Futsal")]),
        ];
        let error = SheetError::Transport {
            table: "RaceResults".to_string(),
            message: "http 500".to_string(),
        };
        let data = BracketData {
            sports: Arc::new(sports),
            brackets: Arc::new(Vec::new()),
            races: Err(error.clone()),
        };
        assert_eq!(
            data.view_for("Lari"),
            BracketView::Unavailable {
                sport: "Lari".to_string(),
                error,
            }
        );
        assert_eq!(
            data.view_for("Futsal"),
            BracketView::NoData {
                sport: "Futsal".to_string()
            }
        );
        assert_eq!(data.view_for(""), BracketView::Prompt);

        let readable = BracketData {
            races: Ok(Arc::new(Vec::new())),
            ..data
        };
        assert_eq!(
            readable.view_for("Lari"),
            BracketView::NoData {
                sport: "Lari".to_string()
            }
        );
    }

    #[test]
    fn medals_follow_rank_not_position() {
        let finals = rank_finals(vec![
            FinalEntry { team: "C".into(), time_ms: None, rank: None, medal: None },
            FinalEntry { team: "B".into(), time_ms: None, rank: Some(4), medal: None },
            FinalEntry { team: "A".into(), time_ms: None, rank: Some(1), medal: None },
        ]);
        assert_eq!(finals[0].team, "A");
        assert_eq!(finals[0].medal, Some(Medal::Gold));
        assert_eq!(finals[1].medal, None);
        assert_eq!(finals[2].team, "C");
    }
}
