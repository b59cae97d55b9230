use crate::section::SectionState;
use crate::sheet_client::SheetClient;
use crate::table::{self, Row};

pub const TEAM_NAME_COLUMN: &str = "Team Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub class: String,
}

/// Team picker entries: every non-blank `Team Name`, in sheet order.
pub fn team_names(teams: &[Row]) -> Vec<String> {
    teams
        .iter()
        .filter_map(|row| row.text(TEAM_NAME_COLUMN))
        .collect()
}

pub fn build_roster(rosters: &[Row], team: &str) -> Vec<Player> {
    rosters
        .iter()
        .filter(|row| row.text_eq(TEAM_NAME_COLUMN, team))
        .map(|row| Player {
            name: row.text_or("Player Name", "-"),
            class: row.text_or("Class", "-"),
        })
        .collect()
}

pub fn load_teams(client: &SheetClient) -> SectionState<Vec<String>> {
    SectionState::from_fetch(table::TEAMS, client.fetch(table::TEAMS), team_names)
}

pub fn load_roster(client: &SheetClient, team: &str) -> SectionState<Vec<Player>> {
    SectionState::from_fetch(table::ROSTERS, client.fetch(table::ROSTERS), |rows| {
        build_roster(rows, team)
    })
}

pub fn no_roster_message(team: &str) -> String {
    format!("No roster registered for {team}. Check the \"{}\" sheet.", table::ROSTERS)
}
