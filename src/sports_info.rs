use crate::section::SectionState;
use crate::sheet_client::SheetClient;
use crate::table::{self, Row};

pub const PLACEHOLDER_SPORT_IMAGE: &str = "https://via.placeholder.com/300x200?text=Sport";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportCard {
    pub name: String,
    pub description: String,
    pub rules: String,
    pub team_count: String,
    pub duration: String,
    pub winning_conditions: String,
    pub image_url: String,
    pub bracket_type: String,
}

pub fn build_sports_info(rows: &[Row]) -> Vec<SportCard> {
    rows.iter()
        .map(|row| SportCard {
            name: row.text_or("Sport Name", "-"),
            description: row.text_or("Description", "-"),
            rules: row.text_or("Rules", "-"),
            team_count: row.text_or("Number of Teams", "-"),
            duration: row.text_or("Duration", "-"),
            winning_conditions: row.text_or("Winning Conditions", "-"),
            image_url: row.text_or("Image URL", PLACEHOLDER_SPORT_IMAGE),
            bracket_type: row.text_or("Bracket Type", "Tree"),
        })
        .collect()
}

pub fn load_sports_info(client: &SheetClient) -> SectionState<Vec<SportCard>> {
    SectionState::from_fetch(table::SPORTS, client.fetch(table::SPORTS), build_sports_info)
}
