use crate::section::SectionState;
use crate::sheet_client::SheetClient;
use crate::table::{self, Row};

pub const TEAM_NAME_COLUMN: &str = "Team Name";

/// Placement columns and the points each finish is worth.
pub const PLACE_POINTS: [(&str, i64); 4] = [
    ("1st Place", 8),
    ("2nd Place", 6),
    ("3rd Place", 4),
    ("4th Place", 2),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub team: String,
    pub placements: [i64; 4],
    pub total_points: i64,
}

/// Weighted sum of placements, saturating at the `i64` bounds.
pub fn total_points(placements: &[i64; 4]) -> i64 {
    placements
        .iter()
        .zip(PLACE_POINTS.iter())
        .map(|(count, (_, points))| count.saturating_mul(*points))
        .fold(0i64, i64::saturating_add)
}

/// Standings sorted by total points, highest first. Equal totals keep sheet order.
pub fn build_leaderboard(rows: &[Row]) -> Vec<Standing> {
    let mut standings = rows
        .iter()
        .map(|row| {
            let mut placements = [0i64; 4];
            for (slot, (column, _)) in placements.iter_mut().zip(PLACE_POINTS.iter()) {
                *slot = row.count(column);
            }
            Standing {
                team: row.text_or(TEAM_NAME_COLUMN, "-"),
                total_points: total_points(&placements),
                placements,
            }
        })
        .collect::<Vec<_>>();
    standings.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    standings
}

pub fn load_leaderboard(client: &SheetClient) -> SectionState<Vec<Standing>> {
    SectionState::from_fetch(table::TEAMS, client.fetch(table::TEAMS), build_leaderboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_use_place_weights() {
        assert_eq!(total_points(&[1, 2, 3, 4]), 8 + 12 + 12 + 8);
        assert_eq!(total_points(&[0, 0, 0, 0]), 0);
    }

    #[test]
    fn huge_counts_saturate() {
        assert_eq!(total_points(&[i64::MAX, 1, 0, 0]), i64::MAX);
        assert_eq!(total_points(&[i64::MIN, 0, 0, 0]), i64::MIN);

        let mut huge = Row::from_pairs([("Team Name", "Kelas X-C")]);
        huge.insert("2nd Place", 1e300);
        let rows = vec![
            Row::from_pairs([("Team Name", "Kelas X-A"), ("1st Place", "9223372036854775807")]),
            Row::from_pairs([("Team Name", "Kelas X-B"), ("1st Place", "2")]),
            huge,
        ];

        let standings = build_leaderboard(&rows);
        let totals: Vec<(&str, i64)> = standings
            .iter()
            .map(|s| (s.team.as_str(), s.total_points))
            .collect();
        assert_eq!(
            totals,
            [("Kelas X-A", i64::MAX), ("Kelas X-C", i64::MAX), ("Kelas X-B", 16)]
        );
    }
}
