use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use classmeet_board::bracket::{
    BracketStrategy, BracketView, DEFAULT_GRADES, GradeGroup, KNOCKOUT_SLOTS, Medal, build_race,
    build_tree, render_bracket, select_strategy,
};
use classmeet_board::countdown::build_countdown;
use classmeet_board::dates::decode_date;
use classmeet_board::gallery::{PLACEHOLDER_GALLERY_IMAGE, build_gallery};
use classmeet_board::gviz::parse_response;
use classmeet_board::leaderboard::{Standing, build_leaderboard};
use classmeet_board::roster::{build_roster, team_names};
use classmeet_board::schedule::build_schedule;
use classmeet_board::section::SectionState;
use classmeet_board::sports_info::{PLACEHOLDER_SPORT_IMAGE, build_sports_info};
use classmeet_board::table::{CellValue, Row};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid test date")
}

fn sport(name: &str, bracket_type: Option<&str>) -> Row {
    let mut row = Row::from_pairs([("Sport Name", name)]);
    if let Some(kind) = bracket_type {
        row.insert("Bracket Type", kind);
    }
    row
}

fn race_row(round: i64, team: &str, time: Option<i64>, rank: Option<i64>) -> Row {
    let mut row = Row::from_pairs([("Sport", CellValue::from("Estafet"))]);
    row.insert("Round", round);
    row.insert("Team", team);
    if let Some(time) = time {
        row.insert("Time (ms)", time);
    }
    if let Some(rank) = rank {
        row.insert("Rank", rank);
    }
    row
}

fn match_row(sport: &str, number: i64, t1: &str, t2: &str, winner: Option<&str>) -> Row {
    let mut row = Row::from_pairs([("Sport", sport), ("Team 1", t1), ("Team 2", t2)]);
    row.insert("Match Number", number);
    row.insert("Score 1", 2i64);
    row.insert("Score 2", 1i64);
    if let Some(winner) = winner {
        row.insert("Winner", winner);
    }
    row
}

// --- Leaderboard ---

#[test]
fn leaderboard_totals_and_stable_order() {
    let rows = parse_response("Teams", &read_fixture("teams.txt")).expect("fixture should parse");
    let standings = build_leaderboard(&rows);

    let summary: Vec<(&str, i64)> = standings
        .iter()
        .map(|s| (s.team.as_str(), s.total_points))
        .collect();
    assert_eq!(
        summary,
        [("Kelas XI-A", 22), ("Kelas X-A", 16), ("Kelas XII-A", 16), ("-", 2)]
    );
    assert_eq!(standings[0].placements, [2, 1, 0, 0]);
}

#[test]
fn leaderboard_points_formula_holds_for_every_row() {
    let rows = (0..12i64)
        .map(|i| {
            let mut row = Row::from_pairs([("Team Name", format!("Team {i}"))]);
            row.insert("1st Place", i % 3);
            row.insert("2nd Place", (i * 7) % 4);
            row.insert("3rd Place", format!("{}", i % 5));
            row.insert("4th Place", (i % 2) as f64);
            row
        })
        .collect::<Vec<_>>();
    let standings = build_leaderboard(&rows);

    for s in &standings {
        let [p1, p2, p3, p4] = s.placements;
        assert_eq!(s.total_points, p1 * 8 + p2 * 6 + p3 * 4 + p4 * 2);
    }
    assert!(standings.windows(2).all(|w| w[0].total_points >= w[1].total_points));

    // Equal totals keep the sheet order.
    let position = |name: &str| standings.iter().position(|s| s.team == name);
    let total = |name: &str| {
        standings
            .iter()
            .find(|s| s.team == name)
            .map(|s| s.total_points)
    };
    for (i, a) in rows.iter().enumerate() {
        for b in rows.iter().skip(i + 1) {
            let a_name = a.text_or("Team Name", "-");
            let b_name = b.text_or("Team Name", "-");
            if total(a_name.as_str()) == total(b_name.as_str()) {
                assert!(position(a_name.as_str()) < position(b_name.as_str()));
            }
        }
    }
}

#[test]
fn empty_teams_table_becomes_placeholder() {
    let rows = parse_response("Teams", &read_fixture("empty_table.txt")).expect("fixture should parse");
    let state: SectionState<Vec<Standing>> =
        SectionState::from_fetch("Teams", Ok(rows.into()), build_leaderboard);
    assert!(matches!(state, SectionState::Empty { .. }));
    let msg = state.placeholder("Leaderboard").expect("placeholder message");
    assert!(msg.contains("Teams"));
}

// --- Dates ---

#[test]
fn serial_dates_match_direct_construction() {
    for (raw, expected) in [
        ("Date(2025,0,1,0,0,0)", at(2025, 1, 1, 0, 0, 0)),
        ("Date(2024,1,29,23,59,59)", at(2024, 2, 29, 23, 59, 59)),
        ("Date(2025,7,17,8,5,9)", at(2025, 8, 17, 8, 5, 9)),
    ] {
        assert_eq!(decode_date(&CellValue::from(raw)), Some(expected), "{raw}");
    }
    assert_eq!(decode_date(&CellValue::from("not a date")), None);
    assert_eq!(decode_date(&CellValue::Null), None);
}

// --- Bracket dispatch ---

#[test]
fn race_type_selects_race_strategy() {
    let sports = vec![
        sport("Estafet", Some("Race")),
        sport("Futsal", Some("Tree")),
        sport("Basket", None),
        sport("Catur", Some("Swiss")),
    ];
    assert_eq!(select_strategy(&sports, "Estafet"), BracketStrategy::Race);
    assert_eq!(select_strategy(&sports, "Futsal"), BracketStrategy::Tree);
    assert_eq!(select_strategy(&sports, "Basket"), BracketStrategy::Tree);
    assert_eq!(select_strategy(&sports, "Catur"), BracketStrategy::Tree);
    assert_eq!(select_strategy(&sports, "Unknown"), BracketStrategy::Tree);
}

#[test]
fn qualifying_group_ranks_fastest_first() {
    let rows = vec![
        race_row(1, "Kelas X-A", Some(12000), None),
        race_row(1, "Kelas X-B", Some(9000), None),
        race_row(1, "Kelas XI-A", Some(8000), None),
    ];
    let race = build_race(&rows, "Estafet", &DEFAULT_GRADES).expect("race rows exist");
    let group_x = &race.groups[0];
    assert_eq!(group_x.grade, "X");

    let ranking: Vec<(String, String, bool)> = group_x
        .entries
        .iter()
        .map(|e| (e.team.clone(), e.time_label(), e.is_winner))
        .collect();
    assert_eq!(
        ranking,
        [
            ("Kelas X-B".to_string(), "9.000s".to_string(), true),
            ("Kelas X-A".to_string(), "12.000s".to_string(), false),
        ]
    );
    assert_eq!(race.groups[1].entries.len(), 1);
    assert!(race.groups[2].entries.is_empty());
}

#[test]
fn missing_times_sort_last_and_finals_get_medals() {
    let rows = vec![
        race_row(1, "Kelas XII-A", None, None),
        race_row(1, "Kelas XII-B", Some(0), None),
        race_row(1, "Kelas XII-C", Some(61000), None),
        race_row(2, "Kelas XII-C", Some(60000), Some(3)),
        race_row(2, "Kelas X-B", Some(58000), None),
        race_row(2, "Kelas XI-A", Some(57000), Some(1)),
        race_row(2, "Kelas X-A", Some(57500), Some(2)),
    ];
    let race = build_race(&rows, "Estafet", &DEFAULT_GRADES).expect("race rows exist");

    let xii = &race.groups[2];
    assert_eq!(xii.entries[0].team, "Kelas XII-C");
    assert!(xii.entries[0].is_winner);
    assert_eq!(xii.entries[1].time_label(), "N/A");
    assert_eq!(xii.entries[2].time_label(), "N/A");

    let finals: Vec<(&str, Option<Medal>)> = race
        .finals
        .iter()
        .map(|f| (f.team.as_str(), f.medal))
        .collect();
    assert_eq!(
        finals,
        [
            ("Kelas XI-A", Some(Medal::Gold)),
            ("Kelas X-A", Some(Medal::Silver)),
            ("Kelas XII-C", Some(Medal::Bronze)),
            ("Kelas X-B", None),
        ]
    );
}

#[test]
fn custom_grade_table_is_respected() {
    let grades = [GradeGroup { name: "7", prefix: "7" }];
    let mut row = Row::from_pairs([("Sport", "Estafet"), ("Team", "7B")]);
    row.insert("Round", 1i64);
    row.insert("Time (ms)", 30500i64);
    let race = build_race(&[row], "Estafet", &grades).expect("race rows exist");
    assert_eq!(race.groups.len(), 1);
    assert_eq!(race.groups[0].entries[0].time_label(), "30.500s");
}

#[test]
fn tree_with_first_and_final_only() {
    let rows = vec![
        match_row("Futsal", 1, "Kelas X-A", "Kelas X-B", Some("Kelas X-A")),
        match_row("Futsal", 8, "Kelas XI-A", "Kelas XII-A", None),
        match_row("Basket", 2, "Kelas X-C", "Kelas XI-C", None),
    ];
    let tree = build_tree(&rows, "Futsal", &KNOCKOUT_SLOTS).expect("futsal has rows");
    assert_eq!(tree.slots.len(), 8);

    for number in 2..=7 {
        let slot = tree.slot(number).expect("slot exists");
        assert!(!slot.filled, "slot {number} should be a placeholder");
        assert_eq!(slot.top.name, None);
        assert_eq!(slot.bottom.name, None);
    }

    let first = tree.slot(1).expect("slot 1");
    assert!(first.top.is_winner);
    assert!(!first.bottom.is_winner);

    let last = tree.slot(8).expect("slot 8");
    assert_eq!(last.top.name.as_deref(), Some("Kelas XI-A"));
    assert_eq!(last.bottom.name.as_deref(), Some("Kelas XII-A"));
    assert_eq!(last.top.score.as_deref(), Some("2"));
    assert_eq!(tree.champion, None);
}

#[test]
fn duplicate_match_numbers_last_write_wins() {
    let rows = vec![
        match_row("Futsal", 8, "Old A", "Old B", Some("Old A")),
        match_row("Futsal", 8, "Kelas XI-A", "Kelas XII-A", Some("Kelas XII-A")),
    ];
    let tree = build_tree(&rows, "Futsal", &KNOCKOUT_SLOTS).expect("futsal has rows");
    let last = tree.slot(8).expect("slot 8");
    assert_eq!(last.top.name.as_deref(), Some("Kelas XI-A"));
    assert!(last.bottom.is_winner);
    assert_eq!(tree.champion.as_deref(), Some("Kelas XII-A"));
}

#[test]
fn dispatcher_covers_prompt_and_missing_data() {
    let sports = vec![sport("Futsal", None), sport("Estafet", Some("race"))];
    let brackets = vec![match_row("Futsal", 1, "A", "B", Some("A"))];
    let races: Vec<Row> = Vec::new();

    assert_eq!(render_bracket(&sports, &brackets, &races, ""), BracketView::Prompt);
    assert!(matches!(
        render_bracket(&sports, &brackets, &races, "Futsal"),
        BracketView::Tree(_)
    ));
    assert_eq!(
        render_bracket(&sports, &brackets, &races, "Estafet"),
        BracketView::NoData {
            sport: "Estafet".to_string()
        }
    );
}

// --- Schedule, countdown, roster, sports, gallery ---

#[test]
fn schedule_splits_today_and_upcoming() {
    let rows = parse_response("Schedule", &read_fixture("schedule.txt")).expect("fixture should parse");
    let view = build_schedule(&rows, at(2025, 8, 17, 12, 0, 0));

    assert_eq!(view.today.len(), 2);
    assert_eq!(view.today[0].time_label(), "08:00");
    assert!(!view.today[0].cancelled);
    assert!(view.today[1].cancelled);
    assert_eq!(view.today[1].venue, "-");

    assert_eq!(view.upcoming.len(), 1);
    assert_eq!(view.upcoming[0].sport, "Estafet");
    assert_eq!(view.upcoming[0].date_label(), "19 Aug 2025");
    assert_eq!(view.upcoming[0].team_2, "-");
}

#[test]
fn countdown_skips_rows_without_target() {
    let rows = vec![
        Row::from_pairs([
            ("Event Name", "Opening"),
            ("Target Date (YYYY-MM-DD HH:mm:ss)", "2025-08-17 07:00:00"),
        ]),
        Row::from_pairs([("Event Name", "No date")]),
        Row::from_pairs([
            ("Event Name", "Broken"),
            ("Target Date (YYYY-MM-DD HH:mm:ss)", "soon"),
        ]),
    ];
    let events = build_countdown(&rows);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].target, at(2025, 8, 17, 7, 0, 0));
}

#[test]
fn roster_filters_by_team() {
    let teams = vec![
        Row::from_pairs([("Team Name", "Kelas X-A")]),
        Row::new(),
        Row::from_pairs([("Team Name", "Kelas X-B")]),
    ];
    assert_eq!(team_names(&teams), ["Kelas X-A", "Kelas X-B"]);

    let rosters = vec![
        Row::from_pairs([("Team Name", "Kelas X-A"), ("Player Name", "Adi"), ("Class", "X-A")]),
        Row::from_pairs([("Team Name", "Kelas X-B"), ("Player Name", "Citra")]),
    ];
    let players = build_roster(&rosters, "Kelas X-B");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Citra");
    assert_eq!(players[0].class, "-");
    assert!(build_roster(&rosters, "Kelas XII-A").is_empty());
}

#[test]
fn cards_and_gallery_fill_defaults() {
    let cards = build_sports_info(&[Row::from_pairs([("Sport Name", "Futsal")])]);
    assert_eq!(cards[0].image_url, PLACEHOLDER_SPORT_IMAGE);
    assert_eq!(cards[0].rules, "-");

    let items = build_gallery(&[
        Row::from_pairs([("Caption", "Parade"), ("Date", "Date(2025,7,17)")]),
        Row::from_pairs([("Image URL", "https://example.org/a.jpg"), ("Date", "later")]),
    ]);
    assert_eq!(items[0].image_url, PLACEHOLDER_GALLERY_IMAGE);
    assert_eq!(items[0].date, "17/08/2025");
    assert_eq!(items[1].caption, "");
    assert_eq!(items[1].date, "");
}
