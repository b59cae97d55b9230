use std::fmt::Write as _;

use chrono::NaiveDateTime;

use crate::bracket::{BracketView, load_bracket_data, race_unavailable_message, round_label};
use crate::countdown::{CountdownBoard, load_countdown};
use crate::gallery::load_gallery;
use crate::leaderboard::load_leaderboard;
use crate::roster::{load_roster, load_teams, no_roster_message};
use crate::schedule::load_schedule;
use crate::section::{SectionKind, SectionState};
use crate::sheet_client::SheetClient;
use crate::sports_info::load_sports_info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDump {
    pub section: SectionKind,
    pub text: String,
    pub logs: Vec<String>,
}

/// Loads `section` and renders it as plain text, the way the board would show it at `now`.
pub fn dump_section(section: SectionKind, client: &SheetClient, now: NaiveDateTime) -> SectionDump {
    let mut out = String::new();
    let mut logs = Vec::new();
    let label = section.label();
    let _ = writeln!(out, "== {label} ==");

    match section {
        SectionKind::Leaderboard => {
            let state = load_leaderboard(client);
            note(&mut logs, label, &state);
            match state.ready() {
                Some(rows) => {
                    let _ = writeln!(out, "{:<20} {:>3} {:>3} {:>3} {:>3} {:>6}", "Team", "1st", "2nd", "3rd", "4th", "Points");
                    for s in rows {
                        let [p1, p2, p3, p4] = s.placements;
                        let _ = writeln!(out, "{:<20} {p1:>3} {p2:>3} {p3:>3} {p4:>3} {:>6}", s.team, s.total_points);
                    }
                }
                None => placeholder(&mut out, &state, label),
            }
        }
        SectionKind::Bracket => {
            let state = load_bracket_data(client, &mut logs);
            note(&mut logs, label, &state);
            match state.ready() {
                Some(data) => {
                    for sport in data.sport_names() {
                        write_bracket(&mut out, &data.view_for(&sport));
                    }
                }
                None => placeholder(&mut out, &state, label),
            }
        }
        SectionKind::Schedule => {
            let state = load_schedule(client, now);
            note(&mut logs, label, &state);
            match state.ready() {
                Some(view) => {
                    let _ = writeln!(out, "-- Today --");
                    if view.today.is_empty() {
                        let _ = writeln!(out, "No matches today.");
                    }
                    for f in &view.today {
                        let flag = if f.cancelled { " [CANCELLED]" } else { "" };
                        let _ = writeln!(out, "{} {} | {} vs {} | {} | {}{flag}", f.time_label(), f.sport, f.team_1, f.team_2, f.venue, f.status);
                    }
                    let _ = writeln!(out, "-- Upcoming --");
                    if view.upcoming.is_empty() {
                        let _ = writeln!(out, "No upcoming matches.");
                    }
                    for f in &view.upcoming {
                        let _ = writeln!(out, "{} {} {} | {} vs {} | {}", f.date_label(), f.time_label(), f.sport, f.team_1, f.team_2, f.venue);
                    }
                }
                None => placeholder(&mut out, &state, label),
            }
        }
        SectionKind::Countdown => {
            let state = load_countdown(client);
            note(&mut logs, label, &state);
            match state {
                SectionState::Ready(events) => {
                    let mut board = CountdownBoard::new(events, 1);
                    board.tick(now);
                    for timer in board.timers() {
                        let _ = writeln!(out, "{:<24} {}", timer.event.name, timer.label());
                    }
                }
                other => placeholder(&mut out, &other, label),
            }
        }
        SectionKind::Roster => {
            let state = load_teams(client);
            note(&mut logs, label, &state);
            match state.ready() {
                Some(teams) => {
                    for team in teams {
                        let _ = writeln!(out, "-- {team} --");
                        let players = load_roster(client, team);
                        match &players {
                            SectionState::Ready(list) if !list.is_empty() => {
                                for p in list {
                                    let _ = writeln!(out, "{:<24} {}", p.name, p.class);
                                }
                            }
                            SectionState::Unavailable { .. } => {
                                placeholder(&mut out, &players, "roster");
                            }
                            _ => {
                                let _ = writeln!(out, "{}", no_roster_message(team));
                            }
                        }
                    }
                }
                None => placeholder(&mut out, &state, label),
            }
        }
        SectionKind::SportsInfo => {
            let state = load_sports_info(client);
            note(&mut logs, label, &state);
            match state.ready() {
                Some(cards) => {
                    for c in cards {
                        let _ = writeln!(out, "{} [{}]", c.name, c.bracket_type);
                        let _ = writeln!(out, "  Description: {}", c.description);
                        let _ = writeln!(out, "  Rules: {}", c.rules);
                        let _ = writeln!(out, "  Teams: {} | Duration: {}", c.team_count, c.duration);
                        let _ = writeln!(out, "  Winning conditions: {}", c.winning_conditions);
                        let _ = writeln!(out, "  Image: {}", c.image_url);
                    }
                }
                None => placeholder(&mut out, &state, label),
            }
        }
        SectionKind::Gallery => {
            let state = load_gallery(client);
            note(&mut logs, label, &state);
            match state.ready() {
                Some(items) => {
                    for item in items {
                        let _ = writeln!(out, "{} | {} | {}", item.date, item.caption, item.image_url);
                    }
                }
                None => placeholder(&mut out, &state, label),
            }
        }
    }

    SectionDump {
        section,
        text: out,
        logs,
    }
}

pub fn write_bracket(out: &mut String, view: &BracketView) {
    match view {
        BracketView::Prompt => {
            let _ = writeln!(out, "Select a sport to see its bracket.");
        }
        BracketView::NoData { sport } => {
            let _ = writeln!(out, "-- {sport} --");
            let _ = writeln!(out, "No bracket data for {sport} yet.");
        }
        BracketView::Unavailable { sport, error } => {
            let _ = writeln!(out, "-- {sport} --");
            let _ = writeln!(out, "{}", race_unavailable_message(sport, error));
        }
        BracketView::Tree(tree) => {
            let _ = writeln!(out, "-- {} (knockout) --", tree.sport);
            for slot in &tree.slots {
                let side = |team: &crate::bracket::BracketTeam| {
                    let name = team.name.as_deref().unwrap_or("");
                    let score = team.score.as_deref().unwrap_or("");
                    let mark = if team.is_winner { "*" } else { "" };
                    format!("{name}{mark} {score}").trim().to_string()
                };
                let _ = writeln!(out, "M{} {:<12} {} | {}", slot.match_number, round_label(slot.round), side(&slot.top), side(&slot.bottom));
            }
            let _ = writeln!(out, "Champion: {}", tree.champion.as_deref().unwrap_or(""));
        }
        BracketView::Race(race) => {
            let _ = writeln!(out, "-- {} (race) --", race.sport);
            for group in &race.groups {
                let _ = writeln!(out, "Grade {}:", group.grade);
                for (idx, entry) in group.entries.iter().enumerate() {
                    let mark = if entry.is_winner { " (winner)" } else { "" };
                    let _ = writeln!(out, "  {}. {} {}{mark}", idx + 1, entry.team, entry.time_label());
                }
            }
            let _ = writeln!(out, "Final:");
            for entry in &race.finals {
                let rank = entry.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
                let medal = entry.medal.map(|m| format!(" [{}]", m.label())).unwrap_or_default();
                let _ = writeln!(out, "  {rank}. {} {}{medal}", entry.team, entry.time_label());
            }
        }
    }
}

fn placeholder<T>(out: &mut String, state: &SectionState<T>, label: &str) {
    if let Some(msg) = state.placeholder(label) {
        let _ = writeln!(out, "{msg}");
    }
}

fn note<T>(logs: &mut Vec<String>, label: &str, state: &SectionState<T>) {
    match state {
        SectionState::Empty { .. } => logs.push(format!("[INFO] {label}: {}", state.summary())),
        SectionState::Unavailable { .. } => logs.push(format!("[WARN] {label}: {}", state.summary())),
        _ => {}
    }
}
