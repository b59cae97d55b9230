use std::collections::VecDeque;

use chrono::NaiveDateTime;

use crate::bracket::{BracketData, BracketView};
use crate::countdown::{CountdownBoard, CountdownEvent};
use crate::gallery::GalleryItem;
use crate::leaderboard::Standing;
use crate::roster::Player;
use crate::schedule::ScheduleView;
use crate::section::{SectionKind, SectionState};
use crate::sports_info::SportCard;

const MAX_LOGS: usize = 200;

/// Roster panel for the team currently picked.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterPanel {
    pub team: String,
    pub players: SectionState<Vec<Player>>,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: SectionKind,
    pub help_overlay: bool,
    pub leaderboard: SectionState<Vec<Standing>>,
    pub bracket_data: SectionState<BracketData>,
    pub sport_names: Vec<String>,
    /// Index into `sport_names`; `None` until the user picks a sport.
    pub sport_selected: Option<usize>,
    pub bracket_view: BracketView,
    pub schedule: SectionState<ScheduleView>,
    pub countdown: SectionState<CountdownBoard>,
    pub countdown_generation: u64,
    pub teams: SectionState<Vec<String>>,
    pub team_selected: Option<usize>,
    pub roster: Option<RosterPanel>,
    pub sports: SectionState<Vec<SportCard>>,
    pub gallery: SectionState<Vec<GalleryItem>>,
    pub scroll: u16,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: SectionKind::Leaderboard,
            help_overlay: false,
            leaderboard: SectionState::Loading,
            bracket_data: SectionState::Loading,
            sport_names: Vec::new(),
            sport_selected: None,
            bracket_view: BracketView::Prompt,
            schedule: SectionState::Loading,
            countdown: SectionState::Loading,
            countdown_generation: 0,
            teams: SectionState::Loading,
            team_selected: None,
            roster: None,
            sports: SectionState::Loading,
            gallery: SectionState::Loading,
            scroll: 0,
            logs: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_screen(&mut self, screen: SectionKind) {
        if self.screen != screen {
            self.screen = screen;
            self.scroll = 0;
        }
    }

    pub fn selected_sport(&self) -> Option<&str> {
        self.sport_selected
            .and_then(|idx| self.sport_names.get(idx))
            .map(String::as_str)
    }

    pub fn selected_team(&self) -> Option<&str> {
        let teams = self.teams.ready()?;
        self.team_selected
            .and_then(|idx| teams.get(idx))
            .map(String::as_str)
    }

    pub fn select_sport_next(&mut self) {
        self.sport_selected = step_selection(self.sport_selected, self.sport_names.len(), true);
        self.refresh_bracket_view();
    }

    pub fn select_sport_prev(&mut self) {
        self.sport_selected = step_selection(self.sport_selected, self.sport_names.len(), false);
        self.refresh_bracket_view();
    }

    pub fn refresh_bracket_view(&mut self) {
        let sport = self.selected_sport().unwrap_or_default().to_string();
        self.bracket_view = match self.bracket_data.ready() {
            Some(data) => data.view_for(&sport),
            None => BracketView::Prompt,
        };
    }

    /// Moves the team picker; returns the newly picked team so the caller can
    /// request its roster.
    pub fn select_team_next(&mut self) -> Option<String> {
        let len = self.teams.ready().map_or(0, Vec::len);
        self.team_selected = step_selection(self.team_selected, len, true);
        self.begin_roster_for_selection()
    }

    pub fn select_team_prev(&mut self) -> Option<String> {
        let len = self.teams.ready().map_or(0, Vec::len);
        self.team_selected = step_selection(self.team_selected, len, false);
        self.begin_roster_for_selection()
    }

    fn begin_roster_for_selection(&mut self) -> Option<String> {
        let team = self.selected_team()?.to_string();
        self.roster = Some(RosterPanel {
            team: team.clone(),
            players: SectionState::Loading,
        });
        Some(team)
    }

    pub fn tick_countdown(&mut self, now: NaiveDateTime) {
        if let SectionState::Ready(board) = &mut self.countdown {
            board.tick(now);
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

/// Cycles through `0..len`, starting from nothing selected.
fn step_selection(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(idx), true) => (idx + 1) % len,
        (Some(idx), false) => (idx + len - 1) % len,
    })
}

#[derive(Debug)]
pub enum Delta {
    SetLeaderboard(SectionState<Vec<Standing>>),
    SetBracketData(SectionState<BracketData>),
    SetSchedule(SectionState<ScheduleView>),
    SetCountdown(SectionState<Vec<CountdownEvent>>),
    SetTeams(SectionState<Vec<String>>),
    SetRoster {
        team: String,
        players: SectionState<Vec<Player>>,
    },
    SetSportsInfo(SectionState<Vec<SportCard>>),
    SetGallery(SectionState<Vec<GalleryItem>>),
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    /// Re-render every section. Tables come from the session cache.
    Reload,
    FetchRoster { team: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetLeaderboard(next) => state.leaderboard = next,
        Delta::SetBracketData(next) => {
            let previous = state.selected_sport().map(str::to_string);
            state.sport_names = next.ready().map(BracketData::sport_names).unwrap_or_default();
            state.sport_selected = previous
                .and_then(|name| state.sport_names.iter().position(|s| *s == name));
            state.bracket_data = next;
            state.refresh_bracket_view();
        }
        Delta::SetSchedule(next) => state.schedule = next,
        Delta::SetCountdown(next) => {
            // Dropping the previous board drops its timers with it.
            state.countdown_generation += 1;
            let generation = state.countdown_generation;
            state.countdown = next.map(|events| CountdownBoard::new(events, generation));
        }
        Delta::SetTeams(next) => {
            let previous = state.selected_team().map(str::to_string);
            state.team_selected = match (&next, previous) {
                (SectionState::Ready(teams), Some(name)) => {
                    teams.iter().position(|t| *t == name)
                }
                _ => None,
            };
            state.teams = next;
            if state.team_selected.is_none() {
                state.roster = None;
            }
        }
        Delta::SetRoster { team, players } => {
            // Only show it if this is still the team the user picked.
            if state.selected_team() != Some(team.as_str()) {
                return;
            }
            state.roster = Some(RosterPanel { team, players });
        }
        Delta::SetSportsInfo(next) => state.sports = next,
        Delta::SetGallery(next) => state.gallery = next,
        Delta::Log(msg) => state.push_log(msg),
    }
}
