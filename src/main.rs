use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use classmeet_board::bracket::{BracketTeam, BracketView, race_unavailable_message, round_label};
use classmeet_board::config::SiteConfig;
use classmeet_board::provider::spawn_provider;
use classmeet_board::roster::no_roster_message;
use classmeet_board::section::{ALL_SECTIONS, SectionKind, SectionState};
use classmeet_board::sheet_client::SheetClient;
use classmeet_board::state::{AppState, Delta, ProviderCommand, apply_delta};

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    source_label: String,
    last_countdown_tick: Instant,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>, source_label: String) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            source_label,
            last_countdown_tick: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='7') => {
                let idx = c as usize - '1' as usize;
                if let Some(section) = SectionKind::from_index(idx) {
                    self.state.set_screen(section);
                }
            }
            KeyCode::Tab => {
                let next = (self.state.screen.index() + 1) % ALL_SECTIONS.len();
                if let Some(section) = SectionKind::from_index(next) {
                    self.state.set_screen(section);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(false),
            KeyCode::PageDown => self.state.scroll_down(),
            KeyCode::PageUp => self.state.scroll_up(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.send(ProviderCommand::Reload, "Reload"),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn move_selection(&mut self, forward: bool) {
        match self.state.screen {
            SectionKind::Bracket => {
                if forward {
                    self.state.select_sport_next();
                } else {
                    self.state.select_sport_prev();
                }
            }
            SectionKind::Roster => {
                let team = if forward {
                    self.state.select_team_next()
                } else {
                    self.state.select_team_prev()
                };
                if let Some(team) = team {
                    self.send(ProviderCommand::FetchRoster { team }, "Roster");
                }
            }
            _ => {
                if forward {
                    self.state.scroll_down();
                } else {
                    self.state.scroll_up();
                }
            }
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {what} unavailable"));
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
        }
    }

    fn maybe_tick_countdown(&mut self) {
        if self.last_countdown_tick.elapsed() >= COUNTDOWN_TICK {
            self.state.tick_countdown(Local::now().naive_local());
            self.last_countdown_tick = Instant::now();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = SiteConfig::from_env();
    let client = Arc::new(SheetClient::new(config.build_source()?));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(client, tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx), config.source_label());
    app.state
        .push_log(format!("[INFO] Loading from {}", config.source_label()));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_tick_countdown();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let state = &app.state;
    match state.screen {
        SectionKind::Leaderboard => render_leaderboard(frame, chunks[1], state),
        SectionKind::Bracket => render_bracket(frame, chunks[1], state),
        SectionKind::Schedule => render_schedule(frame, chunks[1], state),
        SectionKind::Countdown => render_countdown(frame, chunks[1], state),
        SectionKind::Roster => render_roster(frame, chunks[1], state),
        SectionKind::SportsInfo => render_sports(frame, chunks[1], state),
        SectionKind::Gallery => render_gallery(frame, chunks[1], state),
    }

    render_console(frame, chunks[2], state);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> Text<'static> {
    let tabs = ALL_SECTIONS
        .iter()
        .enumerate()
        .map(|(idx, section)| {
            let label = format!(" {} {} ", idx + 1, section.label());
            if *section == app.state.screen {
                Span::styled(label, Style::default().fg(Color::Black).bg(Color::Yellow))
            } else {
                Span::raw(label)
            }
        })
        .collect::<Vec<_>>();
    Text::from(vec![
        Line::from(format!("  CLASS MEET BOARD | {}", app.source_label)),
        Line::from(tabs),
    ])
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        SectionKind::Bracket => "1-7 Section | j/k Sport | r Reload | ? Help | q Quit".to_string(),
        SectionKind::Roster => "1-7 Section | j/k Team | r Reload | ? Help | q Quit".to_string(),
        _ => "1-7 Section | Tab Next | j/k Scroll | r Reload | ? Help | q Quit".to_string(),
    }
}

fn section_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
}

fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, message: String) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(section_block(title));
    frame.render_widget(paragraph, area);
}

fn render_lines(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>, scroll: u16) {
    let paragraph = Paragraph::new(lines)
        .block(section_block(title))
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Shows the placeholder for any non-ready state and returns the view otherwise.
fn ready_or_placeholder<'a, T>(
    frame: &mut Frame,
    area: Rect,
    section: SectionKind,
    state: &'a SectionState<T>,
) -> Option<&'a T> {
    if let Some(msg) = state.placeholder(section.label()) {
        render_placeholder(frame, area, section.label(), msg);
        return None;
    }
    state.ready()
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn render_leaderboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = SectionKind::Leaderboard;
    let Some(rows) = ready_or_placeholder(frame, area, section, &state.leaderboard) else {
        return;
    };
    let mut lines = vec![Line::styled(
        format!("{:<4}{:<22}{:>5}{:>5}{:>5}{:>5}{:>8}", "#", "Team", "1st", "2nd", "3rd", "4th", "Points"),
        bold(),
    )];
    for (idx, s) in rows.iter().enumerate() {
        let [p1, p2, p3, p4] = s.placements;
        let style = if idx == 0 {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!("{:<4}{:<22}{p1:>5}{p2:>5}{p3:>5}{p4:>5}{:>8}", idx + 1, s.team, s.total_points),
            style,
        ));
    }
    render_lines(frame, area, section.label(), lines, state.scroll);
}

fn render_bracket(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = SectionKind::Bracket;
    if ready_or_placeholder(frame, area, section, &state.bracket_data).is_none() {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(30)])
        .split(area);

    let picker = state
        .sport_names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if Some(idx) == state.sport_selected {
                Line::styled(format!("> {name}"), Style::default().fg(Color::Black).bg(Color::Yellow))
            } else {
                Line::from(format!("  {name}"))
            }
        })
        .collect::<Vec<_>>();
    render_lines(frame, columns[0], "Sports", picker, 0);

    let lines = match &state.bracket_view {
        BracketView::Prompt => {
            render_placeholder(frame, columns[1], "Bracket", "Select a sport (j/k) to see its bracket.".to_string());
            return;
        }
        BracketView::NoData { sport } => {
            render_placeholder(frame, columns[1], sport, format!("No bracket data for {sport} yet."));
            return;
        }
        BracketView::Unavailable { sport, error } => {
            let paragraph = Paragraph::new(race_unavailable_message(sport, error))
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true })
                .block(section_block(sport));
            frame.render_widget(paragraph, columns[1]);
            return;
        }
        BracketView::Tree(tree) => {
            let mut lines = Vec::new();
            for slot in &tree.slots {
                lines.push(Line::styled(
                    format!("Match {} - {}", slot.match_number, round_label(slot.round)),
                    bold(),
                ));
                lines.push(team_line(&slot.top));
                lines.push(team_line(&slot.bottom));
            }
            lines.push(Line::from(""));
            lines.push(Line::styled("Champion", bold()));
            lines.push(team_line(&BracketTeam {
                name: tree.champion.clone(),
                score: None,
                is_winner: tree.champion.is_some(),
            }));
            lines
        }
        BracketView::Race(race) => {
            let mut lines = Vec::new();
            for group in &race.groups {
                lines.push(Line::styled(format!("Qualifying - Grade {}", group.grade), bold()));
                if group.entries.is_empty() {
                    lines.push(Line::styled("  no entries", Style::default().fg(Color::DarkGray)));
                }
                for (idx, entry) in group.entries.iter().enumerate() {
                    let style = if entry.is_winner {
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    let mark = if entry.is_winner { "  WINNER" } else { "" };
                    lines.push(Line::styled(
                        format!("  {:>2}. {:<20}{:>10}{mark}", idx + 1, entry.team, entry.time_label()),
                        style,
                    ));
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::styled("Final", bold()));
            for entry in &race.finals {
                let rank = entry.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
                let medal = entry.medal.map(|m| m.label()).unwrap_or("");
                lines.push(Line::from(format!(
                    "  {rank:>2}. {:<20}{:>10}  {medal}",
                    entry.team,
                    entry.time_label()
                )));
            }
            lines
        }
    };
    let title = state.selected_sport().unwrap_or("Bracket").to_string();
    render_lines(frame, columns[1], &title, lines, state.scroll);
}

fn team_line(team: &BracketTeam) -> Line<'static> {
    let name = team.name.clone().unwrap_or_default();
    let score = team.score.clone().unwrap_or_default();
    let style = if team.is_winner {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::styled(format!("  {name:<24}{score:>4}"), style)
}

fn render_schedule(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = SectionKind::Schedule;
    let Some(view) = ready_or_placeholder(frame, area, section, &state.schedule) else {
        return;
    };
    let mut lines = vec![Line::styled("Today", bold())];
    if view.today.is_empty() {
        lines.push(Line::styled("  No matches today.", Style::default().fg(Color::DarkGray)));
    }
    for f in &view.today {
        let style = if f.cancelled {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!("  {}  {:<14}{} vs {}  @ {}  [{}]", f.time_label(), f.sport, f.team_1, f.team_2, f.venue, f.status),
            style,
        ));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled("Upcoming", bold()));
    if view.upcoming.is_empty() {
        lines.push(Line::styled("  No upcoming matches.", Style::default().fg(Color::DarkGray)));
    }
    for f in &view.upcoming {
        lines.push(Line::from(format!(
            "  {} {}  {:<14}{} vs {}  @ {}",
            f.date_label(),
            f.time_label(),
            f.sport,
            f.team_1,
            f.team_2,
            f.venue
        )));
    }
    render_lines(frame, area, section.label(), lines, state.scroll);
}

fn render_countdown(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = SectionKind::Countdown;
    let Some(board) = ready_or_placeholder(frame, area, section, &state.countdown) else {
        return;
    };
    let lines = board
        .timers()
        .iter()
        .map(|timer| {
            let style = if timer.active {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::from(vec![
                Span::styled(format!("{:<28}", timer.event.name), bold()),
                Span::styled(timer.label(), style),
            ])
        })
        .collect::<Vec<_>>();
    render_lines(frame, area, section.label(), lines, state.scroll);
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = SectionKind::Roster;
    let Some(teams) = ready_or_placeholder(frame, area, section, &state.teams) else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(30)])
        .split(area);

    let picker = teams
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if Some(idx) == state.team_selected {
                Line::styled(format!("> {name}"), Style::default().fg(Color::Black).bg(Color::Yellow))
            } else {
                Line::from(format!("  {name}"))
            }
        })
        .collect::<Vec<_>>();
    render_lines(frame, columns[0], "Teams", picker, 0);

    let Some(panel) = &state.roster else {
        render_placeholder(frame, columns[1], "Players", "Select a team (j/k) to see its players.".to_string());
        return;
    };
    let players = match &panel.players {
        SectionState::Ready(players) if !players.is_empty() => players,
        SectionState::Ready(_) | SectionState::Empty { .. } => {
            render_placeholder(frame, columns[1], &panel.team, no_roster_message(&panel.team));
            return;
        }
        other => {
            let msg = other.placeholder("roster").unwrap_or_default();
            render_placeholder(frame, columns[1], &panel.team, msg);
            return;
        }
    };
    let mut lines = vec![Line::styled(format!("{:<28}{}", "Player", "Class"), bold())];
    for p in players {
        lines.push(Line::from(format!("{:<28}{}", p.name, p.class)));
    }
    render_lines(frame, columns[1], &panel.team, lines, state.scroll);
}

fn render_sports(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = SectionKind::SportsInfo;
    let Some(cards) = ready_or_placeholder(frame, area, section, &state.sports) else {
        return;
    };
    let mut lines = Vec::new();
    for c in cards {
        lines.push(Line::styled(format!("{} ({})", c.name, c.bracket_type), bold().fg(Color::Yellow)));
        lines.push(Line::from(format!("  Description: {}", c.description)));
        lines.push(Line::from(format!("  Rules: {}", c.rules)));
        lines.push(Line::from(format!("  Teams: {} | Duration: {}", c.team_count, c.duration)));
        lines.push(Line::from(format!("  Winning conditions: {}", c.winning_conditions)));
        lines.push(Line::styled(format!("  {}", c.image_url), Style::default().fg(Color::DarkGray)));
        lines.push(Line::from(""));
    }
    render_lines(frame, area, section.label(), lines, state.scroll);
}

fn render_gallery(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = SectionKind::Gallery;
    let Some(items) = ready_or_placeholder(frame, area, section, &state.gallery) else {
        return;
    };
    let mut lines = Vec::new();
    for item in items {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", item.date), Style::default().fg(Color::DarkGray)),
            Span::raw(item.caption.clone()),
        ]));
        lines.push(Line::styled(format!("            {}", item.image_url), Style::default().fg(Color::Blue)));
    }
    render_lines(frame, area, section.label(), lines, state.scroll);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.logs.len().saturating_sub(visible);
    let lines = state
        .logs
        .iter()
        .skip(start)
        .map(|line| {
            let style = if line.starts_with("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::styled(line.clone(), style)
        })
        .collect::<Vec<_>>();
    let paragraph = Paragraph::new(lines).block(section_block("Console"));
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = area.width.min(56);
    let height = area.height.min(12);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    let text = vec![
        Line::styled("Keys", bold()),
        Line::from("1-7      switch section"),
        Line::from("Tab      next section"),
        Line::from("j/k      pick sport (Bracket) or team (Roster)"),
        Line::from("PgUp/Dn  scroll"),
        Line::from("r        reload all sections from the session cache"),
        Line::from("?/Esc    close help"),
        Line::from("q        quit"),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(section_block("Help")),
        popup,
    );
}
