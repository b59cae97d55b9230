use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Instant;

use chrono::Local;

use crate::bracket::load_bracket_data;
use crate::countdown::load_countdown;
use crate::gallery::load_gallery;
use crate::leaderboard::load_leaderboard;
use crate::roster::{load_roster, load_teams};
use crate::schedule::load_schedule;
use crate::section::{ALL_SECTIONS, SectionKind, SectionState};
use crate::sheet_client::SheetClient;
use crate::sports_info::load_sports_info;
use crate::state::{Delta, ProviderCommand};

/// Starts one loader per section, then serves commands until the UI hangs up.
pub fn spawn_provider(
    client: Arc<SheetClient>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        spawn_all_sections(&client, &tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Reload => {
                    let _ = tx.send(Delta::Log(format!(
                        "[INFO] Reloading sections (cached: {})",
                        client.cached_tables().join(", ")
                    )));
                    spawn_all_sections(&client, &tx);
                }
                ProviderCommand::FetchRoster { team } => {
                    let client = Arc::clone(&client);
                    let tx = tx.clone();
                    thread::spawn(move || {
                        let players = load_roster(&client, &team);
                        log_outcome(&tx, "Roster", &players);
                        let _ = tx.send(Delta::SetRoster { team, players });
                    });
                }
            }
        }
    });
}

fn spawn_all_sections(client: &Arc<SheetClient>, tx: &Sender<Delta>) {
    for section in ALL_SECTIONS {
        let client = Arc::clone(client);
        let tx = tx.clone();
        thread::spawn(move || load_section(section, &client, &tx));
    }
}

/// Loads one section and sends its state. Blocks the calling thread on the fetches.
pub fn load_section(section: SectionKind, client: &SheetClient, tx: &Sender<Delta>) {
    let started = Instant::now();
    let label = section.label();
    let delta = match section {
        SectionKind::Leaderboard => {
            let next = load_leaderboard(client);
            log_outcome(tx, label, &next);
            Delta::SetLeaderboard(next)
        }
        SectionKind::Bracket => {
            let mut warnings = Vec::new();
            let next = load_bracket_data(client, &mut warnings);
            for warning in warnings {
                let _ = tx.send(Delta::Log(warning));
            }
            log_outcome(tx, label, &next);
            Delta::SetBracketData(next)
        }
        SectionKind::Schedule => {
            let next = load_schedule(client, Local::now().naive_local());
            log_outcome(tx, label, &next);
            Delta::SetSchedule(next)
        }
        SectionKind::Countdown => {
            let next = load_countdown(client);
            log_outcome(tx, label, &next);
            Delta::SetCountdown(next)
        }
        SectionKind::Roster => {
            let next = load_teams(client);
            log_outcome(tx, label, &next);
            Delta::SetTeams(next)
        }
        SectionKind::SportsInfo => {
            let next = load_sports_info(client);
            log_outcome(tx, label, &next);
            Delta::SetSportsInfo(next)
        }
        SectionKind::Gallery => {
            let next = load_gallery(client);
            log_outcome(tx, label, &next);
            Delta::SetGallery(next)
        }
    };
    let _ = tx.send(delta);
    let _ = tx.send(Delta::Log(format!(
        "[INFO] {label} loaded in {} ms",
        started.elapsed().as_millis()
    )));
}

fn log_outcome<T>(tx: &Sender<Delta>, label: &str, state: &SectionState<T>) {
    let line = match state {
        SectionState::Ready(_) | SectionState::Loading => return,
        SectionState::Empty { .. } => format!("[INFO] {label}: {}", state.summary()),
        SectionState::Unavailable { .. } => format!("[WARN] {label}: {}", state.summary()),
    };
    let _ = tx.send(Delta::Log(line));
}
