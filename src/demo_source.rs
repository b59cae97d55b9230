use std::thread;
use std::time::Duration;

use chrono::{Datelike, Duration as ChronoDuration, Local, NaiveDateTime, Timelike};
use rand::Rng;
use serde_json::{Value, json};

use crate::error::SheetError;
use crate::sheet_source::TableSource;
use crate::table;

/// Offline stand-in for the spreadsheet. Serves canned tables in the same
/// wrapped gviz format after a random delay of up to `latency`.
pub struct DemoSource {
    latency: Duration,
}

impl DemoSource {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl TableSource for DemoSource {
    fn fetch_raw(&self, table: &str) -> Result<String, SheetError> {
        let max_ms = self.latency.as_millis() as u64;
        if max_ms > 0 {
            let delay = rand::thread_rng().gen_range(0..=max_ms);
            thread::sleep(Duration::from_millis(delay));
        }
        let now = Local::now().naive_local();
        Ok(demo_response(table, now))
    }
}

/// The wrapped response the demo serves for `table` at `now`.
pub fn demo_response(table: &str, now: NaiveDateTime) -> String {
    let payload = match table {
        table::TEAMS => seed_teams(),
        table::SPORTS => seed_sports(),
        table::BRACKETS => seed_brackets(),
        table::RACE_RESULTS => seed_race_results(),
        table::SCHEDULE => seed_schedule(now),
        table::COUNTDOWN => seed_countdown(now),
        table::ROSTERS => seed_rosters(),
        table::GALLERY => seed_gallery(now),
        other => json!({
            "version": "0.6",
            "status": "error",
            "errors": [{
                "reason": "invalid_query",
                "message": "INVALID_QUERY",
                "detailed_message": format!("Invalid sheet name: {other}"),
            }],
        }),
    };
    wrap(&payload)
}

pub fn wrap(payload: &Value) -> String {
    format!("/*O_o*/\ngoogle.visualization.Query.setResponse({payload});")
}

/// Builds a gviz payload; `Value::Null` cells are emitted as null cells.
pub fn gviz_payload(labels: &[&str], rows: Vec<Vec<Value>>) -> Value {
    let cols = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| json!({ "id": column_id(idx), "label": label, "type": "string" }))
        .collect::<Vec<_>>();
    let rows = rows
        .into_iter()
        .map(|cells| {
            let c = cells
                .into_iter()
                .map(|v| if v.is_null() { Value::Null } else { json!({ "v": v }) })
                .collect::<Vec<_>>();
            json!({ "c": c })
        })
        .collect::<Vec<_>>();
    json!({
        "version": "0.6",
        "status": "ok",
        "table": { "cols": cols, "rows": rows },
    })
}

pub fn gviz_date(at: NaiveDateTime) -> String {
    format!(
        "Date({},{},{},{},{},{})",
        at.year(),
        at.month0(),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

fn column_id(idx: usize) -> String {
    let letter = (b'A' + (idx % 26) as u8) as char;
    letter.to_string()
}

fn at_hour(now: NaiveDateTime, days: i64, hour: u32, minute: u32) -> NaiveDateTime {
    let date = (now + ChronoDuration::days(days)).date();
    date.and_hms_opt(hour, minute, 0).unwrap_or(now)
}

fn seed_teams() -> Value {
    gviz_payload(
        &["Team Name", "1st Place", "2nd Place", "3rd Place", "4th Place"],
        vec![
            vec![json!("Kelas X-A"), json!(1), json!(0), json!(2), json!(0)],
            vec![json!("Kelas X-B"), json!(0), json!(1), json!(0), json!(1)],
            vec![json!("Kelas XI-A"), json!(2), json!(1), json!(0), json!(0)],
            vec![json!("Kelas XI-B"), json!(0), json!(0), json!(1), json!(2)],
            vec![json!("Kelas XII-A"), json!(1), json!(2), json!(0), json!(1)],
            vec![json!("Kelas XII-B"), json!(0), json!(0), Value::Null, json!("1")],
        ],
    )
}

fn seed_sports() -> Value {
    gviz_payload(
        &[
            "Sport Name",
            "Description",
            "Rules",
            "Number of Teams",
            "Duration",
            "Winning Conditions",
            "Image URL",
            "Bracket Type",
        ],
        vec![
            vec![
                json!("Futsal"),
                json!("Five-a-side indoor football."),
                json!("Rolling substitutions, no offside."),
                json!(8),
                json!("2 x 10 min"),
                json!("Most goals; penalties on a draw."),
                Value::Null,
                json!("Tree"),
            ],
            vec![
                json!("Basket"),
                json!("Half-court 3x3 basketball."),
                json!("First to 21 or most points at time."),
                json!(8),
                json!("10 min"),
                json!("Most points."),
                Value::Null,
                Value::Null,
            ],
            vec![
                json!("Estafet"),
                json!("4 x 100 m relay."),
                json!("Baton must be passed inside the zone."),
                json!(6),
                json!("-"),
                json!("Fastest time in the final."),
                Value::Null,
                json!("Race"),
            ],
        ],
    )
}

fn seed_brackets() -> Value {
    let labels = ["Sport", "Match Number", "Team 1", "Team 2", "Score 1", "Score 2", "Winner"];
    let m = |sport: &str, n: u32, t1: &str, t2: &str, s1: Value, s2: Value, w: Value| {
        vec![json!(sport), json!(n), json!(t1), json!(t2), s1, s2, w]
    };
    gviz_payload(
        &labels,
        vec![
            m("Futsal", 1, "Kelas X-A", "Kelas XII-B", json!(3), json!(1), json!("Kelas X-A")),
            m("Futsal", 2, "Kelas XI-A", "Kelas X-B", json!(2), json!(2), json!("Kelas XI-A")),
            m("Futsal", 3, "Kelas XII-A", "Kelas XI-B", json!(4), json!(0), json!("Kelas XII-A")),
            m("Futsal", 4, "Kelas X-C", "Kelas XI-C", json!(1), json!(2), json!("Kelas XI-C")),
            m("Futsal", 5, "Kelas X-A", "Kelas XI-A", json!(0), json!(1), json!("Kelas XI-A")),
            m("Futsal", 6, "Kelas XII-A", "Kelas XI-C", Value::Null, Value::Null, Value::Null),
            m("Basket", 1, "Kelas X-B", "Kelas XI-B", json!(21), json!(17), json!("Kelas X-B")),
            m("Basket", 8, "Kelas X-B", "Kelas XII-A", json!(15), json!(21), json!("Kelas XII-A")),
        ],
    )
}

fn seed_race_results() -> Value {
    let r = |round: u32, team: &str, time: Value, rank: Value| {
        vec![json!("Estafet"), json!(round), json!(team), time, rank]
    };
    gviz_payload(
        &["Sport", "Round", "Team", "Time (ms)", "Rank"],
        vec![
            r(1, "Kelas X-A", json!(61230), Value::Null),
            r(1, "Kelas X-B", json!(59870), Value::Null),
            r(1, "Kelas X-C", Value::Null, Value::Null),
            r(1, "Kelas XI-A", json!(58110), Value::Null),
            r(1, "Kelas XI-B", json!(58900), Value::Null),
            r(1, "Kelas XII-A", json!(57450), Value::Null),
            r(1, "Kelas XII-B", json!(0), Value::Null),
            r(2, "Kelas XI-A", json!(57990), json!(2)),
            r(2, "Kelas XII-A", json!(57020), json!(1)),
            r(2, "Kelas X-B", json!(59010), json!(3)),
        ],
    )
}

fn seed_schedule(now: NaiveDateTime) -> Value {
    let s = |at: NaiveDateTime, sport: &str, t1: &str, t2: &str, venue: &str, status: &str| {
        vec![
            json!(gviz_date(at)),
            json!(sport),
            json!(t1),
            json!(t2),
            json!(venue),
            json!(status),
        ]
    };
    gviz_payload(
        &["Date", "Sport", "Team 1", "Team 2", "Venue", "Status"],
        vec![
            s(at_hour(now, -1, 9, 0), "Futsal", "Kelas X-A", "Kelas XII-B", "Lapangan A", "Finished"),
            s(at_hour(now, 0, 8, 0), "Futsal", "Kelas XII-A", "Kelas XI-C", "Lapangan A", "Scheduled"),
            s(at_hour(now, 0, 10, 30), "Basket", "Kelas X-B", "Kelas XII-A", "Lapangan B", "Cancelled"),
            s(at_hour(now, 1, 9, 0), "Estafet", "Final", "-", "Lintasan", "Scheduled"),
            s(at_hour(now, 2, 13, 0), "Futsal", "Final", "-", "Lapangan A", "Scheduled"),
            vec![json!("TBD"), json!("Tarik Tambang"), json!("-"), json!("-"), Value::Null, json!("Scheduled")],
        ],
    )
}

fn seed_countdown(now: NaiveDateTime) -> Value {
    gviz_payload(
        &["Event Name", "Target Date (YYYY-MM-DD HH:mm:ss)"],
        vec![
            vec![json!("Opening Ceremony"), json!(gviz_date(now - ChronoDuration::hours(2)))],
            vec![
                json!("Estafet Final"),
                json!(at_hour(now, 1, 9, 0).format("%Y-%m-%d %H:%M:%S").to_string()),
            ],
            vec![json!("Closing Ceremony"), json!(gviz_date(at_hour(now, 3, 15, 0)))],
            vec![json!("Mystery Event"), Value::Null],
        ],
    )
}

fn seed_rosters() -> Value {
    let p = |team: &str, name: &str, class: &str| vec![json!(team), json!(name), json!(class)];
    gviz_payload(
        &["Team Name", "Player Name", "Class"],
        vec![
            p("Kelas X-A", "Adi Pratama", "X-A"),
            p("Kelas X-A", "Bima Saputra", "X-A"),
            p("Kelas X-B", "Citra Lestari", "X-B"),
            p("Kelas XI-A", "Dewi Anggraini", "XI-A"),
            p("Kelas XI-A", "Eko Wijaya", "XI-A"),
            p("Kelas XII-A", "Fajar Nugroho", "XII-A"),
        ],
    )
}

fn seed_gallery(now: NaiveDateTime) -> Value {
    gviz_payload(
        &["Image URL", "Caption", "Date"],
        vec![
            vec![
                json!("https://picsum.photos/seed/opening/250/200"),
                json!("Opening parade"),
                json!(gviz_date(now - ChronoDuration::days(1))),
            ],
            vec![Value::Null, json!("Futsal quarterfinal"), json!(gviz_date(now))],
            vec![json!("https://picsum.photos/seed/relay/250/200"), Value::Null, json!("soon")],
        ],
    )
}
