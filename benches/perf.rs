use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

use classmeet_board::bracket::{DEFAULT_GRADES, RaceEntry, build_race, rank_group};
use classmeet_board::demo_source::{demo_response, gviz_payload, wrap};
use classmeet_board::gviz::parse_response;
use classmeet_board::leaderboard::build_leaderboard;
use classmeet_board::schedule::build_schedule;
use classmeet_board::table::{self, Row};

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 17)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

/// A Teams sheet with `n` classes, big enough to make sorting show up.
fn large_teams_response(n: usize) -> String {
    let rows = (0..n)
        .map(|i| {
            vec![
                json!(format!("Kelas {}-{}", ["X", "XI", "XII"][i % 3], i)),
                json!((i * 7) % 5),
                json!((i * 3) % 4),
                json!(i % 3),
                json!(i % 2),
            ]
        })
        .collect();
    let payload = gviz_payload(
        &["Team Name", "1st Place", "2nd Place", "3rd Place", "4th Place"],
        rows,
    );
    wrap(&payload)
}

fn race_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let mut row = Row::from_pairs([
                ("Sport", "Estafet".to_string()),
                ("Team", format!("Kelas {}-{}", ["X", "XI", "XII"][i % 3], i)),
            ]);
            row.insert("Round", if i % 10 == 0 { 2i64 } else { 1i64 });
            row.insert("Time (ms)", (40_000 + (i * 7919) % 20_000) as i64);
            row
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let teams = large_teams_response(500);
    c.bench_function("gviz_parse_teams_500", |b| {
        b.iter(|| {
            let rows = parse_response(table::TEAMS, black_box(&teams)).unwrap();
            black_box(rows.len());
        })
    });

    let schedule = demo_response(table::SCHEDULE, fixed_now());
    c.bench_function("gviz_parse_demo_schedule", |b| {
        b.iter(|| {
            let rows = parse_response(table::SCHEDULE, black_box(&schedule)).unwrap();
            let view = build_schedule(&rows, fixed_now());
            black_box(view.today.len() + view.upcoming.len());
        })
    });
}

fn bench_sections(c: &mut Criterion) {
    let teams = parse_response(table::TEAMS, &large_teams_response(500)).unwrap();
    c.bench_function("leaderboard_500", |b| {
        b.iter(|| {
            let standings = build_leaderboard(black_box(&teams));
            black_box(standings.len());
        })
    });

    let entries = (0..300)
        .map(|i| {
            let time = if i % 17 == 0 { None } else { Some(30_000 + (i * 104_729) % 30_000) };
            RaceEntry::new(format!("Kelas X-{i}"), time)
        })
        .collect::<Vec<_>>();
    c.bench_function("race_rank_group_300", |b| {
        b.iter(|| {
            let ranked = rank_group(black_box(entries.clone()));
            black_box(ranked.len());
        })
    });

    let results = race_rows(300);
    c.bench_function("race_build_300", |b| {
        b.iter(|| {
            let race = build_race(black_box(&results), "Estafet", &DEFAULT_GRADES);
            black_box(race.map(|r| r.finals.len()));
        })
    });
}

criterion_group!(benches, bench_parse, bench_sections);
criterion_main!(benches);
