use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, anyhow};
use chrono::Local;
use rayon::prelude::*;

use classmeet_board::config::SiteConfig;
use classmeet_board::section::{ALL_SECTIONS, SectionKind};
use classmeet_board::sheet_client::SheetClient;
use classmeet_board::text_dump::dump_section;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = SiteConfig::from_env();
    let sections = parse_sections_arg()?;
    let client = Arc::new(SheetClient::new(config.build_source()?));
    let now = Local::now().naive_local();

    eprintln!("[INFO] Loading from {}", config.source_label());
    let started = Instant::now();
    let dumps = sections
        .par_iter()
        .map(|section| dump_section(*section, &client, now))
        .collect::<Vec<_>>();

    for dump in &dumps {
        for line in &dump.logs {
            eprintln!("{line}");
        }
        println!("{}", dump.text);
    }
    eprintln!(
        "[INFO] {} sections in {} ms (tables fetched: {})",
        dumps.len(),
        started.elapsed().as_millis(),
        client.cached_tables().join(", ")
    );
    Ok(())
}

/// `--section <name>` may repeat; with none given every section is dumped.
fn parse_sections_arg() -> Result<Vec<SectionKind>> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut sections = Vec::new();
    let mut idx = 0;
    while idx < args.len() {
        if args[idx] == "--section" {
            let name = args
                .get(idx + 1)
                .ok_or_else(|| anyhow!("--section needs a value"))?;
            let section = ALL_SECTIONS
                .iter()
                .copied()
                .find(|s| s.label().eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("unknown section: {name}"))?;
            sections.push(section);
            idx += 2;
        } else {
            return Err(anyhow!("unexpected argument: {}", args[idx]));
        }
    }
    if sections.is_empty() {
        sections = ALL_SECTIONS.to_vec();
    }
    Ok(sections)
}
