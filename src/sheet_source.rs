use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::Url;

use crate::error::SheetError;

const GVIZ_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Where raw sheet responses come from.
///
/// Implementations return the body untouched; envelope and payload parsing
/// happen in the client so every source is held to the same format.
pub trait TableSource: Send + Sync {
    fn fetch_raw(&self, table: &str) -> Result<String, SheetError>;
}

/// Reads tables from a published spreadsheet through the gviz query endpoint.
pub struct GvizSource {
    client: Client,
    sheet_id: String,
}

impl GvizSource {
    pub fn new(client: Client, sheet_id: impl Into<String>) -> Self {
        Self {
            client,
            sheet_id: sheet_id.into(),
        }
    }

    pub fn table_url(&self, table: &str) -> Result<Url> {
        table_url(&self.sheet_id, table)
    }

    fn request(&self, table: &str) -> Result<String> {
        let url = self.table_url(table)?;
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, "Mozilla/5.0")
            .send()
            .context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {}", status));
        }
        Ok(body)
    }
}

impl TableSource for GvizSource {
    fn fetch_raw(&self, table: &str) -> Result<String, SheetError> {
        self.request(table).map_err(|err| SheetError::Transport {
            table: table.to_string(),
            message: format!("{err:#}"),
        })
    }
}

pub fn table_url(sheet_id: &str, table: &str) -> Result<Url> {
    let base = format!("{GVIZ_BASE_URL}/{sheet_id}/gviz/tq");
    Url::parse_with_params(&base, &[("tqx", "out:json"), ("sheet", table)])
        .context("invalid sheet url")
}
