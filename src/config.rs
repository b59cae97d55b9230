use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::demo_source::DemoSource;
use crate::http_client::{DEFAULT_REQUEST_TIMEOUT_SECS, http_client};
use crate::sheet_source::{GvizSource, TableSource};

pub const DEFAULT_SHEET_ID: &str = "1gAjNYTgbsGAMcVvk8-t7cD-ZrY7CFs4bNQowwnGY05Q";
const DEFAULT_DEMO_LATENCY_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Gviz,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub sheet_id: String,
    pub source: SourceKind,
    pub request_timeout: Duration,
    pub demo_latency: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl SiteConfig {
    /// Reads `SHEET_ID`, `SHEET_SOURCE`, `REQUEST_TIMEOUT_SECS` and `DEMO_LATENCY_MS`.
    /// Call after `.env` files are loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let sheet_id = lookup("SHEET_ID")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_SHEET_ID.to_string());
        let source = match lookup("SHEET_SOURCE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "demo" | "fake" => SourceKind::Demo,
            _ => SourceKind::Gviz,
        };
        let timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .clamp(1, 120);
        let demo_latency_ms = lookup("DEMO_LATENCY_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEMO_LATENCY_MS)
            .min(5_000);
        Self {
            sheet_id,
            source,
            request_timeout: Duration::from_secs(timeout_secs),
            demo_latency: Duration::from_millis(demo_latency_ms),
        }
    }

    pub fn source_label(&self) -> String {
        match self.source {
            SourceKind::Gviz => format!("sheet {}", self.sheet_id),
            SourceKind::Demo => "demo data".to_string(),
        }
    }

    pub fn build_source(&self) -> Result<Arc<dyn TableSource>> {
        Ok(match self.source {
            SourceKind::Gviz => Arc::new(GvizSource::new(
                http_client(self.request_timeout)?,
                self.sheet_id.clone(),
            )),
            SourceKind::Demo => Arc::new(DemoSource::new(self.demo_latency)),
        })
    }
}
