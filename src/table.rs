use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

/// Parsed rows of one sheet, shared between every section that asked for it.
pub type Table = Arc<Vec<Row>>;

pub const TEAMS: &str = "Teams";
pub const SPORTS: &str = "Sports";
pub const BRACKETS: &str = "Brackets";
pub const RACE_RESULTS: &str = "RaceResults";
pub const SCHEDULE: &str = "Schedule";
pub const COUNTDOWN: &str = "Countdown";
pub const ROSTERS: &str = "Rosters";
pub const GALLERY: &str = "Gallery";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
}

static NULL_CELL: CellValue = CellValue::Null;

impl CellValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Integer reading of a count cell: numbers truncate, text uses its
    /// leading integer ("3 gold" -> 3), everything else is 0.
    pub fn as_count(&self) -> i64 {
        match self {
            CellValue::Number(n) if n.is_finite() => n.trunc() as i64,
            CellValue::Text(s) => leading_int(s).unwrap_or(0),
            _ => 0,
        }
    }

    /// Human-facing text, `None` for null and empty strings.
    pub fn display(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

/// One sheet record keyed by the column label as written in the sheet.
///
/// Labels are not validated: asking for a column the sheet does not have
/// yields `CellValue::Null`, exactly like an empty cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: HashMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut row = Row::new();
        for (label, value) in pairs {
            row.insert(label, value);
        }
        row
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> &CellValue {
        self.cells.get(label).unwrap_or(&NULL_CELL)
    }

    pub fn text(&self, label: &str) -> Option<String> {
        self.get(label).display()
    }

    pub fn text_or(&self, label: &str, fallback: &str) -> String {
        self.text(label).unwrap_or_else(|| fallback.to_string())
    }

    pub fn number(&self, label: &str) -> Option<f64> {
        self.get(label).as_f64()
    }

    pub fn count(&self, label: &str) -> i64 {
        self.get(label).as_count()
    }

    /// Exact comparison against a text cell, the way the sheet filters by sport or team.
    pub fn text_eq(&self, label: &str, expected: &str) -> bool {
        self.get(label).as_str() == Some(expected)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_reads_as_null() {
        let row = Row::from_pairs([("Team Name", "Kelas X-A")]);
        assert!(row.get("Team").is_null());
        assert_eq!(row.text("Team Name").as_deref(), Some("Kelas X-A"));
        assert_eq!(row.text_or("Venue", "-"), "-");
    }

    #[test]
    fn counts_follow_leading_integer() {
        assert_eq!(CellValue::from("3").as_count(), 3);
        assert_eq!(CellValue::from(" 12 medals").as_count(), 12);
        assert_eq!(CellValue::from("-2").as_count(), -2);
        assert_eq!(CellValue::from("abc").as_count(), 0);
        assert_eq!(CellValue::from(2.9).as_count(), 2);
        assert_eq!(CellValue::Null.as_count(), 0);
    }

    #[test]
    fn display_drops_trailing_zero_fraction() {
        assert_eq!(CellValue::from(4.0).display().as_deref(), Some("4"));
        assert_eq!(CellValue::from(4.5).display().as_deref(), Some("4.5"));
        assert_eq!(CellValue::from("  ").display(), None);
    }
}
