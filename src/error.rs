use thiserror::Error;

/// Failure to obtain a table from the sheet source.
///
/// An empty table is not an error; it is reported as `SectionState::Empty`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("sheet {table}: request failed: {message}")]
    Transport { table: String, message: String },
    #[error("sheet {table}: response envelope not found")]
    MalformedEnvelope { table: String },
    #[error("sheet {table}: invalid payload: {message}")]
    MalformedPayload { table: String, message: String },
}

impl SheetError {
    pub fn table(&self) -> &str {
        match self {
            SheetError::Transport { table, .. }
            | SheetError::MalformedEnvelope { table }
            | SheetError::MalformedPayload { table, .. } => table,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            SheetError::Transport { .. } => "unreachable",
            SheetError::MalformedEnvelope { .. } => "bad envelope",
            SheetError::MalformedPayload { .. } => "bad payload",
        }
    }
}
