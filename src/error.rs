//! Error types for the call sheet tool.

use std::fmt;

/// A form field that must be filled before a call sheet can be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Date,
    Guest,
    PatTime,
    ManagerName,
    ManagerPhone,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Date => "date",
            RequiredField::Guest => "invité",
            RequiredField::PatTime => "heure PAT",
            RequiredField::ManagerName => "responsable",
            RequiredField::ManagerPhone => "téléphone du responsable",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields.iter().map(|f| f.label()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, thiserror::Error)]
pub enum CallSheetError {
    /// Print requested with required fields left blank.
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<RequiredField>),

    /// Directory add/edit with an empty name or phone.
    #[error("manager name and phone are both required")]
    MissingManagerFields,

    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("invalid date {0:?}")]
    InvalidDate(String),

    #[error("no directory entry at position {0}")]
    IndexOutOfRange(usize),

    /// The browser refused to open the print window.
    #[error("print window was blocked")]
    PopupBlocked,

    #[error("print surface error: {0}")]
    Surface(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(all(feature = "native-db", not(target_arch = "wasm32")))]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, CallSheetError>;
