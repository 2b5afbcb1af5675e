use std::fmt;

use crate::model::DocumentRole;

/// Caller-contract violations. Data-quality problems never show up here;
/// they are reported as `CheckResult`s instead.
#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty id, bad document entry, etc.).
    ConfigValidation(String),
    /// A run carries more than one bag for a single-document role.
    DuplicateRole { role: DocumentRole, first: String, second: String },
    /// Two bags share the same document id.
    DuplicateDocument(String),
    /// Fuzzy threshold outside `0.0..=1.0`.
    InvalidThreshold(f64),
    /// A field-bag document could not be deserialized.
    DocumentParse { document_id: String, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DuplicateRole { role, first, second } => {
                write!(f, "only one {role} document allowed per run, got '{first}' and '{second}'")
            }
            Self::DuplicateDocument(id) => write!(f, "duplicate document id: '{id}'"),
            Self::InvalidThreshold(value) => {
                write!(f, "fuzzy_threshold must be between 0.0 and 1.0, got {value}")
            }
            Self::DocumentParse { document_id, message } => {
                write!(f, "document '{document_id}': cannot parse fields: {message}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
