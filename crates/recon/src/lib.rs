//! `qccheck-recon`: cross-document reconciliation engine for manufacturing QC.
//!
//! Pure engine crate: receives per-document field bags (or recognized text
//! to extract them from), returns check findings and an overall verdict.
//! No CLI or file IO.

pub mod aggregate;
pub mod checks;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod extract;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod verdict;

pub use config::{MatchSettings, ReconConfig};
pub use engine::{load_document, reconcile, run};
pub use error::ReconError;
pub use model::{
    CheckCategory, CheckResult, CheckStatus, DocumentRole, ExtractedFields, FieldBag, ReconReport,
    ReconciliationRun, Verdict,
};
