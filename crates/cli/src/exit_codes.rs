//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; QC gates in CI and line
//! scripts branch on them.
//!
//! # Exit Code Ranges
//!
//! | Range | Domain    | Description                              |
//! |-------|-----------|------------------------------------------|
//! | 0     | Universal | Success (QC verdict: pass)               |
//! | 2     | Universal | CLI usage error (bad args, missing file) |
//! | 3-9   | qc        | Verdict and run codes                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use qccheck_recon::{ReconError, Verdict};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed, QC verdict (if any) is pass.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unparseable values.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// QC (3-9)
// =============================================================================

/// Verdict is warning: nothing contradicts, but something could not be
/// confirmed (missing document, unreadable marking, format difference).
pub const EXIT_QC_WARNING: u8 = 3;

/// Verdict is fail: at least one check found a contradiction.
pub const EXIT_QC_FAIL: u8 = 4;

/// Config could not be parsed or failed validation.
pub const EXIT_QC_INVALID_CONFIG: u8 = 5;

/// Runtime error: document unreadable, malformed field bag, write failure.
pub const EXIT_QC_RUNTIME: u8 = 6;

/// Map a verdict to its exit code.
pub fn verdict_exit_code(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Pass => EXIT_SUCCESS,
        Verdict::Warning => EXIT_QC_WARNING,
        Verdict::Fail => EXIT_QC_FAIL,
    }
}

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::InvalidThreshold(_)
        | ReconError::DuplicateRole { .. }
        | ReconError::DuplicateDocument(_) => EXIT_QC_INVALID_CONFIG,
        ReconError::DocumentParse { .. } | ReconError::Io(_) => EXIT_QC_RUNTIME,
    }
}
