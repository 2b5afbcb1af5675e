use crate::model::{CheckResult, CheckStatus, Verdict};

/// Reduce a run's findings to one verdict: Fail beats Warning beats Pass.
/// An empty list passes.
pub fn overall(results: &[CheckResult]) -> Verdict {
    let mut verdict = Verdict::Pass;
    for result in results {
        match result.status {
            CheckStatus::Fail => return Verdict::Fail,
            CheckStatus::Warning => verdict = Verdict::Warning,
            CheckStatus::Pass => {}
        }
    }
    verdict
}
