use std::collections::BTreeMap;

use crate::model::{CheckResult, CheckStatus, ReconSummary};

/// Compute summary statistics from check results.
pub fn compute_summary(results: &[CheckResult]) -> ReconSummary {
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut passed = 0;
    let mut warnings = 0;
    let mut failed = 0;

    for r in results {
        *by_category.entry(r.category.to_string()).or_insert(0) += 1;

        match r.status {
            CheckStatus::Pass => passed += 1,
            CheckStatus::Warning => warnings += 1,
            CheckStatus::Fail => failed += 1,
        }
    }

    ReconSummary {
        total_checks: results.len(),
        passed,
        warnings,
        failed,
        by_category,
    }
}
