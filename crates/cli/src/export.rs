//! CSV export of check findings, one row per `CheckResult`.

use std::path::Path;

use qccheck_recon::model::CheckResult;

use crate::CliError;

pub const FINDINGS_HEADERS: [&str; 7] = [
    "category",
    "status",
    "description",
    "expected_value",
    "actual_value",
    "details",
    "source_documents",
];

pub fn findings_csv(results: &[CheckResult]) -> Result<Vec<u8>, CliError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(FINDINGS_HEADERS).map_err(|e| CliError::io(e.to_string()))?;

    for r in results {
        let category = r.category.to_string();
        let status = r.status.to_string();
        let sources = r.source_documents.join(";");
        writer
            .write_record([
                category.as_str(),
                status.as_str(),
                r.description.as_str(),
                r.expected_value.as_deref().unwrap_or(""),
                r.actual_value.as_deref().unwrap_or(""),
                r.details.as_deref().unwrap_or(""),
                sources.as_str(),
            ])
            .map_err(|e| CliError::io(e.to_string()))?;
    }

    writer.into_inner().map_err(|e| CliError::io(e.to_string()))
}

pub fn write_findings_csv(path: &Path, results: &[CheckResult]) -> Result<(), CliError> {
    let bytes = findings_csv(results)?;
    std::fs::write(path, bytes)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))
}
