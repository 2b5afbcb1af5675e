use crate::aggregate::aggregate_documents;
use crate::checks::run_all_checks;
use crate::config::{DocumentConfig, DocumentFormat, MatchSettings, ReconConfig};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::extract::extract_fields;
use crate::model::{
    CheckResult, DocumentInfo, ExtractedFields, FieldBag, ReconMeta, ReconReport, ReconciliationRun,
    Verdict,
};
use crate::verdict::overall;

/// Run every check over a run's bags and derive the verdict.
pub fn reconcile(
    run: &ReconciliationRun,
    settings: &MatchSettings,
) -> Result<(Vec<CheckResult>, Verdict), ReconError> {
    settings.validate()?;
    let view = aggregate_documents(run)?;
    let results = run_all_checks(&view, settings);
    let verdict = overall(&results);
    Ok((results, verdict))
}

/// Reconcile a run per config. Returns the findings wrapped in a report.
pub fn run(config: &ReconConfig, run: &ReconciliationRun) -> Result<ReconReport, ReconError> {
    log::info!(
        "reconciling '{}': {} document(s), fuzzy_threshold={}",
        config.name,
        run.documents.len(),
        config.matching.fuzzy_threshold
    );

    let (results, verdict) = reconcile(run, &config.matching)?;
    let summary = compute_summary(&results);

    log::info!(
        "'{}' verdict {verdict}: {} passed, {} warning(s), {} failed",
        config.name,
        summary.passed,
        summary.warnings,
        summary.failed
    );

    let documents = run
        .documents
        .iter()
        .map(|bag| DocumentInfo {
            document_id: bag.document_id.clone(),
            role: bag.role,
            filename: bag.filename.clone(),
        })
        .collect();

    Ok(ReconReport {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            fuzzy_threshold: config.matching.fuzzy_threshold,
        },
        verdict,
        summary,
        documents,
        results,
    })
}

/// Build a field bag from a document's file contents.
///
/// `fields` documents are JSON objects with the extracted lists; `text`
/// documents are recognized text and go through pattern extraction.
pub fn load_document(doc: &DocumentConfig, data: &str) -> Result<FieldBag, ReconError> {
    let fields = match doc.format {
        DocumentFormat::Fields => serde_json::from_str::<ExtractedFields>(data).map_err(|e| {
            ReconError::DocumentParse {
                document_id: doc.id.clone(),
                message: e.to_string(),
            }
        })?,
        DocumentFormat::Text => extract_fields(doc.role, data),
    };

    let mut bag = FieldBag::new(doc.id.clone(), doc.role, fields);
    if let Some(ref filename) = doc.filename {
        bag = bag.with_filename(filename.clone());
    }
    Ok(bag)
}
