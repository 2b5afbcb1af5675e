//! `qccheck run` / `qccheck validate`: config-driven QC reconciliation.

use std::path::{Path, PathBuf};

use qccheck_recon::engine::load_document;
use qccheck_recon::model::{CheckStatus, ReconReport};
use qccheck_recon::{ReconConfig, ReconciliationRun};

use crate::exit_codes::{verdict_exit_code, EXIT_QC_RUNTIME, EXIT_SUCCESS};
use crate::export::write_findings_csv;
use crate::CliError;

fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::io(format!("cannot read config {}: {e}", config_path.display()))
    })?;
    ReconConfig::from_toml(&config_str).map_err(|e| {
        CliError::from(e).with_hint(format!("check {}", config_path.display()))
    })
}

/// Read and parse every document, resolving paths against the config's
/// directory.
fn load_run(config: &ReconConfig, base_dir: &Path) -> Result<ReconciliationRun, CliError> {
    let mut documents = Vec::with_capacity(config.documents.len());
    for doc in &config.documents {
        let path = base_dir.join(&doc.file);
        let data = std::fs::read_to_string(&path)
            .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
        log::debug!("loaded '{}' ({}) from {}", doc.id, doc.role, path.display());
        documents.push(load_document(doc, &data)?);
    }
    Ok(ReconciliationRun::new(documents))
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    csv_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let run = load_run(&config, base_dir)?;

    let report = qccheck_recon::run(&config, &run)?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::new(EXIT_QC_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = csv_file {
        write_findings_csv(path, &report.results)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    print_summary(&report);

    match verdict_exit_code(report.verdict) {
        EXIT_SUCCESS => Ok(()),
        code => Err(CliError::silent(code)),
    }
}

/// Human summary to stderr.
fn print_summary(report: &ReconReport) {
    for result in &report.results {
        if result.status == CheckStatus::Pass {
            continue;
        }
        eprintln!(
            "  {:<8} {:<18} {}",
            result.status.to_string(),
            result.category.to_string(),
            result.description
        );
        if let Some(ref details) = result.details {
            eprintln!("  {:<8} {:<18} {}", "", "", details);
        }
    }

    let s = &report.summary;
    eprintln!(
        "{}: verdict {}: {} checks, {} passed, {} warnings, {} failed",
        report.meta.config_name, report.verdict, s.total_checks, s.passed, s.warnings, s.failed,
    );
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    eprintln!(
        "valid: \"{}\" ({} documents, fuzzy_threshold {})",
        config.name,
        config.documents.len(),
        config.matching.fuzzy_threshold,
    );
    for doc in &config.documents {
        eprintln!("  {:<18} {:<18} {}", doc.id, doc.role.to_string(), doc.file);
    }
    Ok(())
}
