//! Field utilities: run extraction, normalization and list comparison on
//! ad-hoc input, without a run config.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

use qccheck_recon::extract::extract_fields;
use qccheck_recon::matcher::{best_matches, compare, FuzzyMatch, ListComparison};
use qccheck_recon::normalize::{describe_normalization, FieldKind, NormalizationNote};
use qccheck_recon::{DocumentRole, MatchSettings};

use crate::CliError;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Traveler,
    Image,
    #[value(alias = "bill-of-materials")]
    Bom,
}

impl From<RoleArg> for DocumentRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Traveler => DocumentRole::Traveler,
            RoleArg::Image => DocumentRole::Image,
            RoleArg::Bom => DocumentRole::BillOfMaterials,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}

pub fn cmd_extract(file: PathBuf, role: RoleArg) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&file)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", file.display())))?;
    let fields = extract_fields(role.into(), &text);
    print_json(&fields)
}

#[derive(Serialize)]
struct NormalizeOutput<'a> {
    field: String,
    original: &'a str,
    normalized: String,
    note: NormalizationNote,
}

pub fn cmd_normalize(field: FieldKind, value: &str) -> Result<(), CliError> {
    let normalized = field.normalize(value);
    let note = describe_normalization(value, &normalized);
    print_json(&NormalizeOutput {
        field: field.to_string(),
        original: value,
        normalized,
        note,
    })
}

#[derive(Serialize)]
struct CompareOutput {
    field: String,
    left: Vec<String>,
    right: Vec<String>,
    comparison: ListComparison,
    closest: Vec<FuzzyMatch>,
}

pub fn cmd_compare(
    field: FieldKind,
    left: &[String],
    right: &[String],
    threshold: f64,
    json: bool,
) -> Result<(), CliError> {
    let settings = MatchSettings::with_threshold(threshold)
        .map_err(|e| CliError::args(e.to_string()))?;

    let left = field.normalize_all(left);
    let right = field.normalize_all(right);
    let comparison = compare(&left, &right);

    let unmatched_left: Vec<&String> = comparison.missing_in_second.iter().collect();
    let unmatched_right: Vec<&String> = comparison.missing_in_first.iter().collect();
    let closest = best_matches(&unmatched_left, &unmatched_right, settings.fuzzy_threshold);

    let output = CompareOutput { field: field.to_string(), left, right, comparison, closest };
    if json {
        return print_json(&output);
    }

    let join = |values: &std::collections::BTreeSet<String>| {
        values.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    let c = &output.comparison;
    println!(
        "{}: {:.1}% match ({} of {} / {})",
        output.field, c.match_percentage, c.match_count, c.total_unique_first, c.total_unique_second
    );
    println!("  matched:     {}", join(&c.matches));
    println!("  left only:   {}", join(&c.missing_in_second));
    println!("  right only:  {}", join(&c.missing_in_first));
    for m in &output.closest {
        println!("  closest:     {} ~ {} ({:.2})", m.item, m.candidate, m.score);
    }
    Ok(())
}
