//! Check executors: one per check category.
//!
//! Each executor reads only the aggregated view and returns its own result
//! list, so they can run in any order (or in parallel) with identical
//! output. Missing documents become Warning/Fail findings, never errors.

use crate::aggregate::AggregatedView;
use crate::config::MatchSettings;
use crate::matcher::{best_matches, compare, ListComparison};
use crate::model::{CheckCategory, CheckResult, CheckStatus, DocumentRole, FieldBag, SerialSource};
use crate::normalize::{
    describe_normalization, normalize_board_serial, normalize_flight_status, normalize_job_number,
    normalize_part_number, normalize_revision, normalize_unit_serial,
};

pub type CheckFn = fn(&AggregatedView<'_>, &MatchSettings) -> Vec<CheckResult>;

/// Every executor in report order.
pub const ALL_CHECKS: [(CheckCategory, CheckFn); 7] = [
    (CheckCategory::JobNumber, check_job_numbers),
    (CheckCategory::PartNumber, check_part_numbers),
    (CheckCategory::Revision, check_revisions),
    (CheckCategory::BoardSerial, check_board_serials),
    (CheckCategory::UnitSerial, check_unit_serials),
    (CheckCategory::FlightStatus, check_flight_status),
    (CheckCategory::FileCompleteness, check_file_completeness),
];

/// Run every executor and concatenate the findings.
pub fn run_all_checks(view: &AggregatedView<'_>, settings: &MatchSettings) -> Vec<CheckResult> {
    let mut results = Vec::new();
    for (category, check) in ALL_CHECKS {
        let found = check(view, settings);
        log::debug!("{category}: {} finding(s)", found.len());
        results.extend(found);
    }
    results
}

fn join(values: &[String]) -> String {
    values.join(", ")
}

fn join_set<'a, I: IntoIterator<Item = &'a String>>(values: I) -> String {
    values.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

/// "Closest candidates" hint for values present on one side only.
fn fuzzy_hint(comparison: &ListComparison, side: &str, settings: &MatchSettings) -> Option<String> {
    let missing: Vec<&String> = comparison.missing_in_second.iter().collect();
    let candidates: Vec<&String> = comparison.missing_in_first.iter().collect();
    let matches = best_matches(&missing, &candidates, settings.fuzzy_threshold);
    if matches.is_empty() {
        return None;
    }
    let pairs: Vec<String> = matches
        .iter()
        .map(|m| format!("{} ~ {} ({:.2})", m.item, m.candidate, m.score))
        .collect();
    Some(format!("Closest {side} candidates: {}", pairs.join(", ")))
}

fn missing_requirements(
    view: &AggregatedView<'_>,
    category: CheckCategory,
    subject: &str,
) -> Option<CheckResult> {
    if view.traveler.is_some() && !view.boms.is_empty() {
        return None;
    }
    log::warn!("{category}: traveler or BOM missing");
    Some(
        CheckResult::new(
            category,
            CheckStatus::Fail,
            format!("Missing required files for {subject} validation"),
        )
        .details("Need both Traveler PDF and BOM Excel files"),
    )
}

// ---------------------------------------------------------------------------
// Traveler ↔ BOM
// ---------------------------------------------------------------------------

/// Job numbers must agree between the traveler and every BOM.
pub fn check_job_numbers(view: &AggregatedView<'_>, _settings: &MatchSettings) -> Vec<CheckResult> {
    if let Some(missing) = missing_requirements(view, CheckCategory::JobNumber, "job number") {
        return vec![missing];
    }
    let (Some(traveler), boms) = (view.traveler, &view.boms) else {
        return Vec::new();
    };

    let traveler_raw = &traveler.fields.job_numbers;
    let traveler_jobs: Vec<String> = traveler_raw.iter().map(|j| normalize_job_number(j)).collect();

    boms.iter()
        .map(|bom| {
            let bom_raw = &bom.fields.job_numbers;
            let bom_jobs: Vec<String> = bom_raw.iter().map(|j| normalize_job_number(j)).collect();
            let cmp = compare(&traveler_jobs, &bom_jobs);
            let sources = [traveler.document_id.as_str(), bom.document_id.as_str()];

            let result = if cmp.has_matches() {
                CheckResult::new(
                    CheckCategory::JobNumber,
                    CheckStatus::Pass,
                    format!("Job numbers match: {}", join_set(&cmp.matches)),
                )
            } else {
                CheckResult::new(
                    CheckCategory::JobNumber,
                    CheckStatus::Fail,
                    "Job number mismatch between Traveler and BOM",
                )
                .details(format!(
                    "Traveler missing: [{}], BOM missing: [{}]",
                    join_set(&cmp.missing_in_first),
                    join_set(&cmp.missing_in_second),
                ))
            };

            result
                .expected(join(traveler_raw))
                .actual(join(bom_raw))
                .sources(sources)
        })
        .collect()
}

/// Every traveler part (and work instruction) must be on each BOM; extra
/// BOM parts only warn.
pub fn check_part_numbers(view: &AggregatedView<'_>, settings: &MatchSettings) -> Vec<CheckResult> {
    let Some(traveler) = view.traveler else {
        return Vec::new();
    };

    let traveler_parts: Vec<String> = traveler
        .part_numbers_with_instructions()
        .iter()
        .map(|p| normalize_part_number(p))
        .collect();

    view.boms
        .iter()
        .map(|bom| {
            let bom_parts: Vec<String> =
                bom.fields.part_numbers.iter().map(|p| normalize_part_number(p)).collect();
            let cmp = compare(&traveler_parts, &bom_parts);

            let result = if !cmp.missing_in_second.is_empty() {
                let result = CheckResult::new(
                    CheckCategory::PartNumber,
                    CheckStatus::Fail,
                    format!(
                        "Part numbers found in Traveler but missing in BOM: {}",
                        join_set(&cmp.missing_in_second)
                    ),
                );
                match fuzzy_hint(&cmp, "BOM", settings) {
                    Some(hint) => result.details(hint),
                    None => result,
                }
            } else if !cmp.missing_in_first.is_empty() {
                CheckResult::new(
                    CheckCategory::PartNumber,
                    CheckStatus::Warning,
                    format!(
                        "Part numbers in BOM but not in Traveler: {}",
                        join_set(&cmp.missing_in_first)
                    ),
                )
            } else {
                CheckResult::new(
                    CheckCategory::PartNumber,
                    CheckStatus::Pass,
                    format!("Part numbers match: {}", join_set(&cmp.matches)),
                )
            };

            result
                .expected(join(&traveler_parts))
                .actual(join(&bom_parts))
                .sources([traveler.document_id.as_str(), bom.document_id.as_str()])
        })
        .collect()
}

/// Traveler revisions against each BOM.
///
/// BOM revisions are bucketed by first character: `F` on the traveler and
/// `F2` on the BOM is a format difference (Warning), not a mismatch. Note
/// this also buckets `F` with `F9`.
pub fn check_revisions(view: &AggregatedView<'_>, _settings: &MatchSettings) -> Vec<CheckResult> {
    let Some(traveler) = view.traveler else {
        return Vec::new();
    };

    let traveler_revs = dedup(traveler.fields.revisions.iter().map(|r| normalize_revision(r)).collect());
    let mut results = Vec::new();

    for bom in &view.boms {
        let bom_revs: Vec<String> = bom.fields.revisions.iter().map(|r| normalize_revision(r)).collect();
        let sources = [traveler.document_id.as_str(), bom.document_id.as_str()];

        for t_rev in &traveler_revs {
            let family: Vec<&String> = match t_rev.chars().next() {
                Some(first) => bom_revs.iter().filter(|b| b.starts_with(first)).collect(),
                None => Vec::new(),
            };

            let result = if family.is_empty() {
                CheckResult::new(
                    CheckCategory::Revision,
                    CheckStatus::Fail,
                    format!("Revision {t_rev} from Traveler not found in BOM"),
                )
                .expected(t_rev.as_str())
                .actual(join(&bom_revs))
            } else if !family.contains(&t_rev) {
                CheckResult::new(
                    CheckCategory::Revision,
                    CheckStatus::Warning,
                    format!(
                        "Revision format difference: Traveler has {t_rev}, BOM has {}",
                        family[0]
                    ),
                )
                .expected(t_rev.as_str())
                .actual(family[0].as_str())
            } else {
                CheckResult::new(
                    CheckCategory::Revision,
                    CheckStatus::Pass,
                    format!("Revision {t_rev} matches across sources"),
                )
                .expected(t_rev.as_str())
                .actual(t_rev.as_str())
            };

            results.push(result.sources(sources));
        }
    }

    results
}

// ---------------------------------------------------------------------------
// Traveler ↔ Image
// ---------------------------------------------------------------------------

struct SerialCheck {
    category: CheckCategory,
    noun: &'static str,
    prefix: &'static str,
    traveler_serials: fn(&FieldBag) -> (&[String], SerialSource),
    image_serials: fn(&FieldBag) -> &[String],
    normalize: fn(&str) -> String,
}

fn image_board_serials(bag: &FieldBag) -> &[String] {
    &bag.fields.board_serials
}

fn image_unit_serials(bag: &FieldBag) -> &[String] {
    &bag.fields.unit_serials
}

const BOARD_SERIALS: SerialCheck = SerialCheck {
    category: CheckCategory::BoardSerial,
    noun: "Board serial",
    prefix: "VGN-",
    traveler_serials: FieldBag::preferred_board_serials,
    image_serials: image_board_serials,
    normalize: normalize_board_serial,
};

const UNIT_SERIALS: SerialCheck = SerialCheck {
    category: CheckCategory::UnitSerial,
    noun: "Unit serial",
    prefix: "INF-",
    traveler_serials: FieldBag::preferred_unit_serials,
    image_serials: image_unit_serials,
    normalize: normalize_unit_serial,
};

fn check_serials(serial: &SerialCheck, view: &AggregatedView<'_>, settings: &MatchSettings) -> Vec<CheckResult> {
    let (Some(traveler), Some(image)) = (view.traveler, view.image) else {
        log::warn!("{}: traveler or image missing", serial.category);
        return vec![CheckResult::new(
            serial.category,
            CheckStatus::Warning,
            format!(
                "Cannot validate {}s - missing Traveler or Image data",
                serial.noun.to_lowercase()
            ),
        )];
    };

    let (traveler_raw, source) = (serial.traveler_serials)(traveler);
    let image_raw = (serial.image_serials)(image);
    let norm_traveler: Vec<String> = traveler_raw.iter().map(|s| (serial.normalize)(s)).collect();
    let norm_image: Vec<String> = image_raw.iter().map(|s| (serial.normalize)(s)).collect();

    let cmp = compare(&norm_traveler, &norm_image);
    let sources = [traveler.document_id.as_str(), image.document_id.as_str()];

    let result = if cmp.has_matches() {
        let notes: Vec<String> = traveler_raw
            .iter()
            .chain(image_raw.iter())
            .zip(norm_traveler.iter().chain(norm_image.iter()))
            .filter_map(|(raw, norm)| {
                let note = describe_normalization(raw, norm);
                note.changed.then(|| format!("{raw} -> {norm} ({})", note.changes.join(", ")))
            })
            .collect();
        let mut details = format!("Normalized {} prefix handling applied", serial.prefix);
        if !notes.is_empty() {
            details.push_str(": ");
            details.push_str(&dedup(notes).join("; "));
        }

        CheckResult::new(
            serial.category,
            CheckStatus::Pass,
            format!("{}s match: {}", serial.noun, join_set(&cmp.matches)),
        )
        .details(details)
    } else {
        let result = CheckResult::new(
            serial.category,
            CheckStatus::Fail,
            format!("{} mismatch between {} and Image", serial.noun, source.label()),
        );
        match fuzzy_hint(&cmp, "Image", settings) {
            Some(hint) => result.details(hint),
            None => result,
        }
    };

    vec![result
        .expected(join(&norm_traveler))
        .actual(join(&norm_image))
        .sources(sources)]
}

pub fn check_board_serials(view: &AggregatedView<'_>, settings: &MatchSettings) -> Vec<CheckResult> {
    check_serials(&BOARD_SERIALS, view, settings)
}

pub fn check_unit_serials(view: &AggregatedView<'_>, settings: &MatchSettings) -> Vec<CheckResult> {
    check_serials(&UNIT_SERIALS, view, settings)
}

// ---------------------------------------------------------------------------
// Image only
// ---------------------------------------------------------------------------

pub fn check_flight_status(view: &AggregatedView<'_>, _settings: &MatchSettings) -> Vec<CheckResult> {
    let Some(image) = view.image else {
        log::warn!("flight_status: image missing");
        return vec![CheckResult::new(
            CheckCategory::FlightStatus,
            CheckStatus::Warning,
            "Cannot validate flight status - no image data available",
        )];
    };

    let status = image
        .fields
        .flight_status
        .as_deref()
        .map(normalize_flight_status)
        .filter(|s| !s.is_empty());

    let result = match status {
        Some(status) => CheckResult::new(
            CheckCategory::FlightStatus,
            CheckStatus::Pass,
            format!("Flight status confirmed: {status}"),
        )
        .actual(status),
        None => CheckResult::new(
            CheckCategory::FlightStatus,
            CheckStatus::Warning,
            "Flight status marking not clearly detected on image",
        ),
    };

    vec![result.sources([image.document_id.as_str()])]
}

// ---------------------------------------------------------------------------
// Run level
// ---------------------------------------------------------------------------

pub fn check_file_completeness(view: &AggregatedView<'_>, _settings: &MatchSettings) -> Vec<CheckResult> {
    let (present, missing): (Vec<DocumentRole>, Vec<DocumentRole>) =
        DocumentRole::ALL.into_iter().partition(|role| view.has_role(*role));

    let labels = |roles: &[DocumentRole]| roles.iter().map(|r| r.label()).collect::<Vec<_>>().join(", ");

    let result = if missing.is_empty() {
        CheckResult::new(
            CheckCategory::FileCompleteness,
            CheckStatus::Pass,
            "All required file types present and processed successfully",
        )
    } else {
        CheckResult::new(
            CheckCategory::FileCompleteness,
            CheckStatus::Warning,
            format!("Missing file types: {}", labels(&missing)),
        )
        .details(format!("Present: {}", labels(&present)))
    };

    vec![result.sources(view.by_document_id.keys().copied())]
}
