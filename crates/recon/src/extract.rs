//! Pattern extraction: turn recognized document text into field lists.
//!
//! The text itself comes from outside the engine (PDF text layer, OCR,
//! vision model). This module only applies the QC patterns to it and maps
//! the hits onto the fields each document role carries.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{DocumentRole, ExtractedFields, Seq20Fields};
use crate::normalize::{normalize_flight_status, BOARD_SERIAL_PREFIX, UNIT_SERIAL_PREFIX};

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("extraction pattern")
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| re(r"\s+"));
static NOISE: Lazy<Regex> = Lazy::new(|| re(r"[^\w\s\-.,:]"));

static BOARD_SERIAL: Lazy<Regex> = Lazy::new(|| re(r"(?i)(?:VGN[-_]?)?(\d{5}[-_]\d{4})"));
static UNIT_SERIAL: Lazy<Regex> = Lazy::new(|| re(r"(?i)\b(?:INF[-_]?)?(\d{4})\b"));
static BOARD_PART: Lazy<Regex> = Lazy::new(|| re(r"(?i)PCA[-_](\d{4})[-_]([A-Z]\d?)"));
static WORK_INSTRUCTION: Lazy<Regex> = Lazy::new(|| re(r"(?i)DRW[-_](\d{4})[-_]([A-Z]\d?)"));
static PART_NUMBER: Lazy<Regex> = Lazy::new(|| re(r"(?i)\b([A-Z]{2,4}[-_]\d{4}[-_][A-Z]\d?)\b"));
static JOB_NUMBER: Lazy<Regex> = Lazy::new(|| re(r"\b(\d{5})\b"));
static FLIGHT_STATUS: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(FLIGHT|EDU\s*[-–]?\s*NOT\s+FOR\s+FLIGHT)\b"));
static REVISION: Lazy<Regex> = Lazy::new(|| re(r"(?i)\bRev\s*([A-Z]\d?)\b"));
static SEQ_20: Lazy<Regex> =
    Lazy::new(|| re(r"(?is)(?:Seq\s*20|Sequence\s*20)(.*?)(?:Seq\s*\d+|$)"));

/// Collapse whitespace, turn underscores into hyphens and drop OCR
/// punctuation noise.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ").replace('_', "-");
    NOISE.replace_all(&collapsed, " ").trim().to_string()
}

fn sorted(values: impl IntoIterator<Item = String>) -> Vec<String> {
    values.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Blank out structured codes so their digit runs are not re-read as unit
/// serials or job numbers.
fn mask_codes(text: &str) -> String {
    let mut masked = text.to_string();
    for pattern in [&*BOARD_SERIAL, &*BOARD_PART, &*WORK_INSTRUCTION, &*PART_NUMBER] {
        masked = pattern.replace_all(&masked, " ").into_owned();
    }
    masked
}

pub fn extract_board_serials(text: &str) -> Vec<String> {
    sorted(
        BOARD_SERIAL
            .captures_iter(text)
            .map(|c| format!("{BOARD_SERIAL_PREFIX}-{}", c[1].replace('_', "-"))),
    )
}

pub fn extract_unit_serials(text: &str) -> Vec<String> {
    let masked = mask_codes(text);
    sorted(
        UNIT_SERIAL
            .captures_iter(&masked)
            .map(|c| format!("{UNIT_SERIAL_PREFIX}-{}", &c[1])),
    )
}

pub fn extract_board_part_numbers(text: &str) -> Vec<String> {
    sorted(
        BOARD_PART
            .captures_iter(text)
            .map(|c| format!("PCA-{}-{}", &c[1], c[2].to_uppercase())),
    )
}

pub fn extract_work_instructions(text: &str) -> Vec<String> {
    sorted(
        WORK_INSTRUCTION
            .captures_iter(text)
            .map(|c| format!("DRW-{}-{}", &c[1], c[2].to_uppercase())),
    )
}

/// Any `XX-dddd-Y` style part number (BOM rows list every kind of part).
pub fn extract_part_numbers(text: &str) -> Vec<String> {
    sorted(
        PART_NUMBER
            .captures_iter(text)
            .map(|c| c[1].to_uppercase().replace('_', "-")),
    )
}

pub fn extract_job_numbers(text: &str) -> Vec<String> {
    let masked = mask_codes(text);
    sorted(JOB_NUMBER.captures_iter(&masked).map(|c| c[1].to_string()))
}

pub fn extract_flight_status(text: &str) -> Option<String> {
    FLIGHT_STATUS
        .captures(text)
        .map(|c| normalize_flight_status(&c[1]))
}

pub fn extract_revisions(text: &str) -> Vec<String> {
    sorted(REVISION.captures_iter(text).map(|c| c[1].to_uppercase()))
}

/// Fields inside the traveler's "Seq 20" section, which runs up to the next
/// `Seq <n>` marker or the end of the text.
pub fn extract_seq_20(text: &str) -> Option<Seq20Fields> {
    let caps = SEQ_20.captures(text)?;
    let section = caps.get(1).map_or("", |m| m.as_str());
    Some(Seq20Fields {
        board_serials: extract_board_serials(section),
        unit_serials: extract_unit_serials(section),
        part_numbers: extract_board_part_numbers(section),
    })
}

/// Extract the fields a document of `role` carries from its recognized text.
pub fn extract_fields(role: DocumentRole, text: &str) -> ExtractedFields {
    let text = clean_text(text);

    let fields = match role {
        DocumentRole::Traveler => ExtractedFields {
            job_numbers: extract_job_numbers(&text),
            part_numbers: extract_board_part_numbers(&text),
            board_serials: extract_board_serials(&text),
            unit_serials: extract_unit_serials(&text),
            revisions: extract_revisions(&text),
            work_instructions: extract_work_instructions(&text),
            flight_status: None,
            seq_20: extract_seq_20(&text),
        },
        DocumentRole::Image => ExtractedFields {
            part_numbers: extract_board_part_numbers(&text),
            board_serials: extract_board_serials(&text),
            unit_serials: extract_unit_serials(&text),
            flight_status: extract_flight_status(&text),
            ..Default::default()
        },
        DocumentRole::BillOfMaterials => ExtractedFields {
            job_numbers: extract_job_numbers(&text),
            part_numbers: extract_part_numbers(&text),
            revisions: extract_revisions(&text),
            ..Default::default()
        },
    };

    log::debug!(
        "extracted {role}: {} job(s), {} part(s), {} board serial(s), {} unit serial(s), {} revision(s)",
        fields.job_numbers.len(),
        fields.part_numbers.len(),
        fields.board_serials.len(),
        fields.unit_serials.len(),
        fields.revisions.len(),
    );

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAVELER: &str = "TRAVELER  Job: 12345\nAssembly PCA-1234-A  Rev F\n\
        Work instruction DRW_0042_B\nSeq 10 kitting\nSeq 20 Install board VGN-54321-1234 \
        into unit INF-4321\nSeq 30 final test";

    #[test]
    fn clean_text_normalizes_separators() {
        assert_eq!(clean_text("  a_b\t\n c!d  "), "a-b c d");
    }

    #[test]
    fn traveler_fields() {
        let fields = extract_fields(DocumentRole::Traveler, TRAVELER);
        assert_eq!(fields.job_numbers, vec!["12345"]);
        assert_eq!(fields.part_numbers, vec!["PCA-1234-A"]);
        assert_eq!(fields.work_instructions, vec!["DRW-0042-B"]);
        assert_eq!(fields.revisions, vec!["F"]);
        assert_eq!(fields.board_serials, vec!["VGN-54321-1234"]);
        assert_eq!(fields.unit_serials, vec!["INF-4321"]);
        assert_eq!(fields.flight_status, None);

        let seq = fields.seq_20.unwrap();
        assert_eq!(seq.board_serials, vec!["VGN-54321-1234"]);
        assert_eq!(seq.unit_serials, vec!["INF-4321"]);
        assert!(seq.part_numbers.is_empty());
    }

    #[test]
    fn seq_20_absent() {
        assert!(extract_seq_20("Seq 10 only").is_none());
    }

    #[test]
    fn seq_20_runs_to_end_of_text() {
        let seq = extract_seq_20("Sequence 20: board 54321_1234").unwrap();
        assert_eq!(seq.board_serials, vec!["VGN-54321-1234"]);
    }

    #[test]
    fn image_fields() {
        let text = "VGN 54321_1234  INF4321  EDU – NOT FOR FLIGHT  pca_1234_a";
        let fields = extract_fields(DocumentRole::Image, text);
        assert_eq!(fields.board_serials, vec!["VGN-54321-1234"]);
        assert_eq!(fields.unit_serials, vec!["INF-4321"]);
        assert_eq!(fields.part_numbers, vec!["PCA-1234-A"]);
        assert_eq!(fields.flight_status.as_deref(), Some("EDU - NOT FOR FLIGHT"));
        assert!(fields.job_numbers.is_empty());
    }

    #[test]
    fn image_without_marking() {
        let fields = extract_fields(DocumentRole::Image, "INF-4321");
        assert_eq!(fields.flight_status, None);
    }

    #[test]
    fn flight_marking() {
        assert_eq!(extract_flight_status("FLIGHT unit").as_deref(), Some("FLIGHT"));
        assert_eq!(extract_flight_status("edu not for flight").as_deref(), Some("EDU - NOT FOR FLIGHT"));
        assert_eq!(extract_flight_status("inflight"), None);
    }

    #[test]
    fn bom_fields() {
        let text = "Job 12345\nPCA-1234-A Rev F\nDRW-0042-B\nRES-0001-A\nRES-0001-A";
        let fields = extract_fields(DocumentRole::BillOfMaterials, text);
        assert_eq!(fields.job_numbers, vec!["12345"]);
        assert_eq!(fields.part_numbers, vec!["DRW-0042-B", "PCA-1234-A", "RES-0001-A"]);
        assert_eq!(fields.revisions, vec!["F"]);
        assert!(fields.board_serials.is_empty());
    }

    #[test]
    fn codes_do_not_leak_into_unit_serials_or_jobs() {
        let text = "VGN-54321-1234 PCA-5678-B";
        assert!(extract_unit_serials(text).is_empty());
        assert!(extract_job_numbers(text).is_empty());
    }

    #[test]
    fn revision_word_is_not_a_revision() {
        assert!(extract_revisions("Revision history").is_empty());
        assert_eq!(extract_revisions("rev c2 and REV D"), vec!["C2", "D"]);
    }
}
