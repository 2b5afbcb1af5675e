//! Field normalizers: one canonicalization per field category.
//!
//! Every function here is total and idempotent: it never fails, returns an
//! empty string for blank input, and `f(f(x)) == f(x)`. Values that do not
//! fit the expected structure are passed through cleaned but unstructured.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const BOARD_SERIAL_PREFIX: &str = "VGN";
pub const UNIT_SERIAL_PREFIX: &str = "INF";
pub const FLIGHT: &str = "FLIGHT";
pub const EDU_NOT_FOR_FLIGHT: &str = "EDU - NOT FOR FLIGHT";

static SERIAL_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+-?\d*").expect("serial regex"));
static PART_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+)-?(\d+)-?([A-Z]\d?)").expect("part number regex"));

/// Field categories that have a normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    JobNumber,
    PartNumber,
    Revision,
    BoardSerial,
    UnitSerial,
    FlightStatus,
}

impl FieldKind {
    pub const ALL: [FieldKind; 6] = [
        Self::JobNumber,
        Self::PartNumber,
        Self::Revision,
        Self::BoardSerial,
        Self::UnitSerial,
        Self::FlightStatus,
    ];

    pub fn normalize(&self, value: &str) -> String {
        match self {
            Self::JobNumber => normalize_job_number(value),
            Self::PartNumber => normalize_part_number(value),
            Self::Revision => normalize_revision(value),
            Self::BoardSerial => normalize_board_serial(value),
            Self::UnitSerial => normalize_unit_serial(value),
            Self::FlightStatus => normalize_flight_status(value),
        }
    }

    pub fn normalize_all<S: AsRef<str>>(&self, values: &[S]) -> Vec<String> {
        values.iter().map(|v| self.normalize(v.as_ref())).collect()
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JobNumber => write!(f, "job_number"),
            Self::PartNumber => write!(f, "part_number"),
            Self::Revision => write!(f, "revision"),
            Self::BoardSerial => write!(f, "board_serial"),
            Self::UnitSerial => write!(f, "unit_serial"),
            Self::FlightStatus => write!(f, "flight_status"),
        }
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "job_number" | "job" => Ok(Self::JobNumber),
            "part_number" | "part" => Ok(Self::PartNumber),
            "revision" | "rev" => Ok(Self::Revision),
            "board_serial" => Ok(Self::BoardSerial),
            "unit_serial" => Ok(Self::UnitSerial),
            "flight_status" | "flight" => Ok(Self::FlightStatus),
            other => Err(format!("unknown field kind: '{other}'")),
        }
    }
}

fn clean(value: &str) -> String {
    value.trim().to_uppercase().replace('_', "-")
}

fn normalize_serial(serial: &str, prefix: &str) -> String {
    let cleaned = clean(serial);
    if cleaned.is_empty() || cleaned.starts_with(&format!("{prefix}-")) {
        return cleaned;
    }

    match SERIAL_NUMBER.find(&cleaned) {
        Some(number) => format!("{prefix}-{}", number.as_str()),
        None => cleaned,
    }
}

/// Board serials: `VGN-<5 digits>-<4 digits>`.
pub fn normalize_board_serial(serial: &str) -> String {
    normalize_serial(serial, BOARD_SERIAL_PREFIX)
}

/// Unit serials: `INF-<digits>`.
pub fn normalize_unit_serial(serial: &str) -> String {
    normalize_serial(serial, UNIT_SERIAL_PREFIX)
}

/// Part numbers: `PREFIX-NUMBER-SUFFIX` (e.g. `PCA-1234-A1`, `DRW-0042-B`).
pub fn normalize_part_number(part_number: &str) -> String {
    let cleaned = clean(part_number);

    match PART_NUMBER.captures(&cleaned) {
        Some(caps) => format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => cleaned,
    }
}

/// Revisions: upper-cased with any leading `REV` token dropped.
pub fn normalize_revision(revision: &str) -> String {
    let mut rev = revision.trim().to_uppercase();
    // Repeated so the result never starts with REV again.
    while let Some(rest) = rev.strip_prefix("REV") {
        rev = rest.trim_start().to_string();
    }
    rev
}

/// Job numbers: the five digits when exactly five are present, otherwise
/// the trimmed original.
pub fn normalize_job_number(job_number: &str) -> String {
    let digits: String = job_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 5 {
        return digits;
    }
    job_number.trim().to_string()
}

/// Flight-status markings collapse to `FLIGHT` or `EDU - NOT FOR FLIGHT`.
pub fn normalize_flight_status(status: &str) -> String {
    let cleaned = status.trim().to_uppercase();

    if cleaned.contains("EDU") || cleaned.contains("NOT FOR FLIGHT") {
        EDU_NOT_FOR_FLIGHT.to_string()
    } else if cleaned.contains(FLIGHT) {
        FLIGHT.to_string()
    } else {
        cleaned
    }
}

// ---------------------------------------------------------------------------
// Normalization notes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationNote {
    pub changed: bool,
    pub changes: Vec<&'static str>,
    pub description: String,
}

/// Describe what a normalizer did to `original` to produce `normalized`.
pub fn describe_normalization(original: &str, normalized: &str) -> NormalizationNote {
    if original == normalized {
        return NormalizationNote {
            changed: false,
            changes: Vec::new(),
            description: "No normalization needed".into(),
        };
    }

    let trimmed = original.trim();
    let mut changes = Vec::new();

    if trimmed != original {
        changes.push("whitespace trimmed");
    }
    if trimmed.to_uppercase() != trimmed {
        changes.push("case conversion");
    }
    if original.contains('_') && normalized.contains('-') {
        changes.push("underscore to hyphen");
    }

    let prefixes = [
        format!("{BOARD_SERIAL_PREFIX}-"),
        format!("{UNIT_SERIAL_PREFIX}-"),
    ];
    let upper = trimmed.to_uppercase().replace('_', "-");
    let had_prefix = prefixes.iter().any(|p| upper.starts_with(p.as_str()));
    let has_prefix = prefixes.iter().any(|p| normalized.starts_with(p.as_str()));
    if !had_prefix && has_prefix {
        changes.push("prefix added");
    }

    let description = if changes.is_empty() {
        "Format standardized".to_string()
    } else {
        format!("Applied: {}", changes.join(", "))
    };

    NormalizationNote {
        changed: true,
        changes,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_serial_gets_prefix() {
        assert_eq!(normalize_board_serial("54321_1234"), "VGN-54321-1234");
        assert_eq!(normalize_board_serial("54321-1234"), "VGN-54321-1234");
        assert_eq!(normalize_board_serial(" vgn_54321_1234 "), "VGN-54321-1234");
    }

    #[test]
    fn board_serial_keeps_existing_prefix() {
        assert_eq!(normalize_board_serial("VGN-54321-1234"), "VGN-54321-1234");
        // Already prefixed values are not restructured.
        assert_eq!(normalize_board_serial("vgn-12"), "VGN-12");
    }

    #[test]
    fn board_serial_replaces_foreign_prefix() {
        assert_eq!(normalize_board_serial("SN 54321-1234"), "VGN-54321-1234");
        assert_eq!(normalize_board_serial("VGN54321-1234"), "VGN-54321-1234");
    }

    #[test]
    fn serial_without_digits_passes_through() {
        assert_eq!(normalize_board_serial("unknown"), "UNKNOWN");
        assert_eq!(normalize_unit_serial(""), "");
        assert_eq!(normalize_unit_serial("   "), "");
    }

    #[test]
    fn unit_serial_gets_prefix() {
        assert_eq!(normalize_unit_serial("4321"), "INF-4321");
        assert_eq!(normalize_unit_serial("inf_4321"), "INF-4321");
        assert_eq!(normalize_unit_serial("INF-4321"), "INF-4321");
    }

    #[test]
    fn part_number_canonical_form() {
        assert_eq!(normalize_part_number("pca_1234_a1"), "PCA-1234-A1");
        assert_eq!(normalize_part_number("PCA1234B"), "PCA-1234-B");
        assert_eq!(normalize_part_number("DRW-0042-C"), "DRW-0042-C");
    }

    #[test]
    fn part_number_without_structure_is_cleaned_only() {
        assert_eq!(normalize_part_number(" widget 7 "), "WIDGET 7");
        assert_eq!(normalize_part_number("12-34"), "12-34");
        assert_eq!(normalize_part_number(""), "");
    }

    #[test]
    fn revision_drops_rev_token() {
        assert_eq!(normalize_revision("Rev F"), "F");
        assert_eq!(normalize_revision("rev f2"), "F2");
        assert_eq!(normalize_revision("REVF"), "F");
        assert_eq!(normalize_revision(" C "), "C");
        assert_eq!(normalize_revision("REV REV B"), "B");
        assert_eq!(normalize_revision("REV"), "");
    }

    #[test]
    fn job_number_five_digits() {
        assert_eq!(normalize_job_number("12345"), "12345");
        assert_eq!(normalize_job_number("Job #12345"), "12345");
        assert_eq!(normalize_job_number(" J-123-45 "), "12345");
    }

    #[test]
    fn job_number_wrong_length_is_not_padded() {
        assert_eq!(normalize_job_number(" 1234 "), "1234");
        assert_eq!(normalize_job_number("123456"), "123456");
        assert_eq!(normalize_job_number("n/a"), "n/a");
    }

    #[test]
    fn flight_status_canonical_values() {
        assert_eq!(normalize_flight_status("edu - not for flight"), EDU_NOT_FOR_FLIGHT);
        assert_eq!(normalize_flight_status("EDU"), EDU_NOT_FOR_FLIGHT);
        assert_eq!(normalize_flight_status("Not for flight"), EDU_NOT_FOR_FLIGHT);
        assert_eq!(normalize_flight_status("flight"), FLIGHT);
        assert_eq!(normalize_flight_status("FLIGHT UNIT"), FLIGHT);
        assert_eq!(normalize_flight_status(" prototype "), "PROTOTYPE");
        assert_eq!(normalize_flight_status(""), "");
    }

    #[test]
    fn field_kind_dispatch_and_parse() {
        assert_eq!("board-serial".parse::<FieldKind>().unwrap(), FieldKind::BoardSerial);
        assert_eq!("rev".parse::<FieldKind>().unwrap(), FieldKind::Revision);
        assert!("colour".parse::<FieldKind>().is_err());
        assert_eq!(FieldKind::UnitSerial.normalize("4321"), "INF-4321");
        assert_eq!(
            FieldKind::JobNumber.normalize_all(&["12345", "abc"]),
            vec!["12345".to_string(), "abc".to_string()]
        );
    }

    #[test]
    fn idempotent_on_samples() {
        let samples = [
            "", " ", "54321_1234", "VGN-1", "rev rev a", "REVISION C", "pca1234a9x",
            "Job 12345", "EDU - NOT FOR FLIGHT", "12-", "abc_def", "ß123",
        ];
        for kind in FieldKind::ALL {
            for s in samples {
                let once = kind.normalize(s);
                assert_eq!(kind.normalize(&once), once, "{kind} not idempotent on {s:?}");
            }
        }
    }

    #[test]
    fn describe_serial_normalization() {
        let note = describe_normalization("54321_1234", "VGN-54321-1234");
        assert!(note.changed);
        assert_eq!(note.changes, vec!["underscore to hyphen", "prefix added"]);
        assert_eq!(note.description, "Applied: underscore to hyphen, prefix added");
    }

    #[test]
    fn describe_unchanged_and_case_only() {
        let note = describe_normalization("PCA-1234-A", "PCA-1234-A");
        assert!(!note.changed);
        assert_eq!(note.description, "No normalization needed");

        let note = describe_normalization("inf-4321", "INF-4321");
        assert_eq!(note.changes, vec!["case conversion"]);

        let note = describe_normalization("Rev F", "F");
        assert_eq!(note.changes, vec!["case conversion"]);

        let note = describe_normalization("REV F", "F");
        assert_eq!(note.description, "Format standardized");
    }
}
