use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The role a document plays in a QC run. Closed set: unknown roles are
/// rejected when a bag or config is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    #[serde(alias = "TRAVELER_PDF")]
    Traveler,
    #[serde(alias = "PRODUCT_IMAGE")]
    Image,
    #[serde(alias = "bom", alias = "BOM_EXCEL")]
    BillOfMaterials,
}

impl DocumentRole {
    pub const ALL: [DocumentRole; 3] = [Self::Traveler, Self::Image, Self::BillOfMaterials];

    /// Human label used in completeness findings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Traveler => "Traveler PDF",
            Self::Image => "Product Image",
            Self::BillOfMaterials => "BOM Excel",
        }
    }
}

impl std::fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Traveler => write!(f, "traveler"),
            Self::Image => write!(f, "image"),
            Self::BillOfMaterials => write!(f, "bill_of_materials"),
        }
    }
}

/// Serials (and board part numbers) found inside the traveler's "Seq 20"
/// section. When non-empty they take precedence over the document-level
/// serials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seq20Fields {
    #[serde(default)]
    pub board_serials: Vec<String>,
    #[serde(default)]
    pub unit_serials: Vec<String>,
    #[serde(default)]
    pub part_numbers: Vec<String>,
}

impl Seq20Fields {
    pub fn is_empty(&self) -> bool {
        self.board_serials.is_empty() && self.unit_serials.is_empty() && self.part_numbers.is_empty()
    }
}

/// Raw values produced by the upstream extraction step for one document.
/// Values are kept exactly as extracted; normalization happens inside the
/// check executors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default)]
    pub job_numbers: Vec<String>,
    #[serde(default)]
    pub part_numbers: Vec<String>,
    #[serde(default)]
    pub board_serials: Vec<String>,
    #[serde(default)]
    pub unit_serials: Vec<String>,
    #[serde(default)]
    pub revisions: Vec<String>,
    #[serde(default)]
    pub work_instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_20: Option<Seq20Fields>,
}

/// One document's extraction result, tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBag {
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub role: DocumentRole,
    #[serde(flatten)]
    pub fields: ExtractedFields,
}

impl FieldBag {
    pub fn new(document_id: impl Into<String>, role: DocumentRole, fields: ExtractedFields) -> Self {
        Self {
            document_id: document_id.into(),
            filename: None,
            role,
            fields,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Board serials to reconcile: the Seq 20 section wins when it has any.
    pub fn preferred_board_serials(&self) -> (&[String], SerialSource) {
        match &self.fields.seq_20 {
            Some(seq) if !seq.board_serials.is_empty() => (&seq.board_serials, SerialSource::Seq20),
            _ => (&self.fields.board_serials, SerialSource::Document),
        }
    }

    /// Unit serials to reconcile: the Seq 20 section wins when it has any.
    pub fn preferred_unit_serials(&self) -> (&[String], SerialSource) {
        match &self.fields.seq_20 {
            Some(seq) if !seq.unit_serials.is_empty() => (&seq.unit_serials, SerialSource::Seq20),
            _ => (&self.fields.unit_serials, SerialSource::Document),
        }
    }

    /// Part numbers together with work-instruction drawing numbers.
    /// Travelers list both and both must appear on the BOM.
    pub fn part_numbers_with_instructions(&self) -> Vec<String> {
        self.fields
            .part_numbers
            .iter()
            .chain(self.fields.work_instructions.iter())
            .cloned()
            .collect()
    }
}

/// Where a traveler serial list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialSource {
    Seq20,
    Document,
}

impl SerialSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Seq20 => "Traveler Seq 20",
            Self::Document => "Traveler",
        }
    }
}

/// The unit of work: every field bag taking part in one reconciliation.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationRun {
    pub documents: Vec<FieldBag>,
}

impl ReconciliationRun {
    pub fn new(documents: Vec<FieldBag>) -> Self {
        Self { documents }
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    JobNumber,
    PartNumber,
    Revision,
    BoardSerial,
    UnitSerial,
    FlightStatus,
    FileCompleteness,
}

impl CheckCategory {
    pub const ALL: [CheckCategory; 7] = [
        Self::JobNumber,
        Self::PartNumber,
        Self::Revision,
        Self::BoardSerial,
        Self::UnitSerial,
        Self::FlightStatus,
        Self::FileCompleteness,
    ];
}

impl std::fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JobNumber => write!(f, "job_number"),
            Self::PartNumber => write!(f, "part_number"),
            Self::Revision => write!(f, "revision"),
            Self::BoardSerial => write!(f, "board_serial"),
            Self::UnitSerial => write!(f, "unit_serial"),
            Self::FlightStatus => write!(f, "flight_status"),
            Self::FileCompleteness => write!(f, "file_completeness"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Warning => write!(f, "warning"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// One finding from one check executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub category: CheckCategory,
    pub status: CheckStatus,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_documents: Vec<String>,
}

impl CheckResult {
    pub fn new(category: CheckCategory, status: CheckStatus, description: impl Into<String>) -> Self {
        Self {
            category,
            status,
            description: description.into(),
            expected_value: None,
            actual_value: None,
            details: None,
            source_documents: Vec::new(),
        }
    }

    pub fn expected(mut self, value: impl Into<String>) -> Self {
        self.expected_value = Some(value.into());
        self
    }

    pub fn actual(mut self, value: impl Into<String>) -> Self {
        self.actual_value = Some(value.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn sources<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_documents = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Overall outcome of a run. Always derived from the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Warning,
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Warning => write!(f, "warning"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total_checks: usize,
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
    pub by_category: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub document_id: String,
    pub role: DocumentRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub fuzzy_threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub verdict: Verdict,
    pub summary: ReconSummary,
    pub documents: Vec<DocumentInfo>,
    pub results: Vec<CheckResult>,
}
