use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::DocumentRole;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    #[serde(default)]
    pub matching: MatchSettings,
    #[serde(default)]
    pub documents: Vec<DocumentConfig>,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// The engine's only tunable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
}

fn default_fuzzy_threshold() -> f64 {
    DEFAULT_FUZZY_THRESHOLD
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl MatchSettings {
    pub fn with_threshold(fuzzy_threshold: f64) -> Result<Self, ReconError> {
        let settings = Self { fuzzy_threshold };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(ReconError::InvalidThreshold(self.fuzzy_threshold));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    pub id: String,
    pub role: DocumentRole,
    pub file: String,
    #[serde(default)]
    pub format: DocumentFormat,
    /// Original upload name, carried into reports.
    #[serde(default)]
    pub filename: Option<String>,
}

/// How a document file is stored on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// JSON object with the extracted field lists.
    #[default]
    Fields,
    /// Recognized text (OCR / PDF text layer), run through pattern extraction.
    Text,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.matching.validate()?;

        let mut seen_ids: HashMap<&str, usize> = HashMap::new();
        let mut single_roles: HashMap<DocumentRole, &str> = HashMap::new();

        for (index, doc) in self.documents.iter().enumerate() {
            if doc.id.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "document #{} has an empty id",
                    index + 1
                )));
            }
            if doc.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "document '{}' has an empty file path",
                    doc.id
                )));
            }
            if seen_ids.insert(doc.id.as_str(), index).is_some() {
                return Err(ReconError::DuplicateDocument(doc.id.clone()));
            }

            if doc.role != DocumentRole::BillOfMaterials {
                if let Some(first) = single_roles.insert(doc.role, doc.id.as_str()) {
                    return Err(ReconError::DuplicateRole {
                        role: doc.role,
                        first: first.to_string(),
                        second: doc.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn documents_with_role(&self, role: DocumentRole) -> impl Iterator<Item = &DocumentConfig> {
        self.documents.iter().filter(move |d| d.role == role)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
