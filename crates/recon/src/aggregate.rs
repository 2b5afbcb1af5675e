use std::collections::BTreeMap;

use crate::error::ReconError;
use crate::model::{DocumentRole, FieldBag, ReconciliationRun};

/// A run's field bags grouped by document role.
///
/// Pure grouping: raw values are untouched so that findings can still quote
/// what was extracted.
#[derive(Debug, Clone, Default)]
pub struct AggregatedView<'a> {
    pub traveler: Option<&'a FieldBag>,
    pub image: Option<&'a FieldBag>,
    pub boms: Vec<&'a FieldBag>,
    pub by_document_id: BTreeMap<&'a str, &'a FieldBag>,
}

impl<'a> AggregatedView<'a> {
    pub fn has_role(&self, role: DocumentRole) -> bool {
        match role {
            DocumentRole::Traveler => self.traveler.is_some(),
            DocumentRole::Image => self.image.is_some(),
            DocumentRole::BillOfMaterials => !self.boms.is_empty(),
        }
    }

    pub fn document(&self, document_id: &str) -> Option<&'a FieldBag> {
        self.by_document_id.get(document_id).copied()
    }
}

/// Group a run's bags by role.
///
/// A second Traveler or Image bag, or a repeated document id, is a caller
/// bug and is rejected.
pub fn aggregate_documents(run: &ReconciliationRun) -> Result<AggregatedView<'_>, ReconError> {
    let mut view = AggregatedView::default();

    for bag in &run.documents {
        if view.by_document_id.insert(bag.document_id.as_str(), bag).is_some() {
            return Err(ReconError::DuplicateDocument(bag.document_id.clone()));
        }

        let slot = match bag.role {
            DocumentRole::Traveler => &mut view.traveler,
            DocumentRole::Image => &mut view.image,
            DocumentRole::BillOfMaterials => {
                view.boms.push(bag);
                log::debug!("aggregated bill_of_materials document '{}'", bag.document_id);
                continue;
            }
        };

        if let Some(existing) = slot {
            return Err(ReconError::DuplicateRole {
                role: bag.role,
                first: existing.document_id.clone(),
                second: bag.document_id.clone(),
            });
        }
        *slot = Some(bag);
        log::debug!("aggregated {} document '{}'", bag.role, bag.document_id);
    }

    Ok(view)
}
