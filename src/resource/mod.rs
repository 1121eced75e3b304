//! Records owned by the upstream APIs and held locally as read replicas.

mod catalog;
mod person;

use std::collections::BTreeSet;
use std::fmt;

pub use catalog::{filter_by_category, CatalogItem, Category};
pub use person::{PersonPage, PersonProfile, PersonRecord, ValidationError};

/// An identifiable record managed by a list controller.
pub trait Resource: Clone + PartialEq + Send + Sync + 'static {
    type Id: Clone + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}

/// Keeps the first occurrence of every identifier.
///
/// Returns the surviving records in their original order together with the
/// identifiers that were seen more than once.
pub fn dedupe_by_id<R: Resource>(records: Vec<R>) -> (Vec<R>, Vec<R::Id>) {
    let mut seen = BTreeSet::new();
    let mut duplicates = Vec::new();
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.id().clone()) {
            kept.push(record);
        } else {
            duplicates.push(record.id().clone());
        }
    }
    (kept, duplicates)
}
