use std::collections::BTreeMap;

use serde::Serialize;

use super::{covered_set::CoveredSet, tour::Tour, tour_table::TourTable};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub tour: Tour,
    pub cost: f64,
}

/// The cheapest known tour for every set of customers a single vehicle can
/// cover.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TourCatalog {
    entries: BTreeMap<CoveredSet, CatalogEntry>,
    tour_length: usize,
}

impl TourCatalog {
    pub fn new(entries: BTreeMap<CoveredSet, CatalogEntry>, tour_length: usize) -> Self {
        TourCatalog {
            entries,
            tour_length,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tour_length(&self) -> usize {
        self.tour_length
    }

    pub fn get(&self, covered: &CoveredSet) -> Option<&CatalogEntry> {
        self.entries.get(covered)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CoveredSet, &CatalogEntry)> {
        self.entries.iter()
    }

    /// Retained tours without their costs, ordered by covered set.
    pub fn tour_table(&self) -> TourTable {
        TourTable::from_tours(self.entries.values().map(|entry| &entry.tour), self.tour_length)
    }
}
