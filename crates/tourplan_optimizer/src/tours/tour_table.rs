use std::sync::Arc;

use crate::{
    error::{CatalogError, TourDefect},
    problem::instance::Instance,
};

use super::tour::Tour;

/// The tours a single vehicle may drive, as rows of a table constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourTable {
    tuples: Arc<Vec<Vec<i64>>>,
    tour_length: usize,
}

impl TourTable {
    pub fn new(tuples: Vec<Vec<i64>>, tour_length: usize) -> Self {
        TourTable {
            tuples: Arc::new(tuples),
            tour_length,
        }
    }

    pub fn from_tours<'a, I>(tours: I, tour_length: usize) -> Self
    where
        I: IntoIterator<Item = &'a Tour>,
    {
        let tuples = tours
            .into_iter()
            .map(|tour| tour.stops().iter().map(|&stop| stop as i64).collect())
            .collect();
        TourTable::new(tuples, tour_length)
    }

    pub fn tuples(&self) -> &Arc<Vec<Vec<i64>>> {
        &self.tuples
    }

    pub fn tour_length(&self) -> usize {
        self.tour_length
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Rows sorted, for comparisons that ignore order.
    pub fn sorted_tuples(&self) -> Vec<Vec<i64>> {
        let mut tuples = self.tuples.as_ref().clone();
        tuples.sort_unstable();
        tuples
    }

    /// Checks every row against the routes allowed by `instance`.
    pub fn validate(&self, instance: &Instance) -> Result<(), CatalogError> {
        if self.tour_length != instance.num_steps() {
            return Err(CatalogError::TourLength {
                expected: instance.num_steps(),
                found: self.tour_length,
            });
        }

        if self.tuples.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, tuple) in self.tuples.iter().enumerate() {
            let stops = tuple
                .iter()
                .map(|&stop| {
                    usize::try_from(stop).map_err(|_| CatalogError::InvalidTour {
                        index,
                        defect: TourDefect::LocationOutOfRange(stop),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Tour::new(stops)
                .check(instance)
                .map_err(|defect| CatalogError::InvalidTour { index, defect })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_validate_against_instance() {
        let instance = test_utils::toy_instance();
        let table = TourTable::new(vec![vec![0, 0, 0, 0, 0], vec![0, 3, 1, 0, 0]], 5);
        assert!(table.validate(&instance).is_ok());

        let table = TourTable::new(vec![vec![0, 1, 0, 0, 0], vec![0, -1, 0, 0, 0]], 5);
        assert!(matches!(
            table.validate(&instance),
            Err(CatalogError::InvalidTour {
                index: 1,
                defect: TourDefect::LocationOutOfRange(-1)
            })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_tables() {
        let instance = test_utils::toy_instance();

        assert!(matches!(
            TourTable::new(Vec::new(), 0).validate(&instance),
            Err(CatalogError::TourLength {
                expected: 5,
                found: 0
            })
        ));
        assert!(matches!(
            TourTable::new(vec![vec![0, 0, 0]], 3).validate(&instance),
            Err(CatalogError::TourLength { found: 3, .. })
        ));
        assert!(matches!(
            TourTable::new(Vec::new(), 5).validate(&instance),
            Err(CatalogError::Empty)
        ));
    }
}
