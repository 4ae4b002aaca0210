use std::fmt;

use fxhash::FxHashSet;
use serde::Serialize;

use crate::{
    error::TourDefect,
    problem::instance::{DEPOT, Instance},
};

use super::covered_set::CoveredSet;

/// Stop sequence of one vehicle, `num_steps` long and bookended by the depot.
/// Once the route returns to the depot it stays there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Tour(Vec<usize>);

impl Tour {
    pub fn new(stops: Vec<usize>) -> Self {
        Tour(stops)
    }

    pub fn stops(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consecutive `(from, to)` pairs.
    pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn covered_set(&self) -> CoveredSet {
        CoveredSet::new(self.0.iter().copied())
    }

    /// Sum of the distances of every leg.
    pub fn cost(&self, instance: &Instance) -> f64 {
        self.legs()
            .map(|(from, to)| instance.travel_distance(from, to))
            .sum()
    }

    pub fn check(&self, instance: &Instance) -> Result<(), TourDefect> {
        if self.0.len() != instance.num_steps() {
            return Err(TourDefect::WrongLength {
                expected: instance.num_steps(),
                found: self.0.len(),
            });
        }

        if let Some(&location) = self.0.iter().find(|&&stop| stop >= instance.num_locations()) {
            return Err(TourDefect::LocationOutOfRange(location as i64));
        }

        if self.0.first() != Some(&DEPOT) || self.0.last() != Some(&DEPOT) {
            return Err(TourDefect::NotDepotBookended);
        }

        let mut seen = FxHashSet::default();
        let mut returned = false;
        for (step, &stop) in self.0.iter().enumerate().skip(1) {
            if stop == DEPOT {
                returned = true;
            } else if returned {
                return Err(TourDefect::DepotNotAbsorbing { step });
            } else if !seen.insert(stop) {
                return Err(TourDefect::RepeatedCustomer(stop));
            }
        }

        if let Some((from, to)) = self
            .legs()
            .find(|&(from, to)| !instance.is_traversable(from, to))
        {
            return Err(TourDefect::MissingEdge { from, to });
        }

        Ok(())
    }

    pub fn is_valid(&self, instance: &Instance) -> bool {
        self.check(instance).is_ok()
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stops = self
            .0
            .iter()
            .map(|stop| stop.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", stops.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_cost_and_covered_set() {
        let instance = test_utils::toy_instance();
        let tour = Tour::new(vec![0, 2, 1, 0, 0]);

        assert_eq!(tour.cost(&instance), 42.0);
        assert_eq!(tour.covered_set(), CoveredSet::new([1, 2]));
        assert_eq!(tour.to_string(), "0 -> 2 -> 1 -> 0 -> 0");
        assert!(tour.is_valid(&instance));
    }

    #[test]
    fn test_invalid_tours() {
        let instance = test_utils::toy_instance();

        assert_eq!(
            Tour::new(vec![0, 1, 0, 2, 0]).check(&instance),
            Err(TourDefect::DepotNotAbsorbing { step: 3 })
        );
        assert_eq!(
            Tour::new(vec![0, 1, 2, 1, 0]).check(&instance),
            Err(TourDefect::RepeatedCustomer(1))
        );
        assert_eq!(
            Tour::new(vec![1, 2, 3, 0, 0]).check(&instance),
            Err(TourDefect::NotDepotBookended)
        );
        assert_eq!(
            Tour::new(vec![0, 1, 0]).check(&instance),
            Err(TourDefect::WrongLength {
                expected: 5,
                found: 3
            })
        );
        assert_eq!(
            Tour::new(vec![0, 4, 0, 0, 0]).check(&instance),
            Err(TourDefect::LocationOutOfRange(4))
        );
    }

    #[test]
    fn test_missing_edge() {
        let instance = test_utils::sparse_instance();

        assert_eq!(
            Tour::new(vec![0, 2, 1, 0]).check(&instance),
            Err(TourDefect::MissingEdge { from: 0, to: 2 })
        );
    }
}
