use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;

/// Customers visited by a tour, sorted and without the depot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CoveredSet(SmallVec<[usize; 8]>);

impl CoveredSet {
    pub fn new<I>(customers: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut customers = customers
            .into_iter()
            .filter(|&customer| customer != 0)
            .collect::<SmallVec<[usize; 8]>>();
        customers.sort_unstable();
        customers.dedup();
        CoveredSet(customers)
    }

    pub fn contains(&self, customer: usize) -> bool {
        self.0.binary_search(&customer).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for CoveredSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, customer) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{customer}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_depot_do_not_matter() {
        let first = CoveredSet::new([0, 2, 1, 0, 0]);
        let second = CoveredSet::new([0, 1, 2, 0, 0]);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(first.contains(2));
        assert!(!first.contains(0));
        assert_eq!(first.to_string(), "{1, 2}");
        assert!(CoveredSet::new([0, 0, 0]).is_empty());
    }
}
