use std::fmt;

use fixedbitset::FixedBitSet;

/// Finite set of integer values.
///
/// Values are stored relative to `offset` in a bitset, so the domain keeps its
/// original span even once values are removed. Removing values is the only
/// mutation, which is what makes cloning a store a valid search checkpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Domain {
    offset: i64,
    values: FixedBitSet,
    size: usize,
}

impl Domain {
    /// Inclusive range. Returns an empty domain if `min > max`.
    pub fn range(min: i64, max: i64) -> Self {
        if min > max {
            return Domain::empty();
        }

        let span = (max - min + 1) as usize;
        let mut values = FixedBitSet::with_capacity(span);
        values.insert_range(..);

        Domain {
            offset: min,
            values,
            size: span,
        }
    }

    pub fn singleton(value: i64) -> Self {
        Domain::range(value, value)
    }

    pub fn boolean() -> Self {
        Domain::range(0, 1)
    }

    pub fn empty() -> Self {
        Domain {
            offset: 0,
            values: FixedBitSet::with_capacity(0),
            size: 0,
        }
    }

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return Domain::empty();
        };

        let mut bits = FixedBitSet::with_capacity((max - min + 1) as usize);
        for value in values {
            bits.insert((value - min) as usize);
        }

        Domain {
            offset: min,
            size: bits.count_ones(..),
            values: bits,
        }
    }

    #[inline]
    fn slot(&self, value: i64) -> Option<usize> {
        if value < self.offset {
            return None;
        }

        let slot = (value - self.offset) as usize;
        if slot < self.values.len() {
            Some(slot)
        } else {
            None
        }
    }

    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        self.slot(value)
            .is_some_and(|slot| self.values.contains(slot))
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.size == 1
    }

    pub fn min(&self) -> Option<i64> {
        self.values.ones().next().map(|slot| self.offset + slot as i64)
    }

    pub fn max(&self) -> Option<i64> {
        self.values.ones().last().map(|slot| self.offset + slot as i64)
    }

    /// The single remaining value, if the domain is fixed.
    pub fn value(&self) -> Option<i64> {
        if self.is_fixed() { self.min() } else { None }
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.values.ones().map(|slot| self.offset + slot as i64)
    }

    pub fn remove(&mut self, value: i64) -> bool {
        match self.slot(value) {
            Some(slot) if self.values.contains(slot) => {
                self.values.set(slot, false);
                self.size -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(i64) -> bool,
    {
        let removed = self
            .iter()
            .filter(|&value| !keep(value))
            .collect::<Vec<_>>();

        for &value in &removed {
            self.remove(value);
        }

        !removed.is_empty()
    }

    pub fn remove_below(&mut self, bound: i64) -> bool {
        self.retain(|value| value >= bound)
    }

    pub fn remove_above(&mut self, bound: i64) -> bool {
        self.retain(|value| value <= bound)
    }

    pub fn fix(&mut self, value: i64) -> bool {
        self.retain(|candidate| candidate == value)
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) if self.size as i64 == max - min + 1 => {
                write!(f, "[{min}..{max}]")
            }
            _ => f.debug_set().entries(self.iter()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let domain = Domain::range(3, 7);
        assert_eq!(domain.size(), 5);
        assert_eq!(domain.min(), Some(3));
        assert_eq!(domain.max(), Some(7));
        assert!(domain.contains(5));
        assert!(!domain.contains(8));
        assert!(!domain.contains(2));
    }

    #[test]
    fn test_empty_range() {
        let domain = Domain::range(2, 1);
        assert!(domain.is_empty());
        assert_eq!(domain.min(), None);
        assert_eq!(domain.value(), None);
    }

    #[test]
    fn test_remove_and_fix() {
        let mut domain = Domain::range(0, 4);
        assert!(domain.remove(2));
        assert!(!domain.remove(2));
        assert_eq!(domain.iter().collect::<Vec<_>>(), vec![0, 1, 3, 4]);

        assert!(domain.remove_below(1));
        assert!(domain.remove_above(3));
        assert_eq!(domain.iter().collect::<Vec<_>>(), vec![1, 3]);

        assert!(domain.fix(3));
        assert!(domain.is_fixed());
        assert_eq!(domain.value(), Some(3));

        assert!(domain.fix(1));
        assert!(domain.is_empty());
    }

    #[test]
    fn test_from_values_with_holes() {
        let domain = Domain::from_values([-2, 5, 1]);
        assert_eq!(domain.size(), 3);
        assert_eq!(domain.min(), Some(-2));
        assert_eq!(domain.max(), Some(5));
        assert!(!domain.contains(0));
        assert_eq!(format!("{domain:?}"), "{-2, 1, 5}");
    }
}
