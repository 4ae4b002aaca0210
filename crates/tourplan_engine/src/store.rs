use crate::{domain::Domain, variable::VarIdx};

/// Raised when propagation empties a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub var: Option<VarIdx>,
}

pub type PropagationResult = Result<bool, Conflict>;

/// Current domains of every variable of a model.
///
/// Narrowing operations record the touched variable in a change log, which the
/// propagation loop drains to wake up the constraints watching it.
#[derive(Clone, Debug)]
pub struct DomainStore {
    domains: Vec<Domain>,
    changes: Vec<VarIdx>,
}

impl DomainStore {
    pub fn new(domains: Vec<Domain>) -> Self {
        DomainStore {
            domains,
            changes: Vec::new(),
        }
    }

    #[inline]
    pub fn domain(&self, var: VarIdx) -> &Domain {
        &self.domains[var]
    }

    pub fn num_vars(&self) -> usize {
        self.domains.len()
    }

    #[inline]
    pub fn min(&self, var: VarIdx) -> i64 {
        self.domains[var].min().unwrap_or(i64::MAX)
    }

    #[inline]
    pub fn max(&self, var: VarIdx) -> i64 {
        self.domains[var].max().unwrap_or(i64::MIN)
    }

    #[inline]
    pub fn value(&self, var: VarIdx) -> Option<i64> {
        self.domains[var].value()
    }

    #[inline]
    pub fn is_fixed(&self, var: VarIdx) -> bool {
        self.domains[var].is_fixed()
    }

    pub fn first_empty(&self) -> Option<VarIdx> {
        self.domains
            .iter()
            .position(Domain::is_empty)
            .map(VarIdx::new)
    }

    fn record(&mut self, var: VarIdx, changed: bool) -> PropagationResult {
        if !changed {
            return Ok(false);
        }

        self.changes.push(var);
        if self.domains[var].is_empty() {
            Err(Conflict { var: Some(var) })
        } else {
            Ok(true)
        }
    }

    pub fn remove(&mut self, var: VarIdx, value: i64) -> PropagationResult {
        let changed = self.domains[var].remove(value);
        self.record(var, changed)
    }

    pub fn fix(&mut self, var: VarIdx, value: i64) -> PropagationResult {
        if !self.domains[var].contains(value) {
            return Err(Conflict { var: Some(var) });
        }
        let changed = self.domains[var].fix(value);
        self.record(var, changed)
    }

    pub fn remove_below(&mut self, var: VarIdx, bound: i64) -> PropagationResult {
        let changed = self.domains[var].remove_below(bound);
        self.record(var, changed)
    }

    pub fn remove_above(&mut self, var: VarIdx, bound: i64) -> PropagationResult {
        let changed = self.domains[var].remove_above(bound);
        self.record(var, changed)
    }

    pub fn retain<F>(&mut self, var: VarIdx, keep: F) -> PropagationResult
    where
        F: FnMut(i64) -> bool,
    {
        let changed = self.domains[var].retain(keep);
        self.record(var, changed)
    }

    pub fn take_changes(&mut self) -> Vec<VarIdx> {
        std::mem::take(&mut self.changes)
    }

    pub fn values(&self) -> Option<Vec<i64>> {
        self.domains.iter().map(Domain::value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing_records_changes() {
        let mut store = DomainStore::new(vec![Domain::range(0, 5), Domain::range(0, 1)]);
        let x = VarIdx::new(0);
        let b = VarIdx::new(1);

        assert_eq!(store.remove_below(x, 2), Ok(true));
        assert_eq!(store.remove_below(x, 2), Ok(false));
        assert_eq!(store.fix(b, 1), Ok(true));
        assert_eq!(store.take_changes(), vec![x, b]);
        assert!(store.take_changes().is_empty());
    }

    #[test]
    fn test_emptying_a_domain_is_a_conflict() {
        let mut store = DomainStore::new(vec![Domain::range(0, 2)]);
        let x = VarIdx::new(0);

        assert_eq!(store.fix(x, 4), Err(Conflict { var: Some(x) }));
        assert_eq!(store.remove_above(x, -1), Err(Conflict { var: Some(x) }));
    }
}
