use std::sync::Arc;

use crate::{
    assignment::Assignment,
    store::{Conflict, DomainStore, PropagationResult},
    variable::VarIdx,
};

/// The variables must take the values of one of the rows, position by position.
///
/// Rows are shared behind an `Arc` so the same tuple set can constrain many
/// variable vectors without copying it.
#[derive(Debug, Clone)]
pub struct TableConstraint {
    pub vars: Vec<VarIdx>,
    pub tuples: Arc<Vec<Vec<i64>>>,
}

impl TableConstraint {
    pub fn new(vars: Vec<VarIdx>, tuples: Arc<Vec<Vec<i64>>>) -> Self {
        TableConstraint { vars, tuples }
    }

    pub fn scope(&self) -> Vec<VarIdx> {
        self.vars.clone()
    }

    fn is_supported(&self, store: &DomainStore, tuple: &[i64]) -> bool {
        self.vars
            .iter()
            .zip(tuple)
            .all(|(&var, &value)| store.domain(var).contains(value))
    }

    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        let mut supports: Vec<Vec<i64>> = vec![Vec::new(); self.vars.len()];
        let mut any_row = false;

        for tuple in self
            .tuples
            .iter()
            .filter(|tuple| self.is_supported(store, tuple))
        {
            any_row = true;
            for (position, &value) in tuple.iter().enumerate() {
                supports[position].push(value);
            }
        }

        if !any_row {
            return Err(Conflict { var: None });
        }

        let mut changed = false;
        for (position, &var) in self.vars.iter().enumerate() {
            let values = &mut supports[position];
            values.sort_unstable();
            values.dedup();

            changed |= store.retain(var, |value| values.binary_search(&value).is_ok())?;
        }

        Ok(changed)
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        let values = assignment.values_of(&self.vars);
        self.tuples.iter().any(|tuple| *tuple == values)
    }
}
