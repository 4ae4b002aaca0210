use crate::{
    assignment::Assignment,
    store::{Conflict, DomainStore, PropagationResult},
    variable::VarIdx,
};

use super::Relation;

/// `#{ i : vars[i] == value }  relation  bound`
#[derive(Debug, Clone)]
pub struct CountConstraint {
    pub vars: Vec<VarIdx>,
    pub value: i64,
    pub relation: Relation,
    pub bound: i64,
}

impl CountConstraint {
    pub fn new(vars: Vec<VarIdx>, value: i64, relation: Relation, bound: i64) -> Self {
        CountConstraint {
            vars,
            value,
            relation,
            bound,
        }
    }

    pub fn at_most(vars: Vec<VarIdx>, value: i64, bound: i64) -> Self {
        CountConstraint::new(vars, value, Relation::Le, bound)
    }

    pub fn scope(&self) -> Vec<VarIdx> {
        self.vars.clone()
    }

    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        let mut fixed_to_value = 0;
        let mut candidates = Vec::new();
        for &var in &self.vars {
            let domain = store.domain(var);
            if !domain.contains(self.value) {
                continue;
            }
            if domain.is_fixed() {
                fixed_to_value += 1;
            } else {
                candidates.push(var);
            }
        }

        let possible = fixed_to_value + candidates.len() as i64;
        let (lower, upper) = match self.relation {
            Relation::Eq => (self.bound, self.bound),
            Relation::Le => (i64::MIN, self.bound),
            Relation::Ge => (self.bound, i64::MAX),
        };

        if fixed_to_value > upper || possible < lower {
            return Err(Conflict { var: None });
        }

        let mut changed = false;
        if fixed_to_value == upper {
            for &var in &candidates {
                changed |= store.remove(var, self.value)?;
            }
        } else if possible == lower {
            for &var in &candidates {
                changed |= store.fix(var, self.value)?;
            }
        }

        Ok(changed)
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        let count = self
            .vars
            .iter()
            .filter(|&&var| assignment.value(var) == self.value)
            .count() as i64;
        self.relation.holds(count, self.bound)
    }
}
