use crate::{
    assignment::Assignment,
    store::{Conflict, DomainStore, PropagationResult},
    variable::VarIdx,
};

use super::Relation;

fn floor_div(a: i64, b: i64) -> i64 {
    let quotient = a / b;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

fn ceil_div(a: i64, b: i64) -> i64 {
    -floor_div(-a, b)
}

/// `Σ coef·var + constant`
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    pub terms: Vec<(i64, VarIdx)>,
    pub constant: i64,
}

impl LinearExpr {
    pub fn new(terms: Vec<(i64, VarIdx)>, constant: i64) -> Self {
        LinearExpr { terms, constant }
    }

    pub fn var(var: VarIdx) -> Self {
        LinearExpr::new(vec![(1, var)], 0)
    }

    pub fn sum(vars: &[VarIdx]) -> Self {
        LinearExpr::new(vars.iter().map(|&var| (1, var)).collect(), 0)
    }

    /// `lhs - rhs`
    pub fn diff(lhs: VarIdx, rhs: VarIdx) -> Self {
        LinearExpr::new(vec![(1, lhs), (-1, rhs)], 0)
    }

    pub fn plus(mut self, constant: i64) -> Self {
        self.constant += constant;
        self
    }

    pub fn negated(&self) -> Self {
        LinearExpr {
            terms: self.terms.iter().map(|&(coef, var)| (-coef, var)).collect(),
            constant: -self.constant,
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = VarIdx> + '_ {
        self.terms.iter().map(|&(_, var)| var)
    }

    fn term_min(store: &DomainStore, coef: i64, var: VarIdx) -> i64 {
        if coef >= 0 {
            coef * store.min(var)
        } else {
            coef * store.max(var)
        }
    }

    fn term_max(store: &DomainStore, coef: i64, var: VarIdx) -> i64 {
        if coef >= 0 {
            coef * store.max(var)
        } else {
            coef * store.min(var)
        }
    }

    pub fn min(&self, store: &DomainStore) -> i64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|&(coef, var)| LinearExpr::term_min(store, coef, var))
                .sum::<i64>()
    }

    pub fn max(&self, store: &DomainStore) -> i64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|&(coef, var)| LinearExpr::term_max(store, coef, var))
                .sum::<i64>()
    }

    pub fn evaluate(&self, assignment: &Assignment) -> i64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|&(coef, var)| coef * assignment.value(var))
                .sum::<i64>()
    }

    /// Enforces `expr <= upper` with bounds reasoning.
    pub fn propagate_upper(&self, store: &mut DomainStore, upper: i64) -> PropagationResult {
        let min = self.min(store);
        if min > upper {
            return Err(Conflict { var: None });
        }

        let mut changed = false;
        for &(coef, var) in &self.terms {
            if coef == 0 {
                continue;
            }

            // coef * var <= upper - (min - own contribution)
            let slack = upper - (min - LinearExpr::term_min(store, coef, var));
            if coef > 0 {
                changed |= store.remove_above(var, floor_div(slack, coef))?;
            } else {
                changed |= store.remove_below(var, ceil_div(slack, coef))?;
            }
        }

        Ok(changed)
    }

    /// Enforces `expr >= lower` with bounds reasoning.
    pub fn propagate_lower(&self, store: &mut DomainStore, lower: i64) -> PropagationResult {
        self.negated().propagate_upper(store, -lower)
    }

    pub fn propagate_relation(
        &self,
        store: &mut DomainStore,
        relation: Relation,
        rhs: i64,
    ) -> PropagationResult {
        match relation {
            Relation::Le => self.propagate_upper(store, rhs),
            Relation::Ge => self.propagate_lower(store, rhs),
            Relation::Eq => {
                let upper = self.propagate_upper(store, rhs)?;
                let lower = self.propagate_lower(store, rhs)?;
                Ok(upper || lower)
            }
        }
    }

    /// Enforces `expr != 0` once at most one variable is left unfixed.
    pub fn propagate_not_zero(&self, store: &mut DomainStore) -> PropagationResult {
        let mut unfixed = None;
        let mut fixed_sum = self.constant;

        for &(coef, var) in &self.terms {
            match store.value(var) {
                Some(value) => fixed_sum += coef * value,
                None if coef == 0 => {}
                None if unfixed.is_some() => return Ok(false),
                None => unfixed = Some((coef, var)),
            }
        }

        match unfixed {
            None if fixed_sum == 0 => Err(Conflict { var: None }),
            None => Ok(false),
            Some((coef, var)) => {
                if fixed_sum % coef == 0 {
                    store.remove(var, -fixed_sum / coef)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Whether `expr == 0` is still possible given the current domains.
    pub fn may_be_zero(&self, store: &DomainStore) -> bool {
        let (min, max) = (self.min(store), self.max(store));
        if min > 0 || max < 0 {
            return false;
        }

        let mut unfixed = None;
        let mut fixed_sum = self.constant;
        for &(coef, var) in &self.terms {
            match store.value(var) {
                Some(value) => fixed_sum += coef * value,
                None if coef == 0 => {}
                None if unfixed.is_some() => return true,
                None => unfixed = Some((coef, var)),
            }
        }

        match unfixed {
            None => fixed_sum == 0,
            Some((coef, var)) => {
                fixed_sum % coef == 0 && store.domain(var).contains(-fixed_sum / coef)
            }
        }
    }
}

/// `expr (= | <= | >=) rhs`
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn new(expr: LinearExpr, relation: Relation, rhs: i64) -> Self {
        LinearConstraint {
            expr,
            relation,
            rhs,
        }
    }

    pub fn scope(&self) -> Vec<VarIdx> {
        self.expr.variables().collect()
    }

    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        self.expr.propagate_relation(store, self.relation, self.rhs)
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.relation
            .holds(self.expr.evaluate(assignment), self.rhs)
    }
}
