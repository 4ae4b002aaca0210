use crate::{
    assignment::Assignment,
    store::{DomainStore, PropagationResult},
    variable::VarIdx,
};

use super::linear::LinearExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn holds(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

/// Normal form of `expr cmp 0` used for propagation.
#[derive(Debug, Clone)]
enum Condition {
    Zero(LinearExpr),
    NonZero(LinearExpr),
    NonPositive(LinearExpr),
}

impl Condition {
    fn from_comparison(expr: LinearExpr, comparison: Comparison) -> Self {
        match comparison {
            Comparison::Eq => Condition::Zero(expr),
            Comparison::Ne => Condition::NonZero(expr),
            Comparison::Le => Condition::NonPositive(expr),
            // e < 0  <=>  e + 1 <= 0
            Comparison::Lt => Condition::NonPositive(expr.plus(1)),
            // e >= 0  <=>  -e <= 0
            Comparison::Ge => Condition::NonPositive(expr.negated()),
            // e > 0  <=>  -e + 1 <= 0
            Comparison::Gt => Condition::NonPositive(expr.negated().plus(1)),
        }
    }

    fn negated(&self) -> Self {
        match self {
            Condition::Zero(expr) => Condition::NonZero(expr.clone()),
            Condition::NonZero(expr) => Condition::Zero(expr.clone()),
            // not (e <= 0)  <=>  e >= 1  <=>  -e + 1 <= 0
            Condition::NonPositive(expr) => Condition::NonPositive(expr.negated().plus(1)),
        }
    }

    fn is_entailed(&self, store: &DomainStore) -> bool {
        match self {
            Condition::Zero(expr) => expr.min(store) == 0 && expr.max(store) == 0,
            Condition::NonZero(expr) => !expr.may_be_zero(store),
            Condition::NonPositive(expr) => expr.max(store) <= 0,
        }
    }

    fn enforce(&self, store: &mut DomainStore) -> PropagationResult {
        match self {
            Condition::Zero(expr) => {
                let upper = expr.propagate_upper(store, 0)?;
                let lower = expr.propagate_lower(store, 0)?;
                Ok(upper || lower)
            }
            Condition::NonZero(expr) => expr.propagate_not_zero(store),
            Condition::NonPositive(expr) => expr.propagate_upper(store, 0),
        }
    }
}

/// `boolean <=> (expr cmp rhs)` with `boolean` a 0/1 variable.
#[derive(Debug, Clone)]
pub struct ReifiedConstraint {
    pub boolean: VarIdx,
    pub expr: LinearExpr,
    pub comparison: Comparison,
    pub rhs: i64,
    condition: Condition,
    negation: Condition,
}

impl ReifiedConstraint {
    pub fn new(boolean: VarIdx, expr: LinearExpr, comparison: Comparison, rhs: i64) -> Self {
        let condition = Condition::from_comparison(expr.clone().plus(-rhs), comparison);
        let negation = condition.negated();

        ReifiedConstraint {
            boolean,
            expr,
            comparison,
            rhs,
            condition,
            negation,
        }
    }

    pub fn scope(&self) -> Vec<VarIdx> {
        std::iter::once(self.boolean)
            .chain(self.expr.variables())
            .collect()
    }

    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        match store.value(self.boolean) {
            Some(1) => self.condition.enforce(store),
            Some(_) => self.negation.enforce(store),
            None => {
                if self.condition.is_entailed(store) {
                    store.fix(self.boolean, 1)
                } else if self.negation.is_entailed(store) {
                    store.fix(self.boolean, 0)
                } else {
                    Ok(false)
                }
            }
        }
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        let holds = self
            .comparison
            .holds(self.expr.evaluate(assignment), self.rhs);
        (assignment.value(self.boolean) == 1) == holds
    }
}
