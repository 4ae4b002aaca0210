use crate::{
    assignment::Assignment,
    expression::Expr,
    store::{Conflict, DomainStore, PropagationResult},
    variable::VarIdx,
};

/// `min <= expr < max_exclusive` over a real-valued expression.
#[derive(Debug, Clone)]
pub struct ExpressionRangeConstraint {
    pub expr: Expr,
    pub min: f64,
    pub max_exclusive: f64,
}

impl ExpressionRangeConstraint {
    pub fn new(expr: Expr, min: f64, max_exclusive: f64) -> Self {
        ExpressionRangeConstraint {
            expr,
            min,
            max_exclusive,
        }
    }

    pub fn scope(&self) -> Vec<VarIdx> {
        self.expr.variables()
    }

    /// Checks the interval of the expression against the range. It never
    /// narrows a domain itself.
    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        let bounds = self.expr.bounds(store);
        if bounds.hi < self.min || bounds.lo >= self.max_exclusive {
            return Err(Conflict { var: None });
        }

        Ok(false)
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        let value = self.expr.evaluate(assignment);
        value >= self.min && value < self.max_exclusive
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::domain::Domain;

    use super::*;

    #[test]
    fn test_arrival_past_end_of_day_fails() {
        let times = Arc::new(vec![0.0, 900.0, 900.0, 0.0]);
        let mut store = DomainStore::new(vec![Domain::singleton(0), Domain::range(0, 1)]);
        let arrival = Expr::Const(600.0)
            + Expr::element(times, 2, VarIdx::new(0), VarIdx::new(1));
        let range = ExpressionRangeConstraint::new(arrival, 300.0, 1440.0);

        assert_eq!(range.propagate(&mut store), Ok(false));

        store.fix(VarIdx::new(1), 1).unwrap();
        assert!(range.propagate(&mut store).is_err());
        assert!(!range.is_satisfied(&Assignment::new(vec![0, 1])));
        assert!(range.is_satisfied(&Assignment::new(vec![0, 0])));
    }
}
