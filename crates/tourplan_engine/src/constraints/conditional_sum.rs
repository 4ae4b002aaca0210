use crate::{
    assignment::Assignment,
    store::{Conflict, DomainStore, PropagationResult},
    variable::{Literal, LiteralState, VarIdx},
};

use super::{Relation, linear::LinearExpr};

/// `Σₖ [literalₖ] · exprₖ  relation  rhs`
///
/// Each term only contributes while its literal holds. Propagation works on the
/// interval of every term: a term whose literal is undecided spans both zero
/// and the bounds of its expression.
#[derive(Debug, Clone)]
pub struct ConditionalSumConstraint {
    pub terms: Vec<(Literal, LinearExpr)>,
    pub relation: Relation,
    pub rhs: i64,
    negated_terms: Vec<(Literal, LinearExpr)>,
}

impl ConditionalSumConstraint {
    pub fn new(terms: Vec<(Literal, LinearExpr)>, relation: Relation, rhs: i64) -> Self {
        let negated_terms = terms
            .iter()
            .map(|(literal, expr)| (*literal, expr.negated()))
            .collect();

        ConditionalSumConstraint {
            terms,
            relation,
            rhs,
            negated_terms,
        }
    }

    pub fn scope(&self) -> Vec<VarIdx> {
        let mut vars = self
            .terms
            .iter()
            .flat_map(|(literal, expr)| std::iter::once(literal.var).chain(expr.variables()))
            .collect::<Vec<_>>();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    fn term_bounds(store: &DomainStore, literal: &Literal, expr: &LinearExpr) -> (i64, i64) {
        match literal.state(store) {
            LiteralState::True => (expr.min(store), expr.max(store)),
            LiteralState::False => (0, 0),
            LiteralState::Undecided => (expr.min(store).min(0), expr.max(store).max(0)),
        }
    }

    /// Enforces `Σₖ [literalₖ] · exprₖ <= upper`.
    fn propagate_upper(
        store: &mut DomainStore,
        terms: &[(Literal, LinearExpr)],
        upper: i64,
    ) -> PropagationResult {
        let total_min: i64 = terms
            .iter()
            .map(|(literal, expr)| Self::term_bounds(store, literal, expr).0)
            .sum();
        if total_min > upper {
            return Err(Conflict { var: None });
        }

        let mut changed = false;
        for (literal, expr) in terms {
            let (term_min, _) = Self::term_bounds(store, literal, expr);
            let slack = upper - (total_min - term_min);

            match literal.state(store) {
                LiteralState::False => {}
                LiteralState::True => changed |= expr.propagate_upper(store, slack)?,
                LiteralState::Undecided => {
                    if slack < 0 {
                        // only a holding literal can pull the sum down enough
                        changed |= literal.enforce(store)?;
                        changed |= expr.propagate_upper(store, slack)?;
                    } else if expr.min(store) > slack {
                        changed |= literal.negated().enforce(store)?;
                    }
                }
            }
        }

        Ok(changed)
    }

    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        match self.relation {
            Relation::Le => Self::propagate_upper(store, &self.terms, self.rhs),
            Relation::Ge => Self::propagate_upper(store, &self.negated_terms, -self.rhs),
            Relation::Eq => {
                let upper = Self::propagate_upper(store, &self.terms, self.rhs)?;
                let lower = Self::propagate_upper(store, &self.negated_terms, -self.rhs)?;
                Ok(upper || lower)
            }
        }
    }

    pub fn evaluate(&self, assignment: &Assignment) -> i64 {
        self.terms
            .iter()
            .filter(|(literal, _)| literal.holds(assignment.value(literal.var)))
            .map(|(_, expr)| expr.evaluate(assignment))
            .sum()
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.relation.holds(self.evaluate(assignment), self.rhs)
    }
}
