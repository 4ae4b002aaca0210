use crate::{
    assignment::Assignment,
    store::{DomainStore, PropagationResult},
    variable::{Literal, LiteralState, VarIdx},
};

/// `premise => conclusion`
#[derive(Debug, Clone)]
pub struct ImplicationConstraint {
    pub premise: Literal,
    pub conclusion: Literal,
}

impl ImplicationConstraint {
    pub fn new(premise: Literal, conclusion: Literal) -> Self {
        ImplicationConstraint {
            premise,
            conclusion,
        }
    }

    pub fn scope(&self) -> Vec<VarIdx> {
        if self.premise.var == self.conclusion.var {
            vec![self.premise.var]
        } else {
            vec![self.premise.var, self.conclusion.var]
        }
    }

    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        match (self.premise.state(store), self.conclusion.state(store)) {
            (LiteralState::True, _) => self.conclusion.enforce(store),
            (_, LiteralState::False) => self.premise.negated().enforce(store),
            _ => Ok(false),
        }
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        !self.premise.holds(assignment.value(self.premise.var))
            || self.conclusion.holds(assignment.value(self.conclusion.var))
    }
}
