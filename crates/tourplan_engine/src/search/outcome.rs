use crate::assignment::Assignment;

#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// The search tree was exhausted after this assignment was found.
    Optimal(Assignment),
    /// A solution without an optimality proof, either because the model has no
    /// objective or because a termination fired.
    Feasible(Assignment),
    Infeasible,
    /// A termination fired before any solution was found.
    Unknown,
}

impl SolveOutcome {
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolveOutcome::Optimal(assignment) | SolveOutcome::Feasible(assignment) => {
                Some(assignment)
            }
            SolveOutcome::Infeasible | SolveOutcome::Unknown => None,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveOutcome::Infeasible)
    }
}
