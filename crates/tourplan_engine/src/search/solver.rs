use tracing::{debug, info};

use crate::{error::EngineError, model::Model};

use super::{
    outcome::SolveOutcome, search_params::SearchParams, solutions::Solutions,
    statistics::SearchStatistics,
};

pub struct Solver {
    model: Model,
    params: SearchParams,
    watches: Vec<Vec<usize>>,
}

impl Solver {
    pub fn new(model: Model, params: SearchParams) -> Self {
        let mut watches = vec![Vec::new(); model.num_vars()];
        for (index, constraint) in model.constraints().iter().enumerate() {
            for var in constraint.scope() {
                if watches[var.get()].last() != Some(&index) {
                    watches[var.get()].push(index);
                }
            }
        }

        Solver {
            model,
            params,
            watches,
        }
    }

    /// Every solution of the model in a deterministic order. The objective is
    /// ignored.
    pub fn solutions(&self) -> Solutions<'_> {
        Solutions::new(&self.model, &self.params, &self.watches)
    }

    pub fn solve(&self) -> Result<SolveOutcome, EngineError> {
        self.solve_with_statistics().map(|(outcome, _)| outcome)
    }

    /// Without an objective this returns the first solution. With one it runs
    /// branch and bound in a single search: each solution tightens the bound
    /// of every open node to strictly better values.
    pub fn solve_with_statistics(&self) -> Result<(SolveOutcome, SearchStatistics), EngineError> {
        let mut solutions = self.solutions();
        let mut best = None;

        while let Some(assignment) = solutions.next() {
            if let Some(constraint) = self
                .model
                .constraints()
                .iter()
                .find(|constraint| !constraint.is_satisfied(&assignment))
            {
                return Err(EngineError::Malformed {
                    constraint: constraint.constraint_name(),
                    reason: "propagation accepted a violating assignment".to_owned(),
                });
            }

            let Some(objective) = self.model.objective() else {
                best = Some(assignment);
                break;
            };

            let value = assignment.value(objective);
            debug!(objective = value, "Found improving solution");
            solutions.tighten_objective(value - 1);
            best = Some(assignment);
        }

        let statistics = solutions.statistics();
        let exhausted = solutions.stopped().is_none();
        let outcome = match best {
            Some(assignment) if exhausted && self.model.objective().is_some() => {
                SolveOutcome::Optimal(assignment)
            }
            Some(assignment) => SolveOutcome::Feasible(assignment),
            None if exhausted => SolveOutcome::Infeasible,
            None => SolveOutcome::Unknown,
        };

        info!(
            nodes = statistics.nodes,
            failures = statistics.failures,
            solutions = statistics.solutions,
            "Search finished"
        );

        Ok((outcome, statistics))
    }
}
