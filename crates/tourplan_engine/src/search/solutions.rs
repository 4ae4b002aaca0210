use std::collections::VecDeque;

use jiff::Timestamp;
use tracing::debug;

use crate::{
    assignment::Assignment,
    model::Model,
    store::{Conflict, DomainStore},
    variable::VarIdx,
};

use super::{
    search_params::{SearchParams, Termination, ValueSelection, VariableSelection},
    statistics::SearchStatistics,
};

const DURATION_CHECK_INTERVAL: usize = 256;

/// Lazy depth-first enumeration of the solutions of a model.
///
/// Each node owns a copy of the domains; branching on `x` with value `v`
/// pushes `x != v` below `x = v` so the equality branch is explored first.
/// The iterator is finite and cannot be restarted.
pub struct Solutions<'a> {
    model: &'a Model,
    params: &'a SearchParams,
    watches: &'a [Vec<usize>],
    stack: Vec<DomainStore>,
    objective_bound: Option<i64>,
    statistics: SearchStatistics,
    start: Timestamp,
    stopped: Option<Termination>,
    is_root: bool,
}

impl<'a> Solutions<'a> {
    pub(crate) fn new(model: &'a Model, params: &'a SearchParams, watches: &'a [Vec<usize>]) -> Self {
        let root = DomainStore::new(model.domains().to_vec());
        let stack = if root.first_empty().is_some() {
            Vec::new()
        } else {
            vec![root]
        };

        Solutions {
            model,
            params,
            watches,
            stack,
            objective_bound: None,
            statistics: SearchStatistics::default(),
            start: Timestamp::now(),
            stopped: None,
            is_root: true,
        }
    }

    pub fn statistics(&self) -> SearchStatistics {
        self.statistics
    }

    /// The termination that ended the search early, if any.
    pub fn stopped(&self) -> Option<&Termination> {
        self.stopped.as_ref()
    }

    /// Restricts every open node to objective values at most `bound`.
    pub(crate) fn tighten_objective(&mut self, bound: i64) {
        self.objective_bound = Some(self.objective_bound.map_or(bound, |b| b.min(bound)));
    }

    fn check_termination(&self, termination: &Termination) -> bool {
        match *termination {
            Termination::Nodes(max_nodes) => self.statistics.nodes >= max_nodes,
            Termination::Solutions(max_solutions) => self.statistics.solutions >= max_solutions,
            Termination::Duration(max_duration) => {
                self.statistics.nodes % DURATION_CHECK_INTERVAL == 0
                    && Timestamp::now().duration_since(self.start) > max_duration
            }
        }
    }

    fn should_terminate(&mut self) -> bool {
        if let Some(termination) = self
            .params
            .terminations
            .iter()
            .find(|termination| self.check_termination(termination))
        {
            debug!(
                "Termination condition met: {:?} after {} nodes",
                termination, self.statistics.nodes
            );
            self.stopped = Some(termination.clone());
            true
        } else {
            false
        }
    }

    /// Runs the propagators to a fixpoint. The root node runs every
    /// constraint, other nodes only those watching a changed variable.
    fn propagate(&mut self, store: &mut DomainStore) -> Result<(), Conflict> {
        let constraints = self.model.constraints();
        let mut queued = vec![false; constraints.len()];
        let mut queue = VecDeque::new();

        if std::mem::take(&mut self.is_root) {
            store.take_changes();
            queue.extend(0..constraints.len());
            queued.iter_mut().for_each(|flag| *flag = true);
        } else {
            self.schedule(store.take_changes(), &mut queue, &mut queued);
        }

        while let Some(index) = queue.pop_front() {
            queued[index] = false;
            self.statistics.propagations += 1;

            let result = constraints[index].propagate(store);
            let changes = store.take_changes();
            result?;
            self.schedule(changes, &mut queue, &mut queued);
        }

        Ok(())
    }

    fn schedule(&self, changes: Vec<VarIdx>, queue: &mut VecDeque<usize>, queued: &mut [bool]) {
        for var in changes {
            for &index in &self.watches[var.get()] {
                if !queued[index] {
                    queued[index] = true;
                    queue.push_back(index);
                }
            }
        }
    }

    fn select_variable(&self, store: &DomainStore) -> Option<VarIdx> {
        let mut unfixed = self
            .model
            .branching()
            .iter()
            .copied()
            .filter(|&var| !store.is_fixed(var))
            .peekable();

        let branching = match self.params.variable_selection {
            VariableSelection::InputOrder => unfixed.next(),
            VariableSelection::FirstFail => {
                let mut best: Option<VarIdx> = None;
                for var in unfixed {
                    let size = store.domain(var).size();
                    if best.is_none_or(|b| size < store.domain(b).size()) {
                        best = Some(var);
                    }
                }
                best
            }
        };

        branching.or_else(|| {
            (0..store.num_vars())
                .map(VarIdx::new)
                .find(|&var| !store.is_fixed(var))
        })
    }

    fn select_value(&self, store: &DomainStore, var: VarIdx) -> Option<i64> {
        let hint = self
            .model
            .hint(var)
            .filter(|&hint| store.domain(var).contains(hint));
        if hint.is_some() {
            return hint;
        }

        match self.params.value_selection {
            ValueSelection::Min => store.domain(var).min(),
            ValueSelection::Max => store.domain(var).max(),
        }
    }
}

impl Iterator for Solutions<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        while let Some(mut store) = self.stack.pop() {
            self.statistics.nodes += 1;
            if self.should_terminate() {
                self.stack.clear();
                return None;
            }

            let bounded = match (self.model.objective(), self.objective_bound) {
                (Some(objective), Some(bound)) => store.remove_above(objective, bound).map(|_| ()),
                _ => Ok(()),
            };

            if bounded.and_then(|_| self.propagate(&mut store)).is_err() {
                self.statistics.failures += 1;
                continue;
            }

            let Some(var) = self.select_variable(&store) else {
                let Some(values) = store.values() else {
                    self.statistics.failures += 1;
                    continue;
                };

                let assignment = Assignment::new(values);
                debug_assert!(
                    self.model
                        .constraints()
                        .iter()
                        .all(|constraint| constraint.is_satisfied(&assignment))
                );
                self.statistics.solutions += 1;
                return Some(assignment);
            };

            let Some(value) = self.select_value(&store, var) else {
                self.statistics.failures += 1;
                continue;
            };

            let mut excluded = store.clone();
            let mut chosen = store;
            // an unfixed domain always keeps a value on both sides
            if excluded.remove(var, value).is_ok() {
                self.stack.push(excluded);
            }
            if chosen.fix(var, value).is_ok() {
                self.stack.push(chosen);
            }
        }

        None
    }
}
