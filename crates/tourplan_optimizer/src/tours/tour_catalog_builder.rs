use std::{collections::BTreeMap, sync::Arc};

use fxhash::FxHashMap;
use tourplan_engine::{
    EngineError, Expr, Literal, Model, SearchParams, Solver, VarIdx,
    constraints::{
        count::CountConstraint, implication::ImplicationConstraint, table::TableConstraint,
    },
    search::search_params::{ValueSelection, VariableSelection},
};
use tracing::{debug, info};

use crate::{
    error::CatalogError,
    problem::instance::{DEPOT, Instance},
    timer_debug,
};

use super::{
    covered_set::CoveredSet,
    tour::Tour,
    tour_catalog::{CatalogEntry, TourCatalog},
};

struct TourModel {
    model: Model,
    visits: Vec<VarIdx>,
    cost: Expr,
}

/// Enumerates every route a single vehicle can drive and keeps the cheapest
/// one per covered set.
///
/// Routes are enumerated in lexicographic order of their stops, and a route
/// only replaces the incumbent of its covered set when it is strictly
/// cheaper. On equal costs the lexicographically smallest route is kept.
pub struct TourCatalogBuilder<'a> {
    instance: &'a Instance,
    search: SearchParams,
}

impl<'a> TourCatalogBuilder<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        TourCatalogBuilder {
            instance,
            search: SearchParams::default(),
        }
    }

    /// Limits of the enumeration. Branching is always lexicographic.
    pub fn with_search_params(mut self, search: SearchParams) -> Self {
        self.search = search;
        self
    }

    fn build_model(&self) -> Result<TourModel, EngineError> {
        let instance = self.instance;
        let num_steps = instance.num_steps();
        let mut model = Model::new();

        let visits = (0..num_steps)
            .map(|step| {
                if step == 0 || step == num_steps - 1 {
                    model.new_constant(DEPOT as i64)
                } else {
                    model.new_int_var(0, instance.num_customers() as i64)
                }
            })
            .collect::<Vec<_>>();

        for customer in instance.customers() {
            model.add(CountConstraint::at_most(
                visits.clone(),
                customer as i64,
                1,
            ))?;
        }

        // back at the depot means staying there
        for step in 1..num_steps - 2 {
            model.add(ImplicationConstraint::new(
                Literal::eq(visits[step], DEPOT as i64),
                Literal::eq(visits[step + 1], DEPOT as i64),
            ))?;
        }

        let legs = Arc::new(
            instance
                .traversable_pairs()
                .map(|(from, to)| vec![from as i64, to as i64])
                .collect::<Vec<_>>(),
        );
        for step in 0..num_steps - 1 {
            model.add(TableConstraint::new(
                vec![visits[step], visits[step + 1]],
                Arc::clone(&legs),
            ))?;
        }

        let distances = Arc::clone(instance.matrices().distances());
        let cost = Expr::sum((0..num_steps - 1).map(|step| {
            Expr::element(
                Arc::clone(&distances),
                instance.num_locations(),
                visits[step],
                visits[step + 1],
            )
        }));
        model.check_expr(&cost)?;
        model.set_branching_order(visits.clone())?;

        Ok(TourModel {
            model,
            visits,
            cost,
        })
    }

    pub fn build(self) -> Result<TourCatalog, CatalogError> {
        let TourModel {
            model,
            visits,
            cost,
        } = self.build_model()?;

        let params = SearchParams {
            variable_selection: VariableSelection::InputOrder,
            value_selection: ValueSelection::Min,
            ..self.search
        };
        let solver = Solver::new(model, params);

        let mut solutions = solver.solutions();
        let (enumerated, best) = timer_debug!(
            "Tour enumeration",
            solutions.by_ref().fold(
                (0usize, FxHashMap::<CoveredSet, (Tour, f64)>::default()),
                |(enumerated, mut best), assignment| {
                    let tour = Tour::new(
                        assignment
                            .values_of(&visits)
                            .into_iter()
                            .map(|stop| stop as usize)
                            .collect(),
                    );
                    let tour_cost = assignment.evaluate(&cost);

                    let covered = tour.covered_set();
                    match best.get(&covered) {
                        Some((_, incumbent)) if *incumbent <= tour_cost => {}
                        _ => {
                            best.insert(covered, (tour, tour_cost));
                        }
                    }

                    (enumerated + 1, best)
                },
            )
        );

        if solutions.stopped().is_some() {
            return Err(CatalogError::Incomplete { enumerated });
        }

        let statistics = solutions.statistics();
        debug!(
            nodes = statistics.nodes,
            failures = statistics.failures,
            "Tour enumeration statistics"
        );
        info!(
            enumerated,
            retained = best.len(),
            instance = self.instance.name(),
            "Built tour catalog"
        );

        let entries = best
            .into_iter()
            .map(|(covered, (tour, cost))| (covered, CatalogEntry { tour, cost }))
            .collect::<BTreeMap<_, _>>();

        Ok(TourCatalog::new(entries, self.instance.num_steps()))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_toy_catalog() {
        let instance = test_utils::toy_instance();
        let catalog = TourCatalogBuilder::new(&instance).build().unwrap();

        assert_eq!(catalog.len(), 8);

        let empty = catalog.get(&CoveredSet::default()).unwrap();
        assert_eq!(empty.tour, Tour::new(vec![0, 0, 0, 0, 0]));
        assert_eq!(empty.cost, 0.0);

        let all = catalog.get(&CoveredSet::new([1, 2, 3])).unwrap();
        assert_eq!(all.tour, Tour::new(vec![0, 1, 3, 2, 0]));
        assert_eq!(all.cost, 66.0);
    }

    #[test]
    fn test_sparse_graph_only_uses_edges() {
        let instance = test_utils::sparse_instance();
        let catalog = TourCatalogBuilder::new(&instance).build().unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(catalog.get(&CoveredSet::new([2])).is_none());
        assert_eq!(
            catalog.get(&CoveredSet::new([1, 2])).unwrap().tour,
            Tour::new(vec![0, 1, 2, 0])
        );
    }

    #[test]
    fn test_incomplete_enumeration_is_an_error() {
        let instance = test_utils::toy_instance();
        let search = SearchParams {
            terminations: vec![tourplan_engine::Termination::Solutions(3)],
            ..SearchParams::default()
        };

        let result = TourCatalogBuilder::new(&instance)
            .with_search_params(search)
            .build();

        assert!(matches!(
            result,
            Err(CatalogError::Incomplete { enumerated: 3 })
        ));
    }
}
