use tourplan_engine::{SearchParams, Termination};
use tourplan_optimizer::{
    error::{CatalogError, RoutingError},
    problem::instance::Instance,
    routing::{
        objective::ObjectiveMode,
        routing_model::{RoutingModel, RoutingOutcome},
        routing_params::RoutingParams,
        solution::Solution,
    },
    tours::{tour_catalog_builder::TourCatalogBuilder, tour_table::TourTable},
};

mod test_utils;

fn solve(instance: &Instance, params: RoutingParams) -> RoutingOutcome {
    let tours = TourCatalogBuilder::new(instance)
        .build()
        .unwrap()
        .tour_table();

    RoutingModel::build(instance, &tours, params)
        .unwrap()
        .solve()
        .unwrap()
}

fn with_objective(objective: ObjectiveMode) -> RoutingParams {
    RoutingParams {
        objective,
        ..RoutingParams::default()
    }
}

fn expect_solution(outcome: RoutingOutcome) -> (Solution, bool) {
    match outcome {
        RoutingOutcome::Solved {
            solution,
            proven_optimal,
        } => (solution, proven_optimal),
        RoutingOutcome::Infeasible => panic!("Expected a solution, got infeasible"),
        RoutingOutcome::Unknown => panic!("Expected a solution, got unknown"),
    }
}

#[test]
fn test_toy_minimize_fleet() {
    let instance = test_utils::toy_instance();
    let (solution, proven_optimal) = expect_solution(solve(
        &instance,
        with_objective(ObjectiveMode::MinimizeFleet),
    ));

    assert!(proven_optimal);
    assert_eq!(solution.num_used_vehicles, 2);
    assert_eq!(solution.check(&instance), Ok(()));

    for customer in instance.customers() {
        assert_eq!(solution.delivered_to(customer), 5);
    }
    assert_eq!(
        solution.total_cost,
        solution.driving_total + solution.hourly_total + solution.late_total + solution.fixed_total
    );
    assert_eq!(solution.fixed_total, 600.0);
}

#[test]
fn test_toy_feasibility_only() {
    let instance = test_utils::toy_instance();
    let (solution, _) = expect_solution(solve(
        &instance,
        with_objective(ObjectiveMode::FeasibilityOnly),
    ));

    assert!((2..=3).contains(&solution.num_used_vehicles));
    assert_eq!(solution.check(&instance), Ok(()));
}

#[test]
fn test_toy_fixed_fleet() {
    let instance = test_utils::toy_instance();

    let (solution, _) = expect_solution(solve(
        &instance,
        with_objective(ObjectiveMode::FixedFleet(3)),
    ));
    assert_eq!(solution.num_used_vehicles, 3);
    assert_eq!(solution.check(&instance), Ok(()));

    // capped at the fleet size
    let (solution, _) = expect_solution(solve(
        &instance,
        with_objective(ObjectiveMode::FixedFleet(7)),
    ));
    assert_eq!(solution.num_used_vehicles, 3);

    assert!(matches!(
        solve(&instance, with_objective(ObjectiveMode::FixedFleet(1))),
        RoutingOutcome::Infeasible
    ));
}

#[test]
fn test_symmetry_breaking_orders_first_stops() {
    let instance = test_utils::toy_instance();
    let params = RoutingParams {
        symmetry_breaking: true,
        ..RoutingParams::default()
    };
    let (solution, proven_optimal) = expect_solution(solve(&instance, params));

    assert!(proven_optimal);
    assert_eq!(solution.num_used_vehicles, 2);
    assert_eq!(solution.check(&instance), Ok(()));
    assert!(
        solution
            .routes
            .windows(2)
            .all(|pair| pair[0].stops[1] >= pair[1].stops[1])
    );
    assert!(!solution.routes[0].stops.iter().all(|&stop| stop == 0));
}

#[test]
fn test_over_demand_is_infeasible_under_every_objective() {
    let instance = test_utils::overloaded_instance();

    for objective in [
        ObjectiveMode::MinimizeFleet,
        ObjectiveMode::FeasibilityOnly,
        ObjectiveMode::FixedFleet(2),
    ] {
        assert!(
            matches!(
                solve(&instance, with_objective(objective)),
                RoutingOutcome::Infeasible
            ),
            "{objective} should be infeasible"
        );
    }
}

#[test]
fn test_missing_tour_makes_the_problem_infeasible() {
    let instance = test_utils::toy_instance();
    let tours = TourTable::new(
        vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 1, 2, 0, 0],
            vec![0, 1, 0, 0, 0],
            vec![0, 2, 0, 0, 0],
        ],
        5,
    );

    let outcome = RoutingModel::build(&instance, &tours, RoutingParams::default())
        .unwrap()
        .solve()
        .unwrap();

    assert!(matches!(outcome, RoutingOutcome::Infeasible));
}

#[test]
fn test_invalid_tour_table_is_rejected() {
    let instance = test_utils::toy_instance();
    let tours = TourTable::new(vec![vec![0, 1, 0]], 5);

    let result = RoutingModel::build(&instance, &tours, RoutingParams::default());

    assert!(matches!(
        result,
        Err(RoutingError::Catalog(CatalogError::InvalidTour { index: 0, .. }))
    ));
}

#[test]
fn test_cost_components_of_a_late_delivery() {
    let instance = test_utils::always_late_instance();
    let (solution, _) = expect_solution(solve(&instance, RoutingParams::default()));

    let route = &solution.routes[0];
    assert_eq!(route.stops, vec![0, 1, 0]);
    assert_eq!(route.loads, vec![4, 0]);
    assert_eq!(route.arrivals, vec![330.0, 360.0]);

    assert_eq!(solution.driving_total, 20.0);
    assert_eq!(solution.hourly_total, 15.0);
    assert_eq!(solution.late_total, 40.0);
    assert_eq!(solution.fixed_total, 300.0);
    assert_eq!(solution.total_cost, 375.0);
    assert_eq!(solution.check(&instance), Ok(()));
}

#[test]
fn test_delivery_at_the_deadline_is_late() {
    let instance = test_utils::late_instance(330.0);
    let (solution, _) = expect_solution(solve(&instance, RoutingParams::default()));

    assert_eq!(solution.routes[0].arrivals[0], 330.0);
    assert_eq!(solution.late_total, 40.0);
    assert_eq!(solution.total_cost, 375.0);

    let instance = test_utils::late_instance(331.0);
    let (solution, _) = expect_solution(solve(&instance, RoutingParams::default()));

    assert_eq!(solution.late_total, 0.0);
    assert_eq!(solution.total_cost, 335.0);
}

#[test]
fn test_mopta_default_search_within_node_budget() {
    let instance = Instance::from_id("mopta").unwrap();
    let params = RoutingParams {
        search: SearchParams {
            terminations: vec![Termination::Nodes(10_000)],
            ..SearchParams::default()
        },
        ..RoutingParams::default()
    };

    let (solution, _) = expect_solution(solve(&instance, params));

    assert_eq!(solution.check(&instance), Ok(()));
    assert!(solution.num_used_vehicles >= instance.fleet_lower_bound());
    for customer in instance.customers() {
        assert_eq!(solution.delivered_to(customer), instance.demand_of(customer));
    }
}

#[test]
fn test_empty_tour_table_is_rejected() {
    let instance = test_utils::toy_instance();
    let tours = TourTable::new(Vec::new(), 0);

    let result = RoutingModel::build(&instance, &tours, RoutingParams::default());

    assert!(matches!(
        result,
        Err(RoutingError::Catalog(CatalogError::TourLength {
            expected: 5,
            found: 0
        }))
    ));

    let tours = TourTable::new(Vec::new(), 5);
    assert!(matches!(
        RoutingModel::build(&instance, &tours, RoutingParams::default()),
        Err(RoutingError::Catalog(CatalogError::Empty))
    ));
}
