use std::sync::Arc;

use tourplan_engine::{
    Assignment, Expr, Literal, Model, Relation, SolveOutcome, Solver, VarIdx,
    constraints::{
        conditional_sum::ConditionalSumConstraint,
        expression_range::ExpressionRangeConstraint,
        linear::{LinearConstraint, LinearExpr},
        reified::{Comparison, ReifiedConstraint},
        table::TableConstraint,
    },
};
use tracing::{debug, info};

use crate::{
    error::RoutingError,
    problem::instance::{DEPOT, Instance, MINUTES_PER_DAY},
    tours::tour_table::TourTable,
};

use super::{
    construction::{InitialRoute, construct_routes},
    objective::ObjectiveMode,
    routing_params::RoutingParams,
    solution::{RouteAssignment, Solution},
};

/// Decision variables of one vehicle.
struct VehicleVars {
    /// Location at every step, depot at both ends.
    visits: Vec<VarIdx>,
    /// Load left after every step but the last, the final one fixed to 0.
    loads: Vec<VarIdx>,
    is_used: VarIdx,
}

/// Quantities derived from a vehicle's variables, evaluated on solutions.
struct VehicleExprs {
    arrivals: Vec<Expr>,
    driving: Expr,
    hourly: Expr,
    late: Expr,
    fixed: Expr,
}

pub enum RoutingOutcome {
    Solved {
        solution: Solution,
        proven_optimal: bool,
    },
    Infeasible,
    /// The search stopped before finding any assignment.
    Unknown,
}

/// Fleet routing over a fixed set of allowed tours.
pub struct RoutingModel<'a> {
    instance: &'a Instance,
    params: RoutingParams,
    model: Model,
    vehicles: Vec<VehicleVars>,
    exprs: Vec<VehicleExprs>,
    num_used: VarIdx,
}

impl<'a> RoutingModel<'a> {
    pub fn build(
        instance: &'a Instance,
        tours: &TourTable,
        params: RoutingParams,
    ) -> Result<RoutingModel<'a>, RoutingError> {
        tours.validate(instance)?;

        let mut model = Model::new();
        let vehicles = (0..instance.num_vehicles())
            .map(|_| add_vehicle(&mut model, instance, tours))
            .collect::<Result<Vec<_>, _>>()?;

        add_demand(&mut model, instance, &vehicles)?;

        if params.symmetry_breaking {
            for pair in vehicles.windows(2) {
                model.add(LinearConstraint::new(
                    LinearExpr::diff(pair[0].visits[1], pair[1].visits[1]),
                    Relation::Ge,
                    0,
                ))?;
            }
        }

        let num_used = model.new_int_var(
            instance.fleet_lower_bound() as i64,
            instance.num_vehicles() as i64,
        );
        let mut used_terms = vehicles
            .iter()
            .map(|vehicle| (1, vehicle.is_used))
            .collect::<Vec<_>>();
        used_terms.push((-1, num_used));
        model.add(LinearConstraint::new(
            LinearExpr::new(used_terms, 0),
            Relation::Eq,
            0,
        ))?;

        let exprs = vehicles
            .iter()
            .map(|vehicle| add_vehicle_exprs(&mut model, instance, vehicle))
            .collect::<Result<Vec<_>, _>>()?;

        match params.objective {
            ObjectiveMode::MinimizeFleet => model.minimize(num_used)?,
            ObjectiveMode::FeasibilityOnly => {}
            ObjectiveMode::FixedFleet(target) => {
                let target = target.min(instance.num_vehicles());
                model.add(LinearConstraint::new(
                    LinearExpr::var(num_used),
                    Relation::Eq,
                    target as i64,
                ))?;
            }
        }

        let branching = vehicles
            .iter()
            .flat_map(|vehicle| vehicle.visits.iter().copied())
            .chain(
                vehicles
                    .iter()
                    .flat_map(|vehicle| vehicle.loads.iter().copied()),
            )
            .collect();
        model.set_branching_order(branching)?;

        let max_vehicles = match params.objective {
            ObjectiveMode::FixedFleet(target) => target.min(instance.num_vehicles()),
            ObjectiveMode::MinimizeFleet | ObjectiveMode::FeasibilityOnly => {
                instance.num_vehicles()
            }
        };
        match construct_routes(instance, tours, max_vehicles) {
            Some(routes) if fits_objective(&routes, params.objective, max_vehicles) => {
                add_hints(&mut model, &vehicles, &routes)?;
            }
            _ => debug!("Searching without initial routes"),
        }

        debug!(
            variables = model.num_vars(),
            constraints = model.num_constraints(),
            objective = %params.objective,
            "Built routing model"
        );

        Ok(RoutingModel {
            instance,
            params,
            model,
            vehicles,
            exprs,
            num_used,
        })
    }

    pub fn num_vars(&self) -> usize {
        self.model.num_vars()
    }

    pub fn num_constraints(&self) -> usize {
        self.model.num_constraints()
    }

    pub fn solve(self) -> Result<RoutingOutcome, RoutingError> {
        let solver = Solver::new(self.model, self.params.search);
        let (outcome, statistics) = solver.solve_with_statistics()?;

        info!(
            nodes = statistics.nodes,
            failures = statistics.failures,
            propagations = statistics.propagations,
            "Routing search finished"
        );

        let proven_optimal = matches!(outcome, SolveOutcome::Optimal(_));
        let Some(assignment) = outcome.assignment() else {
            return Ok(if outcome.is_infeasible() {
                RoutingOutcome::Infeasible
            } else {
                RoutingOutcome::Unknown
            });
        };

        let routes = self
            .vehicles
            .iter()
            .zip(&self.exprs)
            .enumerate()
            .map(|(vehicle, (vars, exprs))| extract_route(assignment, vehicle, vars, exprs))
            .collect();
        let solution = Solution::new(routes);

        debug_assert_eq!(
            solution.num_used_vehicles as i64,
            assignment.value(self.num_used)
        );
        if let Err(error) = solution.check(self.instance) {
            debug!(%error, "Extracted solution failed its check");
        }

        Ok(RoutingOutcome::Solved {
            solution,
            proven_optimal,
        })
    }
}

fn add_vehicle(
    model: &mut Model,
    instance: &Instance,
    tours: &TourTable,
) -> Result<VehicleVars, RoutingError> {
    let num_steps = instance.num_steps();
    let last = num_steps - 1;

    let visits = (0..num_steps)
        .map(|step| {
            if step == 0 || step == last {
                model.new_constant(DEPOT as i64)
            } else {
                model.new_int_var(0, instance.num_customers() as i64)
            }
        })
        .collect::<Vec<_>>();

    let loads = (0..last)
        .map(|step| {
            if step == last - 1 {
                model.new_constant(0)
            } else {
                model.new_int_var(0, instance.capacity())
            }
        })
        .collect::<Vec<_>>();

    // used <=> leaves the depot <=> leaves with more than one unit
    let is_used = model.new_bool_var();
    model.add(ReifiedConstraint::new(
        is_used,
        LinearExpr::var(visits[1]),
        Comparison::Ne,
        0,
    ))?;
    model.add(ReifiedConstraint::new(
        is_used,
        LinearExpr::var(loads[0]),
        Comparison::Gt,
        1,
    ))?;

    for step in 0..last - 1 {
        model.add(LinearConstraint::new(
            LinearExpr::diff(loads[step], loads[step + 1]),
            Relation::Ge,
            0,
        ))?;
    }

    for step in 1..num_steps {
        // no visit <=> nothing left on board
        let no_visit = model.new_bool_var();
        model.add(ReifiedConstraint::new(
            no_visit,
            LinearExpr::var(visits[step]),
            Comparison::Eq,
            0,
        ))?;
        model.add(ReifiedConstraint::new(
            no_visit,
            LinearExpr::var(loads[step - 1]),
            Comparison::Eq,
            0,
        ))?;

        if step != last {
            // a visit <=> something is dropped
            let drops = model.new_bool_var();
            model.add(ReifiedConstraint::new(
                drops,
                LinearExpr::var(visits[step]),
                Comparison::Ne,
                0,
            ))?;
            model.add(ReifiedConstraint::new(
                drops,
                LinearExpr::diff(loads[step - 1], loads[step]),
                Comparison::Gt,
                0,
            ))?;
        }
    }

    model.add(TableConstraint::new(
        visits.clone(),
        Arc::clone(tours.tuples()),
    ))?;

    Ok(VehicleVars {
        visits,
        loads,
        is_used,
    })
}

fn fits_objective(routes: &[InitialRoute], objective: ObjectiveMode, max_vehicles: usize) -> bool {
    match objective {
        ObjectiveMode::FixedFleet(_) => {
            routes.iter().filter(|route| route.is_used()).count() == max_vehicles
        }
        ObjectiveMode::MinimizeFleet | ObjectiveMode::FeasibilityOnly => true,
    }
}

/// Steers the first descent of the search towards the constructed routes.
fn add_hints(
    model: &mut Model,
    vehicles: &[VehicleVars],
    routes: &[InitialRoute],
) -> Result<(), RoutingError> {
    for (vehicle, route) in vehicles.iter().zip(routes) {
        for (&visit, &stop) in vehicle.visits.iter().zip(&route.stops) {
            model.set_hint(visit, stop as i64)?;
        }
        for (&load, &value) in vehicle.loads.iter().zip(&route.loads) {
            model.set_hint(load, value)?;
        }
        model.set_hint(vehicle.is_used, route.is_used() as i64)?;
    }

    Ok(())
}

/// `(literal on the visit, amount dropped)` for every intermediate step of every vehicle.
fn drop_terms(
    vehicles: &[VehicleVars],
    literal: impl Fn(VarIdx) -> Literal + Copy,
) -> Vec<(Literal, LinearExpr)> {
    vehicles
        .iter()
        .flat_map(|vehicle| {
            (1..vehicle.visits.len() - 1).map(move |step| {
                (
                    literal(vehicle.visits[step]),
                    LinearExpr::diff(vehicle.loads[step - 1], vehicle.loads[step]),
                )
            })
        })
        .collect()
}

/// Every customer receives exactly its demand, summed over vehicles and steps.
fn add_demand(
    model: &mut Model,
    instance: &Instance,
    vehicles: &[VehicleVars],
) -> Result<(), RoutingError> {
    for customer in instance.customers() {
        model.add(ConditionalSumConstraint::new(
            drop_terms(vehicles, |visit| Literal::eq(visit, customer as i64)),
            Relation::Eq,
            instance.demand_of(customer),
        ))?;
    }

    // redundant, everything dropped at customers adds up to the total demand
    model.add(ConditionalSumConstraint::new(
        drop_terms(vehicles, |visit| Literal::ne(visit, DEPOT as i64)),
        Relation::Eq,
        instance.total_demand(),
    ))?;

    Ok(())
}

fn add_vehicle_exprs(
    model: &mut Model,
    instance: &Instance,
    vehicle: &VehicleVars,
) -> Result<VehicleExprs, RoutingError> {
    let costs = instance.costs();
    let width = instance.num_locations();
    let distances = Arc::clone(instance.matrices().distances());
    let times = Arc::clone(instance.matrices().times());
    let legs = vehicle.visits.windows(2).collect::<Vec<_>>();

    let driving = Expr::sum(legs.iter().map(|leg| {
        Expr::element(Arc::clone(&distances), width, leg[0], leg[1])
    }))
    .scale(costs.per_mile);

    let arrivals = legs
        .iter()
        .scan(Expr::Const(instance.start_time()), |arrival, leg| {
            *arrival =
                arrival.clone() + Expr::element(Arc::clone(&times), width, leg[0], leg[1]);
            Some(arrival.clone())
        })
        .collect::<Vec<_>>();

    for arrival in &arrivals {
        model.add(ExpressionRangeConstraint::new(
            arrival.clone(),
            instance.start_time(),
            MINUTES_PER_DAY,
        ))?;
    }

    let back_at_depot = arrivals
        .last()
        .cloned()
        .unwrap_or(Expr::Const(instance.start_time()));
    let hourly =
        (back_at_depot + Expr::Const(-instance.start_time())).scale(costs.per_hour / 60.0);

    // every unit dropped at or after the deadline is charged
    let late = Expr::sum((0..vehicle.loads.len() - 1).map(|step| {
        arrivals[step]
            .clone()
            .at_least(instance.latest_delivery_time())
            .times(Expr::diff(vehicle.loads[step], vehicle.loads[step + 1]))
    }))
    .scale(costs.late_item);

    let fixed = Expr::var(vehicle.is_used).scale(costs.fixed);

    for expr in [&driving, &hourly, &late, &fixed] {
        model.check_expr(expr)?;
    }

    Ok(VehicleExprs {
        arrivals,
        driving,
        hourly,
        late,
        fixed,
    })
}

fn extract_route(
    assignment: &Assignment,
    vehicle: usize,
    vars: &VehicleVars,
    exprs: &VehicleExprs,
) -> RouteAssignment {
    RouteAssignment {
        vehicle,
        is_used: assignment.value(vars.is_used) == 1,
        stops: assignment
            .values_of(&vars.visits)
            .into_iter()
            .map(|stop| stop as usize)
            .collect(),
        loads: assignment.values_of(&vars.loads),
        arrivals: exprs
            .arrivals
            .iter()
            .map(|arrival| assignment.evaluate(arrival))
            .collect(),
        driving_cost: assignment.evaluate(&exprs.driving),
        hourly_cost: assignment.evaluate(&exprs.hourly),
        late_cost: assignment.evaluate(&exprs.late),
        fixed_cost: assignment.evaluate(&exprs.fixed),
    }
}
