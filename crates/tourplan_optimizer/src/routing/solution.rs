use serde::Serialize;

use crate::{
    error::SolutionError,
    problem::instance::{DEPOT, Instance, MINUTES_PER_DAY},
};

const COST_TOLERANCE: f64 = 1e-6;

/// Route driven by one vehicle.
///
/// `loads[s]` is the load left after step `s` and `arrivals[s]` the arrival
/// time at the stop of step `s + 1`, so both are one shorter than `stops`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAssignment {
    pub vehicle: usize,
    pub is_used: bool,
    pub stops: Vec<usize>,
    pub loads: Vec<i64>,
    pub arrivals: Vec<f64>,
    pub driving_cost: f64,
    pub hourly_cost: f64,
    pub late_cost: f64,
    pub fixed_cost: f64,
}

impl RouteAssignment {
    /// Amount dropped at the stop of step `step`, for `1 <= step < stops.len() - 1`.
    pub fn delivered_at(&self, step: usize) -> i64 {
        self.loads[step - 1] - self.loads[step]
    }

    pub fn departure_load(&self) -> i64 {
        self.loads.first().copied().unwrap_or(0)
    }

    pub fn total_cost(&self) -> f64 {
        self.driving_cost + self.hourly_cost + self.late_cost + self.fixed_cost
    }

    /// `(step, stop, delivered)` for every intermediate step.
    pub fn deliveries(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        (1..self.stops.len().saturating_sub(1))
            .map(|step| (step, self.stops[step], self.delivered_at(step)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub routes: Vec<RouteAssignment>,
    pub num_used_vehicles: usize,
    pub driving_total: f64,
    pub hourly_total: f64,
    pub late_total: f64,
    pub fixed_total: f64,
    pub total_cost: f64,
}

impl Solution {
    pub fn new(routes: Vec<RouteAssignment>) -> Self {
        let num_used_vehicles = routes.iter().filter(|route| route.is_used).count();
        let driving_total = routes.iter().map(|route| route.driving_cost).sum::<f64>();
        let hourly_total = routes.iter().map(|route| route.hourly_cost).sum::<f64>();
        let late_total = routes.iter().map(|route| route.late_cost).sum::<f64>();
        let fixed_total = routes.iter().map(|route| route.fixed_cost).sum::<f64>();

        Solution {
            routes,
            num_used_vehicles,
            driving_total,
            hourly_total,
            late_total,
            fixed_total,
            total_cost: driving_total + hourly_total + late_total + fixed_total,
        }
    }

    pub fn delivered_to(&self, customer: usize) -> i64 {
        self.routes
            .iter()
            .flat_map(|route| route.deliveries())
            .filter(|&(_, stop, _)| stop == customer)
            .map(|(_, _, delivered)| delivered)
            .sum()
    }

    /// Re-verifies demand, load, usage, time and cost invariants.
    pub fn check(&self, instance: &Instance) -> Result<(), SolutionError> {
        for customer in instance.customers() {
            let delivered = self.delivered_to(customer);
            if delivered != instance.demand_of(customer) {
                return Err(SolutionError::DemandMismatch {
                    customer,
                    delivered,
                    demand: instance.demand_of(customer),
                });
            }
        }

        for route in &self.routes {
            let closed = route.loads.last() == Some(&0)
                && route.loads.windows(2).all(|pair| pair[0] >= pair[1]);
            if !closed {
                return Err(SolutionError::LoadNotClosed {
                    vehicle: route.vehicle,
                });
            }

            let leaves_depot = route.stops.get(1).is_some_and(|&stop| stop != DEPOT);
            let carries_load = route.departure_load() > 1;
            if route.is_used != leaves_depot || route.is_used != carries_load {
                return Err(SolutionError::UsageMismatch {
                    vehicle: route.vehicle,
                });
            }

            let valid_arrivals = route
                .arrivals
                .iter()
                .all(|&arrival| arrival >= instance.start_time() && arrival < MINUTES_PER_DAY)
                && route.arrivals.windows(2).all(|pair| pair[0] <= pair[1]);
            if !valid_arrivals {
                return Err(SolutionError::InvalidArrivals {
                    vehicle: route.vehicle,
                });
            }
        }

        let components = self.driving_total + self.hourly_total + self.late_total + self.fixed_total;
        let by_route = self.routes.iter().map(RouteAssignment::total_cost).sum::<f64>();
        if (self.total_cost - components).abs() > COST_TOLERANCE
            || (self.total_cost - by_route).abs() > COST_TOLERANCE
        {
            return Err(SolutionError::CostMismatch {
                total: self.total_cost,
                components,
            });
        }

        let lower_bound = instance.fleet_lower_bound();
        if self.num_used_vehicles < lower_bound || self.num_used_vehicles > instance.num_vehicles() {
            return Err(SolutionError::FleetSize {
                used: self.num_used_vehicles,
                lower_bound,
                num_vehicles: instance.num_vehicles(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    fn route(vehicle: usize, stops: Vec<usize>, loads: Vec<i64>, arrivals: Vec<f64>) -> RouteAssignment {
        let is_used = stops[1] != DEPOT;
        RouteAssignment {
            vehicle,
            is_used,
            stops,
            loads,
            arrivals,
            driving_cost: 10.0,
            hourly_cost: 1.0,
            late_cost: 0.0,
            fixed_cost: if is_used { 300.0 } else { 0.0 },
        }
    }

    fn toy_solution() -> Solution {
        Solution::new(vec![
            route(
                0,
                vec![0, 1, 2, 0, 0],
                vec![9, 4, 0, 0],
                vec![310.0, 322.0, 342.0, 342.0],
            ),
            route(
                1,
                vec![0, 3, 2, 0, 0],
                vec![6, 1, 0, 0],
                vec![330.0, 353.0, 373.0, 373.0],
            ),
            route(
                2,
                vec![0, 0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![300.0, 300.0, 300.0, 300.0],
            ),
        ])
    }

    #[test]
    fn test_valid_solution() {
        let instance = test_utils::toy_instance();
        let solution = toy_solution();

        assert_eq!(solution.num_used_vehicles, 2);
        assert_eq!(solution.delivered_to(2), 5);
        assert_eq!(solution.total_cost, 633.0);
        assert_eq!(solution.check(&instance), Ok(()));
    }

    #[test]
    fn test_check_detects_broken_invariants() {
        let instance = test_utils::toy_instance();

        let mut solution = toy_solution();
        solution.routes[1].loads = vec![6, 2, 0, 0];
        assert!(matches!(
            solution.check(&instance),
            Err(SolutionError::DemandMismatch { customer: 2, .. })
        ));

        let mut solution = toy_solution();
        solution.total_cost += 1.0;
        assert!(matches!(
            solution.check(&instance),
            Err(SolutionError::CostMismatch { .. })
        ));
    }
}
