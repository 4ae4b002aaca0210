use std::fmt;

use serde::Serialize;

use crate::{
    problem::instance::Instance,
    routing::solution::{RouteAssignment, Solution},
    utils::time::format_clock,
};

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub location: usize,
    pub arrival: String,
    pub delivered: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleReport {
    pub vehicle: usize,
    pub is_used: bool,
    pub departure_load: i64,
    pub driving_cost: f64,
    pub hourly_cost: f64,
    pub late_cost: f64,
    pub fixed_cost: f64,
    pub total_cost: f64,
    pub steps: Vec<StepReport>,
}

/// Human readable summary of a solution: totals, then one section per vehicle.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionReport {
    pub instance: String,
    pub num_used_vehicles: usize,
    pub fleet_lower_bound: usize,
    pub total_cost: f64,
    pub driving_total: f64,
    pub hourly_total: f64,
    pub late_total: f64,
    pub fixed_total: f64,
    pub vehicles: Vec<VehicleReport>,
}

impl SolutionReport {
    pub fn new(instance: &Instance, solution: &Solution) -> Self {
        SolutionReport {
            instance: instance.name().to_owned(),
            num_used_vehicles: solution.num_used_vehicles,
            fleet_lower_bound: instance.fleet_lower_bound(),
            total_cost: solution.total_cost,
            driving_total: solution.driving_total,
            hourly_total: solution.hourly_total,
            late_total: solution.late_total,
            fixed_total: solution.fixed_total,
            vehicles: solution.routes.iter().map(vehicle_report).collect(),
        }
    }
}

fn vehicle_report(route: &RouteAssignment) -> VehicleReport {
    let last = route.stops.len().saturating_sub(1);
    let steps = (1..route.stops.len())
        .map(|step| StepReport {
            step,
            location: route.stops[step],
            arrival: format_clock(route.arrivals[step - 1]),
            delivered: if step < last {
                route.delivered_at(step)
            } else {
                0
            },
        })
        .collect();

    VehicleReport {
        vehicle: route.vehicle,
        is_used: route.is_used,
        departure_load: route.departure_load(),
        driving_cost: route.driving_cost,
        hourly_cost: route.hourly_cost,
        late_cost: route.late_cost,
        fixed_cost: route.fixed_cost,
        total_cost: route.total_cost(),
        steps,
    }
}

impl fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instance: {}", self.instance)?;
        writeln!(
            f,
            "Vehicles used: {} (lower bound {})",
            self.num_used_vehicles, self.fleet_lower_bound
        )?;
        writeln!(f, "Total cost: {:.2}", self.total_cost)?;
        writeln!(f, "  driving: {:.2}", self.driving_total)?;
        writeln!(f, "  hourly:  {:.2}", self.hourly_total)?;
        writeln!(f, "  late:    {:.2}", self.late_total)?;
        writeln!(f, "  fixed:   {:.2}", self.fixed_total)?;

        for vehicle in self.vehicles.iter().filter(|vehicle| vehicle.is_used) {
            writeln!(f)?;
            writeln!(
                f,
                "Vehicle {}: cost {:.2} (driving {:.2}, hourly {:.2}, late {:.2}, fixed {:.2}), departs with {}",
                vehicle.vehicle,
                vehicle.total_cost,
                vehicle.driving_cost,
                vehicle.hourly_cost,
                vehicle.late_cost,
                vehicle.fixed_cost,
                vehicle.departure_load
            )?;
            for step in &vehicle.steps {
                writeln!(
                    f,
                    "  step {}: location {} at {}, delivered {}",
                    step.step, step.location, step.arrival, step.delivered
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_report_of_single_route() {
        let instance = test_utils::toy_instance();
        let solution = Solution::new(vec![
            RouteAssignment {
                vehicle: 0,
                is_used: true,
                stops: vec![0, 1, 2, 0, 0],
                loads: vec![9, 4, 0, 0],
                arrivals: vec![310.0, 322.0, 342.0, 342.0],
                driving_cost: 84.0,
                hourly_cost: 10.5,
                late_cost: 0.0,
                fixed_cost: 300.0,
            },
            RouteAssignment {
                vehicle: 1,
                is_used: false,
                stops: vec![0, 0, 0, 0, 0],
                loads: vec![0, 0, 0, 0],
                arrivals: vec![300.0; 4],
                driving_cost: 0.0,
                hourly_cost: 0.0,
                late_cost: 0.0,
                fixed_cost: 0.0,
            },
        ]);

        let report = SolutionReport::new(&instance, &solution);

        assert_eq!(report.instance, "toy");
        assert_eq!(report.num_used_vehicles, 1);
        assert_eq!(report.total_cost, 394.5);

        let vehicle = &report.vehicles[0];
        assert_eq!(vehicle.departure_load, 9);
        assert_eq!(vehicle.steps.len(), 4);
        assert_eq!(vehicle.steps[0].arrival, "05:10");
        assert_eq!(vehicle.steps[0].delivered, 5);
        assert_eq!(vehicle.steps[1].location, 2);
        assert_eq!(vehicle.steps[1].delivered, 4);
        assert_eq!(vehicle.steps[2].arrival, "05:42");

        let text = report.to_string();
        assert!(text.contains("Vehicle 0: cost 394.50"));
        assert!(!text.contains("Vehicle 1"));
    }
}
