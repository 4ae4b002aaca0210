use serde::{Deserialize, Serialize};

use crate::error::InstanceError;

use super::travel_matrices::TravelMatrices;

pub const DEPOT: usize = 0;
pub const MINUTES_PER_DAY: f64 = 1440.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostCoefficients {
    pub per_mile: f64,
    pub per_hour: f64,
    pub late_item: f64,
    pub fixed: f64,
}

/// A delivery problem: one depot (location 0), customers `1..=num_customers`
/// and a fleet of identical vehicles.
///
/// Times are minutes of the day.
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    num_vehicles: usize,
    num_customers: usize,
    capacity: i64,
    demand: Vec<i64>,
    matrices: TravelMatrices,
    start_time: f64,
    latest_delivery_time: f64,
    costs: CostCoefficients,
}

impl Instance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn num_customers(&self) -> usize {
        self.num_customers
    }

    pub fn customers(&self) -> impl Iterator<Item = usize> + use<> {
        1..=self.num_customers
    }

    pub fn num_locations(&self) -> usize {
        self.num_customers + 1
    }

    /// Length of every tour: leaving the depot, one step per customer, and
    /// returning to the depot.
    pub fn num_steps(&self) -> usize {
        self.num_customers + 2
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Demand of a customer, numbered from 1.
    pub fn demand_of(&self, customer: usize) -> i64 {
        self.demand[customer - 1]
    }

    pub fn demand(&self) -> &[i64] {
        &self.demand
    }

    pub fn total_demand(&self) -> i64 {
        self.demand.iter().sum()
    }

    /// `ceil(total_demand / capacity)`, ignoring routing and time.
    pub fn fleet_lower_bound(&self) -> usize {
        let total = self.total_demand();
        ((total + self.capacity - 1) / self.capacity) as usize
    }

    pub fn matrices(&self) -> &TravelMatrices {
        &self.matrices
    }

    pub fn travel_distance(&self, from: usize, to: usize) -> f64 {
        self.matrices.travel_distance(from, to)
    }

    pub fn travel_time(&self, from: usize, to: usize) -> f64 {
        self.matrices.travel_time(from, to)
    }

    /// Whether a route may go from `from` to `to`: an edge, or staying at the
    /// depot once the route is over.
    pub fn is_traversable(&self, from: usize, to: usize) -> bool {
        (from == DEPOT && to == DEPOT) || self.matrices.has_edge(from, to)
    }

    pub fn traversable_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let locations = self.num_locations();
        (0..locations)
            .flat_map(move |from| (0..locations).map(move |to| (from, to)))
            .filter(|&(from, to)| self.is_traversable(from, to))
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn latest_delivery_time(&self) -> f64 {
        self.latest_delivery_time
    }

    pub fn costs(&self) -> &CostCoefficients {
        &self.costs
    }

    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.num_vehicles == 0 {
            return Err(InstanceError::NoVehicles);
        }

        if self.capacity <= 0 {
            return Err(InstanceError::NoCapacity);
        }

        if self.demand.len() != self.num_customers {
            return Err(InstanceError::DemandLength {
                expected: self.num_customers,
                found: self.demand.len(),
            });
        }

        if let Some(index) = self.demand.iter().position(|&demand| demand < 0) {
            return Err(InstanceError::NegativeDemand {
                customer: index + 1,
            });
        }

        if self.matrices.num_locations() != self.num_locations() {
            return Err(InstanceError::MatrixSize {
                expected: self.num_locations(),
                found: self.matrices.num_locations(),
            });
        }

        for (field, value) in [
            ("start_time", self.start_time),
            ("latest_delivery_time", self.latest_delivery_time),
        ] {
            if !(0.0..MINUTES_PER_DAY).contains(&value) {
                return Err(InstanceError::TimeOutOfDay { field, value });
            }
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct InstanceBuilder {
    name: Option<String>,
    num_vehicles: usize,
    num_customers: Option<usize>,
    capacity: i64,
    demand: Vec<i64>,
    matrices: Option<TravelMatrices>,
    start_time: f64,
    latest_delivery_time: f64,
    costs: CostCoefficients,
}

impl InstanceBuilder {
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut InstanceBuilder {
        self.name = Some(name.into());
        self
    }

    pub fn set_num_vehicles(&mut self, num_vehicles: usize) -> &mut InstanceBuilder {
        self.num_vehicles = num_vehicles;
        self
    }

    /// Defaults to the length of the demand vector.
    pub fn set_num_customers(&mut self, num_customers: usize) -> &mut InstanceBuilder {
        self.num_customers = Some(num_customers);
        self
    }

    pub fn set_capacity(&mut self, capacity: i64) -> &mut InstanceBuilder {
        self.capacity = capacity;
        self
    }

    pub fn set_demand(&mut self, demand: Vec<i64>) -> &mut InstanceBuilder {
        self.demand = demand;
        self
    }

    pub fn set_travel_matrices(&mut self, matrices: TravelMatrices) -> &mut InstanceBuilder {
        self.matrices = Some(matrices);
        self
    }

    pub fn set_start_time(&mut self, start_time: f64) -> &mut InstanceBuilder {
        self.start_time = start_time;
        self
    }

    pub fn set_latest_delivery_time(&mut self, latest_delivery_time: f64) -> &mut InstanceBuilder {
        self.latest_delivery_time = latest_delivery_time;
        self
    }

    pub fn set_costs(&mut self, costs: CostCoefficients) -> &mut InstanceBuilder {
        self.costs = costs;
        self
    }

    pub fn build(self) -> Result<Instance, InstanceError> {
        let num_customers = self.num_customers.unwrap_or(self.demand.len());
        let matrices = self.matrices.ok_or(InstanceError::MatrixSize {
            expected: num_customers + 1,
            found: 0,
        })?;

        let instance = Instance {
            name: self.name.unwrap_or_else(|| String::from("instance")),
            num_vehicles: self.num_vehicles,
            num_customers,
            capacity: self.capacity,
            demand: self.demand,
            matrices,
            start_time: self.start_time,
            latest_delivery_time: self.latest_delivery_time,
            costs: self.costs,
        };

        instance.validate()?;
        Ok(instance)
    }
}
