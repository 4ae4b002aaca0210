use crate::error::InstanceError;

use super::{
    instance::{CostCoefficients, Instance, InstanceBuilder},
    travel_matrices::TravelMatricesBuilder,
};

pub const INSTANCE_IDS: [&str; 2] = ["toy", "mopta"];

const DEFAULT_COSTS: CostCoefficients = CostCoefficients {
    per_mile: 2.0,
    per_hour: 15.0,
    late_item: 10.0,
    fixed: 300.0,
};

/// Day starts at 05:00.
const START_TIME: f64 = 300.0;
/// Deliveries are on time until 08:01.
const LATEST_DELIVERY_TIME: f64 = 481.0;

// (from, to, distance, time), all symmetric
const TOY_EDGES: [(usize, usize, f64, f64); 6] = [
    (0, 1, 10.0, 10.0),
    (0, 2, 20.0, 20.0),
    (0, 3, 30.0, 30.0),
    (1, 2, 12.0, 12.0),
    (1, 3, 13.0, 13.0),
    (2, 3, 23.0, 23.0),
];

// (from, to, miles, minutes), all symmetric. Customers 4 and 6 are not
// reachable from the depot directly.
const MOPTA_EDGES: [(usize, usize, f64, f64); 31] = [
    (0, 1, 1.96468827043885, 10.6),
    (0, 2, 5.0643007760336936, 32.08),
    (0, 3, 1.1854219150394074, 6.95),
    (0, 5, 4.907218491015141, 27.64),
    (0, 7, 4.640221721305585, 24.13),
    (0, 8, 2.6596014859808714, 18.42),
    (0, 9, 3.080543715187625, 21.2),
    (0, 10, 3.585117510979431, 19.0),
    (1, 2, 3.608830236783567, 20.32),
    (1, 3, 2.6400831314914046, 14.0),
    (1, 5, 4.921232308870278, 22.0),
    (1, 7, 4.717041635672212, 27.13),
    (1, 8, 4.120651436973349, 26.25),
    (1, 9, 1.2596981846086392, 6.7),
    (1, 10, 4.483110549310852, 24.79),
    (2, 7, 3.8125014837397604, 20.19),
    (2, 9, 3.7610074859206524, 16.35),
    (2, 10, 5.097154605916928, 30.55),
    (3, 5, 3.9603850053646843, 22.36),
    (3, 6, 4.2284009238396125, 30.38),
    (3, 8, 3.453934890729809, 18.98),
    (3, 9, 3.4480499930985538, 16.15),
    (3, 10, 4.603146042889638, 27.65),
    (4, 7, 2.8705173286733583, 18.97),
    (4, 8, 3.270348339390213, 18.34),
    (4, 10, 2.2167807986842525, 12.12),
    (5, 6, 4.412446144735891, 21.61),
    (5, 9, 4.571665408744175, 25.9),
    (7, 8, 3.351784281672397, 19.92),
    (7, 10, 1.9870721685071835, 10.48),
    (8, 10, 1.4754000196183448, 8.01),
];

fn build_instance(
    name: &str,
    num_vehicles: usize,
    capacity: i64,
    demand: Vec<i64>,
    edges: &[(usize, usize, f64, f64)],
) -> Result<Instance, InstanceError> {
    let mut matrices = TravelMatricesBuilder::new(demand.len() + 1);
    for &(from, to, distance, time) in edges {
        matrices.add_symmetric_edge(from, to, distance, time)?;
    }

    let mut builder = InstanceBuilder::default();
    builder
        .set_name(name)
        .set_num_vehicles(num_vehicles)
        .set_capacity(capacity)
        .set_demand(demand)
        .set_travel_matrices(matrices.build())
        .set_start_time(START_TIME)
        .set_latest_delivery_time(LATEST_DELIVERY_TIME)
        .set_costs(DEFAULT_COSTS);

    builder.build()
}

impl Instance {
    /// Built-in instances by name.
    pub fn from_id(id: &str) -> Result<Instance, InstanceError> {
        match id {
            "toy" => build_instance("toy", 3, 9, vec![5, 5, 5], &TOY_EDGES),
            "mopta" => build_instance(
                "mopta",
                8,
                360,
                vec![156, 131, 112, 116, 162, 151, 102, 183, 195, 128],
                &MOPTA_EDGES,
            ),
            _ => Err(InstanceError::UnknownInstance(id.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_instance_is_rejected() {
        assert_eq!(
            Instance::from_id("nowhere").err(),
            Some(InstanceError::UnknownInstance(String::from("nowhere")))
        );
    }

    #[test]
    fn test_toy_instance() {
        let toy = Instance::from_id("toy").unwrap();

        assert_eq!(toy.num_vehicles(), 3);
        assert_eq!(toy.capacity(), 9);
        assert_eq!(toy.travel_distance(2, 1), 12.0);
        assert!(toy.matrices().is_symmetric());
    }

    #[test]
    fn test_mopta_instance() {
        let mopta = Instance::from_id("mopta").unwrap();

        assert_eq!(mopta.num_customers(), 10);
        assert_eq!(mopta.num_steps(), 12);
        assert_eq!(mopta.total_demand(), 1436);
        assert_eq!(mopta.fleet_lower_bound(), 4);
        assert!(!mopta.is_traversable(0, 4));
        assert!(mopta.is_traversable(4, 10));
        assert_eq!(mopta.travel_time(10, 8), 8.01);
        assert_eq!(mopta.matrices().num_edges(), 62);
    }
}
