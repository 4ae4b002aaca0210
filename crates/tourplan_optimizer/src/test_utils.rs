use crate::problem::{
    instance::{CostCoefficients, Instance, InstanceBuilder},
    travel_matrices::TravelMatricesBuilder,
};

pub const TEST_COSTS: CostCoefficients = CostCoefficients {
    per_mile: 2.0,
    per_hour: 15.0,
    late_item: 10.0,
    fixed: 300.0,
};

pub fn toy_instance() -> Instance {
    Instance::from_id("toy").unwrap()
}

/// Builds an instance from directed `(from, to, distance)` edges, with the
/// travel time equal to the distance.
pub fn create_test_instance(
    num_vehicles: usize,
    capacity: i64,
    demand: Vec<i64>,
    edges: &[(usize, usize, f64)],
) -> Instance {
    let mut matrices = TravelMatricesBuilder::new(demand.len() + 1);
    for &(from, to, distance) in edges {
        matrices.add_edge(from, to, distance, distance).unwrap();
    }

    let mut builder = InstanceBuilder::default();
    builder
        .set_name("test")
        .set_num_vehicles(num_vehicles)
        .set_capacity(capacity)
        .set_demand(demand)
        .set_travel_matrices(matrices.build())
        .set_start_time(300.0)
        .set_latest_delivery_time(481.0)
        .set_costs(TEST_COSTS);

    builder.build().unwrap()
}

/// Two customers, `0 -> 2` and `2 -> 1` are missing.
pub fn sparse_instance() -> Instance {
    create_test_instance(
        2,
        10,
        vec![3, 4],
        &[(0, 1, 3.0), (1, 2, 4.0), (2, 0, 5.0), (1, 0, 10.0)],
    )
}
