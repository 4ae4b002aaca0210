#![allow(dead_code)]

use tourplan_optimizer::problem::{
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

/// Every leg of the `0 -> 1 -> 2 -> 0` cycle costs 10, the reverse cycle costs 1 per leg.
pub fn asymmetric_instance() -> Instance {
    create_test_instance(
        2,
        10,
        vec![3, 4],
        &[
            (0, 1, 10.0),
            (1, 2, 10.0),
            (2, 0, 10.0),
            (0, 2, 1.0),
            (2, 1, 1.0),
            (1, 0, 1.0),
        ],
    )
}

/// Toy graph with two vehicles of capacity 5: 15 units cannot fit in 10.
pub fn overloaded_instance() -> Instance {
    create_test_instance(
        2,
        5,
        vec![5, 5, 5],
        &[
            (0, 1, 10.0),
            (1, 0, 10.0),
            (0, 2, 20.0),
            (2, 0, 20.0),
            (0, 3, 30.0),
            (3, 0, 30.0),
            (1, 2, 12.0),
            (2, 1, 12.0),
            (1, 3, 13.0),
            (3, 1, 13.0),
            (2, 3, 23.0),
            (3, 2, 23.0),
        ],
    )
}

/// One customer half an hour away, with the delivery deadline at the start of the day.
pub fn always_late_instance() -> Instance {
    late_instance(300.0)
}

/// One customer reached at minute 330.
pub fn late_instance(latest_delivery_time: f64) -> Instance {
    let mut matrices = TravelMatricesBuilder::new(2);
    matrices.add_symmetric_edge(0, 1, 5.0, 30.0).unwrap();

    let mut builder = InstanceBuilder::default();
    builder
        .set_name("late")
        .set_num_vehicles(1)
        .set_capacity(10)
        .set_demand(vec![4])
        .set_travel_matrices(matrices.build())
        .set_start_time(300.0)
        .set_latest_delivery_time(latest_delivery_time)
        .set_costs(TEST_COSTS);

    builder.build().unwrap()
}
