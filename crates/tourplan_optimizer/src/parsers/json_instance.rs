use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::problem::{
    instance::{CostCoefficients, Instance, InstanceBuilder},
    travel_matrices::TravelMatricesBuilder,
};

use super::parser::InstanceParser;

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonInstance {
    pub name: Option<String>,
    pub num_vehicles: usize,
    pub capacity: i64,
    pub demand: Vec<i64>,
    pub start_time: f64,
    pub latest_delivery_time: f64,
    pub costs: CostCoefficients,
    pub edges: Vec<JsonEdge>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonEdge {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
    pub time: f64,
    #[serde(default)]
    pub symmetric: bool,
}

impl JsonInstance {
    pub fn into_instance(self, fallback_name: &str) -> Result<Instance, anyhow::Error> {
        let mut matrices = TravelMatricesBuilder::new(self.demand.len() + 1);
        for edge in &self.edges {
            if edge.symmetric {
                matrices.add_symmetric_edge(edge.from, edge.to, edge.distance, edge.time)?;
            } else {
                matrices.add_edge(edge.from, edge.to, edge.distance, edge.time)?;
            }
        }

        let mut builder = InstanceBuilder::default();
        builder
            .set_name(self.name.unwrap_or_else(|| fallback_name.to_owned()))
            .set_num_vehicles(self.num_vehicles)
            .set_capacity(self.capacity)
            .set_demand(self.demand)
            .set_travel_matrices(matrices.build())
            .set_start_time(self.start_time)
            .set_latest_delivery_time(self.latest_delivery_time)
            .set_costs(self.costs);

        Ok(builder.build()?)
    }
}

pub struct JsonInstanceParser;

impl InstanceParser for JsonInstanceParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<Instance, anyhow::Error> {
        let path = file.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read instance file {}", path.display()))?;
        let json: JsonInstance = serde_json::from_str(&content)
            .with_context(|| format!("Invalid instance file {}", path.display()))?;

        let fallback_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("instance");

        json.into_instance(fallback_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CUSTOMERS: &str = r#"{
        "num_vehicles": 2,
        "capacity": 10,
        "demand": [4, 6],
        "start_time": 300,
        "latest_delivery_time": 481,
        "costs": { "per_mile": 2, "per_hour": 15, "late_item": 10, "fixed": 300 },
        "edges": [
            { "from": 0, "to": 1, "distance": 3, "time": 5, "symmetric": true },
            { "from": 1, "to": 2, "distance": 0, "time": 2 },
            { "from": 2, "to": 0, "distance": 4, "time": 6 }
        ]
    }"#;

    #[test]
    fn test_json_instance() {
        let json: JsonInstance = serde_json::from_str(TWO_CUSTOMERS).unwrap();
        let instance = json.into_instance("two").unwrap();

        assert_eq!(instance.name(), "two");
        assert_eq!(instance.num_customers(), 2);
        assert_eq!(instance.fleet_lower_bound(), 1);
        assert!(instance.is_traversable(1, 0));
        assert!(instance.is_traversable(1, 2));
        assert!(!instance.is_traversable(2, 1));
        assert_eq!(instance.travel_distance(1, 2), 0.0);
        assert_eq!(instance.costs().fixed, 300.0);
    }

    #[test]
    fn test_json_instance_rejects_unknown_location() {
        let mut json: JsonInstance = serde_json::from_str(TWO_CUSTOMERS).unwrap();
        json.edges[0].to = 7;

        assert!(json.into_instance("two").is_err());
    }
}
