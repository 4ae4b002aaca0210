use std::path::{Path, PathBuf};

use tourplan_optimizer::{
    parsers::{json_instance::JsonInstanceParser, parser::InstanceParser},
    problem::instance::Instance,
};
use tracing::info;

/// A `.json` path is parsed as an instance file, anything else is looked up
/// among the built-in instances.
pub fn load_instance(instance: &str) -> Result<Instance, anyhow::Error> {
    let path = Path::new(instance);
    let instance = if path.extension().is_some_and(|extension| extension == "json") {
        JsonInstanceParser.parse(path)?
    } else {
        Instance::from_id(instance)?
    };

    info!(
        instance = instance.name(),
        vehicles = instance.num_vehicles(),
        customers = instance.num_customers(),
        capacity = instance.capacity(),
        total_demand = instance.total_demand(),
        "Loaded instance"
    );

    Ok(instance)
}

pub fn default_tours_path(instance: &Instance) -> PathBuf {
    PathBuf::from("data").join(format!("{}_tours.txt", instance.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_instance() {
        let instance = load_instance("toy").unwrap();

        assert_eq!(instance.name(), "toy");
        assert_eq!(
            default_tours_path(&instance),
            PathBuf::from("data/toy_tours.txt")
        );
    }

    #[test]
    fn test_unknown_instance_is_an_error() {
        let error = load_instance("atlantis").unwrap_err();

        assert!(error.to_string().contains("atlantis"));
    }
}
