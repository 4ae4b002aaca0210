pub mod instance;
pub mod instance_registry;
pub mod travel_matrices;
