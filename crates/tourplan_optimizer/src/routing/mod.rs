pub mod construction;
pub mod objective;
pub mod routing_model;
pub mod routing_params;
pub mod solution;
