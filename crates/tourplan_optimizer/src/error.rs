use std::path::PathBuf;

use thiserror::Error;
use tourplan_engine::EngineError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstanceError {
    #[error("Unknown instance '{0}', expected one of: toy, mopta")]
    UnknownInstance(String),
    #[error("Instance has no vehicles")]
    NoVehicles,
    #[error("Vehicle capacity must be positive")]
    NoCapacity,
    #[error("Expected {expected} demand values, found {found}")]
    DemandLength { expected: usize, found: usize },
    #[error("Customer {customer} has a negative demand")]
    NegativeDemand { customer: usize },
    #[error("Travel matrices cover {found} locations, expected {expected}")]
    MatrixSize { expected: usize, found: usize },
    #[error("Location {location} is outside of the {num_locations} known locations")]
    LocationOutOfRange {
        location: usize,
        num_locations: usize,
    },
    #[error("{field} is {value}, expected a minute of the day in [0, 1440)")]
    TimeOutOfDay { field: &'static str, value: f64 },
}

/// Why a tour is not a valid route of an instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TourDefect {
    #[error("has {found} steps, expected {expected}")]
    WrongLength { expected: usize, found: usize },
    #[error("visits unknown location {0}")]
    LocationOutOfRange(i64),
    #[error("does not start and end at the depot")]
    NotDepotBookended,
    #[error("leaves the depot again at step {step}")]
    DepotNotAbsorbing { step: usize },
    #[error("visits customer {0} more than once")]
    RepeatedCustomer(usize),
    #[error("uses missing edge {from} -> {to}")]
    MissingEdge { from: usize, to: usize },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to build the tour model: {0}")]
    Engine(#[from] EngineError),
    #[error("Tour enumeration stopped after {enumerated} tours, the catalog would be incomplete")]
    Incomplete { enumerated: usize },
    #[error("Tour {index} {defect}")]
    InvalidTour { index: usize, defect: TourDefect },
    #[error("Tours have {found} steps, the instance needs {expected}")]
    TourLength { expected: usize, found: usize },
    #[error("Tour table is empty, it needs at least the all-depot tour")]
    Empty,
}

#[derive(Error, Debug)]
pub enum CatalogFileError {
    #[error("Failed to access tour file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Tour file is missing its 'count length' header")]
    MissingHeader,
    #[error("Invalid header: {count} tours of length {tour_length}")]
    InvalidHeader { count: usize, tour_length: usize },
    #[error("Invalid token '{token}' at position {position}")]
    InvalidToken { token: String, position: usize },
    #[error("Tour file declares {expected} values but holds {found}")]
    Truncated { expected: usize, found: usize },
    #[error("Tour file has {extra} values after the declared tours")]
    TrailingData { extra: usize },
    #[error("Tour {tour} does not start and end at the depot")]
    NotDepotBookended { tour: usize },
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Invariant broken by an extracted solution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolutionError {
    #[error("Customer {customer} received {delivered}, expected {demand}")]
    DemandMismatch {
        customer: usize,
        delivered: i64,
        demand: i64,
    },
    #[error("Vehicle {vehicle} load does not decrease to zero")]
    LoadNotClosed { vehicle: usize },
    #[error("Vehicle {vehicle} usage flag disagrees with its route or load")]
    UsageMismatch { vehicle: usize },
    #[error("Vehicle {vehicle} arrival times leave the day or go backwards")]
    InvalidArrivals { vehicle: usize },
    #[error("Total cost {total} differs from the sum of its components {components}")]
    CostMismatch { total: f64, components: f64 },
    #[error("{used} vehicles used, expected between {lower_bound} and {num_vehicles}")]
    FleetSize {
        used: usize,
        lower_bound: usize,
        num_vehicles: usize,
    },
}
