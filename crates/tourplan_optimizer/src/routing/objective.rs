use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveMode {
    /// Minimize the number of vehicles leaving the depot.
    #[default]
    MinimizeFleet,
    /// Accept the first assignment satisfying every constraint.
    FeasibilityOnly,
    /// Use exactly this many vehicles, capped at the fleet size.
    FixedFleet(usize),
}

impl fmt::Display for ObjectiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveMode::MinimizeFleet => write!(f, "minimize-fleet"),
            ObjectiveMode::FeasibilityOnly => write!(f, "feasibility-only"),
            ObjectiveMode::FixedFleet(vehicles) => write!(f, "fixed-fleet:{vehicles}"),
        }
    }
}

impl FromStr for ObjectiveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimize-fleet" => Ok(ObjectiveMode::MinimizeFleet),
            "feasibility-only" => Ok(ObjectiveMode::FeasibilityOnly),
            _ => {
                let vehicles = s
                    .strip_prefix("fixed-fleet:")
                    .ok_or_else(|| {
                        format!(
                            "Invalid objective '{s}', expected minimize-fleet, feasibility-only or fixed-fleet:N"
                        )
                    })?;
                vehicles
                    .parse()
                    .map(ObjectiveMode::FixedFleet)
                    .map_err(|_| format!("Invalid number of vehicles '{vehicles}'"))
            }
        }
    }
}
