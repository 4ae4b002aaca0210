use std::path::Path;

use crate::problem::instance::Instance;

pub trait InstanceParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<Instance, anyhow::Error>;
}
