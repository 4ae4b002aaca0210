pub mod json_instance;
pub mod parser;
