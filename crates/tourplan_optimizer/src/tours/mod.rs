pub mod covered_set;
pub mod tour;
pub mod tour_catalog;
pub mod tour_catalog_builder;
pub mod tour_file;
pub mod tour_table;
