use std::path::PathBuf;

use clap::Args;
use tourplan_optimizer::tours::{tour_catalog_builder::TourCatalogBuilder, tour_file};
use tracing::info;

use crate::{instances, report_table};

#[derive(Args)]
pub struct ToursArgs {
    /// Built-in instance (toy, mopta) or a JSON instance file
    #[arg(short, long)]
    instance: String,

    /// Output tour file, defaults to data/<instance>_tours.txt
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub fn run(args: ToursArgs) -> Result<(), anyhow::Error> {
    let instance = instances::load_instance(&args.instance)?;
    let out = args
        .out
        .unwrap_or_else(|| instances::default_tours_path(&instance));

    let catalog = TourCatalogBuilder::new(&instance).build()?;
    let table = catalog.tour_table();
    tour_file::write(&out, &table)?;

    info!(tours = table.len(), path = %out.display(), "Wrote tour catalog");
    println!("{}", report_table::catalog_table(&catalog));

    Ok(())
}
