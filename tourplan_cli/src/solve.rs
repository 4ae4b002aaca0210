use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tourplan_engine::{SearchParams, VariableSelection};
use tourplan_optimizer::{
    problem::instance::Instance,
    report::SolutionReport,
    routing::{
        objective::ObjectiveMode,
        routing_model::{RoutingModel, RoutingOutcome},
        routing_params::RoutingParams,
    },
    tours::{tour_catalog_builder::TourCatalogBuilder, tour_file, tour_table::TourTable},
};
use tracing::{debug, info, warn};

use crate::{instances, parsers, report_table};

#[derive(Args)]
pub struct SolveArgs {
    /// Built-in instance (toy, mopta) or a JSON instance file
    #[arg(short, long)]
    instance: String,

    /// Tour file, defaults to data/<instance>_tours.txt
    #[arg(long)]
    tours: Option<PathBuf>,

    /// Builds the tour catalog and writes it to the tour file before solving
    #[arg(long)]
    build_tours: bool,

    #[arg(long)]
    symmetry_breaking: bool,

    /// minimize-fleet, feasibility-only or fixed-fleet:N
    #[arg(short, long, default_value = "minimize-fleet")]
    objective: ObjectiveMode,

    /// Stops the search after this long (e.g., "30s", "5m", "PT1H30M")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Branches on the smallest domain first
    #[arg(long)]
    first_fail: bool,

    /// Prints the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SolveArgs) -> Result<(), anyhow::Error> {
    let instance = instances::load_instance(&args.instance)?;
    let tours_path = args
        .tours
        .unwrap_or_else(|| instances::default_tours_path(&instance));

    let tours = if args.build_tours {
        let table = TourCatalogBuilder::new(&instance).build()?.tour_table();
        tour_file::write(&tours_path, &table)?;
        info!(tours = table.len(), path = %tours_path.display(), "Wrote tour catalog");
        table
    } else {
        tour_file::read(&tours_path).with_context(|| {
            format!(
                "Cannot solve without a tour catalog, build one with `tourplan tours --instance {} --out {}` or pass --build-tours",
                args.instance,
                tours_path.display()
            )
        })?
    };

    let mut search = SearchParams {
        variable_selection: if args.first_fail {
            VariableSelection::FirstFail
        } else {
            VariableSelection::InputOrder
        },
        ..SearchParams::default()
    };
    if let Some(timeout) = args.timeout {
        search = search.with_timeout(timeout);
    }

    let params = RoutingParams {
        symmetry_breaking: args.symmetry_breaking,
        objective: args.objective,
        search,
    };

    solve(&instance, &tours, params, args.json)
}

fn solve(
    instance: &Instance,
    tours: &TourTable,
    params: RoutingParams,
    json: bool,
) -> Result<(), anyhow::Error> {
    let objective = params.objective;
    let timeout = params.search.timeout();
    let start = jiff::Timestamp::now();
    let model = RoutingModel::build(instance, tours, params)?;
    info!(
        variables = model.num_vars(),
        constraints = model.num_constraints(),
        tours = tours.len(),
        %objective,
        ?timeout,
        "Solving"
    );

    let outcome = model.solve()?;
    let elapsed = jiff::Timestamp::now().duration_since(start);

    match outcome {
        RoutingOutcome::Solved {
            solution,
            proven_optimal,
        } => {
            match solution.check(instance) {
                Ok(()) => debug!("Solution passed its consistency checks"),
                Err(error) => warn!(%error, "Solution failed its consistency checks"),
            }

            info!(
                vehicles = solution.num_used_vehicles,
                total_cost = solution.total_cost,
                proven_optimal,
                "Solved in {elapsed:?}"
            );

            let report = SolutionReport::new(instance, &solution);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report_table::totals_table(&report));
                println!("{}", report_table::routes_table(&report));
            }
        }
        RoutingOutcome::Infeasible => {
            info!("No assignment satisfies the constraints, the instance is infeasible ({elapsed:?})");
        }
        RoutingOutcome::Unknown => {
            warn!("Search stopped before finding a solution ({elapsed:?})");
        }
    }

    Ok(())
}
