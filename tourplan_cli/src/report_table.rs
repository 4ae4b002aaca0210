use comfy_table::Table;
use tourplan_optimizer::{report::SolutionReport, tours::tour_catalog::TourCatalog};

fn money(value: f64) -> String {
    format!("{value:.2}")
}

pub fn totals_table(report: &SolutionReport) -> Table {
    let mut table = Table::new();
    table
        .set_header(vec![
            "Vehicles used",
            "Lower bound",
            "Driving",
            "Hourly",
            "Late",
            "Fixed",
            "Total",
        ])
        .add_row(vec![
            report.num_used_vehicles.to_string(),
            report.fleet_lower_bound.to_string(),
            money(report.driving_total),
            money(report.hourly_total),
            money(report.late_total),
            money(report.fixed_total),
            money(report.total_cost),
        ]);
    table
}

/// One row per stop of every vehicle that leaves the depot.
pub fn routes_table(report: &SolutionReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Vehicle", "Step", "Location", "Arrival", "Delivered", "Cost",
    ]);

    for vehicle in report.vehicles.iter().filter(|vehicle| vehicle.is_used) {
        table.add_row(vec![
            vehicle.vehicle.to_string(),
            String::from("0"),
            String::from("0"),
            String::new(),
            format!("loads {}", vehicle.departure_load),
            format!(
                "{} (driving {}, hourly {}, late {}, fixed {})",
                money(vehicle.total_cost),
                money(vehicle.driving_cost),
                money(vehicle.hourly_cost),
                money(vehicle.late_cost),
                money(vehicle.fixed_cost)
            ),
        ]);
        for step in &vehicle.steps {
            table.add_row(vec![
                vehicle.vehicle.to_string(),
                step.step.to_string(),
                step.location.to_string(),
                step.arrival.clone(),
                step.delivered.to_string(),
                String::new(),
            ]);
        }
    }

    table
}

pub fn catalog_table(catalog: &TourCatalog) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Customers", "Tour", "Distance"]);

    for (covered, entry) in catalog.iter() {
        table.add_row(vec![
            covered.to_string(),
            entry.tour.to_string(),
            money(entry.cost),
        ]);
    }

    table
}
