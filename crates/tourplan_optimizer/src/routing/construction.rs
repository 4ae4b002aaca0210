use fxhash::FxHashMap;
use tracing::{Level, debug, instrument};

use crate::{
    problem::instance::{DEPOT, Instance, MINUTES_PER_DAY},
    tours::{covered_set::CoveredSet, tour_table::TourTable},
};

const MAX_NODES: usize = 100_000;

/// Stops and loads of one vehicle in a constructed routing.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialRoute {
    pub stops: Vec<usize>,
    /// Load left after every step but the last.
    pub loads: Vec<i64>,
}

impl InitialRoute {
    pub fn is_used(&self) -> bool {
        self.stops.get(1).is_some_and(|&stop| stop != DEPOT)
    }
}

/// `(customer, amount)` dropped by one vehicle, in the order they were assigned.
type Deliveries = Vec<(usize, i64)>;

#[derive(Clone)]
struct Partial {
    closed: Vec<Deliveries>,
    open: Deliveries,
    room: i64,
    placed: Vec<bool>,
}

struct Construction<'a> {
    instance: &'a Instance,
    max_vehicles: usize,
    rows: FxHashMap<CoveredSet, Vec<usize>>,
    extendable: FxHashMap<CoveredSet, bool>,
    nodes: usize,
}

/// Builds a routing of the whole demand over the rows of `tours` with at most
/// `max_vehicles` vehicles.
///
/// Customers are loaded one after the other; a customer that does not fit in
/// the remaining room fills the vehicle and the rest of its demand starts the
/// next one. Customer orders are explored depth first until every vehicle
/// drives one of the rows. Returns one route per vehicle of the instance, used
/// vehicles first and sorted by decreasing first stop.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn construct_routes(
    instance: &Instance,
    tours: &TourTable,
    max_vehicles: usize,
) -> Option<Vec<InitialRoute>> {
    let mut construction = Construction::new(instance, tours, max_vehicles);

    let root = Partial {
        closed: Vec::new(),
        open: Vec::new(),
        room: instance.capacity(),
        placed: instance
            .customers()
            .map(|customer| instance.demand_of(customer) == 0)
            .collect(),
    };

    let deliveries = construction.extend(&root);
    debug!(
        nodes = construction.nodes,
        found = deliveries.is_some(),
        "Constructed initial routes"
    );

    let mut routes = deliveries?
        .iter()
        .map(|vehicle| construction.route(vehicle))
        .collect::<Option<Vec<_>>>()?;
    routes.sort_by(|first, second| second.stops[1].cmp(&first.stops[1]));

    let num_steps = instance.num_steps();
    routes.resize(
        instance.num_vehicles(),
        InitialRoute {
            stops: vec![DEPOT; num_steps],
            loads: vec![0; num_steps - 1],
        },
    );

    Some(routes)
}

impl<'a> Construction<'a> {
    fn new(instance: &'a Instance, tours: &TourTable, max_vehicles: usize) -> Self {
        let mut rows = FxHashMap::default();
        for tuple in tours.tuples().iter() {
            let Ok(stops) = tuple
                .iter()
                .map(|&stop| usize::try_from(stop))
                .collect::<Result<Vec<_>, _>>()
            else {
                continue;
            };

            if stops.len() == instance.num_steps() && ends_within_day(instance, &stops) {
                rows.entry(CoveredSet::new(stops.iter().copied()))
                    .or_insert(stops);
            }
        }

        Construction {
            instance,
            max_vehicles: max_vehicles.min(instance.num_vehicles()),
            rows,
            extendable: FxHashMap::default(),
            nodes: 0,
        }
    }

    fn extend(&mut self, partial: &Partial) -> Option<Vec<Deliveries>> {
        if self.nodes >= MAX_NODES {
            return None;
        }
        self.nodes += 1;

        if partial.placed.iter().all(|&placed| placed) {
            return self.finish(partial);
        }

        for customer in self.instance.customers() {
            if partial.placed[customer - 1] {
                continue;
            }

            let found = self
                .place(partial, customer)
                .and_then(|next| self.extend(&next));
            if found.is_some() {
                return found;
            }
        }

        None
    }

    fn place(&mut self, partial: &Partial, customer: usize) -> Option<Partial> {
        let mut next = partial.clone();
        next.placed[customer - 1] = true;
        let mut left = self.instance.demand_of(customer);

        loop {
            if next.closed.len() >= self.max_vehicles {
                return None;
            }

            let set = covered(&next.open, customer);
            if !self.is_extendable(&set) {
                return None;
            }

            if left < next.room {
                next.open.push((customer, left));
                next.room -= left;
                return Some(next);
            }

            // full vehicle, it has to drive exactly one of the rows
            if !self.rows.contains_key(&set) {
                return None;
            }
            next.open.push((customer, next.room));
            left -= next.room;
            next.closed.push(std::mem::take(&mut next.open));
            next.room = self.instance.capacity();

            if left == 0 {
                return Some(next);
            }
        }
    }

    fn finish(&self, partial: &Partial) -> Option<Vec<Deliveries>> {
        let mut vehicles = partial.closed.clone();
        if !partial.open.is_empty() {
            if !self.rows.contains_key(&covered(&partial.open, DEPOT)) {
                return None;
            }
            vehicles.push(partial.open.clone());
        }

        let loaded = vehicles.iter().all(|vehicle| {
            vehicle.iter().map(|&(_, amount)| amount).sum::<i64>() > 1
        });
        (loaded && vehicles.len() <= self.max_vehicles).then_some(vehicles)
    }

    fn is_extendable(&mut self, set: &CoveredSet) -> bool {
        if let Some(&extendable) = self.extendable.get(set) {
            return extendable;
        }

        let extendable = self
            .rows
            .keys()
            .any(|row| set.iter().all(|customer| row.contains(customer)));
        self.extendable.insert(set.clone(), extendable);
        extendable
    }

    fn route(&self, deliveries: &Deliveries) -> Option<InitialRoute> {
        let stops = self.rows.get(&covered(deliveries, DEPOT))?.clone();
        let dropped = |stop: usize| {
            deliveries
                .iter()
                .filter(|&&(customer, _)| customer == stop)
                .map(|&(_, amount)| amount)
                .sum::<i64>()
        };

        let mut load = deliveries.iter().map(|&(_, amount)| amount).sum::<i64>();
        let mut loads = vec![load];
        for &stop in &stops[1..stops.len() - 1] {
            load -= dropped(stop);
            loads.push(load);
        }

        Some(InitialRoute { stops, loads })
    }
}

fn covered(deliveries: &Deliveries, customer: usize) -> CoveredSet {
    CoveredSet::new(
        deliveries
            .iter()
            .map(|&(delivered, _)| delivered)
            .chain([customer]),
    )
}

fn ends_within_day(instance: &Instance, stops: &[usize]) -> bool {
    let mut arrival = instance.start_time();
    stops.windows(2).all(|leg| {
        arrival += instance.travel_time(leg[0], leg[1]);
        arrival < MINUTES_PER_DAY
    })
}

#[cfg(test)]
mod tests {
    use crate::{test_utils, tours::tour_catalog_builder::TourCatalogBuilder};

    use super::*;

    fn check_routes(instance: &Instance, routes: &[InitialRoute]) {
        assert_eq!(routes.len(), instance.num_vehicles());

        let mut delivered = vec![0; instance.num_customers()];
        for route in routes {
            assert_eq!(route.stops.len(), instance.num_steps());
            assert_eq!(route.loads.len(), instance.num_steps() - 1);
            assert_eq!(route.loads.last(), Some(&0));
            assert!(route.loads.windows(2).all(|pair| pair[0] >= pair[1]));
            assert!(route.loads[0] <= instance.capacity());
            assert_eq!(route.is_used(), route.loads[0] > 1);

            for (step, &stop) in route.stops[1..route.stops.len() - 1].iter().enumerate() {
                let dropped = route.loads[step] - route.loads[step + 1];
                assert_eq!(stop != DEPOT, dropped > 0);
                if stop != DEPOT {
                    delivered[stop - 1] += dropped;
                }
            }
        }

        assert_eq!(delivered, instance.demand());
        assert!(
            routes
                .windows(2)
                .all(|pair| pair[0].stops[1] >= pair[1].stops[1])
        );
    }

    #[test]
    fn test_toy_routes_use_the_minimum_fleet() {
        let instance = test_utils::toy_instance();
        let tours = TourCatalogBuilder::new(&instance).build().unwrap().tour_table();

        let routes = construct_routes(&instance, &tours, instance.num_vehicles()).unwrap();

        check_routes(&instance, &routes);
        assert_eq!(
            routes.iter().filter(|route| route.is_used()).count(),
            instance.fleet_lower_bound()
        );

        // 5 + 4 fill the first vehicle, the last unit of customer 2 rides with customer 3
        let split = routes
            .iter()
            .filter(|route| route.stops.contains(&2))
            .count();
        assert_eq!(split, 2);
    }

    #[test]
    fn test_too_few_vehicles() {
        let instance = test_utils::toy_instance();
        let tours = TourCatalogBuilder::new(&instance).build().unwrap().tour_table();

        assert_eq!(construct_routes(&instance, &tours, 1), None);
    }
}
