use fxhash::FxHashSet;
use tourplan_optimizer::tours::{
    covered_set::CoveredSet, tour::Tour, tour_catalog_builder::TourCatalogBuilder,
};

mod test_utils;

#[test]
fn test_covered_sets_are_unique() {
    let instance = test_utils::toy_instance();
    let catalog = TourCatalogBuilder::new(&instance).build().unwrap();

    let covered = catalog
        .iter()
        .map(|(_, entry)| entry.tour.covered_set())
        .collect::<FxHashSet<_>>();

    assert_eq!(covered.len(), catalog.len());
    for (key, entry) in catalog.iter() {
        assert_eq!(key, &entry.tour.covered_set());
    }
}

#[test]
fn test_costs_follow_the_edges() {
    let instance = test_utils::toy_instance();
    let catalog = TourCatalogBuilder::new(&instance).build().unwrap();

    for (_, entry) in catalog.iter() {
        assert!(entry.tour.is_valid(&instance));

        let cost = entry
            .tour
            .legs()
            .map(|(from, to)| instance.travel_distance(from, to))
            .sum::<f64>();
        assert_eq!(entry.cost, cost);
    }
}

#[test]
fn test_keeps_first_of_equally_cheap_tours() {
    let instance = test_utils::toy_instance();
    let catalog = TourCatalogBuilder::new(&instance).build().unwrap();

    let pair = catalog.get(&CoveredSet::new([1, 2])).unwrap();
    assert_eq!(pair.tour, Tour::new(vec![0, 1, 2, 0, 0]));
    assert_eq!(pair.cost, 42.0);
    assert_eq!(Tour::new(vec![0, 2, 1, 0, 0]).cost(&instance), 42.0);

    let pair = catalog.get(&CoveredSet::new([2, 3])).unwrap();
    assert_eq!(pair.tour, Tour::new(vec![0, 2, 3, 0, 0]));
}

#[test]
fn test_strictly_cheaper_tour_replaces_earlier_one() {
    let instance = test_utils::asymmetric_instance();
    let catalog = TourCatalogBuilder::new(&instance).build().unwrap();

    assert_eq!(catalog.len(), 4);

    let pair = catalog.get(&CoveredSet::new([1, 2])).unwrap();
    assert_eq!(pair.tour, Tour::new(vec![0, 2, 1, 0]));
    assert_eq!(pair.cost, 3.0);

    let single = catalog.get(&CoveredSet::new([1])).unwrap();
    assert_eq!(single.tour, Tour::new(vec![0, 1, 0, 0]));
    assert_eq!(single.cost, 11.0);
}
