use std::sync::Arc;

use fixedbitset::FixedBitSet;

use crate::error::InstanceError;

pub type Distance = f64;
pub type Time = f64;

/// Distances and driving times between locations, stored flat with
/// `index = from * num_locations + to`.
///
/// Connectivity is kept in its own bitset: a pair is an edge because it was
/// added as one, not because its distance is non zero.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: Arc<Vec<Distance>>,
    times: Arc<Vec<Time>>,
    edges: FixedBitSet,
    num_locations: usize,
}

impl TravelMatrices {
    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_locations + to
    }

    #[inline(always)]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        from < self.num_locations && to < self.num_locations && self.edges[self.index(from, to)]
    }

    /// Distance of an edge, `0.0` for pairs that are not connected.
    #[inline(always)]
    pub fn travel_distance(&self, from: usize, to: usize) -> Distance {
        if !self.has_edge(from, to) {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: usize, to: usize) -> Time {
        if !self.has_edge(from, to) {
            return 0.0;
        }

        self.times[self.index(from, to)]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn num_edges(&self) -> usize {
        self.edges.count_ones(..)
    }

    /// Every `(from, to)` edge in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .ones()
            .map(|index| (index / self.num_locations, index % self.num_locations))
    }

    pub fn is_symmetric(&self) -> bool {
        self.edges().all(|(from, to)| {
            self.has_edge(to, from)
                && self.travel_distance(from, to) == self.travel_distance(to, from)
                && self.travel_time(from, to) == self.travel_time(to, from)
        })
    }

    /// Flat distance table shared with element lookups.
    pub fn distances(&self) -> &Arc<Vec<Distance>> {
        &self.distances
    }

    pub fn times(&self) -> &Arc<Vec<Time>> {
        &self.times
    }
}

pub struct TravelMatricesBuilder {
    num_locations: usize,
    distances: Vec<Distance>,
    times: Vec<Time>,
    edges: FixedBitSet,
}

impl TravelMatricesBuilder {
    pub fn new(num_locations: usize) -> Self {
        let len = num_locations * num_locations;
        TravelMatricesBuilder {
            num_locations,
            distances: vec![0.0; len],
            times: vec![0.0; len],
            edges: FixedBitSet::with_capacity(len),
        }
    }

    fn check_location(&self, location: usize) -> Result<(), InstanceError> {
        if location < self.num_locations {
            Ok(())
        } else {
            Err(InstanceError::LocationOutOfRange {
                location,
                num_locations: self.num_locations,
            })
        }
    }

    pub fn add_edge(
        &mut self,
        from: usize,
        to: usize,
        distance: Distance,
        time: Time,
    ) -> Result<&mut Self, InstanceError> {
        self.check_location(from)?;
        self.check_location(to)?;

        let index = from * self.num_locations + to;
        self.distances[index] = distance;
        self.times[index] = time;
        self.edges.insert(index);

        Ok(self)
    }

    pub fn add_symmetric_edge(
        &mut self,
        from: usize,
        to: usize,
        distance: Distance,
        time: Time,
    ) -> Result<&mut Self, InstanceError> {
        self.add_edge(from, to, distance, time)?;
        self.add_edge(to, from, distance, time)
    }

    pub fn build(self) -> TravelMatrices {
        TravelMatrices {
            distances: Arc::new(self.distances),
            times: Arc::new(self.times),
            edges: self.edges,
            num_locations: self.num_locations,
        }
    }
}
