//! Nearest-point and containment lookups over plotted data.
//!
//! Positions are captured when entities are added. Moving data, scales or
//! layout invalidates the index; callers rebuild it, nothing here tracks
//! staleness.

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::core::dataset::Dataset;
use crate::core::projector::pixel_point;
use crate::core::types::{Bounds, DatasetId, Point};

/// Anything with a pixel position that can be hit-tested.
pub trait Positioned {
    fn position(&self) -> Point;
}

/// One plotted datum together with where it was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotEntity<T> {
    pub datum: T,
    pub dataset: DatasetId,
    pub index: usize,
    pub position: Point,
}

impl<T> Positioned for PlotEntity<T> {
    fn position(&self) -> Point {
        self.position
    }
}

impl Positioned for Point {
    fn position(&self) -> Point {
        *self
    }
}

/// Snapshots every datum of `datasets` at its current pixel position.
///
/// Data that either projector cannot place (or places at a non-finite
/// pixel) is left out.
pub fn build_entities<T, X, Y>(datasets: &[&Dataset<T>], x: X, y: Y) -> Vec<PlotEntity<T>>
where
    T: Clone,
    X: Fn(&T, usize, &Dataset<T>) -> Option<f64>,
    Y: Fn(&T, usize, &Dataset<T>) -> Option<f64>,
{
    let mut entities = Vec::with_capacity(datasets.iter().map(|dataset| dataset.len()).sum());
    for dataset in datasets {
        for (index, datum) in dataset.data().iter().enumerate() {
            let Some(position) = pixel_point(&x, &y, datum, index, dataset) else {
                continue;
            };
            entities.push(PlotEntity {
                datum: datum.clone(),
                dataset: dataset.id(),
                index,
                position,
            });
        }
    }
    entities
}

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Entity store with an R-tree over the entities that were inside the
/// bounds given when they were added.
#[derive(Debug)]
pub struct EntityIndex<E> {
    entities: Vec<E>,
    tree: RTree<IndexedPoint>,
}

impl<E> Default for EntityIndex<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            tree: RTree::new(),
        }
    }
}

impl<E: Positioned> EntityIndex<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entities`. With `bounds`, only entities positioned inside
    /// them (edges included) become visible to [`EntityIndex::entity_nearest`];
    /// all of them stay in [`EntityIndex::entities`].
    pub fn add_all<I>(&mut self, entities: I, bounds: Option<Bounds>)
    where
        I: IntoIterator<Item = E>,
    {
        let mut indexed = Vec::new();
        for entity in entities {
            let position = entity.position();
            let visible = position.is_finite() && bounds.is_none_or(|b| b.contains(position));
            if visible {
                indexed.push(GeomWithData::new(
                    [position.x, position.y],
                    self.entities.len(),
                ));
            }
            self.entities.push(entity);
        }

        if self.tree.size() == 0 {
            self.tree = RTree::bulk_load(indexed);
        } else {
            for point in indexed {
                self.tree.insert(point);
            }
        }
    }

    /// Indexed entity with the smallest Euclidean distance to `point`.
    #[must_use]
    pub fn entity_nearest(&self, point: Point) -> Option<&E> {
        let nearest = self.tree.nearest_neighbor(&[point.x, point.y])?;
        self.entities.get(nearest.data)
    }

    /// Every entity ever added, in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    /// Indexed entities inside `bounds` (edges included), in insertion order.
    #[must_use]
    pub fn entities_in(&self, bounds: Bounds) -> Vec<&E> {
        let envelope = AABB::from_corners(
            [bounds.top_left.x, bounds.top_left.y],
            [bounds.bottom_right.x, bounds.bottom_right.y],
        );
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|point| point.data)
            .collect();
        hits.sort_unstable();
        hits.into_iter()
            .filter_map(|index| self.entities.get(index))
            .collect()
    }

    /// Number of entities, indexed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn indexed_len(&self) -> usize {
        self.tree.size()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.tree = RTree::new();
    }
}
