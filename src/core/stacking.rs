//! Per-key cumulative offsets across several datasets.
//!
//! Positive and negative values stack independently: for every key there is
//! one running total per sign, and a value of exactly zero counts as
//! positive.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::dataset::Dataset;
use crate::core::providers::ExtentProvider;
use crate::core::types::DatasetId;
use crate::error::{ChartError, ChartResult};

/// Direction in which datasets are piled onto the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackingOrder {
    /// The first dataset sits on the baseline.
    #[default]
    BottomUp,
    /// The first dataset ends up furthest from the baseline, matching
    /// legend order.
    TopDown,
}

impl StackingOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BottomUp => "bottomup",
            Self::TopDown => "topdown",
        }
    }
}

impl fmt::Display for StackingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StackingOrder {
    type Err = ChartError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "bottomup" => Ok(Self::BottomUp),
            "topdown" => Ok(Self::TopDown),
            other => Err(ChartError::UnsupportedStackingOrder(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedDatum<K> {
    pub value: f64,
    pub offset: f64,
    pub axis_value: K,
}

/// Dataset -> normalized key -> stacked datum, in processing order.
#[derive(Debug, Clone, PartialEq)]
pub struct StackingResult<K> {
    stacks: IndexMap<DatasetId, IndexMap<String, StackedDatum<K>>>,
}

impl<K> Default for StackingResult<K> {
    fn default() -> Self {
        Self {
            stacks: IndexMap::new(),
        }
    }
}

impl<K> StackingResult<K> {
    #[must_use]
    pub fn get(&self, dataset: DatasetId, key: &str) -> Option<&StackedDatum<K>> {
        self.stacks.get(&dataset)?.get(key)
    }

    #[must_use]
    pub fn dataset(&self, dataset: DatasetId) -> Option<&IndexMap<String, StackedDatum<K>>> {
        self.stacks.get(&dataset)
    }

    /// Datasets in the order they were stacked.
    pub fn iter(&self) -> impl Iterator<Item = (DatasetId, &IndexMap<String, StackedDatum<K>>)> {
        self.stacks.iter().map(|(id, stack)| (*id, stack))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackExtent<K> {
    pub extent: f64,
    pub axis_value: K,
}

/// Per-key extremes of every stack, used e.g. for stacked-bar total labels.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedExtents<K> {
    pub maximum_extents: IndexMap<String, StackExtent<K>>,
    pub minimum_extents: IndexMap<String, StackExtent<K>>,
}

#[must_use]
pub fn normalize_key<K: fmt::Display + ?Sized>(key: &K) -> String {
    key.to_string()
}

/// Computes value and offset for each datum of each dataset.
///
/// Items keep their order inside a dataset; only the dataset list
/// is reversed for [`StackingOrder::TopDown`]. A key repeated within one
/// dataset advances the running total twice but only the last entry is kept.
pub fn stack<T, K, KA, VA>(
    datasets: &[&Dataset<T>],
    key_accessor: KA,
    value_accessor: VA,
    order: StackingOrder,
) -> StackingResult<K>
where
    K: fmt::Display,
    KA: Fn(&T, usize, &Dataset<T>) -> K,
    VA: Fn(&T, usize, &Dataset<T>) -> f64,
{
    let mut ordered: Vec<&Dataset<T>> = datasets.to_vec();
    if order == StackingOrder::TopDown {
        ordered.reverse();
    }

    let mut positive_totals: HashMap<String, f64> = HashMap::new();
    let mut negative_totals: HashMap<String, f64> = HashMap::new();
    let mut stacks = IndexMap::with_capacity(ordered.len());

    for dataset in ordered {
        let mut stack = IndexMap::with_capacity(dataset.len());
        for (index, datum) in dataset.data().iter().enumerate() {
            let axis_value = key_accessor(datum, index, dataset);
            let key = normalize_key(&axis_value);
            let value = value_accessor(datum, index, dataset);
            let totals = if value >= 0.0 {
                &mut positive_totals
            } else {
                &mut negative_totals
            };
            let running = totals.entry(key.clone()).or_insert(0.0);
            let offset = *running;
            *running = offset + value;
            stack.insert(
                key,
                StackedDatum {
                    value,
                    offset,
                    axis_value,
                },
            );
        }
        stacks.insert(dataset.id(), stack);
    }

    trace!(datasets = stacks.len(), %order, "stacked datasets");
    StackingResult { stacks }
}

/// Total `[min, max]` over every stacked datum, always including zero.
///
/// `filter` drops data points from the computation without affecting the
/// offsets already recorded in `result`.
pub fn stacked_extent<T, K, KA>(
    result: &StackingResult<K>,
    datasets: &[&Dataset<T>],
    key_accessor: KA,
    filter: Option<&dyn Fn(&T, usize, &Dataset<T>) -> bool>,
) -> (f64, f64)
where
    K: fmt::Display,
    KA: Fn(&T, usize, &Dataset<T>) -> K,
{
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;
    for dataset in datasets {
        let Some(stack) = result.dataset(dataset.id()) else {
            continue;
        };
        for (index, datum) in dataset.data().iter().enumerate() {
            if filter.is_some_and(|keep| !keep(datum, index, dataset)) {
                continue;
            }
            let key = normalize_key(&key_accessor(datum, index, dataset));
            let Some(stacked) = stack.get(&key) else {
                continue;
            };
            for edge in [stacked.offset + stacked.value, stacked.offset] {
                if edge.is_finite() {
                    min = min.min(edge);
                    max = max.max(edge);
                }
            }
        }
    }
    (min, max)
}

/// Maximum and minimum extent of each individual stack, tagged with the
/// axis value that produced it.
#[must_use]
pub fn stacked_extents<K: Clone>(result: &StackingResult<K>) -> StackedExtents<K> {
    let mut maximum_extents: IndexMap<String, StackExtent<K>> = IndexMap::new();
    let mut minimum_extents: IndexMap<String, StackExtent<K>> = IndexMap::new();

    for (_, stack) in result.iter() {
        for (key, datum) in stack {
            let top = datum.offset + datum.value;
            let maximal = top.max(datum.offset);
            let minimal = top.min(datum.offset);

            let replace_max = maximum_extents
                .get(key)
                .is_none_or(|current| current.extent < maximal);
            if replace_max {
                maximum_extents.insert(
                    key.clone(),
                    StackExtent {
                        extent: maximal,
                        axis_value: datum.axis_value.clone(),
                    },
                );
            }

            let replace_min = minimum_extents
                .get(key)
                .is_none_or(|current| current.extent > minimal);
            if replace_min {
                minimum_extents.insert(
                    key.clone(),
                    StackExtent {
                        extent: minimal,
                        axis_value: datum.axis_value.clone(),
                    },
                );
            }
        }
    }

    StackedExtents {
        maximum_extents,
        minimum_extents,
    }
}

/// Last stacking computation of a stacked plot, kept so scales can read its
/// extent through a provider.
#[derive(Debug, Clone)]
pub struct StackLayout<K> {
    order: StackingOrder,
    result: StackingResult<K>,
    extent: (f64, f64),
}

impl<K> Default for StackLayout<K> {
    fn default() -> Self {
        Self::new(StackingOrder::default())
    }
}

impl<K> StackLayout<K> {
    #[must_use]
    pub fn new(order: StackingOrder) -> Self {
        Self {
            order,
            result: StackingResult::default(),
            extent: (0.0, 0.0),
        }
    }

    #[must_use]
    pub fn order(&self) -> StackingOrder {
        self.order
    }

    /// Changes the order; takes effect on the next [`StackLayout::recompute`].
    pub fn set_order(&mut self, order: StackingOrder) {
        self.order = order;
    }

    /// Parses and applies a stacking-order token (`"bottomup"` / `"topdown"`).
    pub fn set_order_token(&mut self, token: &str) -> ChartResult<()> {
        self.order = token.parse()?;
        Ok(())
    }

    #[must_use]
    pub fn result(&self) -> &StackingResult<K> {
        &self.result
    }

    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        self.extent
    }

    /// Recomputes offsets and extent from scratch.
    pub fn recompute<T, KA, VA>(
        &mut self,
        datasets: &[&Dataset<T>],
        key_accessor: KA,
        value_accessor: VA,
        filter: Option<&dyn Fn(&T, usize, &Dataset<T>) -> bool>,
    ) where
        K: fmt::Display,
        KA: Fn(&T, usize, &Dataset<T>) -> K,
        VA: Fn(&T, usize, &Dataset<T>) -> f64,
    {
        self.result = stack(datasets, &key_accessor, value_accessor, self.order);
        self.extent = stacked_extent(&self.result, datasets, &key_accessor, filter);
        debug!(
            min = self.extent.0,
            max = self.extent.1,
            order = %self.order,
            "recomputed stacked extent"
        );
    }
}

/// Included-values provider reporting a layout's stacked extent.
///
/// Reports nothing once the layout is dropped or while it is being
/// recomputed.
pub fn stacked_extent_provider<K: 'static>(
    layout: &Rc<RefCell<StackLayout<K>>>,
) -> impl ExtentProvider<f64> + 'static {
    let layout: Weak<RefCell<StackLayout<K>>> = Rc::downgrade(layout);
    move || {
        let Some(layout) = layout.upgrade() else {
            return Vec::new();
        };
        match layout.try_borrow() {
            Ok(layout) => {
                let (min, max) = layout.extent();
                vec![min, max]
            }
            Err(_) => {
                trace!("stack layout busy, contributing no values");
                Vec::new()
            }
        }
    }
}

/// Zero baseline, registered both as included value and padding exception
/// so stacks start exactly at the axis.
#[must_use]
pub fn baseline_provider() -> impl ExtentProvider<f64> + 'static {
    || vec![0.0]
}
