pub mod category_scale;
pub mod dataset;
pub mod deferred;
pub mod entity_index;
pub mod linear_scale;
pub mod listeners;
pub mod primitives;
pub mod projector;
pub mod providers;
pub mod quantitative_scale;
pub mod scale;
pub mod stacking;
pub mod time_scale;
pub mod transformable;
pub mod types;

pub use category_scale::CategoryScale;
pub use dataset::{Accessor, Dataset};
pub use deferred::{DeferredPreview, PreviewTransform, TrailingDebounce};
pub use entity_index::{EntityIndex, PlotEntity, Positioned, build_entities};
pub use linear_scale::{Linear, LinearScale};
pub use listeners::{CallbackSet, UpdateListeners};
pub use projector::{pixel_point, scaled_accessor};
pub use providers::{ExtentProvider, ProviderRegistry};
pub use quantitative_scale::{QuantitativeKind, QuantitativeScale};
pub use scale::{Scale, ScaleCore, SharedScale, link_auto_domain, shared};
pub use stacking::{
    StackExtent, StackLayout, StackedDatum, StackedExtents, StackingOrder, StackingResult,
    baseline_provider, normalize_key, stack, stacked_extent, stacked_extent_provider,
    stacked_extents,
};
pub use time_scale::{Time, TimeScale};
pub use transformable::{SharedTransformable, TransformableScale};
pub use types::{Bounds, DatasetId, ListenerId, Point, ProviderId, ScaleId};
