//! chart-scales: the data-to-pixel layer of an interactive chart.
//!
//! Scales keep their domain in sync with whatever data consumers register
//! against them, a pan/zoom controller moves those domains under per-scale
//! bounds, stacking computes per-key offsets across series, and an entity
//! index answers "which datum is nearest to this pixel". Drawing, layout and
//! event plumbing stay with the host.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod telemetry;

pub use api::{ChartScalesConfig, StackingConfig};
pub use core::{
    CategoryScale, Dataset, EntityIndex, LinearScale, Point, Scale, StackingOrder, TimeScale,
    TransformableScale,
};
pub use error::{ChartError, ChartResult};
pub use interaction::{PanZoomConstraints, PanZoomController};
