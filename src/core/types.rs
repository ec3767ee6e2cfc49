use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::primitives::in_range;

/// Pixel-space point in the local coordinate space of a chart component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Midpoint of the axis-aligned box spanned by two points.
    #[must_use]
    pub fn center(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Axis-aligned pixel rectangle. Points on the edges count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Bounds {
    #[must_use]
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Bounds anchored at the origin with the given size.
    #[must_use]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(width, height))
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        in_range(point.x, self.top_left.x, self.bottom_right.x)
            && in_range(point.y, self.top_left.y, self.bottom_right.y)
    }
}

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

fn next_handle() -> u64 {
    NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)
}

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub(crate) fn next() -> Self {
                Self(next_handle())
            }

            #[must_use]
            pub fn get(self) -> u64 {
                self.0
            }
        }
    };
}

handle_type!(
    /// Stable identity of a scale, used to key pan/zoom constraints.
    ScaleId
);
handle_type!(
    /// Registration token returned when a provider is added to a scale.
    ProviderId
);
handle_type!(
    /// Registration token returned when an update listener is added.
    ListenerId
);
handle_type!(
    /// Stable identity of a dataset, used to key stacking results and entities.
    DatasetId
);
