//! Telemetry helpers for applications embedding `chart-scales`.
//!
//! Events the crate emits, by level:
//! - `warn`: ignored gestures (non-positive or non-finite zoom factors,
//!   pinches with near-zero finger distance), extent constraints set on a
//!   non-linear scale, non-finite transformation domains, and domain
//!   overrides that collapse to one value.
//! - `debug`: every applied pan, zoom and wheel zoom with its factor and
//!   center, auto-domain changes, and recomputed stacked extents.
//! - `trace`: applied pinches, skipped re-entrant auto-domain updates, and
//!   scales left alone because they were mid-update or had no usable range.
//!
//! All events use the `chart_scales::*` module paths as targets, so
//! `RUST_LOG=chart_scales::interaction=debug` narrows output to gestures.

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chart_scales=info")),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
