// SPDX-License-Identifier: GPL-3.0-only

//! Crate-wide constants
//!
//! The focus-area values mirror the driver contract: tap areas are expressed
//! in a normalized square spanning [-1000, 1000] on both axes, with a weight
//! the driver uses to prioritize competing areas.

/// Bound of the driver's normalized focus coordinate space.
pub const FOCUS_COORDINATE_BOUND: i32 = 1000;

/// Base side length of a tap focus area, in normalized driver units.
///
/// The effective side is scaled by a per-area coefficient (1.0 for focus,
/// larger for metering).
pub const FOCUS_AREA_BASE_SIZE: f32 = 200.0;

/// Driver priority weight attached to tap focus and metering areas.
pub const FOCUS_AREA_WEIGHT: u32 = 800;

/// A pinch spanning 1/5 of the surface height sweeps the full zoom range.
pub const ZOOM_SURFACE_DIVISIONS: u32 = 5;

/// Tilt magnitude (m/s²) above which an accelerometer axis triggers a
/// rotation classification.
pub const TILT_TRIGGER: f32 = 6.0;

/// Cross-axis magnitude (m/s²) below which the triggering axis counts as
/// dominant. The gap between this and [`TILT_TRIGGER`] is a hysteresis band
/// that avoids flapping near diagonal orientations.
pub const TILT_RELEASE: f32 = 4.0;
