// SPDX-License-Identifier: GPL-3.0-only

//! Pure preview geometry
//!
//! Size selection, tap-to-focus mapping, zoom unit computation, tilt
//! classification, and display-orientation math. Everything here is total
//! and side-effect-free: invalid surface dimensions short-circuit to a no-op
//! result (`None` or an unchanged state), never an error.
//!
//! Coordinate convention: surfaces are stored with the long edge as the
//! width (see [`Dimensions::landscape`]), matching the sensor's landscape
//! readout. Tap coordinates arrive in display space, which is rotated 90°
//! against the sensor, so the tap mapping swaps axes: x is normalized against
//! the surface height and y against the surface width.

use crate::config::SessionConfig;
use crate::constants::{
    FOCUS_AREA_BASE_SIZE, FOCUS_AREA_WEIGHT, FOCUS_COORDINATE_BOUND, TILT_RELEASE, TILT_TRIGGER,
    ZOOM_SURFACE_DIVISIONS,
};
use crate::device::types::{
    Dimensions, DisplayRotation, Facing, FocusArea, FocusMode, PictureFormat, RotationHint,
    ZoomState,
};
use crate::device::DeviceParameters;
use tracing::debug;

/// Two sizes with ratios closer than this share an aspect group.
const RATIO_TOLERANCE: f32 = 1e-4;

/// Result of a zoom computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomUpdate {
    /// The clamped zoom state after applying the pinch delta
    pub state: ZoomState,
    /// Whether the level actually moved; a no-op lets the caller skip the
    /// parameter write
    pub changed: bool,
}

/// Select the candidate size that fits a target surface best.
///
/// Candidates are grouped by aspect ratio and the group closest to the
/// target's ratio wins, ties going to the first-encountered group. Within
/// that group the preferred candidate is at least as tall as the target and
/// minimizes `|Δwidth| + |Δheight|`; when no candidate is tall enough the
/// height constraint is dropped and the same minimizer is taken.
///
/// Returns `None` for an empty candidate list or a degenerate target.
pub fn best_preview_size(target: Dimensions, candidates: &[Dimensions]) -> Option<Dimensions> {
    if !target.is_valid() || candidates.is_empty() {
        return None;
    }

    // Group by ratio, preserving first-encountered order.
    let mut groups: Vec<Vec<Dimensions>> = Vec::new();
    for &size in candidates {
        match groups
            .iter_mut()
            .find(|group| (group[0].ratio() - size.ratio()).abs() < RATIO_TOLERANCE)
        {
            Some(group) => group.push(size),
            None => groups.push(vec![size]),
        }
    }

    let target_ratio = target.ratio();
    let mut best_group = &groups[0];
    let mut best_ratio_diff = f32::MAX;
    for group in &groups {
        let ratio_diff = (group[0].ratio() - target_ratio).abs();
        if ratio_diff < best_ratio_diff {
            best_group = group;
            best_ratio_diff = ratio_diff;
        }
    }

    closest_in_group(target, best_group, true)
        .or_else(|| closest_in_group(target, best_group, false))
}

/// Minimize `|Δwidth| + |Δheight|` within one aspect group, optionally
/// requiring the candidate to be at least as tall as the target.
fn closest_in_group(
    target: Dimensions,
    group: &[Dimensions],
    require_height: bool,
) -> Option<Dimensions> {
    let mut best = None;
    let mut best_diff = u32::MAX;
    for &size in group {
        if require_height && size.height < target.height {
            continue;
        }
        let diff = size.width.abs_diff(target.width) + size.height.abs_diff(target.height);
        if diff < best_diff {
            best = Some(size);
            best_diff = diff;
        }
    }
    best
}

/// Map a tap in display coordinates to a driver focus area.
///
/// The tap is projected into the driver's normalized [-1000, 1000] square
/// with axes swapped (see module docs), and a square of side
/// `200 * coefficient` normalized units is centered on it. Each edge is
/// clamped independently, so an area at a corner of the space can degenerate
/// to zero size; the driver accepts that.
///
/// Returns `None` when the surface is degenerate.
pub fn tap_to_focus_area(
    surface: Dimensions,
    tap_x: f32,
    tap_y: f32,
    coefficient: f32,
) -> Option<FocusArea> {
    if !surface.is_valid() {
        return None;
    }

    let area_size = (FOCUS_AREA_BASE_SIZE * coefficient) as i32;
    let center_x = (tap_x / surface.height as f32 * 2000.0 - 1000.0) as i32;
    let center_y = (tap_y / surface.width as f32 * 2000.0 - 1000.0) as i32;

    let left = clamp_coordinate(center_x - area_size / 2);
    let top = clamp_coordinate(center_y - area_size / 2);
    let right = clamp_coordinate(left + area_size);
    let bottom = clamp_coordinate(top + area_size);

    Some(FocusArea {
        left,
        top,
        right,
        bottom,
        weight: FOCUS_AREA_WEIGHT,
    })
}

fn clamp_coordinate(value: i32) -> i32 {
    value.clamp(-FOCUS_COORDINATE_BOUND, FOCUS_COORDINATE_BOUND)
}

/// Convert a pinch span delta into a new zoom level.
///
/// The step unit is `surface.height / 5 / max`, so a pinch across a fifth of
/// the surface height sweeps the full zoom range. The resulting level is
/// clamped to [0, max]. A degenerate surface, an unzoomable device, or a
/// zoom range too large for the surface all leave the state unchanged.
pub fn compute_zoom(surface: Dimensions, zoom: ZoomState, span_delta: f32) -> ZoomUpdate {
    let unchanged = ZoomUpdate {
        state: zoom,
        changed: false,
    };
    if !surface.is_valid() || zoom.max == 0 {
        return unchanged;
    }

    let unit = surface.height / ZOOM_SURFACE_DIVISIONS / zoom.max;
    if unit == 0 {
        return unchanged;
    }

    let steps = (span_delta / unit as f32) as i64;
    let level = (i64::from(zoom.current) + steps).clamp(0, i64::from(zoom.max)) as u32;
    ZoomUpdate {
        state: ZoomState {
            current: level,
            max: zoom.max,
        },
        changed: level != zoom.current,
    }
}

/// Classify accelerometer tilt into a device rotation.
///
/// An axis triggers at magnitude 6 only while the other axis stays below 4;
/// readings inside the 4–6 hysteresis band return `None` so near-diagonal
/// holds don't flap between orientations.
pub fn classify_tilt_rotation(accel_x: f32, accel_y: f32) -> Option<RotationHint> {
    if accel_x.abs() > TILT_TRIGGER && accel_y.abs() < TILT_RELEASE {
        Some(if accel_x > TILT_TRIGGER {
            RotationHint::Deg270
        } else {
            RotationHint::Deg90
        })
    } else if accel_y.abs() > TILT_TRIGGER && accel_x.abs() < TILT_RELEASE {
        Some(if accel_y > TILT_TRIGGER {
            RotationHint::Deg0
        } else {
            RotationHint::Deg180
        })
    } else {
        None
    }
}

/// Compute the clockwise rotation the device must apply to preview frames so
/// they appear upright on the display.
///
/// Front sensors deliver a mirrored readout, so their result is mirrored a
/// second time to compensate.
pub fn display_orientation(
    mount_angle: u32,
    facing: Facing,
    display_rotation: DisplayRotation,
) -> u32 {
    let mount = mount_angle % 360;
    let degrees = display_rotation.degrees();
    match facing {
        Facing::Front => {
            let result = (mount + degrees) % 360;
            (360 - result) % 360
        }
        Facing::Back => (mount + 360 - degrees) % 360,
    }
}

/// Fill a parameter block with the preview/picture sizes and modes that best
/// fit the surface.
///
/// Preview and picture sizes both go through [`best_preview_size`];
/// continuous-picture focus and JPEG output are selected when the driver
/// supports them. Pure with respect to the device: the caller writes the
/// block back.
pub fn plan_preview_parameters(
    surface: Dimensions,
    params: &mut DeviceParameters,
    config: &SessionConfig,
) {
    if let Some(size) = best_preview_size(surface, &params.supported_preview_sizes) {
        debug!(%size, "selected preview size");
        params.preview_size = Some(size);
    }
    if let Some(size) = best_preview_size(surface, &params.supported_picture_sizes) {
        debug!(%size, "selected picture size");
        params.picture_size = Some(size);
    }
    if params
        .supported_focus_modes
        .contains(&FocusMode::ContinuousPicture)
    {
        params.focus_mode = Some(FocusMode::ContinuousPicture);
    }
    if params
        .supported_picture_formats
        .contains(&PictureFormat::Jpeg)
    {
        params.picture_format = Some(PictureFormat::Jpeg);
        params.jpeg_quality = config.jpeg_quality;
    }
}

/// Fill a parameter block with the focus and metering areas for a tap.
///
/// Areas are only set where the driver reports capacity for them; the
/// metering area uses a wider square than the focus area. Focus mode switches
/// to single-shot auto so the following `auto_focus` call targets the tap.
pub fn plan_focus_parameters(
    surface: Dimensions,
    params: &mut DeviceParameters,
    tap_x: f32,
    tap_y: f32,
    config: &SessionConfig,
) {
    if params.max_focus_areas > 0 {
        if let Some(area) = tap_to_focus_area(surface, tap_x, tap_y, config.focus_area_coefficient)
        {
            debug!(?area, "focus area");
            params.focus_areas = vec![area];
        }
    }
    if params.max_metering_areas > 0 {
        if let Some(area) =
            tap_to_focus_area(surface, tap_x, tap_y, config.metering_area_coefficient)
        {
            debug!(?area, "metering area");
            params.metering_areas = vec![area];
        }
    }
    params.focus_mode = Some(FocusMode::Auto);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FOCUS_COORDINATE_BOUND;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions::new(width, height)
    }

    #[test]
    fn test_best_size_prefers_closest_ratio() {
        let target = dims(1920, 1080);
        let candidates = [dims(640, 480), dims(1280, 720), dims(800, 600)];
        assert_eq!(best_preview_size(target, &candidates), Some(dims(1280, 720)));
    }

    #[test]
    fn test_best_size_prefers_taller_candidate_within_group() {
        let target = dims(1000, 562); // ~16:9
        // Both candidates are 16:9; 1280x720 covers the target height,
        // 960x540 does not, even though it is closer in absolute terms.
        let candidates = [dims(960, 540), dims(1280, 720)];
        assert_eq!(best_preview_size(target, &candidates), Some(dims(1280, 720)));
    }

    #[test]
    fn test_best_size_falls_back_when_nothing_is_tall_enough() {
        let target = dims(3840, 2160);
        let candidates = [dims(1280, 720), dims(1920, 1080)];
        assert_eq!(
            best_preview_size(target, &candidates),
            Some(dims(1920, 1080))
        );
    }

    #[test]
    fn test_best_size_ratio_tie_goes_to_first_group() {
        // Ratios 1.25 and 0.75 are equidistant from the target's 1.0; the
        // 1.25 group was encountered first and must win.
        let target = dims(1000, 1000);
        let candidates = [dims(1250, 1000), dims(750, 1000), dims(2500, 2000)];
        assert_eq!(
            best_preview_size(target, &candidates),
            Some(dims(1250, 1000))
        );
    }

    #[test]
    fn test_best_size_degenerate_inputs() {
        assert_eq!(best_preview_size(dims(0, 1080), &[dims(640, 480)]), None);
        assert_eq!(best_preview_size(dims(1920, 0), &[dims(640, 480)]), None);
        assert_eq!(best_preview_size(dims(1920, 1080), &[]), None);
    }

    #[test]
    fn test_focus_area_is_centered_on_tap() {
        let surface = dims(1920, 1080);
        // Tap in the middle of the display: normalized center is (0, 0).
        let area = tap_to_focus_area(surface, 540.0, 960.0, 1.0).unwrap();
        assert_eq!(area.left, -100);
        assert_eq!(area.top, -100);
        assert_eq!(area.right, 100);
        assert_eq!(area.bottom, 100);
        assert_eq!(area.weight, 800);
    }

    #[test]
    fn test_focus_area_edges_stay_in_bounds() {
        let surface = dims(1920, 1080);
        let taps = [
            (0.0, 0.0),
            (1080.0, 1920.0),
            (0.0, 1920.0),
            (1080.0, 0.0),
            (540.0, 960.0),
            (-50.0, 5000.0),
        ];
        for (x, y) in taps {
            let area = tap_to_focus_area(surface, x, y, 1.5).unwrap();
            for edge in [area.left, area.top, area.right, area.bottom] {
                assert!(edge >= -FOCUS_COORDINATE_BOUND && edge <= FOCUS_COORDINATE_BOUND);
            }
            assert!(area.left <= area.right);
            assert!(area.top <= area.bottom);
        }
    }

    #[test]
    fn test_focus_area_degenerates_at_corner() {
        let surface = dims(1920, 1080);
        // Bottom-right corner: both edges clamp to the bound.
        let area = tap_to_focus_area(surface, 1080.0, 1920.0, 1.0).unwrap();
        assert_eq!(area.right, FOCUS_COORDINATE_BOUND);
        assert_eq!(area.bottom, FOCUS_COORDINATE_BOUND);
        assert!(area.left <= area.right);
    }

    #[test]
    fn test_focus_area_invalid_surface() {
        assert_eq!(tap_to_focus_area(dims(0, 0), 10.0, 10.0, 1.0), None);
    }

    #[test]
    fn test_zoom_clamps_to_range() {
        let surface = dims(1920, 1080);
        let zoom = ZoomState::new(5, 10);
        let up = compute_zoom(surface, zoom, 1e6);
        assert_eq!(up.state.current, 10);
        assert!(up.changed);
        let down = compute_zoom(surface, zoom, -1e6);
        assert_eq!(down.state.current, 0);
        assert!(down.changed);
    }

    #[test]
    fn test_zoom_round_trip_cancels_out() {
        let surface = dims(1920, 1080);
        let zoom = ZoomState::new(5, 10);
        let span = 47.0;
        let forward = compute_zoom(surface, zoom, span);
        let back = compute_zoom(surface, forward.state, -span);
        assert_eq!(back.state.current, zoom.current);
    }

    #[test]
    fn test_zoom_below_one_step_is_a_noop() {
        let surface = dims(1920, 1080);
        let zoom = ZoomState::new(3, 10);
        // unit = 1080 / 5 / 10 = 21
        let update = compute_zoom(surface, zoom, 15.0);
        assert_eq!(update.state, zoom);
        assert!(!update.changed);
    }

    #[test]
    fn test_zoom_degenerate_inputs_unchanged() {
        let zoom = ZoomState::new(2, 10);
        assert!(!compute_zoom(dims(0, 0), zoom, 100.0).changed);
        assert!(!compute_zoom(dims(1920, 1080), ZoomState::new(0, 0), 100.0).changed);
        // Range too large for the surface: unit truncates to zero.
        assert!(!compute_zoom(dims(40, 20), ZoomState::new(0, 100), 100.0).changed);
    }

    #[test]
    fn test_tilt_classification() {
        assert_eq!(classify_tilt_rotation(7.0, 0.0), Some(RotationHint::Deg270));
        assert_eq!(classify_tilt_rotation(-7.0, 0.0), Some(RotationHint::Deg90));
        assert_eq!(classify_tilt_rotation(0.0, 7.0), Some(RotationHint::Deg0));
        assert_eq!(classify_tilt_rotation(0.0, -7.0), Some(RotationHint::Deg180));
    }

    #[test]
    fn test_tilt_hysteresis_band_returns_none() {
        assert_eq!(classify_tilt_rotation(5.0, 5.0), None);
        assert_eq!(classify_tilt_rotation(7.0, 5.0), None);
        assert_eq!(classify_tilt_rotation(3.0, 3.0), None);
    }

    #[test]
    fn test_display_orientation_back_camera() {
        assert_eq!(
            display_orientation(90, Facing::Back, DisplayRotation::Deg0),
            90
        );
        assert_eq!(
            display_orientation(90, Facing::Back, DisplayRotation::Deg270),
            180
        );
    }

    #[test]
    fn test_display_orientation_front_camera_is_mirrored() {
        assert_eq!(
            display_orientation(90, Facing::Front, DisplayRotation::Deg0),
            270
        );
        assert_eq!(
            display_orientation(270, Facing::Front, DisplayRotation::Deg90),
            0
        );
    }

    #[test]
    fn test_preview_plan_selects_sizes_and_modes() {
        let config = SessionConfig::default();
        let mut params = DeviceParameters {
            supported_preview_sizes: vec![dims(640, 480), dims(1280, 720)],
            supported_picture_sizes: vec![dims(1920, 1080), dims(800, 600)],
            supported_focus_modes: vec![FocusMode::Auto, FocusMode::ContinuousPicture],
            supported_picture_formats: vec![PictureFormat::Raw, PictureFormat::Jpeg],
            ..DeviceParameters::default()
        };
        plan_preview_parameters(dims(1920, 1080), &mut params, &config);
        assert_eq!(params.preview_size, Some(dims(1280, 720)));
        assert_eq!(params.picture_size, Some(dims(1920, 1080)));
        assert_eq!(params.focus_mode, Some(FocusMode::ContinuousPicture));
        assert_eq!(params.picture_format, Some(PictureFormat::Jpeg));
        assert_eq!(params.jpeg_quality, config.jpeg_quality);
    }

    #[test]
    fn test_focus_plan_respects_driver_capacity() {
        let config = SessionConfig::default();
        let mut params = DeviceParameters {
            max_focus_areas: 1,
            max_metering_areas: 0,
            ..DeviceParameters::default()
        };
        plan_focus_parameters(dims(1920, 1080), &mut params, 540.0, 960.0, &config);
        assert_eq!(params.focus_areas.len(), 1);
        assert!(params.metering_areas.is_empty());
        assert_eq!(params.focus_mode, Some(FocusMode::Auto));
    }
}
