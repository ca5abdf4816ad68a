// SPDX-License-Identifier: GPL-3.0-only

//! Capture post-processing
//!
//! Decodes the device's capture payload and applies the orientation
//! transform: sensor mount rotation plus the tilt rotation measured at
//! capture time, with an extra flip compensating the front sensor's mirrored
//! readout.

use crate::device::types::Facing;
use crate::errors::{SessionError, SessionResult};
use image::DynamicImage;
use tracing::debug;

/// A decoded, orientation-corrected capture
#[derive(Debug)]
pub struct CapturedImage {
    pub image: DynamicImage,
    /// Clockwise rotation that was applied, in degrees
    pub rotation_degrees: u32,
    /// Whether the image was mirrored horizontally (front camera)
    pub mirrored: bool,
}

/// Decode a capture payload and rotate/mirror it upright.
///
/// `display_orientation` is the preview rotation computed for the device and
/// `sensor_rotation` the tilt classification at capture time; both are
/// multiples of 90. Rear captures rotate by their sum; front captures rotate
/// by the complement and are then mirrored.
pub fn orient_capture(
    payload: &[u8],
    facing: Facing,
    display_orientation: u32,
    sensor_rotation: u32,
) -> SessionResult<CapturedImage> {
    if payload.is_empty() {
        return Err(SessionError::EmptyCapture);
    }

    let decoded = image::load_from_memory(payload)
        .map_err(|err| SessionError::DecodeFailed(err.to_string()))?;

    let upright = (display_orientation + sensor_rotation) % 360;
    let (rotation, mirrored) = match facing {
        Facing::Back => (upright, false),
        Facing::Front => ((360 - upright) % 360, true),
    };
    debug!(%facing, rotation, mirrored, "orienting capture");

    let mut image = rotate(decoded, rotation);
    if mirrored {
        image = image.fliph();
    }

    Ok(CapturedImage {
        image,
        rotation_degrees: rotation,
        mirrored,
    })
}

fn rotate(image: DynamicImage, degrees: u32) -> DynamicImage {
    match degrees % 360 {
        90 => image.rotate90(),
        180 => image.rotate180(),
        270 => image.rotate270(),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    /// 2x1 PNG: red pixel left, blue pixel right.
    fn two_pixel_payload() -> Vec<u8> {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let err = orient_capture(&[], Facing::Back, 0, 0).unwrap_err();
        assert!(matches!(err, SessionError::EmptyCapture));
    }

    #[test]
    fn test_undecodable_payload_is_rejected() {
        let err = orient_capture(&[1, 2, 3, 4], Facing::Back, 0, 0).unwrap_err();
        assert!(matches!(err, SessionError::DecodeFailed(_)));
    }

    #[test]
    fn test_back_capture_rotates_without_mirroring() {
        let captured = orient_capture(&two_pixel_payload(), Facing::Back, 90, 0).unwrap();
        assert_eq!(captured.rotation_degrees, 90);
        assert!(!captured.mirrored);
        // 2x1 rotated 90° clockwise becomes 1x2 with red at the top.
        assert_eq!(captured.image.width(), 1);
        assert_eq!(captured.image.height(), 2);
        let rgba = captured.image.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(rgba.get_pixel(0, 1), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_back_rotation_includes_sensor_tilt() {
        let captured = orient_capture(&two_pixel_payload(), Facing::Back, 90, 270).unwrap();
        assert_eq!(captured.rotation_degrees, 0);
        assert_eq!(captured.image.width(), 2);
    }

    #[test]
    fn test_front_capture_is_mirrored() {
        let captured = orient_capture(&two_pixel_payload(), Facing::Front, 0, 0).unwrap();
        assert!(captured.mirrored);
        assert_eq!(captured.rotation_degrees, 0);
        let rgba = captured.image.to_rgba8();
        // Mirror swaps the two pixels: blue now sits on the left.
        assert_eq!(rgba.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(rgba.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_front_capture_rotates_by_complement() {
        let captured = orient_capture(&two_pixel_payload(), Facing::Front, 90, 0).unwrap();
        assert_eq!(captured.rotation_degrees, 270);
        assert_eq!(captured.image.width(), 1);
        assert_eq!(captured.image.height(), 2);
    }
}
