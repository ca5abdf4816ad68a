// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the device abstraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// A frame or surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Create a size normalized to the sensor convention: the long edge is
    /// the width. Surface sizes are stored this way regardless of how the
    /// host reports them.
    pub const fn landscape(a: u32, b: u32) -> Self {
        if a >= b {
            Self {
                width: a,
                height: b,
            }
        } else {
            Self {
                width: b,
                height: a,
            }
        }
    }

    /// Aspect ratio as width / height
    pub fn ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Both dimensions are positive
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which way a camera sensor faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    /// Rear-facing (world) camera
    Back,
    /// Front-facing (selfie) camera; its readout is mirrored
    Front,
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::Back => write!(f, "back"),
            Facing::Front => write!(f, "front"),
        }
    }
}

/// Identifier of a camera device: its enumeration index
pub type DeviceId = usize;

/// An enumerated camera device
///
/// `id` is the position of the device in the enumeration order, not a
/// driver-facing constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub id: DeviceId,
    pub facing: Facing,
    /// Angle (degrees, clockwise) the sensor is mounted at relative to the
    /// device's natural orientation
    pub mount_angle: u32,
}

/// A tap focus or metering area in the driver's normalized coordinate space
///
/// All edges lie within [-1000, 1000] and `left <= right`, `top <= bottom`.
/// An area centered at a corner of the space can legitimately clamp down to
/// zero size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    /// Driver priority weight for this area
    pub weight: u32,
}

/// Digital zoom state of an open device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoomState {
    /// Current zoom level, always within [0, max]
    pub current: u32,
    /// Maximum zoom level supported by the driver
    pub max: u32,
}

impl ZoomState {
    /// Create a zoom state, clamping the level into range
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }
}

/// Focus modes a driver may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusMode {
    /// Single-shot autofocus triggered by `auto_focus`
    Auto,
    /// Continuous autofocus tuned for still capture
    ContinuousPicture,
    /// Fixed focus at infinity
    Infinity,
    /// Close-range focus
    Macro,
}

/// Capture payload formats a driver may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PictureFormat {
    /// JPEG-compressed capture
    Jpeg,
    /// Unprocessed sensor output
    Raw,
}

/// Rotation of the host display relative to the device's natural orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayRotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl DisplayRotation {
    /// Rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            DisplayRotation::Deg0 => 0,
            DisplayRotation::Deg90 => 90,
            DisplayRotation::Deg180 => 180,
            DisplayRotation::Deg270 => 270,
        }
    }
}

/// Device rotation classified from accelerometer tilt
///
/// "Not tilted far enough to classify" is `Option::None` at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationHint {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl RotationHint {
    /// Rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            RotationHint::Deg0 => 0,
            RotationHint::Deg90 => 90,
            RotationHint::Deg180 => 180,
            RotationHint::Deg270 => 270,
        }
    }
}

/// Handle to the host surface the preview is rendered into
///
/// The handle value is opaque to this crate; the host maps it back to its
/// windowing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTarget {
    pub handle: u64,
    pub dimensions: Dimensions,
}

impl SurfaceTarget {
    /// Create a surface target. The reported width/height are normalized to
    /// the sensor convention (long edge first).
    pub fn new(handle: u64, width: u32, height: u32) -> Self {
        Self {
            handle,
            dimensions: Dimensions::landscape(width, height),
        }
    }
}

/// The mutable parameter block of an open device
///
/// Mirrors the driver's parameter object: read it, adjust the fields, write
/// it back with `set_parameters`. Unsupported settings stay `None`.
#[derive(Debug, Clone, Default)]
pub struct DeviceParameters {
    pub supported_preview_sizes: Vec<Dimensions>,
    pub supported_picture_sizes: Vec<Dimensions>,
    pub preview_size: Option<Dimensions>,
    pub picture_size: Option<Dimensions>,
    pub supported_focus_modes: Vec<FocusMode>,
    pub focus_mode: Option<FocusMode>,
    pub supported_picture_formats: Vec<PictureFormat>,
    pub picture_format: Option<PictureFormat>,
    /// JPEG quality in [1, 100], meaningful when `picture_format` is JPEG
    pub jpeg_quality: u8,
    /// Number of focus areas the driver accepts; 0 means unsupported
    pub max_focus_areas: u32,
    pub focus_areas: Vec<FocusArea>,
    /// Number of metering areas the driver accepts; 0 means unsupported
    pub max_metering_areas: u32,
    pub metering_areas: Vec<FocusArea>,
    pub zoom_supported: bool,
    pub zoom: ZoomState,
}

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Error types for device operations
#[derive(Debug, Clone)]
pub enum DeviceError {
    /// No device with the requested id
    NotFound(String),
    /// Device exists but could not be opened
    OpenFailed(String),
    /// Driver rejected a parameter write
    ParameterRejected(String),
    /// Preview could not be started or attached to the surface
    PreviewFailed(String),
    /// Hardware capture call failed
    CaptureFailed(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NotFound(msg) => write!(f, "Device not found: {}", msg),
            DeviceError::OpenFailed(msg) => write!(f, "Open failed: {}", msg),
            DeviceError::ParameterRejected(msg) => write!(f, "Parameters rejected: {}", msg),
            DeviceError::PreviewFailed(msg) => write!(f, "Preview failed: {}", msg),
            DeviceError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
        }
    }
}

impl std::error::Error for DeviceError {}
