// SPDX-License-Identifier: GPL-3.0-only

//! Camera capture session core
//!
//! This library provides the platform-independent core of an embeddable
//! camera-capture component: best-fit preview geometry, tap-to-focus and
//! zoom computation, and a serialized device session state machine.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`geometry`]: Pure size/focus/zoom/orientation math
//! - [`device`]: Hardware capability traits, shared types, and a mock device
//! - [`session`]: The Idle → Opened → Shooting session controller
//! - [`processing`]: Capture decode and rotation/mirror post-processing
//! - [`config`]: Session configuration
//!
//! The platform view hierarchy, gesture recognition, and activity plumbing
//! that embed this core are host responsibilities and live outside the crate.

pub mod config;
pub mod constants;
pub mod device;
pub mod errors;
pub mod geometry;
pub mod processing;
pub mod session;

// Re-export commonly used types
pub use config::SessionConfig;
pub use device::{CaptureDevice, DeviceHost};
pub use device::types::{
    DeviceDescriptor, DeviceParameters, Dimensions, DisplayRotation, Facing, FocusArea,
    RotationHint, SurfaceTarget, ZoomState,
};
pub use errors::{SessionError, SessionResult};
pub use processing::CapturedImage;
pub use session::{CameraSession, CaptureOutcome, Completion, SessionState};
