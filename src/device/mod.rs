// SPDX-License-Identifier: GPL-3.0-only

//! Camera device abstraction
//!
//! This module defines the opaque hardware capability the session controller
//! drives, as two traits: [`DeviceHost`] for enumeration and opening, and
//! [`CaptureDevice`] for an open handle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   Host UI layer     │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   CameraSession     │  ← State machine, serialized worker
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ DeviceHost /        │  ← Common interface
//! │ CaptureDevice traits│
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     platform driver
//! ```
//!
//! All trait methods are synchronous and are only ever invoked on the
//! session's worker thread, so implementations need `Send` but no internal
//! locking. Driver completion callbacks of the underlying platform API are
//! modeled as plain return values delivered on that worker.

pub mod mock;
pub mod types;

pub use types::*;

/// Entry point to the platform camera service
pub trait DeviceHost: Send {
    /// Enumerate the cameras present on the system
    ///
    /// The returned descriptors carry the enumeration index as the device id;
    /// the list is taken once per session and treated as stable.
    fn enumerate(&self) -> Vec<DeviceDescriptor>;

    /// Open the device with the given id
    fn open(&self, id: DeviceId) -> DeviceResult<Box<dyn CaptureDevice>>;
}

/// An open camera device handle
///
/// The handle is not safe for concurrent mutation; the session worker is its
/// only caller.
pub trait CaptureDevice: Send {
    /// Read the current parameter block from the driver
    fn parameters(&self) -> DeviceResult<DeviceParameters>;

    /// Write a parameter block back to the driver
    ///
    /// A rejection leaves the driver on its prior parameters; the session
    /// logs and continues.
    fn set_parameters(&mut self, params: &DeviceParameters) -> DeviceResult<()>;

    /// Set the clockwise rotation applied to preview frames
    fn set_display_orientation(&mut self, degrees: u32) -> DeviceResult<()>;

    /// Attach the preview stream to a host surface
    fn set_preview_target(&mut self, target: &SurfaceTarget) -> DeviceResult<()>;

    /// Start streaming preview frames
    fn start_preview(&mut self) -> DeviceResult<()>;

    /// Stop streaming preview frames; safe to call when not previewing
    fn stop_preview(&mut self);

    /// Cancel an in-flight autofocus sweep, if any
    fn cancel_auto_focus(&mut self);

    /// Run an autofocus sweep; returns whether focus converged
    fn auto_focus(&mut self) -> DeviceResult<bool>;

    /// Capture a single still picture and return its encoded payload
    fn take_picture(&mut self) -> DeviceResult<Vec<u8>>;

    /// Release the hardware handle; the device is unusable afterwards
    fn release(&mut self);
}
