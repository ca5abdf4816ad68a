// SPDX-License-Identifier: GPL-3.0-only

//! Camera session controller
//!
//! [`CameraSession`] owns one camera device at a time and sequences every
//! device-touching operation onto a single dedicated worker thread: the
//! underlying hardware handle is not safe for concurrent mutation, and
//! open/close races are the dominant real-world failure mode this design
//! avoids.
//!
//! Public operations are asynchronous from the caller's perspective: each
//! returns immediately with a [`Completion`] channel that resolves on the
//! caller's own execution context, so host UI updates never block behind
//! hardware I/O. Queued operations always run to completion — there is no
//! cancellation — and teardown is idempotent, so a close queued after an
//! open still leaves the session consistent.
//!
//! One session instance corresponds to one active device at a time; the
//! "single active session" invariant is carried by ownership of the handle,
//! not by global state.

mod worker;

use crate::config::SessionConfig;
use crate::device::types::{DisplayRotation, Facing, SurfaceTarget};
use crate::device::DeviceHost;
use crate::errors::SessionError;
use crate::processing::CapturedImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};
use worker::SessionWorker;

/// Lifecycle state of the device session
///
/// Transitions happen only on the session worker, never directly by host
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No device held
    #[default]
    Idle,
    /// Device open and previewing
    Opened,
    /// Hardware capture in flight
    Shooting,
}

/// Outcome of a capture request
pub type CaptureOutcome = Result<CapturedImage, SessionError>;

/// Completion channel for an asynchronous session operation
///
/// Await it from async code or `blocking_recv` from a plain thread. If the
/// session shuts down before the operation runs, the channel resolves with
/// a receive error.
pub type Completion<T> = oneshot::Receiver<T>;

pub(crate) enum Command {
    Open {
        done: oneshot::Sender<bool>,
    },
    Close,
    SwitchCamera {
        done: oneshot::Sender<bool>,
    },
    SetFocus {
        tap_x: f32,
        tap_y: f32,
        done: oneshot::Sender<bool>,
    },
    SetZoom {
        span_delta: f32,
    },
    TakePicture {
        done: oneshot::Sender<CaptureOutcome>,
    },
    SetSurfaceTarget {
        target: SurfaceTarget,
    },
    SetSensorRotation {
        degrees: u32,
    },
    SetDisplayRotation {
        rotation: DisplayRotation,
    },
}

/// Handle to a camera capture session
///
/// Cheap to clone; all clones feed the same worker. Dropping the last clone
/// tears the session down and stops the worker.
#[derive(Clone)]
pub struct CameraSession {
    commands: mpsc::UnboundedSender<Command>,
    opened: Arc<AtomicBool>,
    multi_camera: bool,
}

impl CameraSession {
    /// Create a session over a device host and spawn its worker thread.
    ///
    /// Devices are enumerated once here; the back camera is preferred when
    /// the session first opens.
    pub fn new(host: Box<dyn DeviceHost>, config: SessionConfig) -> Self {
        let devices = host.enumerate();
        info!(count = devices.len(), "enumerated camera devices");

        let multi_camera = devices.iter().any(|d| d.facing == Facing::Back)
            && devices.iter().any(|d| d.facing == Facing::Front);
        let opened = Arc::new(AtomicBool::new(false));

        let (commands, receiver) = mpsc::unbounded_channel();
        let worker = SessionWorker::new(host, devices, config, Arc::clone(&opened));
        thread::spawn(move || worker.run(receiver));

        Self {
            commands,
            opened,
            multi_camera,
        }
    }

    /// Open the default device and start the preview.
    ///
    /// Requires a surface target to have been set. Completes with `true` when
    /// the session reaches the Opened state; any failure tears the device
    /// down fully before completing with `false`.
    pub fn open(&self) -> Completion<bool> {
        let (done, completion) = oneshot::channel();
        self.send(Command::Open { done });
        completion
    }

    /// Tear the session down. Idempotent in any state.
    pub fn close(&self) {
        self.send(Command::Close);
    }

    /// Toggle between the back and front device and reopen.
    ///
    /// Completes with `false` without touching the device when the system has
    /// no second camera.
    pub fn switch_camera(&self) -> Completion<bool> {
        let (done, completion) = oneshot::channel();
        self.send(Command::SwitchCamera { done });
        completion
    }

    /// Focus on a tapped point, in display pixel coordinates.
    ///
    /// Completes with the driver's focus result; completes with `false` when
    /// the session is not open.
    pub fn set_focus(&self, tap_x: f32, tap_y: f32) -> Completion<bool> {
        let (done, completion) = oneshot::channel();
        self.send(Command::SetFocus { tap_x, tap_y, done });
        completion
    }

    /// Apply a pinch span delta to the digital zoom. Fire-and-forget; a
    /// delta below one zoom step is skipped without touching the driver.
    pub fn set_zoom(&self, span_delta: f32) {
        self.send(Command::SetZoom { span_delta });
    }

    /// Capture a still picture.
    ///
    /// Single-shot model: the device is closed after the capture, whatever
    /// the outcome. Fails with [`SessionError::NotOpen`] when the session is
    /// not in the Opened state, leaving the state unchanged.
    pub fn take_picture(&self) -> Completion<CaptureOutcome> {
        let (done, completion) = oneshot::channel();
        self.send(Command::TakePicture { done });
        completion
    }

    /// Set the surface the preview renders into. Takes effect on the next
    /// open.
    pub fn set_surface_target(&self, target: SurfaceTarget) {
        self.send(Command::SetSurfaceTarget { target });
    }

    /// Record the tilt rotation (degrees) classified from the accelerometer;
    /// applied to the next capture.
    pub fn set_sensor_rotation(&self, degrees: u32) {
        self.send(Command::SetSensorRotation { degrees });
    }

    /// Record the host display rotation, used for preview orientation and
    /// capture post-processing.
    pub fn set_display_rotation(&self, rotation: DisplayRotation) {
        self.send(Command::SetDisplayRotation { rotation });
    }

    /// Whether a device is currently held (Opened or Shooting)
    pub fn is_opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    /// Whether both a back and a front camera were enumerated
    pub fn has_multiple_devices(&self) -> bool {
        self.multi_camera
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("session worker is gone; command dropped");
        }
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("opened", &self.is_opened())
            .field("multi_camera", &self.multi_camera)
            .finish()
    }
}
