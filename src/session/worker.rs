// SPDX-License-Identifier: GPL-3.0-only

//! Session worker: the single thread all device access is serialized on

use super::{CaptureOutcome, Command, SessionState};
use crate::config::SessionConfig;
use crate::device::types::{DeviceDescriptor, DisplayRotation, Facing, SurfaceTarget};
use crate::device::{CaptureDevice, DeviceHost};
use crate::errors::{SessionError, SessionResult};
use crate::{geometry, processing};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Owns all mutable session state. Only ever touched on the worker thread,
/// so no locking is needed.
pub(crate) struct SessionWorker {
    host: Box<dyn DeviceHost>,
    devices: Vec<DeviceDescriptor>,
    config: SessionConfig,
    state: SessionState,
    device: Option<Box<dyn CaptureDevice>>,
    /// Index into `devices` of the selected camera
    current: Option<usize>,
    surface: Option<SurfaceTarget>,
    /// Tilt rotation (degrees) last reported by the host
    sensor_rotation: u32,
    display_rotation: DisplayRotation,
    /// Mirror of `state != Idle` readable from session handles
    opened_flag: Arc<AtomicBool>,
}

impl SessionWorker {
    pub(crate) fn new(
        host: Box<dyn DeviceHost>,
        devices: Vec<DeviceDescriptor>,
        config: SessionConfig,
        opened_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            host,
            devices,
            config,
            state: SessionState::Idle,
            device: None,
            current: None,
            surface: None,
            sensor_rotation: 0,
            display_rotation: DisplayRotation::Deg0,
            opened_flag,
        }
    }

    /// Drain commands until every session handle is dropped, then tear down.
    pub(crate) fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        debug!("session worker started");
        while let Some(command) = commands.blocking_recv() {
            self.handle(command);
        }
        self.close_immediate();
        debug!("session worker exiting");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Open { done } => {
                let success = self.open_immediate();
                let _ = done.send(success);
            }
            Command::Close => self.close_immediate(),
            Command::SwitchCamera { done } => {
                let success = self.switch_camera();
                let _ = done.send(success);
            }
            Command::SetFocus { tap_x, tap_y, done } => {
                let focused = self.set_focus(tap_x, tap_y);
                let _ = done.send(focused);
            }
            Command::SetZoom { span_delta } => self.set_zoom(span_delta),
            Command::TakePicture { done } => {
                let outcome = self.take_picture();
                let _ = done.send(outcome);
            }
            Command::SetSurfaceTarget { target } => {
                debug!(dimensions = %target.dimensions, "surface target set");
                self.surface = Some(target);
            }
            Command::SetSensorRotation { degrees } => self.sensor_rotation = degrees % 360,
            Command::SetDisplayRotation { rotation } => self.display_rotation = rotation,
        }
    }

    /// Close whatever is open, resolve a device id, and run the open path.
    /// Returns whether the session reached the Opened state.
    fn open_immediate(&mut self) -> bool {
        self.close_immediate();

        let Some(surface) = self.surface else {
            warn!("open requested without a surface target");
            return false;
        };

        if self.current.is_none() {
            self.current = self.default_device_index();
        }
        let Some(descriptor) = self.current.and_then(|i| self.devices.get(i)).copied() else {
            warn!("open requested but no camera device is available");
            return false;
        };

        let mut device = match self.host.open(descriptor.id) {
            Ok(device) => device,
            Err(err) => {
                error!(id = descriptor.id, error = %err, "opening camera device failed");
                return false;
            }
        };

        match self.configure_device(device.as_mut(), descriptor, &surface) {
            Ok(()) => {
                info!(id = descriptor.id, facing = %descriptor.facing, "camera opened");
                self.device = Some(device);
                self.set_state(SessionState::Opened);
                true
            }
            Err(err) => {
                // Never leave a half-open handle behind.
                error!(error = %err, "configuring camera failed");
                device.stop_preview();
                device.release();
                false
            }
        }
    }

    /// Apply preview parameters, orientation, and surface, then start the
    /// preview. Parameter rejection is tolerated; anything else aborts.
    fn configure_device(
        &self,
        device: &mut dyn CaptureDevice,
        descriptor: DeviceDescriptor,
        surface: &SurfaceTarget,
    ) -> SessionResult<()> {
        let mut params = device.parameters()?;
        geometry::plan_preview_parameters(surface.dimensions, &mut params, &self.config);
        if let Err(err) = device.set_parameters(&params) {
            warn!(error = %err, "driver rejected preview parameters, keeping prior ones");
        }

        let orientation = geometry::display_orientation(
            descriptor.mount_angle,
            descriptor.facing,
            self.display_rotation,
        );
        device.set_display_orientation(orientation)?;
        device.set_preview_target(surface)?;
        device.start_preview()?;
        Ok(())
    }

    /// Back camera if present, otherwise the first enumerated device.
    fn default_device_index(&self) -> Option<usize> {
        self.devices
            .iter()
            .position(|d| d.facing == Facing::Back)
            .or(if self.devices.is_empty() { None } else { Some(0) })
    }

    fn switch_camera(&mut self) -> bool {
        let back = self.devices.iter().position(|d| d.facing == Facing::Back);
        let front = self.devices.iter().position(|d| d.facing == Facing::Front);
        let (Some(back), Some(front)) = (back, front) else {
            debug!("switch requested with a single camera");
            return false;
        };

        self.current = Some(if self.current == Some(back) { front } else { back });
        self.open_immediate()
    }

    fn set_focus(&mut self, tap_x: f32, tap_y: f32) -> bool {
        if self.state != SessionState::Opened {
            return false;
        }
        let Some(surface) = self.surface else {
            return false;
        };
        let Some(device) = self.device.as_mut() else {
            return false;
        };

        device.cancel_auto_focus();
        match device.parameters() {
            Ok(mut params) => {
                geometry::plan_focus_parameters(
                    surface.dimensions,
                    &mut params,
                    tap_x,
                    tap_y,
                    &self.config,
                );
                if let Err(err) = device.set_parameters(&params) {
                    warn!(error = %err, "driver rejected focus parameters");
                }
            }
            Err(err) => warn!(error = %err, "reading parameters for focus failed"),
        }

        match device.auto_focus() {
            Ok(focused) => {
                debug!(focused, "auto focus result");
                focused
            }
            Err(err) => {
                warn!(error = %err, "auto focus failed");
                false
            }
        }
    }

    fn set_zoom(&mut self, span_delta: f32) {
        if self.state != SessionState::Opened {
            return;
        }
        let Some(surface) = self.surface else {
            return;
        };
        let Some(device) = self.device.as_mut() else {
            return;
        };

        let mut params = match device.parameters() {
            Ok(params) => params,
            Err(err) => {
                warn!(error = %err, "reading parameters for zoom failed");
                return;
            }
        };
        if !params.zoom_supported {
            return;
        }

        let update = geometry::compute_zoom(surface.dimensions, params.zoom, span_delta);
        if !update.changed {
            return;
        }
        debug!(level = update.state.current, "applying zoom level");
        params.zoom = update.state;
        if let Err(err) = device.set_parameters(&params) {
            warn!(error = %err, "driver rejected zoom parameters");
        }
    }

    /// Single-shot capture: Opened → Shooting → (close) → Idle.
    fn take_picture(&mut self) -> CaptureOutcome {
        if self.state != SessionState::Opened {
            return Err(SessionError::NotOpen);
        }
        let Some(descriptor) = self.current.and_then(|i| self.devices.get(i)).copied() else {
            return Err(SessionError::NotOpen);
        };

        self.set_state(SessionState::Shooting);
        let result = match self.device.as_mut() {
            Some(device) => {
                debug!("capture starting");
                device.take_picture()
            }
            None => Err(crate::device::types::DeviceError::CaptureFailed(
                "no open device".to_string(),
            )),
        };

        // The preview session ends with the shot, success or not.
        self.close_immediate();

        let payload = result?;
        let orientation = geometry::display_orientation(
            descriptor.mount_angle,
            descriptor.facing,
            self.display_rotation,
        );
        processing::orient_capture(&payload, descriptor.facing, orientation, self.sensor_rotation)
    }

    /// Unconditional teardown; idempotent, any state → Idle.
    fn close_immediate(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.stop_preview();
            device.release();
        }
        if self.state != SessionState::Idle {
            self.set_state(SessionState::Idle);
        }
    }

    fn set_state(&mut self, state: SessionState) {
        debug!(from = ?self.state, to = ?state, "session state change");
        self.state = state;
        self.opened_flag
            .store(state != SessionState::Idle, Ordering::SeqCst);
    }
}
