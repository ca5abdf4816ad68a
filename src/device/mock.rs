// SPDX-License-Identifier: GPL-3.0-only

//! Mock device host for testing without hardware
//!
//! Devices are described by [`MockDeviceSpec`]s with programmable failure
//! modes; every driver call is counted in a shared [`Journal`] the test can
//! inspect.

use super::types::*;
use super::{CaptureDevice, DeviceHost};
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Counters of driver calls, shared between the host, its devices, and the
/// test.
#[derive(Debug, Default, Clone)]
pub struct Journal {
    pub opens: u32,
    pub releases: u32,
    pub parameter_writes: u32,
    pub preview_starts: u32,
    pub preview_stops: u32,
    pub captures: u32,
    pub focus_runs: u32,
    pub focus_cancels: u32,
    pub last_display_orientation: Option<u32>,
}

/// Shared journal handle
pub type SharedJournal = Arc<Mutex<Journal>>;

/// Behavior of one mock device
#[derive(Debug, Clone)]
pub struct MockDeviceSpec {
    descriptor: DeviceDescriptor,
    parameters: DeviceParameters,
    payload: Vec<u8>,
    focus_result: bool,
    fail_open: bool,
    reject_parameters: bool,
}

impl MockDeviceSpec {
    /// A rear camera mounted at the usual 90°
    pub fn back() -> Self {
        Self::with_facing(Facing::Back, 90)
    }

    /// A front camera mounted at the usual 270°
    pub fn front() -> Self {
        Self::with_facing(Facing::Front, 270)
    }

    fn with_facing(facing: Facing, mount_angle: u32) -> Self {
        Self {
            descriptor: DeviceDescriptor {
                id: 0,
                facing,
                mount_angle,
            },
            parameters: default_parameters(),
            payload: test_payload(),
            focus_result: true,
            fail_open: false,
            reject_parameters: false,
        }
    }

    /// Override the sensor mount angle
    #[must_use]
    pub fn with_mount_angle(mut self, mount_angle: u32) -> Self {
        self.descriptor.mount_angle = mount_angle;
        self
    }

    /// Override the capture payload the device produces
    #[must_use]
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Override the initial parameter block
    #[must_use]
    pub fn with_parameters(mut self, parameters: DeviceParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the result every autofocus sweep reports
    #[must_use]
    pub fn with_focus_result(mut self, focus_result: bool) -> Self {
        self.focus_result = focus_result;
        self
    }

    /// Make `open` fail for this device
    #[must_use]
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Make every parameter write fail
    #[must_use]
    pub fn rejecting_parameters(mut self) -> Self {
        self.reject_parameters = true;
        self
    }
}

/// A parameter block resembling a midrange phone camera
fn default_parameters() -> DeviceParameters {
    let sizes = vec![
        Dimensions::new(1920, 1080),
        Dimensions::new(1280, 720),
        Dimensions::new(640, 480),
    ];
    DeviceParameters {
        supported_preview_sizes: sizes.clone(),
        supported_picture_sizes: sizes,
        supported_focus_modes: vec![FocusMode::Auto, FocusMode::ContinuousPicture],
        supported_picture_formats: vec![PictureFormat::Jpeg],
        jpeg_quality: 85,
        max_focus_areas: 1,
        max_metering_areas: 1,
        zoom_supported: true,
        zoom: ZoomState::new(0, 30),
        ..DeviceParameters::default()
    }
}

/// A 2x1 PNG with a red pixel left and a blue pixel right.
///
/// Lossless, so tests can assert on pixel positions after rotation and
/// mirroring.
pub fn test_payload() -> Vec<u8> {
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encoding the test payload cannot fail");
    bytes
}

/// Mock device host
pub struct MockHost {
    specs: Vec<MockDeviceSpec>,
    journal: SharedJournal,
}

impl MockHost {
    /// Create a host with no devices
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            journal: Arc::new(Mutex::new(Journal::default())),
        }
    }

    /// Add a device; its id becomes its position in the enumeration
    #[must_use]
    pub fn with_device(mut self, mut spec: MockDeviceSpec) -> Self {
        spec.descriptor.id = self.specs.len();
        self.specs.push(spec);
        self
    }

    /// Handle to the call journal, for assertions after the fact
    pub fn journal(&self) -> SharedJournal {
        Arc::clone(&self.journal)
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceHost for MockHost {
    fn enumerate(&self) -> Vec<DeviceDescriptor> {
        self.specs.iter().map(|spec| spec.descriptor).collect()
    }

    fn open(&self, id: DeviceId) -> DeviceResult<Box<dyn CaptureDevice>> {
        let spec = self
            .specs
            .get(id)
            .ok_or_else(|| DeviceError::NotFound(format!("no device with id {}", id)))?;
        if spec.fail_open {
            return Err(DeviceError::OpenFailed(format!("device {} is busy", id)));
        }
        self.journal.lock().unwrap().opens += 1;
        Ok(Box::new(MockDevice {
            spec: spec.clone(),
            parameters: spec.parameters.clone(),
            journal: Arc::clone(&self.journal),
        }))
    }
}

/// An open mock device
pub struct MockDevice {
    spec: MockDeviceSpec,
    parameters: DeviceParameters,
    journal: SharedJournal,
}

impl CaptureDevice for MockDevice {
    fn parameters(&self) -> DeviceResult<DeviceParameters> {
        Ok(self.parameters.clone())
    }

    fn set_parameters(&mut self, params: &DeviceParameters) -> DeviceResult<()> {
        self.journal.lock().unwrap().parameter_writes += 1;
        if self.spec.reject_parameters {
            return Err(DeviceError::ParameterRejected(
                "mock driver rejects all writes".to_string(),
            ));
        }
        self.parameters = params.clone();
        Ok(())
    }

    fn set_display_orientation(&mut self, degrees: u32) -> DeviceResult<()> {
        self.journal.lock().unwrap().last_display_orientation = Some(degrees);
        Ok(())
    }

    fn set_preview_target(&mut self, _target: &SurfaceTarget) -> DeviceResult<()> {
        Ok(())
    }

    fn start_preview(&mut self) -> DeviceResult<()> {
        self.journal.lock().unwrap().preview_starts += 1;
        Ok(())
    }

    fn stop_preview(&mut self) {
        self.journal.lock().unwrap().preview_stops += 1;
    }

    fn cancel_auto_focus(&mut self) {
        self.journal.lock().unwrap().focus_cancels += 1;
    }

    fn auto_focus(&mut self) -> DeviceResult<bool> {
        self.journal.lock().unwrap().focus_runs += 1;
        Ok(self.spec.focus_result)
    }

    fn take_picture(&mut self) -> DeviceResult<Vec<u8>> {
        self.journal.lock().unwrap().captures += 1;
        Ok(self.spec.payload.clone())
    }

    fn release(&mut self) {
        self.journal.lock().unwrap().releases += 1;
    }
}
