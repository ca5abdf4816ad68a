// SPDX-License-Identifier: GPL-3.0-only

//! Session configuration

use serde::{Deserialize, Serialize};

/// Tunables for a capture session
///
/// The defaults match the behavior of the stock component; hosts embedding
/// the session can persist and restore this struct alongside their own
/// settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JPEG quality requested from the driver, in [1, 100]
    pub jpeg_quality: u8,
    /// Scale of the tap focus area relative to the base size
    pub focus_area_coefficient: f32,
    /// Scale of the tap metering area; wider than the focus area so exposure
    /// samples the surroundings of the tapped subject
    pub metering_area_coefficient: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 100,
            focus_area_coefficient: 1.0,
            metering_area_coefficient: 1.5,
        }
    }
}
