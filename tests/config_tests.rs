// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use camera_session::SessionConfig;

#[test]
fn test_config_default() {
    let config = SessionConfig::default();

    assert_eq!(config.jpeg_quality, 100, "JPEG quality should default to max");
    assert_eq!(config.focus_area_coefficient, 1.0);
    assert!(
        config.metering_area_coefficient > config.focus_area_coefficient,
        "Metering should sample a wider area than focus"
    );
}

#[test]
fn test_config_round_trips_through_json() {
    let config = SessionConfig {
        jpeg_quality: 85,
        focus_area_coefficient: 1.2,
        metering_area_coefficient: 2.0,
    };

    let json = serde_json::to_string(&config).unwrap();
    let restored: SessionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}
