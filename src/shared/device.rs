use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validators::{validate_brightness, validate_target_temperature};

/// Device status values used across all variants
pub mod status {
    pub const ON: &str = "on";
    pub const OFF: &str = "off";
    pub const RECORDING: &str = "recording";
}

/// The set of built-in device kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Light,
    Thermostat,
    SecurityCamera,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Light => "light",
            DeviceKind::Thermostat => "thermostat",
            DeviceKind::SecurityCamera => "security_camera",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every device variant
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceBase {
    pub device_id: String,
    pub device_name: String,
    pub status: String,
}

impl DeviceBase {
    fn new(device_id: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: device_name.into(),
            status: status::OFF.to_string(),
        }
    }
}

/// A dimmable light.
///
/// Invariant: `is_on` holds exactly when `brightness > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub base: DeviceBase,
    pub brightness: u8,
    pub is_on: bool,
}

impl Light {
    pub fn new(device_id: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            base: DeviceBase::new(device_id, device_name),
            brightness: 0,
            is_on: false,
        }
    }

    pub fn turn_on(&mut self) {
        self.is_on = true;
        // Restore full brightness only when coming from dark
        if self.brightness == 0 {
            self.brightness = 100;
        }
        self.base.status = status::ON.to_string();
    }

    pub fn turn_off(&mut self) {
        self.is_on = false;
        self.brightness = 0;
        self.base.status = status::OFF.to_string();
    }

    /// Set the brightness level, deriving `is_on` and `status` from `level > 0`.
    /// Levels outside 0..=100 are rejected and leave the light unchanged.
    pub fn set_brightness(&mut self, level: i64) -> Result<(), CoreError> {
        validate_brightness(level)?;

        self.brightness = level as u8;
        self.is_on = level > 0;
        self.base.status = if self.is_on {
            status::ON.to_string()
        } else {
            status::OFF.to_string()
        };
        Ok(())
    }

    /// Flip on/off through the regular turn_on/turn_off transitions
    /// and return the new on-state.
    pub fn toggle(&mut self) -> bool {
        if self.is_on {
            self.turn_off();
        } else {
            self.turn_on();
        }
        self.is_on
    }

    fn apply(&mut self, config: LightConfig) -> Result<(), CoreError> {
        // Validate before mutating anything
        if let Some(level) = config.brightness {
            validate_brightness(level)?;
        }
        if let Some(name) = config.device_name {
            self.base.device_name = name;
        }
        if let Some(level) = config.brightness {
            self.set_brightness(level)?;
        }
        Ok(())
    }
}

/// A thermostat with a simulated, read-only ambient temperature and a
/// bounded target temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Thermostat {
    pub base: DeviceBase,
    pub temperature: f64,
    pub target_temperature: f64,
}

impl Thermostat {
    pub fn new(device_id: impl Into<String>, device_name: impl Into<String>) -> Self {
        use rand::Rng;
        // Simulated ambient reading; there is no real sensor behind this
        let temperature = rand::thread_rng().gen_range(17.0..23.0);
        Self {
            base: DeviceBase::new(device_id, device_name),
            temperature: (temperature * 10.0_f64).round() / 10.0,
            target_temperature: 21.0,
        }
    }

    pub fn turn_on(&mut self) {
        self.base.status = status::ON.to_string();
    }

    pub fn turn_off(&mut self) {
        self.base.status = status::OFF.to_string();
    }

    /// Set the target temperature. Targets outside [10.0, 35.0] are rejected.
    pub fn set_target_temperature(&mut self, target: f64) -> Result<(), CoreError> {
        validate_target_temperature(target)?;
        self.target_temperature = target;
        Ok(())
    }

    fn apply(&mut self, config: ThermostatConfig) -> Result<(), CoreError> {
        if let Some(target) = config.target_temperature {
            validate_target_temperature(target)?;
        }
        if let Some(name) = config.device_name {
            self.base.device_name = name;
        }
        if let Some(target) = config.target_temperature {
            self.target_temperature = target;
        }
        Ok(())
    }
}

/// A security camera.
///
/// Invariant: `recording` implies `status == "recording"`; recording can only
/// start while the camera status is `"on"`.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityCamera {
    pub base: DeviceBase,
    pub recording: bool,
    pub resolution: String,
}

impl SecurityCamera {
    pub fn new(device_id: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            base: DeviceBase::new(device_id, device_name),
            recording: false,
            resolution: "1080p".to_string(),
        }
    }

    pub fn turn_on(&mut self) {
        self.base.status = status::ON.to_string();
    }

    pub fn turn_off(&mut self) {
        // Turning off always stops recording
        self.recording = false;
        self.base.status = status::OFF.to_string();
    }

    /// Start recording. No-op unless the camera is on and not already
    /// recording. Returns whether recording actually started.
    pub fn start_recording(&mut self) -> bool {
        if self.base.status != status::ON || self.recording {
            return false;
        }
        self.recording = true;
        self.base.status = status::RECORDING.to_string();
        true
    }

    /// Stop recording. No-op unless currently recording.
    /// Returns whether recording actually stopped.
    pub fn stop_recording(&mut self) -> bool {
        if !self.recording {
            return false;
        }
        self.recording = false;
        self.base.status = status::ON.to_string();
        true
    }

    /// Capture a still image. Available while the camera is on or recording.
    pub fn capture_image(&self) -> Result<String, CoreError> {
        if self.base.status == status::ON || self.base.status == status::RECORDING {
            Ok(format!("{}_capture.jpg", self.base.device_id))
        } else {
            Err(CoreError::CameraUnavailable(self.base.device_id.clone()))
        }
    }

    fn apply(&mut self, config: CameraConfig) -> Result<(), CoreError> {
        if let Some(name) = config.device_name {
            self.base.device_name = name;
        }
        if let Some(resolution) = config.resolution {
            self.resolution = resolution;
        }
        Ok(())
    }
}

/// A controllable unit: one of the built-in device variants.
///
/// Serialization is a match over the tag; variant fields are always additive
/// over the shared base shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Light(Light),
    Thermostat(Thermostat),
    SecurityCamera(SecurityCamera),
}

impl Device {
    pub fn device_id(&self) -> &str {
        &self.base().device_id
    }

    pub fn device_name(&self) -> &str {
        &self.base().device_name
    }

    pub fn status(&self) -> &str {
        &self.base().status
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            Device::Light(_) => DeviceKind::Light,
            Device::Thermostat(_) => DeviceKind::Thermostat,
            Device::SecurityCamera(_) => DeviceKind::SecurityCamera,
        }
    }

    fn base(&self) -> &DeviceBase {
        match self {
            Device::Light(d) => &d.base,
            Device::Thermostat(d) => &d.base,
            Device::SecurityCamera(d) => &d.base,
        }
    }

    pub fn turn_on(&mut self) {
        match self {
            Device::Light(d) => d.turn_on(),
            Device::Thermostat(d) => d.turn_on(),
            Device::SecurityCamera(d) => d.turn_on(),
        }
    }

    pub fn turn_off(&mut self) {
        match self {
            Device::Light(d) => d.turn_off(),
            Device::Thermostat(d) => d.turn_off(),
            Device::SecurityCamera(d) => d.turn_off(),
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match self {
            Device::Light(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut SecurityCamera> {
        match self {
            Device::SecurityCamera(d) => Some(d),
            _ => None,
        }
    }

    /// Apply a typed configuration. The config variant must match the device
    /// variant; a mismatch fails without mutating the device.
    pub fn apply(&mut self, config: DeviceConfig) -> Result<(), CoreError> {
        match (&mut *self, config) {
            (Device::Light(d), DeviceConfig::Light(c)) => d.apply(c),
            (Device::Thermostat(d), DeviceConfig::Thermostat(c)) => d.apply(c),
            (Device::SecurityCamera(d), DeviceConfig::SecurityCamera(c)) => d.apply(c),
            (device, config) => Err(CoreError::WrongDeviceKind {
                device_id: device.device_id().to_string(),
                expected: config.kind(),
            }),
        }
    }

    /// Snapshot of the base fields plus variant-specific fields
    pub fn snapshot(&self) -> DeviceSnapshot {
        let base = self.base();
        let mut snapshot = DeviceSnapshot {
            device_id: base.device_id.clone(),
            device_name: base.device_name.clone(),
            device_type: self.kind(),
            status: base.status.clone(),
            brightness: None,
            is_on: None,
            temperature: None,
            target_temperature: None,
            recording: None,
            resolution: None,
        };

        match self {
            Device::Light(d) => {
                snapshot.brightness = Some(d.brightness);
                snapshot.is_on = Some(d.is_on);
            }
            Device::Thermostat(d) => {
                snapshot.temperature = Some(d.temperature);
                snapshot.target_temperature = Some(d.target_temperature);
            }
            Device::SecurityCamera(d) => {
                snapshot.recording = Some(d.recording);
                snapshot.resolution = Some(d.resolution.clone());
            }
        }

        snapshot
    }
}

/// Serialized view of a device: base fields plus the fields of its variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub device_id: String,
    pub device_name: String,
    pub device_type: DeviceKind,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Typed per-variant configuration. Unknown option names are rejected during
/// deserialization rather than silently ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceConfig {
    Light(LightConfig),
    Thermostat(ThermostatConfig),
    SecurityCamera(CameraConfig),
}

impl DeviceConfig {
    pub fn kind(&self) -> DeviceKind {
        match self {
            DeviceConfig::Light(_) => DeviceKind::Light,
            DeviceConfig::Thermostat(_) => DeviceKind::Thermostat,
            DeviceConfig::SecurityCamera(_) => DeviceKind::SecurityCamera,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightConfig {
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub brightness: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThermostatConfig {
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub target_temperature: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_light_starts_off_and_dark() {
        let light = Light::new("light1", "Kitchen");

        assert_eq!(light.base.status, "off");
        assert_eq!(light.brightness, 0);
        assert!(!light.is_on);
    }

    #[test]
    fn test_light_turn_on_restores_full_brightness_from_dark() {
        let mut light = Light::new("light1", "Kitchen");

        light.turn_on();

        assert!(light.is_on);
        assert_eq!(light.brightness, 100);
        assert_eq!(light.base.status, "on");
    }

    #[test]
    fn test_light_turn_on_keeps_existing_brightness() {
        let mut light = Light::new("light1", "Kitchen");
        light.set_brightness(40).unwrap();
        light.turn_on();

        assert_eq!(light.brightness, 40);
    }

    #[test]
    fn test_light_set_brightness_derives_on_state() {
        let mut light = Light::new("light1", "Kitchen");

        light.set_brightness(40).unwrap();
        assert!(light.is_on);
        assert_eq!(light.base.status, "on");
        assert_eq!(light.brightness, 40);

        light.set_brightness(0).unwrap();
        assert!(!light.is_on);
        assert_eq!(light.base.status, "off");
    }

    #[test]
    fn test_light_set_brightness_rejects_out_of_range() {
        let mut light = Light::new("light1", "Kitchen");
        light.set_brightness(60).unwrap();

        assert_eq!(
            light.set_brightness(101),
            Err(CoreError::InvalidBrightness(101))
        );
        assert_eq!(
            light.set_brightness(-1),
            Err(CoreError::InvalidBrightness(-1))
        );

        // Rejected levels leave the light unchanged
        assert_eq!(light.brightness, 60);
        assert!(light.is_on);
    }

    #[test]
    fn test_light_toggle_round_trip() {
        let mut light = Light::new("light1", "Kitchen");

        assert!(light.toggle());
        assert_eq!(light.brightness, 100);

        assert!(!light.toggle());
        assert_eq!(light.brightness, 0);
        assert_eq!(light.base.status, "off");
    }

    #[test]
    fn test_light_brightness_zero_iff_off() {
        let mut light = Light::new("light1", "Kitchen");

        for level in [0, 1, 50, 100] {
            light.set_brightness(level).unwrap();
            assert_eq!(light.is_on, light.brightness > 0);
        }

        light.toggle();
        assert_eq!(light.is_on, light.brightness > 0);
        light.toggle();
        assert_eq!(light.is_on, light.brightness > 0);
    }

    #[test]
    fn test_thermostat_target_bounds() {
        let mut thermostat = Thermostat::new("thermo1", "Hallway");

        assert!(thermostat.set_target_temperature(10.0).is_ok());
        assert!(thermostat.set_target_temperature(35.0).is_ok());
        assert_eq!(
            thermostat.set_target_temperature(9.9),
            Err(CoreError::InvalidTargetTemperature(9.9))
        );
        assert_eq!(
            thermostat.set_target_temperature(35.5),
            Err(CoreError::InvalidTargetTemperature(35.5))
        );

        // Last accepted target sticks
        assert_eq!(thermostat.target_temperature, 35.0);
    }

    #[test]
    fn test_thermostat_simulated_temperature_in_range() {
        let thermostat = Thermostat::new("thermo1", "Hallway");
        assert!(thermostat.temperature >= 17.0 && thermostat.temperature <= 23.0);
    }

    #[test]
    fn test_camera_recording_requires_on() {
        let mut camera = SecurityCamera::new("cam1", "Front Door");

        // Off: no-op
        assert!(!camera.start_recording());
        assert!(!camera.recording);

        camera.turn_on();
        assert!(camera.start_recording());
        assert!(camera.recording);
        assert_eq!(camera.base.status, "recording");

        // Already recording: no-op
        assert!(!camera.start_recording());
    }

    #[test]
    fn test_camera_stop_recording() {
        let mut camera = SecurityCamera::new("cam1", "Front Door");

        // Not recording: no-op
        assert!(!camera.stop_recording());

        camera.turn_on();
        camera.start_recording();
        assert!(camera.stop_recording());
        assert!(!camera.recording);
        assert_eq!(camera.base.status, "on");
    }

    #[test]
    fn test_camera_turn_off_stops_recording() {
        let mut camera = SecurityCamera::new("cam1", "Front Door");
        camera.turn_on();
        camera.start_recording();

        camera.turn_off();

        assert!(!camera.recording);
        assert_eq!(camera.base.status, "off");
    }

    #[test]
    fn test_camera_capture_image_availability() {
        let mut camera = SecurityCamera::new("cam1", "Front Door");

        assert_eq!(
            camera.capture_image(),
            Err(CoreError::CameraUnavailable("cam1".to_string()))
        );

        camera.turn_on();
        assert_eq!(camera.capture_image().unwrap(), "cam1_capture.jpg");

        camera.start_recording();
        assert_eq!(camera.capture_image().unwrap(), "cam1_capture.jpg");
    }

    #[test]
    fn test_snapshot_light_fields() {
        let mut device = Device::Light(Light::new("light1", "Kitchen"));
        device.as_light_mut().unwrap().set_brightness(40).unwrap();

        let snapshot = device.snapshot();
        assert_eq!(snapshot.device_id, "light1");
        assert_eq!(snapshot.device_type, DeviceKind::Light);
        assert_eq!(snapshot.status, "on");
        assert_eq!(snapshot.brightness, Some(40));
        assert_eq!(snapshot.is_on, Some(true));
        assert!(snapshot.temperature.is_none());
        assert!(snapshot.recording.is_none());

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""device_type":"light""#));
        assert!(json.contains(r#""brightness":40"#));
        // Variant fields of other kinds are omitted entirely
        assert!(!json.contains("temperature"));
        assert!(!json.contains("resolution"));
    }

    #[test]
    fn test_snapshot_camera_fields() {
        let device = Device::SecurityCamera(SecurityCamera::new("cam1", "Front Door"));

        let snapshot = device.snapshot();
        assert_eq!(snapshot.device_type, DeviceKind::SecurityCamera);
        assert_eq!(snapshot.recording, Some(false));
        assert_eq!(snapshot.resolution.as_deref(), Some("1080p"));
        assert!(snapshot.brightness.is_none());
    }

    #[test]
    fn test_apply_matching_config() {
        let mut device = Device::Light(Light::new("light1", "Kitchen"));

        device
            .apply(DeviceConfig::Light(LightConfig {
                device_name: Some("Kitchen Main".to_string()),
                brightness: Some(25),
            }))
            .unwrap();

        assert_eq!(device.device_name(), "Kitchen Main");
        let snapshot = device.snapshot();
        assert_eq!(snapshot.brightness, Some(25));
        assert_eq!(snapshot.is_on, Some(true));
    }

    #[test]
    fn test_apply_wrong_kind_leaves_device_unchanged() {
        let mut device = Device::Light(Light::new("light1", "Kitchen"));
        let before = device.clone();

        let result = device.apply(DeviceConfig::Thermostat(ThermostatConfig {
            device_name: Some("Nope".to_string()),
            target_temperature: Some(22.0),
        }));

        assert_eq!(
            result,
            Err(CoreError::WrongDeviceKind {
                device_id: "light1".to_string(),
                expected: DeviceKind::Thermostat,
            })
        );
        assert_eq!(device, before);
    }

    #[test]
    fn test_apply_invalid_brightness_leaves_name_unchanged() {
        let mut device = Device::Light(Light::new("light1", "Kitchen"));

        let result = device.apply(DeviceConfig::Light(LightConfig {
            device_name: Some("Renamed".to_string()),
            brightness: Some(500),
        }));

        assert_eq!(result, Err(CoreError::InvalidBrightness(500)));
        assert_eq!(device.device_name(), "Kitchen");
    }

    #[test]
    fn test_device_config_rejects_unknown_fields() {
        let result: Result<DeviceConfig, _> =
            serde_json::from_str(r#"{"light": {"brightness": 50, "color": "red"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_device_config_deserializes_tagged_variants() {
        let config: DeviceConfig =
            serde_json::from_str(r#"{"thermostat": {"target_temperature": 22.5}}"#).unwrap();
        assert_eq!(config.kind(), DeviceKind::Thermostat);

        let config: DeviceConfig =
            serde_json::from_str(r#"{"security_camera": {"resolution": "4k"}}"#).unwrap();
        assert_eq!(config.kind(), DeviceKind::SecurityCamera);
    }
}
