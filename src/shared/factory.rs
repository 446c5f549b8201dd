use std::collections::HashMap;
use std::sync::RwLock;

use crate::device::{Device, Light, SecurityCamera, Thermostat};
use crate::error::CoreError;
use crate::id_generator::IdGenerator;

/// Optional overrides supplied when constructing a device
#[derive(Debug, Clone, Default)]
pub struct DeviceSpec {
    pub device_id: Option<String>,
    pub device_name: Option<String>,
}

impl DeviceSpec {
    pub fn named(device_name: impl Into<String>) -> Self {
        Self {
            device_id: None,
            device_name: Some(device_name.into()),
        }
    }
}

type Constructor = Box<dyn Fn(String, String) -> Device + Send + Sync>;

/// Registry of device constructors keyed by lower-cased type tag.
///
/// Explicitly constructed and passed by reference to whoever creates devices;
/// there is no process-wide singleton. The variant set is open: new kinds can
/// be registered at runtime without touching existing call sites.
pub struct DeviceRegistry {
    constructors: RwLock<HashMap<String, Constructor>>,
}

impl DeviceRegistry {
    /// Empty registry with no constructors
    pub fn new() -> Self {
        Self {
            constructors: RwLock::new(HashMap::new()),
        }
    }

    /// Registry pre-populated with the built-in device kinds
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register("light", |id, name| Device::Light(Light::new(id, name)));
        registry.register("thermostat", |id, name| {
            Device::Thermostat(Thermostat::new(id, name))
        });
        registry.register("security_camera", |id, name| {
            Device::SecurityCamera(SecurityCamera::new(id, name))
        });
        // Accepted alias for the camera tag
        registry.register("securitycamera", |id, name| {
            Device::SecurityCamera(SecurityCamera::new(id, name))
        });
        registry
    }

    /// Register a constructor under the given tag (stored lower-cased)
    pub fn register<F>(&self, tag: &str, ctor: F)
    where
        F: Fn(String, String) -> Device + Send + Sync + 'static,
    {
        self.constructors
            .write()
            .expect("device registry lock poisoned")
            .insert(tag.to_lowercase(), Box::new(ctor));
    }

    /// Construct a device for the given type tag.
    ///
    /// Missing id/name in the spec fall back to a fresh uuid and a default
    /// name derived from the tag and the id prefix.
    pub fn create(
        &self,
        tag: &str,
        spec: DeviceSpec,
        ids: &dyn IdGenerator,
    ) -> Result<Device, CoreError> {
        let key = tag.to_lowercase();
        let constructors = self
            .constructors
            .read()
            .expect("device registry lock poisoned");
        let ctor = constructors
            .get(&key)
            .ok_or_else(|| CoreError::UnknownDeviceType(tag.to_string()))?;

        let device_id = spec.device_id.unwrap_or_else(|| ids.next_id());
        let device_name = spec
            .device_name
            .unwrap_or_else(|| default_device_name(&key, &device_id));

        Ok(ctor(device_id, device_name))
    }

    pub fn registered_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .constructors
            .read()
            .expect("device registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        tags.sort();
        tags
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Default name for a device: tag plus the first 8 characters of its id
fn default_device_name(tag: &str, device_id: &str) -> String {
    let prefix: String = device_id.chars().take(8).collect();
    format!("{}-{}", tag, prefix)
}
