use std::collections::HashMap;
use std::sync::RwLock;

use indexmap::IndexMap;

use crate::device::{Device, DeviceSnapshot};
use crate::error::CoreError;

/// Per-user collection of devices, keyed by device id.
///
/// Iteration order is insertion order; listings are never sorted.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub user_id: String,
    devices: IndexMap<String, Device>,
}

impl Dashboard {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            devices: IndexMap::new(),
        }
    }

    /// Add a device. Returns false (and keeps the existing device) when the
    /// id is already present; there is no overwrite.
    pub fn add_device(&mut self, device: Device) -> bool {
        if self.devices.contains_key(device.device_id()) {
            return false;
        }
        self.devices.insert(device.device_id().to_string(), device);
        true
    }

    /// Remove a device by id, reporting whether one was present
    pub fn remove_device(&mut self, device_id: &str) -> bool {
        // shift_remove keeps the remaining insertion order intact
        self.devices.shift_remove(device_id).is_some()
    }

    pub fn get_device(&self, device_id: &str) -> Option<&Device> {
        self.devices.get(device_id)
    }

    pub fn get_device_mut(&mut self, device_id: &str) -> Option<&mut Device> {
        self.devices.get_mut(device_id)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Snapshot every device in insertion order
    pub fn snapshots(&self) -> Vec<DeviceSnapshot> {
        self.devices.values().map(Device::snapshot).collect()
    }
}

/// All dashboards in the process, one per user, guarded by a single lock so
/// exists-check-then-insert sequences are atomic.
#[derive(Default)]
pub struct DashboardStore {
    inner: RwLock<HashMap<String, Dashboard>>,
}

impl DashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device to the user's dashboard, creating the dashboard lazily
    /// on first addition. Duplicate device ids are refused.
    pub fn add_device(&self, user_id: &str, device: Device) -> Result<DeviceSnapshot, CoreError> {
        let mut dashboards = self.inner.write().expect("dashboard store lock poisoned");
        let dashboard = dashboards
            .entry(user_id.to_string())
            .or_insert_with(|| Dashboard::new(user_id));

        let snapshot = device.snapshot();
        if !dashboard.add_device(device) {
            return Err(CoreError::DuplicateDevice(snapshot.device_id));
        }
        Ok(snapshot)
    }

    /// Remove a device from the user's dashboard
    pub fn remove_device(&self, user_id: &str, device_id: &str) -> Result<(), CoreError> {
        let mut dashboards = self.inner.write().expect("dashboard store lock poisoned");
        let dashboard = dashboards
            .get_mut(user_id)
            .ok_or(CoreError::DashboardNotFound)?;
        if dashboard.remove_device(device_id) {
            Ok(())
        } else {
            Err(CoreError::DeviceNotFound)
        }
    }

    /// Snapshot the user's devices in insertion order.
    /// A user without a dashboard has no devices.
    pub fn list_devices(&self, user_id: &str) -> Vec<DeviceSnapshot> {
        let dashboards = self.inner.read().expect("dashboard store lock poisoned");
        dashboards
            .get(user_id)
            .map(Dashboard::snapshots)
            .unwrap_or_default()
    }

    /// Whether the user's dashboard contains the device
    pub fn contains_device(&self, user_id: &str, device_id: &str) -> bool {
        let dashboards = self.inner.read().expect("dashboard store lock poisoned");
        dashboards
            .get(user_id)
            .map(|d| d.get_device(device_id).is_some())
            .unwrap_or(false)
    }

    /// Name of a device on the user's dashboard, if present
    pub fn device_name(&self, user_id: &str, device_id: &str) -> Option<String> {
        let dashboards = self.inner.read().expect("dashboard store lock poisoned");
        dashboards
            .get(user_id)?
            .get_device(device_id)
            .map(|d| d.device_name().to_string())
    }

    /// Run a closure against a mutable device, holding the store lock for the
    /// whole find-then-mutate sequence.
    pub fn with_device_mut<R>(
        &self,
        user_id: &str,
        device_id: &str,
        f: impl FnOnce(&mut Device) -> Result<R, CoreError>,
    ) -> Result<R, CoreError> {
        let mut dashboards = self.inner.write().expect("dashboard store lock poisoned");
        let dashboard = dashboards
            .get_mut(user_id)
            .ok_or(CoreError::DashboardNotFound)?;
        let device = dashboard
            .get_device_mut(device_id)
            .ok_or(CoreError::DeviceNotFound)?;
        f(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Light;

    fn light(id: &str, name: &str) -> Device {
        Device::Light(Light::new(id, name))
    }

    #[test]
    fn test_add_device_rejects_duplicate_id() {
        let mut dashboard = Dashboard::new("user1");

        assert!(dashboard.add_device(light("light1", "Kitchen")));
        assert!(!dashboard.add_device(light("light1", "Shadow")));

        // Exactly one device with that id, and the original survives
        assert_eq!(dashboard.device_count(), 1);
        assert_eq!(
            dashboard.get_device("light1").unwrap().device_name(),
            "Kitchen"
        );
    }

    #[test]
    fn test_remove_device_reports_presence() {
        let mut dashboard = Dashboard::new("user1");
        dashboard.add_device(light("light1", "Kitchen"));

        assert!(dashboard.remove_device("light1"));
        assert!(!dashboard.remove_device("light1"));
        assert_eq!(dashboard.device_count(), 0);
    }

    #[test]
    fn test_snapshots_preserve_insertion_order() {
        let mut dashboard = Dashboard::new("user1");
        dashboard.add_device(light("b", "Second"));
        dashboard.add_device(light("a", "First-alphabetically"));
        dashboard.add_device(light("c", "Third"));

        let ids: Vec<String> = dashboard
            .snapshots()
            .into_iter()
            .map(|s| s.device_id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_snapshots_order_survives_removal() {
        let mut dashboard = Dashboard::new("user1");
        dashboard.add_device(light("a", "A"));
        dashboard.add_device(light("b", "B"));
        dashboard.add_device(light("c", "C"));

        dashboard.remove_device("b");

        let ids: Vec<String> = dashboard
            .snapshots()
            .into_iter()
            .map(|s| s.device_id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_store_creates_dashboard_lazily() {
        let store = DashboardStore::new();
        assert!(store.list_devices("user1").is_empty());

        store.add_device("user1", light("light1", "Kitchen")).unwrap();

        let devices = store.list_devices("user1");
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_id, "light1");
    }

    #[test]
    fn test_store_duplicate_device_id() {
        let store = DashboardStore::new();
        store.add_device("user1", light("light1", "Kitchen")).unwrap();

        let result = store.add_device("user1", light("light1", "Shadow"));
        assert_eq!(
            result.err(),
            Some(CoreError::DuplicateDevice("light1".to_string()))
        );
        assert_eq!(store.list_devices("user1").len(), 1);
    }

    #[test]
    fn test_store_remove_errors() {
        let store = DashboardStore::new();

        // No dashboard yet
        assert_eq!(
            store.remove_device("user1", "light1"),
            Err(CoreError::DashboardNotFound)
        );

        store.add_device("user1", light("light1", "Kitchen")).unwrap();
        assert_eq!(
            store.remove_device("user1", "nope"),
            Err(CoreError::DeviceNotFound)
        );
        assert!(store.remove_device("user1", "light1").is_ok());
    }

    #[test]
    fn test_store_with_device_mut() {
        let store = DashboardStore::new();
        store.add_device("user1", light("light1", "Kitchen")).unwrap();

        let is_on = store
            .with_device_mut("user1", "light1", |device| {
                Ok(device.as_light_mut().expect("is a light").toggle())
            })
            .unwrap();
        assert!(is_on);

        let result: Result<(), CoreError> =
            store.with_device_mut("user1", "missing", |_| Ok(()));
        assert_eq!(result, Err(CoreError::DeviceNotFound));
    }

    #[test]
    fn test_store_isolates_users() {
        let store = DashboardStore::new();
        store.add_device("user1", light("light1", "Kitchen")).unwrap();

        assert!(store.list_devices("user2").is_empty());
        assert!(!store.contains_device("user2", "light1"));
        assert!(store.contains_device("user1", "light1"));
    }
}
