use std::sync::Arc;

use smart_home_backend::shared::dashboard::DashboardStore;
use smart_home_backend::shared::device::{Device, Light};
use smart_home_backend::shared::factory::DeviceRegistry;
use smart_home_backend::shared::id_generator::{IdGenerator, UuidIdGenerator};
use smart_home_backend::shared::integrations::IntegrationsService;
use smart_home_backend::shared::notifications::NotificationService;
use smart_home_backend::shared::scheduler::Scheduler;
use smart_home_backend::shared::sessions::{SessionService, User};
use smart_home_backend::shared::time::{Clock, SystemClock};

use crate::config::ApiConfig;

/// User id of the seeded admin account
pub const SEED_USER_ID: &str = "user1";

/// All in-memory services behind the API.
///
/// Built once at startup and shared by reference into every request; the
/// services guard their own collections, so the state itself needs no lock.
pub struct AppState {
    pub config: ApiConfig,
    pub sessions: SessionService,
    pub dashboards: DashboardStore,
    pub registry: DeviceRegistry,
    pub scheduler: Scheduler,
    pub notifications: NotificationService,
    pub integrations: IntegrationsService,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

impl AppState {
    /// Production state: system clock, random ids, seeded demo data
    pub fn new(config: ApiConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(SystemClock::new()),
            Arc::new(UuidIdGenerator::new()),
        )
    }

    /// State with injectable clock and id generator. Seeds the admin
    /// account, its dashboard with two lights, and the built-in
    /// integrations.
    pub fn with_parts(
        config: ApiConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let sessions = SessionService::new();
        sessions.add_user(User::new(
            SEED_USER_ID,
            config.admin_username.clone(),
            config.admin_password.clone(),
        ));

        let dashboards = DashboardStore::new();
        dashboards
            .add_device(
                SEED_USER_ID,
                Device::Light(Light::new("light1", "Living Room Light")),
            )
            .expect("fresh store accepts light1");
        dashboards
            .add_device(
                SEED_USER_ID,
                Device::Light(Light::new("light2", "Bedroom Light")),
            )
            .expect("fresh store accepts light2");

        AppState {
            config,
            sessions,
            dashboards,
            registry: DeviceRegistry::with_builtins(),
            scheduler: Scheduler::new(),
            notifications: NotificationService::new(),
            integrations: IntegrationsService::with_builtins(),
            clock,
            ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_home_backend::shared::id_generator::SequenceIdGenerator;
    use smart_home_backend::shared::time::FixedClock;

    fn test_state() -> AppState {
        AppState::with_parts(
            ApiConfig::default(),
            Arc::new(FixedClock::from_rfc3339("2024-01-15T10:00:00Z").unwrap()),
            Arc::new(SequenceIdGenerator::from_strings(&["id1", "id2", "id3"])),
        )
    }

    #[test]
    fn test_seeded_dashboard() {
        let state = test_state();
        let devices = state.dashboards.list_devices(SEED_USER_ID);

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].device_id, "light1");
        assert_eq!(devices[0].device_name, "Living Room Light");
        assert_eq!(devices[0].status, "off");
        assert_eq!(devices[1].device_id, "light2");
    }

    #[test]
    fn test_seeded_admin_can_authenticate() {
        let state = test_state();

        let token = state
            .sessions
            .authenticate("admin", "password123", state.ids.as_ref())
            .unwrap();
        assert_eq!(token, "id1");
        assert_eq!(state.sessions.resolve(&token).unwrap().user_id, "user1");
    }

    #[test]
    fn test_seeded_integrations() {
        let state = test_state();
        assert_eq!(state.integrations.list().len(), 3);
        assert_eq!(state.integrations.stats().connected_count, 0);
    }
}
