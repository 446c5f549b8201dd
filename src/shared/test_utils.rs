//! Test utilities for property-based testing
//!
//! Generators and helpers for proptest-based tests: brightness levels,
//! target temperatures, device type tags, RFC3339 timestamps, and UUIDs.

pub mod generators {
    use proptest::prelude::*;

    /// Generate a valid brightness level (0..=100)
    pub fn brightness() -> impl Strategy<Value = i64> {
        0i64..=100
    }

    /// Generate an out-of-range brightness level
    pub fn invalid_brightness() -> impl Strategy<Value = i64> {
        prop_oneof![i64::MIN..0, 101..=i64::MAX]
    }

    /// Generate a valid thermostat target temperature (10.0..=35.0)
    pub fn target_temperature() -> impl Strategy<Value = f64> {
        10.0f64..=35.0
    }

    /// Generate an out-of-range target temperature
    pub fn invalid_target_temperature() -> impl Strategy<Value = f64> {
        prop_oneof![
            -100.0f64..10.0,
            (35.0f64..200.0).prop_map(|t| t + 0.01),
            Just(f64::NAN),
            Just(f64::INFINITY),
        ]
    }

    /// Generate a registered device type tag, in mixed case
    pub fn device_type_tag() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "light",
            "Light",
            "LIGHT",
            "thermostat",
            "Thermostat",
            "security_camera",
            "SecurityCamera",
        ])
        .prop_map(str::to_string)
    }

    /// Generate a device name
    pub fn device_name() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z][A-Za-z0-9 ]{2,40}")
            .expect("Valid regex for device_name")
    }

    /// Generate a valid UUID v4 string
    pub fn uuid_v4() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<u8>(), 16).prop_map(|mut bytes| {
            // Set version to 4 (random)
            bytes[6] = (bytes[6] & 0x0f) | 0x40;
            // Set variant to RFC4122
            bytes[8] = (bytes[8] & 0x3f) | 0x80;

            format!(
                "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
                bytes[0], bytes[1], bytes[2], bytes[3],
                bytes[4], bytes[5],
                bytes[6], bytes[7],
                bytes[8], bytes[9],
                bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
            )
        })
    }

    /// Generate a valid RFC3339 timestamp within 2020-2030
    pub fn rfc3339_timestamp() -> impl Strategy<Value = String> {
        // 2020-01-01 00:00:00 UTC to 2030-12-31 23:59:59 UTC, in seconds
        (1577836800i64..1924991999).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0)
                .expect("timestamp in range")
                .to_rfc3339()
        })
    }

    /// Generate a string that does not parse as RFC3339
    pub fn malformed_timestamp() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("".to_string()),
            Just("tomorrow".to_string()),
            Just("2024-01-15".to_string()),
            Just("2024-13-99T99:99:99Z".to_string()),
            Just("1705314600".to_string()),
        ]
    }
}

pub mod helpers {
    use std::sync::Arc;

    use crate::dashboard::DashboardStore;
    use crate::device::{Device, Light};
    use crate::id_generator::SequenceIdGenerator;
    use crate::sessions::{SessionService, User};
    use crate::time::FixedClock;

    /// The credentials every seeded test account uses
    pub const TEST_USERNAME: &str = "admin";
    pub const TEST_PASSWORD: &str = "password123";
    pub const TEST_USER_ID: &str = "user1";

    /// Session service with the standard admin account
    pub fn seeded_sessions() -> SessionService {
        let sessions = SessionService::new();
        sessions.add_user(User::new(TEST_USER_ID, TEST_USERNAME, TEST_PASSWORD));
        sessions
    }

    /// Dashboard store with the two standard seeded lights
    pub fn seeded_dashboards() -> DashboardStore {
        let store = DashboardStore::new();
        store
            .add_device(
                TEST_USER_ID,
                Device::Light(Light::new("light1", "Living Room Light")),
            )
            .expect("fresh store accepts light1");
        store
            .add_device(
                TEST_USER_ID,
                Device::Light(Light::new("light2", "Bedroom Light")),
            )
            .expect("fresh store accepts light2");
        store
    }

    /// A clock pinned to a known instant
    pub fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(
            FixedClock::from_rfc3339("2024-01-15T10:00:00Z").expect("valid fixed clock time"),
        )
    }

    /// An id generator that yields predictable ids
    pub fn sequential_ids(ids: &[&str]) -> Arc<SequenceIdGenerator> {
        Arc::new(SequenceIdGenerator::from_strings(ids))
    }

    /// Helper to check if a string is a valid UUID v4
    pub fn is_valid_uuid_v4(s: &str) -> bool {
        if s.len() != 36 {
            return false;
        }

        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 5 {
            return false;
        }

        if parts[0].len() != 8
            || parts[1].len() != 4
            || parts[2].len() != 4
            || parts[3].len() != 4
            || parts[4].len() != 12
        {
            return false;
        }

        let version_char = parts[2].chars().next().unwrap();
        let variant_char = parts[3].chars().next().unwrap();

        version_char == '4' && matches!(variant_char, '8' | '9' | 'a' | 'b' | 'A' | 'B')
    }
}
