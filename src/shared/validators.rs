use chrono::{DateTime, Utc};

use crate::error::CoreError;

/// Inclusive brightness range for lights
pub const BRIGHTNESS_MIN: i64 = 0;
pub const BRIGHTNESS_MAX: i64 = 100;

/// Inclusive target temperature range for thermostats (°C)
pub const TARGET_TEMP_MIN: f64 = 10.0;
pub const TARGET_TEMP_MAX: f64 = 35.0;

/// Validate a brightness level is within 0..=100
pub fn validate_brightness(level: i64) -> Result<(), CoreError> {
    if (BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&level) {
        Ok(())
    } else {
        Err(CoreError::InvalidBrightness(level))
    }
}

/// Validate a thermostat target temperature is within [10.0, 35.0]
pub fn validate_target_temperature(target: f64) -> Result<(), CoreError> {
    if (TARGET_TEMP_MIN..=TARGET_TEMP_MAX).contains(&target) && target.is_finite() {
        Ok(())
    } else {
        Err(CoreError::InvalidTargetTemperature(target))
    }
}

/// Parse a scheduled-time string as an ISO-8601 / RFC3339 timestamp.
///
/// Malformed timestamps yield `None` rather than an error: a task with an
/// unparseable time is treated as never due.
pub fn parse_scheduled_time(scheduled_time: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(scheduled_time)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}
