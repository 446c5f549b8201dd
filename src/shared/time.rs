use chrono::{DateTime, Duration, Utc};

/// Clock trait for abstracting time operations.
/// Event timestamps and due-time evaluation both go through this trait so
/// tests can pin the current time.
pub trait Clock: Send + Sync {
    /// Get the current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// Get current time as RFC3339 string (for event and task timestamps)
    /// Format: "2024-01-15T10:30:00Z"
    fn now_rfc3339(&self) -> String {
        self.now().to_rfc3339()
    }
}

/// Production implementation of Clock using system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test implementation of Clock with a fixed, controllable time
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    /// Create a FixedClock from an RFC3339 string
    pub fn from_rfc3339(timestamp_str: &str) -> Result<Self, chrono::ParseError> {
        let timestamp = DateTime::parse_from_rfc3339(timestamp_str)?.with_timezone(&Utc);
        Ok(Self { timestamp })
    }

    /// Advance the fixed time by the given number of seconds
    pub fn advance_seconds(&mut self, seconds: i64) {
        self.timestamp += Duration::seconds(seconds);
    }

    pub fn set_time(&mut self, timestamp: DateTime<Utc>) {
        self.timestamp = timestamp;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
