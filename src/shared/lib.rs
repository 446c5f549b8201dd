// Declare modules at the root level
pub mod dashboard;
pub mod device;
pub mod error;
pub mod factory;
pub mod id_generator;
pub mod integrations;
pub mod notifications;
pub mod scheduler;
pub mod sessions;
pub mod time;
pub mod validators;

// Test utilities module (available in test and integration test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export everything under a shared namespace for external access
pub mod shared {
    pub use super::dashboard;
    pub use super::device;
    pub use super::error;
    pub use super::factory;
    pub use super::id_generator;
    pub use super::integrations;
    pub use super::notifications;
    pub use super::scheduler;
    pub use super::sessions;
    pub use super::time;
    pub use super::validators;
}

// Also re-export at root for convenience
pub use dashboard::*;
pub use device::*;
pub use error::*;
pub use factory::*;
pub use id_generator::*;
pub use integrations::*;
pub use notifications::*;
pub use scheduler::*;
pub use sessions::*;
pub use time::*;
pub use validators::*;
