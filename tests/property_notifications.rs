//! Property Test: Notification History Ordering
//!
//! This property test verifies that:
//! - `recent(limit)` returns at most `limit` events
//! - Returned events are newest-first
//! - History length always equals the number of published events

use proptest::prelude::*;
use smart_home_backend::test_utils::helpers;
use smart_home_backend::{event_types, NotificationService};

fn publish_numbered(service: &NotificationService, count: usize) {
    let clock = helpers::fixed_clock();
    for i in 0..count {
        service.publish(
            format!("event {}", i),
            "light1",
            event_types::DEVICE_TOGGLED,
            serde_json::Value::Null,
            clock.as_ref(),
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: recent(limit) never exceeds the limit or the history size
    #[test]
    fn prop_recent_respects_limit(count in 0usize..40, limit in 1usize..40) {
        let service = NotificationService::new();
        publish_numbered(&service, count);

        let recent = service.recent(limit);
        prop_assert_eq!(recent.len(), count.min(limit));
        prop_assert_eq!(service.history_len(), count);
    }

    /// Property: recent events come back newest-first
    #[test]
    fn prop_recent_is_newest_first(count in 1usize..40, limit in 1usize..40) {
        let service = NotificationService::new();
        publish_numbered(&service, count);

        let recent = service.recent(limit);
        for (offset, event) in recent.iter().enumerate() {
            let expected = format!("event {}", count - 1 - offset);
            prop_assert_eq!(&event.message, &expected);
        }
    }

    /// Property: publishing past the limit only ever drops the oldest
    /// events from view, never reorders the survivors
    #[test]
    fn prop_window_slides_forward(count in 5usize..40) {
        let service = NotificationService::new();
        publish_numbered(&service, count);

        let limit = 5;
        let window = service.recent(limit);
        let messages: Vec<&str> = window.iter().map(|e| e.message.as_str()).collect();
        let expected: Vec<String> = (count - limit..count)
            .rev()
            .map(|i| format!("event {}", i))
            .collect();
        prop_assert_eq!(messages, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
