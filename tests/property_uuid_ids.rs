//! Property Test: UUID v4 Session and Device Ids
//!
//! This property test verifies that:
//! - The production id generator only emits well-formed UUID v4 strings
//! - Generated ids are unique across a run
//! - The UUID v4 shape check agrees with generated examples

use proptest::prelude::*;
use smart_home_backend::test_utils::{generators, helpers};
use smart_home_backend::{IdGenerator, UuidIdGenerator};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: all generated valid UUID v4 strings pass the shape check
    #[test]
    fn prop_valid_uuid_v4_accepted(uuid in generators::uuid_v4()) {
        prop_assert!(
            helpers::is_valid_uuid_v4(&uuid),
            "Valid UUID v4 {} should be accepted",
            uuid
        );
    }
}

#[test]
fn test_uuid_generator_emits_valid_v4() {
    let ids = UuidIdGenerator::new();
    for _ in 0..50 {
        let id = ids.next_id();
        assert!(helpers::is_valid_uuid_v4(&id), "Bad id: {}", id);
    }
}

#[test]
fn test_uuid_generator_ids_are_unique() {
    let ids = UuidIdGenerator::new();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..1000 {
        assert!(seen.insert(ids.next_id()));
    }
}

#[test]
fn test_specific_invalid_shapes() {
    assert!(!helpers::is_valid_uuid_v4("not-a-uuid"));
    assert!(!helpers::is_valid_uuid_v4("550e8400-e29b-11d4-a716-446655440000")); // UUID v1
    assert!(!helpers::is_valid_uuid_v4(""));
    assert!(helpers::is_valid_uuid_v4("550e8400-e29b-41d4-a716-446655440000"));
}
