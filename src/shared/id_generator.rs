use uuid::Uuid;

/// IdGenerator trait for abstracting identifier generation.
/// Device ids, task ids and session tokens are all opaque UUID v4 strings.
pub trait IdGenerator: Send + Sync {
    /// Generate a fresh identifier (hyphenated lowercase UUID v4)
    fn next_id(&self) -> String;
}

/// Production implementation backed by random UUID v4 generation
#[derive(Debug, Clone, Default)]
pub struct UuidIdGenerator;

impl UuidIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Test implementation returning a fixed sequence of ids, wrapping around
/// when exhausted. Useful for deterministic testing.
#[derive(Debug, Clone)]
pub struct SequenceIdGenerator {
    ids: Vec<String>,
    index: std::sync::Arc<std::sync::Mutex<usize>>,
}

impl SequenceIdGenerator {
    pub fn new(ids: Vec<String>) -> Self {
        assert!(!ids.is_empty(), "SequenceIdGenerator requires at least one id");
        Self {
            ids,
            index: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }

    /// Generator that always returns the same id
    pub fn single(id: impl Into<String>) -> Self {
        Self::new(vec![id.into()])
    }

    pub fn from_strings(ids: &[&str]) -> Self {
        Self::new(ids.iter().map(|s| s.to_string()).collect())
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> String {
        let mut index = self.index.lock().unwrap();
        let id = self.ids[*index % self.ids.len()].clone();
        *index += 1;
        id
    }
}
