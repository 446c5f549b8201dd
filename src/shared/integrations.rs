use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of an integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    Active,
    Inactive,
    Error,
}

impl IntegrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationStatus::Active => "active",
            IntegrationStatus::Inactive => "inactive",
            IntegrationStatus::Error => "error",
        }
    }
}

impl fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A voice-assistant integration record. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub name: String,
    pub status: IntegrationStatus,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub connected: bool,
}

impl Integration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: IntegrationStatus::Inactive,
            description: description.into(),
            features: Vec::new(),
            commands: Vec::new(),
            skills: Vec::new(),
            connected: false,
        }
    }

    fn with_capabilities(mut self, features: &[&str], commands: &[&str]) -> Self {
        self.features = features.iter().map(|s| s.to_string()).collect();
        self.commands = commands.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Connected/total counts across the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStats {
    pub connected_count: usize,
    pub total_count: usize,
}

/// In-memory registry of integrations, keyed by name.
///
/// The vector keeps registration order; lookups scan it. One lock guards the
/// whole registry so uniqueness checks and inserts are atomic.
pub struct IntegrationsService {
    integrations: RwLock<Vec<Integration>>,
}

impl IntegrationsService {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            integrations: RwLock::new(Vec::new()),
        }
    }

    /// Registry seeded with the built-in voice assistants, all inactive and
    /// disconnected.
    pub fn with_builtins() -> Self {
        let service = Self::new();
        {
            let mut integrations = service
                .integrations
                .write()
                .expect("integrations lock poisoned");
            integrations.push(
                Integration::new("alexa", "Amazon Alexa voice assistant").with_capabilities(
                    &["voice_control", "routines", "announcements"],
                    &["turn on", "turn off", "set brightness", "set temperature"],
                ),
            );
            integrations.push(
                Integration::new("google_home", "Google Home voice assistant").with_capabilities(
                    &["voice_control", "routines", "broadcast"],
                    &["turn on", "turn off", "dim", "set temperature"],
                ),
            );
            integrations.push(
                Integration::new("homekit", "Apple HomeKit bridge").with_capabilities(
                    &["siri_control", "scenes", "automations"],
                    &["turn on", "turn off", "set brightness"],
                ),
            );
        }
        service
    }

    /// All integrations in registration order
    pub fn list(&self) -> Vec<Integration> {
        self.integrations
            .read()
            .expect("integrations lock poisoned")
            .clone()
    }

    pub fn get(&self, name: &str) -> Result<Integration, CoreError> {
        self.integrations
            .read()
            .expect("integrations lock poisoned")
            .iter()
            .find(|i| i.name == name)
            .cloned()
            .ok_or_else(|| CoreError::IntegrationNotFound(name.to_string()))
    }

    /// Register a new integration. Names are unique; duplicates are refused.
    pub fn create(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Integration, CoreError> {
        let mut integrations = self
            .integrations
            .write()
            .expect("integrations lock poisoned");
        if integrations.iter().any(|i| i.name == name) {
            return Err(CoreError::DuplicateIntegration(name.to_string()));
        }
        let integration = Integration::new(name, description.unwrap_or_default());
        integrations.push(integration.clone());
        Ok(integration)
    }

    pub fn activate(&self, name: &str) -> Result<Integration, CoreError> {
        self.update(name, |i| i.status = IntegrationStatus::Active)
    }

    pub fn deactivate(&self, name: &str) -> Result<Integration, CoreError> {
        self.update(name, |i| i.status = IntegrationStatus::Inactive)
    }

    /// Flip the connected flag and return the new record
    pub fn toggle_connection(&self, name: &str) -> Result<Integration, CoreError> {
        self.update(name, |i| i.connected = !i.connected)
    }

    /// Add a skill to an integration. Adding a skill it already has is a
    /// no-op, not an error.
    pub fn add_skill(&self, name: &str, skill: &str) -> Result<Integration, CoreError> {
        self.update(name, |i| {
            if !i.skills.iter().any(|s| s == skill) {
                i.skills.push(skill.to_string());
            }
        })
    }

    pub fn skills(&self, name: &str) -> Result<Vec<String>, CoreError> {
        Ok(self.get(name)?.skills)
    }

    pub fn stats(&self) -> IntegrationStats {
        let integrations = self
            .integrations
            .read()
            .expect("integrations lock poisoned");
        IntegrationStats {
            connected_count: integrations.iter().filter(|i| i.connected).count(),
            total_count: integrations.len(),
        }
    }

    fn update(
        &self,
        name: &str,
        f: impl FnOnce(&mut Integration),
    ) -> Result<Integration, CoreError> {
        let mut integrations = self
            .integrations
            .write()
            .expect("integrations lock poisoned");
        let integration = integrations
            .iter_mut()
            .find(|i| i.name == name)
            .ok_or_else(|| CoreError::IntegrationNotFound(name.to_string()))?;
        f(integration);
        Ok(integration.clone())
    }
}

impl Default for IntegrationsService {
    fn default() -> Self {
        Self::with_builtins()
    }
}
