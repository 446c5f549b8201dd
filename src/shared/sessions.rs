use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::error::CoreError;
use crate::id_generator::IdGenerator;

/// An account in the in-memory user directory.
///
/// Credentials are stored and compared in plaintext; this backend has no
/// durable storage and no password hashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub logged_in: bool,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            password: password.into(),
            logged_in: false,
        }
    }
}

/// User directory plus live session tokens.
///
/// A token maps to exactly one user; a user may hold several tokens at once.
/// Tokens never expire, they only end on explicit logout.
#[derive(Default)]
pub struct SessionService {
    users: RwLock<HashMap<String, User>>,
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a user, keyed by username
    pub fn add_user(&self, user: User) {
        self.users
            .write()
            .expect("user directory lock poisoned")
            .insert(user.username.clone(), user);
    }

    /// Check credentials and open a session, returning the opaque token.
    ///
    /// Unknown username and wrong password are indistinguishable to the
    /// caller.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        ids: &dyn IdGenerator,
    ) -> Result<String, CoreError> {
        let mut users = self.users.write().expect("user directory lock poisoned");
        let user = users
            .get_mut(username)
            .filter(|u| u.password == password)
            .ok_or(CoreError::InvalidCredentials)?;
        user.logged_in = true;
        let user_id = user.user_id.clone();
        drop(users);

        let session_id = ids.next_id();
        self.sessions
            .write()
            .expect("session table lock poisoned")
            .insert(session_id.clone(), user_id);
        Ok(session_id)
    }

    /// Resolve a live session token to its user
    pub fn resolve(&self, session_id: &str) -> Result<User, CoreError> {
        let sessions = self.sessions.read().expect("session table lock poisoned");
        let user_id = sessions.get(session_id).ok_or(CoreError::InvalidSession)?;

        let users = self.users.read().expect("user directory lock poisoned");
        users
            .values()
            .find(|u| &u.user_id == user_id)
            .cloned()
            .ok_or(CoreError::InvalidSession)
    }

    /// Destroy a session token and mark its user logged out
    pub fn end_session(&self, session_id: &str) -> Result<(), CoreError> {
        let user_id = self
            .sessions
            .write()
            .expect("session table lock poisoned")
            .remove(session_id)
            .ok_or(CoreError::InvalidSession)?;

        let mut users = self.users.write().expect("user directory lock poisoned");
        if let Some(user) = users.values_mut().find(|u| u.user_id == user_id) {
            user.logged_in = false;
        }
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .expect("session table lock poisoned")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::{SequenceIdGenerator, UuidIdGenerator};

    fn service_with_admin() -> SessionService {
        let service = SessionService::new();
        service.add_user(User::new("user1", "admin", "password123"));
        service
    }

    #[test]
    fn test_authenticate_issues_token_and_marks_logged_in() {
        let service = service_with_admin();
        let ids = SequenceIdGenerator::single("session-token-1");

        let token = service.authenticate("admin", "password123", &ids).unwrap();
        assert_eq!(token, "session-token-1");

        let user = service.resolve(&token).unwrap();
        assert_eq!(user.user_id, "user1");
        assert!(user.logged_in);
    }

    #[test]
    fn test_authenticate_rejects_bad_credentials() {
        let service = service_with_admin();
        let ids = UuidIdGenerator::new();

        assert_eq!(
            service.authenticate("admin", "wrong", &ids),
            Err(CoreError::InvalidCredentials)
        );
        assert_eq!(
            service.authenticate("nobody", "password123", &ids),
            Err(CoreError::InvalidCredentials)
        );
        assert_eq!(service.session_count(), 0);
    }

    #[test]
    fn test_concurrent_sessions_per_user() {
        let service = service_with_admin();
        let ids = UuidIdGenerator::new();

        let first = service.authenticate("admin", "password123", &ids).unwrap();
        let second = service.authenticate("admin", "password123", &ids).unwrap();

        assert_ne!(first, second);
        assert_eq!(service.resolve(&first).unwrap().user_id, "user1");
        assert_eq!(service.resolve(&second).unwrap().user_id, "user1");
    }

    #[test]
    fn test_resolve_unknown_token() {
        let service = service_with_admin();
        assert_eq!(
            service.resolve("not-a-session"),
            Err(CoreError::InvalidSession)
        );
    }

    #[test]
    fn test_end_session_destroys_token() {
        let service = service_with_admin();
        let ids = UuidIdGenerator::new();
        let token = service.authenticate("admin", "password123", &ids).unwrap();

        service.end_session(&token).unwrap();

        assert_eq!(service.resolve(&token), Err(CoreError::InvalidSession));
        assert_eq!(service.end_session(&token), Err(CoreError::InvalidSession));
        assert_eq!(service.session_count(), 0);
    }

    #[test]
    fn test_serialized_user_hides_password() {
        let user = User::new("user1", "admin", "password123");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password123"));
        assert!(json.contains(r#""username":"admin""#));
    }
}
