/// Configuration for the smart home API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Username of the seeded admin account
    pub admin_username: String,
    /// Password of the seeded admin account
    pub admin_password: String,
    /// CORS allowed origin
    pub cors_allowed_origin: String,
}

impl ApiConfig {
    /// Build the configuration from environment variables.
    ///
    /// Every value has a default, so construction never fails; the backend
    /// holds no external connections and no secrets beyond the demo account.
    pub fn from_env() -> Self {
        let admin_username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "password123".to_string());
        let cors_allowed_origin =
            std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string());

        ApiConfig {
            admin_username,
            admin_password,
            cors_allowed_origin,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "password123".to_string(),
            cors_allowed_origin: "*".to_string(),
        }
    }
}
