//! Single-address admin policy.

use myco_core::ports::AdminPolicy;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@mushroomservice.com";

/// Treats exactly one email address as the administrator.
#[derive(Debug, Clone)]
pub struct EmailAdminPolicy {
    admin_email: String,
}

impl EmailAdminPolicy {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
        )
    }
}

impl Default for EmailAdminPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_EMAIL)
    }
}

impl AdminPolicy for EmailAdminPolicy {
    fn is_admin(&self, email: Option<&str>) -> bool {
        email.is_some_and(|e| e == self.admin_email)
    }
}
