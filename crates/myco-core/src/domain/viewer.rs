use serde::Serialize;

use crate::ports::AdminPolicy;

/// Whoever is looking at the site right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Viewer {
    pub email: Option<String>,
    pub is_admin: bool,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Derive admin-ness from the signed-in email through the injected policy.
    pub fn resolve(email: Option<String>, policy: &dyn AdminPolicy) -> Self {
        let is_admin = policy.is_admin(email.as_deref());
        Self { email, is_admin }
    }

    pub fn is_signed_in(&self) -> bool {
        self.email.is_some()
    }
}
