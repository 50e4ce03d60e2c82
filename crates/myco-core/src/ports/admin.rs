//! Admin identity port.

/// Decides whether a signed-in identity is the site administrator.
///
/// Injected so moderation can be exercised without a real identity provider.
pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, email: Option<&str>) -> bool;
}

impl<F> AdminPolicy for F
where
    F: Fn(Option<&str>) -> bool + Send + Sync,
{
    fn is_admin(&self, email: Option<&str>) -> bool {
        self(email)
    }
}
