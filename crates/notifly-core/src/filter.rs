// ── Admin console login suppression ──

/// Drops the events the configured administrator causes by logging in
/// to the controller console.
#[derive(Debug, Clone)]
pub struct AdminLoginFilter {
    prefix: String,
}

impl AdminLoginFilter {
    pub fn new(admin_name: &str) -> Self {
        Self {
            prefix: format!("Admin[{admin_name}] log in from"),
        }
    }

    pub fn is_suppressed(&self, message: &str) -> bool {
        message.starts_with(&self.prefix)
    }
}
